pub mod queue;

use thiserror::Error;

pub use queue::{error_string, ErrorRecord};

/// Library number packed into the high byte of every error code
pub const LIB_CRYPTO: u32 = 1;

/// Pack a library number and a reason into a single error code
pub const fn pack_code(library: u32, reason: u32) -> u32 {
    (library << 24) | (reason & 0x00ff_ffff)
}

/// Crypto模块的错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("PKCS8 error: {0}")]
    Pkcs8Error(#[from] pkcs8::Error),

    #[error("SPKI error: {0}")]
    SpkiError(#[from] pkcs8::spki::Error),

    #[error("DER error: {0}")]
    DerError(#[from] der::Error),

    #[error("PEM error: {0}")]
    PemError(#[from] pem::PemError),

    #[error("RSA error: {0}")]
    RsaError(#[from] rsa::Error),

    /// 摘要算法名称无法解析
    #[error("Unknown digest: {0}")]
    UnknownDigest(String),

    /// 对称算法名称无法解析
    #[error("Unknown cipher: {0}")]
    UnknownCipher(String),

    /// 填充模式名称无法解析
    #[error("Unknown padding: {0}")]
    UnknownPadding(String),

    #[error("Padding {padding} is not supported for {operation}")]
    UnsupportedPadding {
        padding: &'static str,
        operation: &'static str,
    },

    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// 填充校验失败
    #[error("Padding check failed: {0}")]
    PaddingError(String),

    #[error("Data too large for key size: {0} bytes")]
    DataTooLarge(usize),

    #[error("Cipher error: {0}")]
    CipherError(String),

    /// DH 参数或公钥校验失败
    #[error("DH error: {0}")]
    DhError(String),

    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Numeric error code, `(LIB_CRYPTO << 24) | reason`
    pub fn code(&self) -> u32 {
        let reason = match self {
            Error::Pkcs8Error(_) => 1,
            Error::SpkiError(_) => 2,
            Error::DerError(_) => 3,
            Error::PemError(_) => 4,
            Error::RsaError(_) => 5,
            Error::UnknownDigest(_) => 6,
            Error::UnknownCipher(_) => 7,
            Error::UnknownPadding(_) => 8,
            Error::UnsupportedPadding { .. } => 9,
            Error::InvalidKeyLength { .. } => 10,
            Error::PaddingError(_) => 11,
            Error::DataTooLarge(_) => 12,
            Error::CipherError(_) => 13,
            Error::DhError(_) => 14,
            Error::Other(_) => 100,
        };
        pack_code(LIB_CRYPTO, reason)
    }

    /// Push this error onto the calling thread's error queue and hand it back
    pub fn record(self) -> Self {
        queue::push(self.code(), self.to_string());
        self
    }
}

/// Result类型别名
pub type Result<T> = std::result::Result<T, Error>;
