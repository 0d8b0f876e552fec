use keyseal_crypto::error::{pack_code, queue};
use thiserror::Error;

/// Library number packed into the high byte of every error code
pub const LIB_KEY: u32 = 2;

/// Key模块的错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 密钥相关错误
    #[error("Key error: {0}")]
    KeyError(String),

    /// 签名相关错误
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// 密钥导入错误
    #[error("Key import error: {0}")]
    ImportError(String),

    /// 密钥导出错误
    #[error("Key export error: {0}")]
    ExportError(String),

    /// 编码解析错误
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 不支持的算法
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// 算法不支持该操作
    #[error("{algorithm} keys do not support {operation}")]
    Unsupported {
        algorithm: &'static str,
        operation: &'static str,
    },

    /// 需要私钥
    #[error("Key object is not a private key")]
    NotPrivateKey,

    /// 无法判断是否为私钥
    #[error("Cannot determine whether the key is private")]
    IndeterminatePrivacy,

    /// 参数无效
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// 证书相关错误
    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("Crypto error: {0}")]
    CryptoError(#[from] keyseal_crypto::Error),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Numeric error code; errors from the primitive layer keep their own code
    pub fn code(&self) -> u32 {
        let reason = match self {
            Error::CryptoError(e) => return e.code(),
            Error::KeyError(_) => 1,
            Error::SignatureError(_) => 2,
            Error::ImportError(_) => 3,
            Error::ExportError(_) => 4,
            Error::ParseError(_) => 5,
            Error::UnsupportedAlgorithm(_) => 6,
            Error::Unsupported { .. } => 7,
            Error::NotPrivateKey => 8,
            Error::IndeterminatePrivacy => 9,
            Error::InvalidParameter { .. } => 10,
            Error::CertificateError(_) => 11,
            Error::IoError(_) => 12,
            Error::Other(_) => 100,
        };
        pack_code(LIB_KEY, reason)
    }

    /// Push this error onto the calling thread's error queue and hand it back
    pub fn record(self) -> Self {
        queue::push(self.code(), self.to_string());
        self
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result类型别名
pub type Result<T> = std::result::Result<T, Error>;
