//! 核心错误类型定义

use keyseal_crypto::error::{pack_code, queue};
use thiserror::Error;

/// Library number packed into the high byte of every error code
pub const LIB_CORE: u32 = 3;

/// 核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    /// 加密错误
    #[error("Crypto error: {0}")]
    CryptoError(#[from] keyseal_crypto::Error),

    /// 密钥错误
    #[error("Key error: {0}")]
    KeyError(#[from] keyseal_key::Error),

    /// 配置错误
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// 数字信封错误
    #[error("Envelope error: {0}")]
    EnvelopeError(String),

    /// 没有接收者
    #[error("Envelope needs at least one recipient")]
    NoRecipients,

    /// 密钥协商错误
    #[error("Key agreement error: {0}")]
    AgreementError(String),

    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl CoreError {
    /// Numeric error code; errors from lower layers keep their own code
    pub fn code(&self) -> u32 {
        let reason = match self {
            CoreError::CryptoError(e) => return e.code(),
            CoreError::KeyError(e) => return e.code(),
            CoreError::SettingsError(_) => 1,
            CoreError::EnvelopeError(_) => 2,
            CoreError::NoRecipients => 3,
            CoreError::AgreementError(_) => 4,
            CoreError::Other(_) => 100,
        };
        pack_code(LIB_CORE, reason)
    }

    /// Push this error onto the calling thread's error queue and hand it back
    pub fn record(self) -> Self {
        queue::push(self.code(), self.to_string());
        self
    }
}

/// 核心操作结果类型
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CoreError::NoRecipients.code(), (3 << 24) | 3);
        let key_err = keyseal_key::Error::NotPrivateKey;
        let code = key_err.code();
        assert_eq!(CoreError::from(key_err).code(), code);
    }

    #[test]
    fn test_record_renders_library() {
        queue::clear();
        let _ = CoreError::EnvelopeError("bad".to_string()).record();
        let rendered = queue::pop().unwrap().render();
        assert!(rendered.starts_with("error:03000002:core:"));
    }
}
