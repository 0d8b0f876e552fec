use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] keyseal_crypto::Error),

    #[error("Key error: {0}")]
    Key(#[from] keyseal_key::Error),

    #[error("{0}")]
    Core(#[from] keyseal_core::CoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No usable key in {0}")]
    NoKey(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl CliError {
    /// Packed library code when the error came from a library crate
    pub fn code(&self) -> Option<u32> {
        match self {
            CliError::Crypto(e) => Some(e.code()),
            CliError::Key(e) => Some(e.code()),
            CliError::Core(e) => Some(e.code()),
            _ => None,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
