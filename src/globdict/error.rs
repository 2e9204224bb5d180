use thiserror::Error;

/// Errors raised by the layers around the dictionary core.
///
/// The core operations themselves are total and never produce one of these;
/// only configuration, scripts and the CLI do.
#[derive(Error, Debug)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Expectation failed on line {line}: {message}")]
    Expectation { line: usize, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DictError>;
