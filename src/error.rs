use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The sanitized series is shorter than the slowest indicator needs.
    #[error("Insufficient data: need at least {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bar input that is not a JSON array.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub fn insufficient(required: usize, actual: usize) -> Self {
        EngineError::InsufficientData { required, actual }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
