use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlzgenError {
    /// Missing or malformed reference data. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A request the scorer cannot serve, e.g. an unknown age bracket.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AlzgenError {
    pub fn config(msg: impl Into<String>) -> Self {
        AlzgenError::Configuration(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AlzgenError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AlzgenError>;
