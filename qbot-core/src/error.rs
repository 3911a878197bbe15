use thiserror::Error;

/// Errors raised at the platform boundary (collaborators) and at startup.
#[derive(Error, Debug)]
pub enum QbotError {
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QbotError>;
