use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid transport '{value}': {reason}")]
    InvalidTransport { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
