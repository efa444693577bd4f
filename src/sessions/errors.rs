use crate::core::errors::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to serialize state: {message}")]
    SerializeFailed { message: String },

    #[error("IO operation failed: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl AppError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::SerializeFailed { .. } => "STATE_SERIALIZE_FAILED",
            SessionError::IoError { .. } => "IO_ERROR",
        }
    }
}
