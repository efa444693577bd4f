use crate::core::errors::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Process '{pid}' not found")]
    NotFound { pid: u32 },

    #[error("Failed to signal process '{pid}': {message}")]
    SignalFailed { pid: u32, message: String },
}

impl AppError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::NotFound { .. } => "PROCESS_NOT_FOUND",
            ProcessError::SignalFailed { .. } => "PROCESS_SIGNAL_FAILED",
        }
    }
}
