use crate::core::errors::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Not inside a git repository")]
    NotInRepository,

    #[error("A cleanup mode is required when not running on a terminal")]
    ModeRequired,

    #[error("Unknown cleanup mode: '{mode}'")]
    UnknownMode { mode: String },

    #[error("Interactive selection failed: {message}")]
    SelectionFailed { message: String },

    #[error("Git operation failed: {source}")]
    GitError {
        #[from]
        source: crate::git::errors::GitError,
    },

    #[error("State update failed: {source}")]
    SessionError {
        #[from]
        source: crate::sessions::errors::SessionError,
    },

    #[error("IO operation failed: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl AppError for CleanupError {
    fn error_code(&self) -> &'static str {
        match self {
            CleanupError::NotInRepository => "NOT_IN_REPOSITORY",
            CleanupError::ModeRequired => "MODE_REQUIRED",
            CleanupError::UnknownMode { .. } => "UNKNOWN_MODE",
            CleanupError::SelectionFailed { .. } => "SELECTION_FAILED",
            CleanupError::GitError { .. } => "GIT_ERROR",
            CleanupError::SessionError { .. } => "STATE_ERROR",
            CleanupError::IoError { .. } => "IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            CleanupError::NotInRepository
                | CleanupError::ModeRequired
                | CleanupError::UnknownMode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_error_codes() {
        assert_eq!(CleanupError::NotInRepository.error_code(), "NOT_IN_REPOSITORY");
        assert!(CleanupError::NotInRepository.is_user_error());

        let error = CleanupError::UnknownMode {
            mode: "bogus".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown cleanup mode: 'bogus'");
        assert!(error.is_user_error());
    }
}
