use crate::core::errors::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Not inside a git repository")]
    NotInRepository,

    #[error("Worktree not found at path: {path}")]
    WorktreeNotFound { path: String },

    #[error("Worktree already exists at path: {path}")]
    WorktreeAlreadyExists { path: String },

    #[error("Worktree at {path} has modified or untracked files")]
    WorktreeDirty { path: String },

    #[error("Invalid branch name: '{name}'")]
    InvalidBranchName { name: String },

    #[error("Git operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Git error: {source}")]
    Git2Error {
        #[from]
        source: git2::Error,
    },

    #[error("IO operation failed: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl AppError for GitError {
    fn error_code(&self) -> &'static str {
        match self {
            GitError::NotInRepository => "NOT_IN_REPOSITORY",
            GitError::WorktreeNotFound { .. } => "WORKTREE_NOT_FOUND",
            GitError::WorktreeAlreadyExists { .. } => "WORKTREE_ALREADY_EXISTS",
            GitError::WorktreeDirty { .. } => "WORKTREE_DIRTY",
            GitError::InvalidBranchName { .. } => "INVALID_BRANCH_NAME",
            GitError::OperationFailed { .. } => "GIT_OPERATION_FAILED",
            GitError::Git2Error { .. } => "GIT_ERROR",
            GitError::IoError { .. } => "IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GitError::NotInRepository
                | GitError::WorktreeNotFound { .. }
                | GitError::WorktreeAlreadyExists { .. }
                | GitError::WorktreeDirty { .. }
                | GitError::InvalidBranchName { .. }
        )
    }
}
