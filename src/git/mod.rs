pub mod errors;
pub mod handler;
pub mod operations;
pub mod types;

// Public API exports
pub use errors::GitError;
pub use handler::{create_worktree, discover_repo, list_worktrees, remove_worktree};
pub use operations::classify_worktrees;
pub use types::{BranchStatus, WorktreeInfo};
