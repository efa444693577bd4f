use std::path::PathBuf;

/// Snapshot of one worktree as enumerated from the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct WorktreeInfo {
    pub branch: String,
    pub path: PathBuf,
    pub is_current: bool,
    /// True for the main checkout. Never a cleanup candidate.
    pub is_primary: bool,
}

impl WorktreeInfo {
    pub fn new(branch: String, path: PathBuf, is_current: bool, is_primary: bool) -> Self {
        Self {
            branch,
            path,
            is_current,
            is_primary,
        }
    }
}

/// Classification of one branch relative to the default branch.
///
/// `is_identical` and `is_merged` are mutually exclusive by construction:
/// a branch pointing at the default branch tip is reported as identical,
/// never as merged.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStatus {
    pub branch: String,
    pub has_remote: bool,
    pub is_merged: bool,
    pub is_identical: bool,
    pub has_uncommitted_changes: bool,
    pub path: PathBuf,
}

impl BranchStatus {
    /// Human-readable tags for display in selection UIs.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if !self.has_remote {
            tags.push("no remote");
        }
        if self.is_identical {
            tags.push("identical to main");
        }
        if self.is_merged {
            tags.push("merged");
        }
        if self.has_uncommitted_changes {
            tags.push("uncommitted changes");
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(has_remote: bool, is_merged: bool, is_identical: bool) -> BranchStatus {
        BranchStatus {
            branch: "feature".to_string(),
            has_remote,
            is_merged,
            is_identical,
            has_uncommitted_changes: false,
            path: PathBuf::from("/tmp/feature"),
        }
    }

    #[test]
    fn test_worktree_info_new() {
        let info = WorktreeInfo::new("main".to_string(), PathBuf::from("/repo"), true, true);
        assert_eq!(info.branch, "main");
        assert!(info.is_primary);
        assert!(info.is_current);
    }

    #[test]
    fn test_tags_remoteless_merged() {
        let tags = status(false, true, false).tags();
        assert_eq!(tags, vec!["no remote", "merged"]);
    }

    #[test]
    fn test_tags_identical() {
        let tags = status(true, false, true).tags();
        assert_eq!(tags, vec!["identical to main"]);
    }

    #[test]
    fn test_tags_empty() {
        assert!(status(true, false, false).tags().is_empty());
    }
}
