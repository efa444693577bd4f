use git2::{BranchType, Oid, Repository, StatusOptions};
use std::path::Path;
use tracing::debug;

use crate::git::{errors::GitError, types::*};

/// Baseline the classifier compares every branch against. Resolved once per
/// invocation, never per branch.
#[derive(Debug, Clone)]
pub struct ComparisonBaseline {
    /// Display name, e.g. `origin/main` or `main`.
    pub refname: String,
    pub oid: Oid,
}

/// Classify every given worktree's branch against the default branch.
///
/// A lookup failure for a single branch degrades the corresponding flag to
/// `false`; classification never fails because of one branch.
pub fn classify_worktrees(
    repo_path: &Path,
    worktrees: &[WorktreeInfo],
) -> Result<Vec<BranchStatus>, GitError> {
    let repo = Repository::open(repo_path)?;
    let baseline = resolve_comparison_baseline(&repo);

    if baseline.is_none() {
        debug!(
            event = "git.classify.no_baseline",
            repo_path = %repo_path.display(),
            message = "Could not determine default branch, skipping merge analysis"
        );
    }

    let statuses = worktrees
        .iter()
        .map(|worktree| classify_branch(&repo, worktree, baseline.as_ref()))
        .collect();

    Ok(statuses)
}

fn classify_branch(
    repo: &Repository,
    worktree: &WorktreeInfo,
    baseline: Option<&ComparisonBaseline>,
) -> BranchStatus {
    let branch = &worktree.branch;

    let has_remote = branch_has_remote(repo, branch);
    let branch_oid = branch_oid(repo, branch);

    let is_identical = match (branch_oid, baseline) {
        (Some(oid), Some(baseline)) => oid == baseline.oid,
        _ => false,
    };

    // Identical branches are excluded from "merged" so the two flags never
    // overlap.
    let is_merged = if is_identical {
        false
    } else {
        match (branch_oid, baseline) {
            (Some(oid), Some(baseline)) => repo
                .graph_descendant_of(baseline.oid, oid)
                .unwrap_or_else(|e| {
                    debug!(
                        event = "git.classify.ancestry_check_failed",
                        branch = branch,
                        error = %e
                    );
                    false
                }),
            _ => false,
        }
    };

    let has_uncommitted_changes = has_uncommitted_changes(&worktree.path);

    debug!(
        event = "git.classify.branch_completed",
        branch = branch,
        has_remote = has_remote,
        is_identical = is_identical,
        is_merged = is_merged,
        has_uncommitted_changes = has_uncommitted_changes
    );

    BranchStatus {
        branch: branch.clone(),
        has_remote,
        is_merged,
        is_identical,
        has_uncommitted_changes,
        path: worktree.path.clone(),
    }
}

/// Resolve the default branch and the ref it should be compared against.
///
/// Prefers the remote `HEAD` symbolic reference, then `main`, then `master`,
/// then the current branch. The remote-tracking ref of the resolved name is
/// used as the comparison baseline when it exists.
pub fn resolve_comparison_baseline(repo: &Repository) -> Option<ComparisonBaseline> {
    let default_branch = resolve_default_branch(repo)?;

    let remote_ref = format!("origin/{}", default_branch);
    if let Ok(object) = repo.revparse_single(&remote_ref) {
        return Some(ComparisonBaseline {
            refname: remote_ref,
            oid: object.id(),
        });
    }

    let oid = branch_oid(repo, &default_branch)?;
    Some(ComparisonBaseline {
        refname: default_branch,
        oid,
    })
}

fn resolve_default_branch(repo: &Repository) -> Option<String> {
    // Remote HEAD is authoritative when present; it often is not.
    if let Ok(head_ref) = repo.find_reference("refs/remotes/origin/HEAD") {
        if let Some(target) = head_ref.symbolic_target() {
            if let Some(name) = target.strip_prefix("refs/remotes/origin/") {
                return Some(name.to_string());
            }
        }
    }

    for name in ["main", "master"] {
        if repo.find_branch(name, BranchType::Local).is_ok() {
            return Some(name.to_string());
        }
    }

    repo.head()
        .ok()
        .and_then(|head| head.shorthand().map(|s| s.to_string()))
}

/// True iff the branch has a configured remote-tracking entry.
pub fn branch_has_remote(repo: &Repository, branch: &str) -> bool {
    match repo.config() {
        Ok(config) => config
            .get_string(&format!("branch.{}.remote", branch))
            .is_ok(),
        Err(e) => {
            debug!(
                event = "git.classify.remote_check_failed",
                branch = branch,
                error = %e
            );
            false
        }
    }
}

fn branch_oid(repo: &Repository, branch: &str) -> Option<Oid> {
    match repo.revparse_single(branch) {
        Ok(object) => Some(object.id()),
        Err(e) => {
            debug!(
                event = "git.classify.rev_parse_failed",
                branch = branch,
                error = %e
            );
            None
        }
    }
}

/// True iff the worktree has any staged, unstaged, or untracked entries.
/// Failures degrade to `false`.
pub fn has_uncommitted_changes(worktree_path: &Path) -> bool {
    let repo = match Repository::open(worktree_path) {
        Ok(repo) => repo,
        Err(e) => {
            debug!(
                event = "git.status.open_failed",
                worktree_path = %worktree_path.display(),
                error = %e
            );
            return false;
        }
    };

    let mut options = StatusOptions::new();
    options.include_untracked(true).include_ignored(false);

    let dirty = match repo.statuses(Some(&mut options)) {
        Ok(statuses) => !statuses.is_empty(),
        Err(e) => {
            debug!(
                event = "git.status.check_failed",
                worktree_path = %worktree_path.display(),
                error = %e
            );
            false
        }
    };
    dirty
}

pub fn validate_branch_name(branch: &str) -> Result<String, GitError> {
    let trimmed = branch.trim();

    if trimmed.is_empty()
        || trimmed.contains("..")
        || trimmed.starts_with('-')
        || trimmed.contains(' ')
    {
        return Err(GitError::InvalidBranchName {
            name: branch.to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// Worktree names registered with git cannot contain path separators.
pub fn worktree_name_for_branch(branch: &str) -> String {
    branch.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_branch_name_valid() {
        assert_eq!(validate_branch_name("feature/login").unwrap(), "feature/login");
        assert_eq!(validate_branch_name("  bugfix  ").unwrap(), "bugfix");
    }

    #[test]
    fn test_validate_branch_name_invalid() {
        assert!(validate_branch_name("").is_err());
        assert!(validate_branch_name("a..b").is_err());
        assert!(validate_branch_name("-flag").is_err());
        assert!(validate_branch_name("has space").is_err());
    }

    #[test]
    fn test_worktree_name_for_branch() {
        assert_eq!(worktree_name_for_branch("feature/login"), "feature-login");
        assert_eq!(worktree_name_for_branch("bugfix"), "bugfix");
    }

    #[test]
    fn test_has_uncommitted_changes_not_a_repo() {
        let temp = tempfile::tempdir().unwrap();
        assert!(!has_uncommitted_changes(temp.path()));
    }
}
