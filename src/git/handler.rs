use git2::{BranchType, Repository, WorktreeAddOptions, WorktreePruneOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::git::{errors::GitError, operations, types::*};

/// Locate the repository containing the current directory and return its
/// working directory root.
pub fn discover_repo() -> Result<PathBuf, GitError> {
    let current_dir = std::env::current_dir().map_err(|e| GitError::IoError { source: e })?;

    let repo = Repository::discover(&current_dir).map_err(|_| GitError::NotInRepository)?;

    let workdir = repo.workdir().ok_or_else(|| GitError::OperationFailed {
        message: "Repository has no working directory".to_string(),
    })?;

    debug!(event = "git.repo.discovered", repo_path = %workdir.display());
    Ok(workdir.to_path_buf())
}

/// Enumerate all worktrees: the primary checkout first, then every linked
/// worktree in registration order. Detached or broken worktrees are skipped.
pub fn list_worktrees(repo_path: &Path) -> Result<Vec<WorktreeInfo>, GitError> {
    let repo = Repository::open(repo_path)?;
    let current_dir = std::env::current_dir()
        .ok()
        .and_then(|d| d.canonicalize().ok());

    let mut worktrees = Vec::new();

    if let Some(workdir) = repo.workdir() {
        if let Some(branch) = head_branch(&repo) {
            worktrees.push(WorktreeInfo::new(
                branch,
                workdir.to_path_buf(),
                is_current_path(workdir, current_dir.as_deref()),
                true,
            ));
        }
    }

    let names = repo.worktrees()?;
    for name in names.iter().flatten() {
        let worktree = match repo.find_worktree(name) {
            Ok(worktree) => worktree,
            Err(e) => {
                debug!(event = "git.worktree.lookup_failed", name = name, error = %e);
                continue;
            }
        };
        let path = worktree.path().to_path_buf();

        let worktree_repo = match Repository::open(&path) {
            Ok(repo) => repo,
            Err(e) => {
                debug!(
                    event = "git.worktree.open_failed",
                    worktree_path = %path.display(),
                    error = %e
                );
                continue;
            }
        };

        let Some(branch) = head_branch(&worktree_repo) else {
            debug!(
                event = "git.worktree.detached_skipped",
                worktree_path = %path.display()
            );
            continue;
        };

        let is_current = is_current_path(&path, current_dir.as_deref());
        worktrees.push(WorktreeInfo::new(branch, path, is_current, false));
    }

    debug!(event = "git.worktree.list_completed", count = worktrees.len());
    Ok(worktrees)
}

fn head_branch(repo: &Repository) -> Option<String> {
    let head = repo.head().ok()?;
    if !head.is_branch() {
        return None;
    }
    head.shorthand().map(|s| s.to_string())
}

fn is_current_path(worktree_path: &Path, current_dir: Option<&Path>) -> bool {
    let Some(current_dir) = current_dir else {
        return false;
    };
    match worktree_path.canonicalize() {
        Ok(canonical) => current_dir.starts_with(&canonical),
        Err(_) => current_dir.starts_with(worktree_path),
    }
}

/// Remove a worktree from the repository.
///
/// Without `force`, a worktree with modified or untracked files is refused
/// with `GitError::WorktreeDirty` so the caller can offer a forced retry.
pub fn remove_worktree(repo_path: &Path, worktree_path: &Path, force: bool) -> Result<(), GitError> {
    info!(
        event = "git.worktree.remove_started",
        worktree_path = %worktree_path.display(),
        force = force
    );

    if !force && operations::has_uncommitted_changes(worktree_path) {
        return Err(GitError::WorktreeDirty {
            path: worktree_path.display().to_string(),
        });
    }

    let repo = Repository::open(repo_path)?;

    let names = repo.worktrees()?;
    let mut found_worktree = None;
    for name in names.iter().flatten() {
        if let Ok(worktree) = repo.find_worktree(name) {
            if paths_match(worktree.path(), worktree_path) {
                found_worktree = Some(worktree);
                break;
            }
        }
    }

    if let Some(worktree) = found_worktree {
        let mut prune_options = WorktreePruneOptions::new();
        prune_options.valid(true);

        worktree.prune(Some(&mut prune_options))?;

        if worktree_path.exists() {
            std::fs::remove_dir_all(worktree_path).map_err(|e| GitError::IoError { source: e })?;
        }

        info!(
            event = "git.worktree.remove_completed",
            worktree_path = %worktree_path.display()
        );
        Ok(())
    } else if worktree_path.exists() {
        // Directory exists but git does not know about it; clean up the
        // orphaned directory rather than failing.
        warn!(
            event = "git.worktree.state_inconsistency",
            worktree_path = %worktree_path.display(),
            message = "Worktree directory exists but not registered in git"
        );
        std::fs::remove_dir_all(worktree_path).map_err(|e| GitError::IoError { source: e })?;
        Ok(())
    } else {
        Err(GitError::WorktreeNotFound {
            path: worktree_path.display().to_string(),
        })
    }
}

fn paths_match(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Create a worktree for `branch` at `worktree_path`.
///
/// Branch resolution: existing local branch, then `origin/<branch>`, then a
/// new branch cut from the comparison baseline (falling back to `HEAD`).
pub fn create_worktree(
    repo_path: &Path,
    branch: &str,
    worktree_path: &Path,
) -> Result<WorktreeInfo, GitError> {
    let validated_branch = operations::validate_branch_name(branch)?;

    info!(
        event = "git.worktree.create_started",
        branch = validated_branch,
        worktree_path = %worktree_path.display()
    );

    if worktree_path.exists() {
        return Err(GitError::WorktreeAlreadyExists {
            path: worktree_path.display().to_string(),
        });
    }

    let repo = Repository::open(repo_path)?;

    if repo.find_branch(&validated_branch, BranchType::Local).is_err() {
        create_local_branch(&repo, &validated_branch)?;
    }

    if let Some(parent) = worktree_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GitError::IoError { source: e })?;
    }

    let branch_ref = repo
        .find_branch(&validated_branch, BranchType::Local)?
        .into_reference();

    let worktree_name = operations::worktree_name_for_branch(&validated_branch);
    let mut options = WorktreeAddOptions::new();
    options.reference(Some(&branch_ref));

    repo.worktree(&worktree_name, worktree_path, Some(&options))?;

    info!(
        event = "git.worktree.create_completed",
        branch = validated_branch,
        worktree_path = %worktree_path.display()
    );

    Ok(WorktreeInfo::new(
        validated_branch,
        worktree_path.to_path_buf(),
        false,
        false,
    ))
}

fn create_local_branch(repo: &Repository, branch: &str) -> Result<(), GitError> {
    let remote_ref = format!("origin/{}", branch);
    if let Ok(object) = repo.revparse_single(&remote_ref) {
        let commit = object.peel_to_commit()?;
        let mut created = repo.branch(branch, &commit, false)?;
        if let Err(e) = created.set_upstream(Some(&remote_ref)) {
            debug!(
                event = "git.branch.set_upstream_failed",
                branch = branch,
                error = %e
            );
        }
        debug!(
            event = "git.branch.create_from_remote",
            branch = branch,
            start_point = remote_ref
        );
        return Ok(());
    }

    let commit = match operations::resolve_comparison_baseline(repo) {
        Some(baseline) => repo.find_commit(baseline.oid)?,
        None => repo.head()?.peel_to_commit()?,
    };

    repo.branch(branch, &commit, false)?;
    debug!(event = "git.branch.create_from_baseline", branch = branch);
    Ok(())
}
