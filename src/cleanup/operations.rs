use std::collections::HashSet;
use std::path::Path;

use crate::cleanup::types::CleanupMode;
use crate::git::types::BranchStatus;

/// Branch statuses grouped by cleanup category. Discovery order is preserved
/// within each category; a branch can appear in more than one.
#[derive(Debug, Clone, Default)]
pub struct BranchCategories {
    pub remoteless: Vec<BranchStatus>,
    pub identical: Vec<BranchStatus>,
    pub merged: Vec<BranchStatus>,
}

pub fn categorize(statuses: &[BranchStatus]) -> BranchCategories {
    let mut categories = BranchCategories::default();
    for status in statuses {
        if !status.has_remote {
            categories.remoteless.push(status.clone());
        }
        if status.is_identical {
            categories.identical.push(status.clone());
        }
        if status.is_merged {
            categories.merged.push(status.clone());
        }
    }
    categories
}

/// Apply a non-interactive selection rule.
///
/// `All` is the deduplicated union remoteless, then identical, then merged;
/// `Merged` folds identical branches in because neither has unique history.
/// `Interactive` selection goes through a presenter, not this function.
pub fn select_by_rule(mode: CleanupMode, statuses: &[BranchStatus]) -> Vec<BranchStatus> {
    let categories = categorize(statuses);
    match mode {
        CleanupMode::All => {
            let mut combined = categories.remoteless;
            combined.extend(categories.identical);
            combined.extend(categories.merged);
            dedupe_by_branch(combined)
        }
        CleanupMode::Remoteless => categories.remoteless,
        CleanupMode::Merged => {
            let mut combined = categories.identical;
            combined.extend(categories.merged);
            dedupe_by_branch(combined)
        }
        CleanupMode::Interactive => Vec::new(),
    }
}

/// Deduplicate by branch name; the first occurrence wins.
pub fn dedupe_by_branch(statuses: Vec<BranchStatus>) -> Vec<BranchStatus> {
    let mut seen = HashSet::new();
    statuses
        .into_iter()
        .filter(|status| seen.insert(status.branch.clone()))
        .collect()
}

/// Format a path for display: relative to the current directory when
/// possible, then relative to home, otherwise absolute.
pub fn format_path_for_display(path: &Path) -> String {
    if let Ok(current_dir) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&current_dir) {
            return relative.display().to_string();
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home_dir) {
            return format!("~/{}", relative.display());
        }
    }

    path.display().to_string()
}
