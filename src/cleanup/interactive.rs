use dialoguer::{MultiSelect, Select};
use std::io::BufRead;
use tracing::debug;

use crate::cleanup::errors::CleanupError;
use crate::cleanup::operations::format_path_for_display;
use crate::git::types::BranchStatus;

/// Presents classified branches for interactive selection. An empty result
/// is a valid "cancel".
pub trait SelectionPresenter {
    fn present(&self, statuses: &[BranchStatus]) -> Result<Vec<BranchStatus>, CleanupError>;
}

/// Pick the presenter at the application boundary: the rich selector on a
/// terminal, a plain prompt loop otherwise.
pub fn default_presenter() -> Box<dyn SelectionPresenter> {
    if console::user_attended() {
        Box::new(DialoguerPresenter)
    } else {
        Box::new(PlainPresenter)
    }
}

fn selection_label(status: &BranchStatus) -> String {
    let tags = status.tags();
    if tags.is_empty() {
        format!(
            "{} ({})",
            status.branch,
            format_path_for_display(&status.path)
        )
    } else {
        format!(
            "{} ({}) [{}]",
            status.branch,
            format_path_for_display(&status.path),
            tags.join(", ")
        )
    }
}

/// Rich selector: a bulk-selection shortcut first, then individual toggles.
pub struct DialoguerPresenter;

impl SelectionPresenter for DialoguerPresenter {
    fn present(&self, statuses: &[BranchStatus]) -> Result<Vec<BranchStatus>, CleanupError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let shortcut = Select::new()
            .with_prompt("Selection")
            .items(&[
                "Pick worktrees individually",
                "Select all",
                "Select merged only",
                "Select remoteless only",
                "Cancel",
            ])
            .default(0)
            .interact()
            .map_err(|e| CleanupError::SelectionFailed {
                message: e.to_string(),
            })?;

        let selected = match shortcut {
            0 => {
                let labels: Vec<String> = statuses.iter().map(selection_label).collect();
                let indices = MultiSelect::new()
                    .with_prompt("Select worktrees to remove")
                    .items(&labels)
                    .interact()
                    .map_err(|e| CleanupError::SelectionFailed {
                        message: e.to_string(),
                    })?;
                indices.into_iter().map(|i| statuses[i].clone()).collect()
            }
            1 => statuses.to_vec(),
            2 => statuses.iter().filter(|s| s.is_merged).cloned().collect(),
            3 => statuses.iter().filter(|s| !s.has_remote).cloned().collect(),
            _ => Vec::new(),
        };

        debug!(
            event = "cleanup.interactive_selection_completed",
            offered = statuses.len(),
            selected = selected.len()
        );

        Ok(selected)
    }
}

/// Plain prompt loop fallback for environments without a terminal.
pub struct PlainPresenter;

impl SelectionPresenter for PlainPresenter {
    fn present(&self, statuses: &[BranchStatus]) -> Result<Vec<BranchStatus>, CleanupError> {
        println!("\nInteractive cleanup mode");
        println!("Select worktrees to remove:");
        println!();

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        let mut selected = Vec::new();

        for (i, status) in statuses.iter().enumerate() {
            println!("{}. Remove {}? (y/N)", i + 1, selection_label(status));
            let answer = match lines.next() {
                Some(line) => line.map_err(|e| CleanupError::IoError { source: e })?,
                None => break,
            };
            if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                selected.push(status.clone());
            }
        }

        if !selected.is_empty() {
            println!("\nSelected {} worktrees for removal.", selected.len());
        }

        Ok(selected)
    }
}

/// Scripted presenter that selects branches by name. Used to exercise the
/// orchestrator without a terminal.
pub struct StaticPresenter {
    branches: Vec<String>,
}

impl StaticPresenter {
    pub fn new(branches: Vec<String>) -> Self {
        Self { branches }
    }
}

impl SelectionPresenter for StaticPresenter {
    fn present(&self, statuses: &[BranchStatus]) -> Result<Vec<BranchStatus>, CleanupError> {
        Ok(statuses
            .iter()
            .filter(|s| self.branches.contains(&s.branch))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn status(branch: &str, has_remote: bool, is_merged: bool) -> BranchStatus {
        BranchStatus {
            branch: branch.to_string(),
            has_remote,
            is_merged,
            is_identical: false,
            has_uncommitted_changes: false,
            path: PathBuf::from(format!("/tmp/worktrees/{}", branch)),
        }
    }

    #[test]
    fn test_selection_label_includes_tags() {
        let label = selection_label(&status("feature", false, true));
        assert!(label.contains("feature"));
        assert!(label.contains("no remote"));
        assert!(label.contains("merged"));
    }

    #[test]
    fn test_selection_label_without_tags() {
        let label = selection_label(&status("feature", true, false));
        assert!(!label.contains('['));
    }

    #[test]
    fn test_static_presenter_filters_by_branch() {
        let statuses = vec![status("a", true, false), status("b", false, true)];
        let presenter = StaticPresenter::new(vec!["b".to_string()]);
        let selected = presenter.present(&statuses).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].branch, "b");
    }

    #[test]
    fn test_static_presenter_empty_selection_is_valid() {
        let statuses = vec![status("a", true, false)];
        let presenter = StaticPresenter::new(vec![]);
        assert!(presenter.present(&statuses).unwrap().is_empty());
    }
}
