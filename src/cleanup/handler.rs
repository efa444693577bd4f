use std::path::Path;
use tracing::{info, warn};

use crate::cleanup::errors::CleanupError;
use crate::cleanup::interactive::{default_presenter, SelectionPresenter};
use crate::cleanup::operations::{categorize, format_path_for_display, select_by_rule};
use crate::cleanup::prompt::{Confirmer, TerminalConfirmer};
use crate::cleanup::types::{CleanupMode, CleanupOutcome, CleanupRequest};
use crate::core::config::{Config, SweepConfig};
use crate::git;
use crate::git::errors::GitError;
use crate::git::types::BranchStatus;
use crate::process::terminator::{SignalTerminator, Terminator};
use crate::process::types::ProcessInfo;
use crate::sessions;

/// Run a cleanup against the repository containing the current directory,
/// using the default presenter and confirmer.
pub fn run_cleanup(
    request: &CleanupRequest,
    config: &Config,
    sweep_config: &SweepConfig,
) -> Result<CleanupOutcome, CleanupError> {
    let repo_path = git::handler::discover_repo().map_err(|e| match e {
        GitError::NotInRepository => CleanupError::NotInRepository,
        other => other.into(),
    })?;

    let presenter = default_presenter();
    let mut confirmer = TerminalConfirmer::new(request.auto_confirm);
    let mut terminator = SignalTerminator;

    execute_cleanup(
        &repo_path,
        request,
        config,
        sweep_config,
        presenter.as_ref(),
        &mut confirmer,
        &mut terminator,
    )
}

/// The cleanup pipeline: enumerate, classify, select, confirm, terminate,
/// remove, then reconcile persisted state. Selection, confirmation, and
/// process shutdown come through the injected presenter, confirmer, and
/// terminator.
pub fn execute_cleanup(
    repo_path: &Path,
    request: &CleanupRequest,
    config: &Config,
    sweep_config: &SweepConfig,
    presenter: &dyn SelectionPresenter,
    confirmer: &mut dyn Confirmer,
    terminator: &mut dyn Terminator,
) -> Result<CleanupOutcome, CleanupError> {
    info!(
        event = "cleanup.started",
        mode = request.mode.as_str(),
        dry_run = request.dry_run
    );

    println!("Checking branch status...");

    let worktrees = git::handler::list_worktrees(repo_path)?;
    if worktrees.is_empty() {
        println!("No worktrees found.");
        return Ok(CleanupOutcome::NothingToClean);
    }

    let secondary: Vec<_> = worktrees.into_iter().filter(|w| !w.is_primary).collect();
    if secondary.is_empty() {
        println!("No secondary worktrees found.");
        return Ok(CleanupOutcome::NothingToClean);
    }

    let statuses = git::operations::classify_worktrees(repo_path, &secondary)?;
    display_branch_status(&statuses);

    let selected = match request.mode {
        CleanupMode::Interactive => presenter.present(&statuses)?,
        mode => select_by_rule(mode, &statuses),
    };

    if selected.is_empty() {
        println!("No worktrees selected for cleanup.");
        return Ok(CleanupOutcome::NothingSelected);
    }

    let kill_processes = request
        .kill_processes
        .unwrap_or(sweep_config.cleanup.kill_processes);

    if request.dry_run {
        return Ok(dry_run_report(&selected, kill_processes, terminator));
    }

    // Interactive selection already walked the list, so only the prompt is
    // skipped; the recap still prints.
    let skip_prompt = request.mode == CleanupMode::Interactive;
    if !confirm_cleanup(&selected, skip_prompt, confirmer) {
        println!("Cleanup cancelled.");
        return Ok(CleanupOutcome::Cancelled);
    }

    if kill_processes {
        let processes = collect_processes(&selected, terminator);
        if !handle_running_processes(&processes, terminator, confirmer) {
            println!("Cleanup cancelled.");
            return Ok(CleanupOutcome::Cancelled);
        }
    }

    let removed = remove_worktrees(repo_path, &selected, request.force, confirmer);

    if removed.is_empty() {
        println!("Cleanup complete. No worktrees were removed.");
        return Ok(CleanupOutcome::Completed {
            removed: 0,
            targeted: selected.len(),
        });
    }

    reconcile_state(config, &removed)?;

    println!(
        "Cleanup complete. Removed {} of {} worktrees.",
        removed.len(),
        selected.len()
    );
    info!(
        event = "cleanup.completed",
        removed = removed.len(),
        targeted = selected.len()
    );

    Ok(CleanupOutcome::Completed {
        removed: removed.len(),
        targeted: selected.len(),
    })
}

fn display_branch_status(statuses: &[BranchStatus]) {
    let categories = categorize(statuses);

    let sections: [(&str, &[BranchStatus]); 3] = [
        ("Branches without remotes:", &categories.remoteless),
        ("Branches identical to main:", &categories.identical),
        ("Branches merged into main:", &categories.merged),
    ];

    for (heading, branches) in sections {
        if branches.is_empty() {
            continue;
        }
        println!("\n{}", heading);
        for status in branches {
            if status.has_uncommitted_changes {
                println!("  {} (uncommitted changes)", status.branch);
            } else {
                println!("  {}", status.branch);
            }
        }
    }
    println!();
}

fn dry_run_report(
    selected: &[BranchStatus],
    kill_processes: bool,
    terminator: &mut dyn Terminator,
) -> CleanupOutcome {
    println!("Dry run. The following worktrees would be removed:");
    for status in selected {
        println!("  {} ({})", status.branch, format_path_for_display(&status.path));
    }

    let mut process_count = 0;
    if kill_processes {
        let processes = collect_processes(selected, terminator);
        process_count = processes.len();
        if !processes.is_empty() {
            println!("\nThe following processes would be terminated:");
            for process in &processes {
                println!("  [{}] {}", process.pid, process.display_command());
            }
        }
    }

    info!(
        event = "cleanup.dry_run_completed",
        targeted = selected.len(),
        processes = process_count
    );

    CleanupOutcome::DryRun {
        targeted: selected.len(),
        processes: process_count,
    }
}

fn confirm_cleanup(
    selected: &[BranchStatus],
    skip_prompt: bool,
    confirmer: &mut dyn Confirmer,
) -> bool {
    println!("Worktrees to be removed:");
    for status in selected {
        println!("  {} ({})", status.branch, format_path_for_display(&status.path));
    }
    println!();

    if skip_prompt {
        return true;
    }
    confirmer.confirm("Proceed with cleanup?", true)
}

fn collect_processes(
    selected: &[BranchStatus],
    terminator: &mut dyn Terminator,
) -> Vec<ProcessInfo> {
    let mut processes = Vec::new();
    for status in selected {
        processes.extend(terminator.find(&status.path));
    }
    processes
}

/// Terminate processes working inside the targeted worktrees. Returns false
/// only when survivors remain and the user declines to continue.
fn handle_running_processes(
    processes: &[ProcessInfo],
    terminator: &mut dyn Terminator,
    confirmer: &mut dyn Confirmer,
) -> bool {
    if processes.is_empty() {
        return true;
    }

    println!("Shutting down processes operating in worktrees to be deleted...");
    for process in processes {
        println!("  [{}] {}", process.pid, process.display_command());
    }

    let outcome = terminator.terminate(processes);
    if outcome.success() {
        return true;
    }

    println!("Warning: Some processes could not be terminated:");
    for survivor in &outcome.survivors {
        println!("  [{}] {}", survivor.pid, survivor.display_command());
    }
    warn!(
        event = "cleanup.process_survivors",
        count = outcome.survivors.len()
    );

    confirmer.confirm("Continue with cleanup anyway?", false)
}

/// Remove each selected worktree independently; one failure never aborts the
/// rest. A dirty worktree gets one confirm-gated forced retry.
fn remove_worktrees(
    repo_path: &Path,
    selected: &[BranchStatus],
    force: bool,
    confirmer: &mut dyn Confirmer,
) -> Vec<String> {
    let mut removed = Vec::new();

    for status in selected {
        match git::handler::remove_worktree(repo_path, &status.path, force) {
            Ok(()) => {
                println!("✓ Removed {}", status.branch);
                removed.push(status.branch.clone());
            }
            Err(GitError::WorktreeDirty { .. }) => {
                println!("  {} has uncommitted changes.", status.branch);
                let message = format!("Remove {} anyway, discarding changes?", status.branch);
                if confirmer.confirm(&message, false) {
                    match git::handler::remove_worktree(repo_path, &status.path, true) {
                        Ok(()) => {
                            println!("✓ Removed {}", status.branch);
                            removed.push(status.branch.clone());
                        }
                        Err(e) => {
                            println!("✗ Failed to remove {}: {}", status.branch, e);
                            warn!(
                                event = "cleanup.remove_failed",
                                branch = status.branch,
                                error = %e
                            );
                        }
                    }
                } else {
                    println!("  Skipped {}", status.branch);
                }
            }
            Err(e) => {
                println!("✗ Failed to remove {}: {}", status.branch, e);
                warn!(
                    event = "cleanup.remove_failed",
                    branch = status.branch,
                    error = %e
                );
            }
        }
    }

    removed
}

/// Prune session-id entries and the current-worktree marker for removed
/// branches. Failing to persist the update is a hard error; a stale entry
/// pointing at a deleted worktree would poison later runs.
fn reconcile_state(config: &Config, removed: &[String]) -> Result<(), CleanupError> {
    let mut table = sessions::handler::load_session_table(config);
    let mut table_changed = false;
    for branch in removed {
        if table.remove(branch).is_some() {
            table_changed = true;
        }
    }
    if table_changed {
        sessions::handler::save_session_table(config, &table)?;
    }

    let mut state = sessions::handler::load_app_state(config);
    if let Some(current) = &state.current_worktree {
        if removed.contains(current) {
            state.current_worktree = None;
            sessions::handler::save_app_state(config, &state)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::prompt::ScriptedConfirmer;
    use crate::core::config::SweepConfig;
    use crate::process::terminator::ScriptedTerminator;
    use crate::process::types::TerminationOutcome;
    use crate::sessions::types::{AppState, SessionTable};

    fn status(branch: &str) -> BranchStatus {
        BranchStatus {
            branch: branch.to_string(),
            has_remote: false,
            is_merged: false,
            is_identical: false,
            has_uncommitted_changes: false,
            path: std::path::PathBuf::from(format!("/tmp/worktrees/{}", branch)),
        }
    }

    #[test]
    fn test_confirm_cleanup_respects_decline() {
        let mut confirmer = ScriptedConfirmer::new(vec![false]);
        assert!(!confirm_cleanup(&[status("feature1")], false, &mut confirmer));
    }

    #[test]
    fn test_confirm_cleanup_skips_prompt_after_interactive_selection() {
        // An empty script would answer any prompt with a decline, so passing
        // proves no prompt was issued.
        let mut confirmer = ScriptedConfirmer::new(vec![]);
        assert!(confirm_cleanup(&[status("feature1")], true, &mut confirmer));
    }

    #[test]
    fn test_survivor_gate_respects_decline() {
        let survivor = ProcessInfo {
            pid: 4242,
            command: "npm run dev".to_string(),
            working_dir: std::path::PathBuf::from("/tmp/worktrees/feature1"),
        };
        let processes = vec![survivor.clone()];
        let mut terminator = ScriptedTerminator::new(
            vec![],
            vec![TerminationOutcome {
                interrupted: 1,
                forced: 1,
                survivors: vec![survivor],
            }],
        );

        let mut confirmer = ScriptedConfirmer::new(vec![false]);
        assert!(!handle_running_processes(
            &processes,
            &mut terminator,
            &mut confirmer
        ));
    }

    #[test]
    fn test_survivor_gate_continue_anyway() {
        let survivor = ProcessInfo {
            pid: 4242,
            command: "npm run dev".to_string(),
            working_dir: std::path::PathBuf::from("/tmp/worktrees/feature1"),
        };
        let processes = vec![survivor.clone()];
        let mut terminator = ScriptedTerminator::new(
            vec![],
            vec![TerminationOutcome {
                interrupted: 1,
                forced: 1,
                survivors: vec![survivor],
            }],
        );

        let mut confirmer = ScriptedConfirmer::new(vec![true]);
        assert!(handle_running_processes(
            &processes,
            &mut terminator,
            &mut confirmer
        ));
    }

    #[test]
    fn test_no_processes_needs_no_confirmation() {
        let mut terminator = ScriptedTerminator::new(vec![], vec![]);
        let mut confirmer = ScriptedConfirmer::new(vec![]);
        assert!(handle_running_processes(&[], &mut terminator, &mut confirmer));
    }

    #[test]
    fn test_reconcile_state_prunes_removed_branches() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::with_app_dir(temp.path().to_path_buf());

        let mut table = SessionTable::new();
        table.insert("feature1".to_string(), "s-1".to_string());
        table.insert("feature2".to_string(), "s-2".to_string());
        sessions::handler::save_session_table(&config, &table).unwrap();
        sessions::handler::save_app_state(
            &config,
            &AppState {
                current_worktree: Some("feature1".to_string()),
            },
        )
        .unwrap();

        reconcile_state(&config, &["feature1".to_string()]).unwrap();

        let table = sessions::handler::load_session_table(&config);
        assert!(table.get("feature1").is_none());
        assert!(table.get("feature2").is_some());

        let state = sessions::handler::load_app_state(&config);
        assert!(state.current_worktree.is_none());
    }

    #[test]
    fn test_reconcile_state_keeps_unrelated_marker() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::with_app_dir(temp.path().to_path_buf());

        sessions::handler::save_app_state(
            &config,
            &AppState {
                current_worktree: Some("other".to_string()),
            },
        )
        .unwrap();

        reconcile_state(&config, &["feature1".to_string()]).unwrap();

        let state = sessions::handler::load_app_state(&config);
        assert_eq!(state.current_worktree.as_deref(), Some("other"));
    }

    #[test]
    fn test_kill_processes_resolution_prefers_request() {
        let sweep = SweepConfig::default();
        assert!(sweep.cleanup.kill_processes);

        let mut request = CleanupRequest::new(CleanupMode::All);
        request.kill_processes = Some(false);
        let resolved = request
            .kill_processes
            .unwrap_or(sweep.cleanup.kill_processes);
        assert!(!resolved);
    }
}
