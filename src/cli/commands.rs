use clap::ArgMatches;
use tracing::{error, info};

use crate::cleanup::{self, CleanupError, CleanupMode, CleanupRequest};
use crate::core::config::{Config, SweepConfig};
use crate::git;
use crate::sessions::handler as session_handler;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("cleanup", sub_matches)) => handle_cleanup_command(sub_matches),
        Some(("ls", _)) => handle_ls_command(),
        Some(("switch", sub_matches)) => handle_switch_command(sub_matches),
        Some(("register-session", sub_matches)) => handle_register_session_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Resolve the cleanup mode: command line first, then the configured
/// default, then interactive when a terminal is attached.
fn resolve_mode(
    matches: &ArgMatches,
    sweep_config: &SweepConfig,
) -> Result<CleanupMode, CleanupError> {
    if let Some(mode) = matches.get_one::<String>("mode") {
        return mode.parse();
    }
    if let Some(mode) = &sweep_config.cleanup.default_mode {
        return mode.parse();
    }
    if console::user_attended() {
        return Ok(CleanupMode::Interactive);
    }
    Err(CleanupError::ModeRequired)
}

fn handle_cleanup_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    let sweep_config = SweepConfig::load_hierarchy(&config.app_dir);

    let mode = resolve_mode(matches, &sweep_config)?;

    let mut request = CleanupRequest::new(mode);
    request.dry_run = matches.get_flag("dry-run");
    request.auto_confirm = matches.get_flag("yes");
    request.force = matches.get_flag("force");
    if matches.get_flag("kill") {
        request.kill_processes = Some(true);
    } else if matches.get_flag("no-kill") {
        request.kill_processes = Some(false);
    }

    info!(
        event = "cli.cleanup_started",
        mode = mode.as_str(),
        dry_run = request.dry_run
    );

    match cleanup::run_cleanup(&request, &config, &sweep_config) {
        Ok(outcome) => {
            info!(event = "cli.cleanup_completed", outcome = ?outcome);
            Ok(())
        }
        Err(e) => {
            error!(event = "cli.cleanup_failed", error = %e);
            Err(e.into())
        }
    }
}

fn handle_ls_command() -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.ls_started");

    let repo_path = git::handler::discover_repo()?;
    let worktrees = git::handler::list_worktrees(&repo_path)?;

    if worktrees.is_empty() {
        println!("No worktrees found.");
        return Ok(());
    }

    let config = Config::new();
    let table = session_handler::load_session_table(&config);

    println!("Worktrees:");
    for worktree in &worktrees {
        let mut annotations = Vec::new();
        if worktree.is_primary {
            annotations.push("primary".to_string());
        }
        if let Some(session_id) = table.get(&worktree.branch) {
            annotations.push(format!("session {}", session_id));
        }
        let suffix = if annotations.is_empty() {
            String::new()
        } else {
            format!(" [{}]", annotations.join(", "))
        };

        println!(
            "  {} {} ({}){}",
            marker_symbol(worktree.is_current),
            worktree.branch,
            cleanup::format_path_for_display(&worktree.path),
            suffix
        );
    }

    info!(event = "cli.ls_completed", count = worktrees.len());
    Ok(())
}

fn marker_symbol(is_current: bool) -> char {
    if is_current {
        '*'
    } else {
        ' '
    }
}

fn handle_switch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let branch = matches.get_one::<String>("branch").ok_or("branch required")?;

    let config = Config::new();
    let sweep_config = SweepConfig::load_hierarchy(&config.app_dir);

    info!(event = "cli.switch_started", branch = branch);

    let repo_path = git::handler::discover_repo()?;
    let worktrees = git::handler::list_worktrees(&repo_path)?;

    let worktree = match worktrees.into_iter().find(|w| &w.branch == branch) {
        Some(existing) => {
            println!(
                "Worktree for '{}' already exists at {}",
                branch,
                cleanup::format_path_for_display(&existing.path)
            );
            existing
        }
        None => {
            let base_dir = sweep_config
                .worktree
                .base_dir
                .clone()
                .unwrap_or_else(|| config.worktrees_dir());
            let repo_name = repo_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "repo".to_string());
            let worktree_path = base_dir
                .join(repo_name)
                .join(git::operations::worktree_name_for_branch(branch));

            let created = git::handler::create_worktree(&repo_path, branch, &worktree_path)?;
            println!(
                "✓ Created worktree for '{}' at {}",
                created.branch,
                cleanup::format_path_for_display(&created.path)
            );
            created
        }
    };

    let mut state = session_handler::load_app_state(&config);
    state.current_worktree = Some(worktree.branch.clone());
    session_handler::save_app_state(&config, &state)?;

    println!("{}", worktree.path.display());

    info!(event = "cli.switch_completed", branch = branch);
    Ok(())
}

fn handle_register_session_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let branch = matches.get_one::<String>("branch").ok_or("branch required")?;
    let session_id = matches
        .get_one::<String>("session-id")
        .ok_or("session id required")?;

    let config = Config::new();

    let mut table = session_handler::load_session_table(&config);
    table.insert(branch.clone(), session_id.clone());
    session_handler::save_session_table(&config, &table)?;

    println!("✓ Registered session {} for '{}'", session_id, branch);
    info!(
        event = "cli.register_session_completed",
        branch = branch,
        session_id = session_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::app::build_cli;

    fn cleanup_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["wtsweep", "cleanup"];
        argv.extend_from_slice(args);
        build_cli()
            .try_get_matches_from(argv)
            .unwrap()
            .subcommand_matches("cleanup")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_resolve_mode_from_cli() {
        let matches = cleanup_matches(&["--mode", "merged"]);
        let mode = resolve_mode(&matches, &SweepConfig::default()).unwrap();
        assert_eq!(mode, CleanupMode::Merged);
    }

    #[test]
    fn test_resolve_mode_from_config() {
        let matches = cleanup_matches(&[]);
        let mut sweep_config = SweepConfig::default();
        sweep_config.cleanup.default_mode = Some("remoteless".to_string());
        let mode = resolve_mode(&matches, &sweep_config).unwrap();
        assert_eq!(mode, CleanupMode::Remoteless);
    }

    #[test]
    fn test_resolve_mode_cli_beats_config() {
        let matches = cleanup_matches(&["--mode", "all"]);
        let mut sweep_config = SweepConfig::default();
        sweep_config.cleanup.default_mode = Some("merged".to_string());
        let mode = resolve_mode(&matches, &sweep_config).unwrap();
        assert_eq!(mode, CleanupMode::All);
    }

    #[test]
    fn test_resolve_mode_rejects_bad_config_value() {
        let matches = cleanup_matches(&[]);
        let mut sweep_config = SweepConfig::default();
        sweep_config.cleanup.default_mode = Some("everything".to_string());
        let result = resolve_mode(&matches, &sweep_config);
        assert!(matches!(result, Err(CleanupError::UnknownMode { .. })));
    }
}
