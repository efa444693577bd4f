use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("wtsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Clean up git worktrees whose branches no longer carry unique work")
        .long_about("Wtsweep enumerates the linked worktrees of a repository, classifies each branch against the default branch (no remote, identical, merged, uncommitted changes), and removes the ones you select. Processes still running inside a doomed worktree are shut down first.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("cleanup")
                .about("Remove worktrees for branches that are merged, identical, or remoteless")
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .short('m')
                        .help("Selection rule (falls back to config, then interactive on a terminal)")
                        .value_parser(["all", "remoteless", "merged", "interactive"])
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Report what would be removed without touching anything")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Answer yes to all confirmation prompts")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Remove worktrees with uncommitted changes without asking")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("kill")
                        .long("kill")
                        .help("Shut down processes running in removed worktrees (overrides config)")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("no-kill")
                        .long("no-kill")
                        .help("Leave processes running (overrides config)")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("kill")
                )
        )
        .subcommand(
            Command::new("ls")
                .about("List worktrees for the current repository")
        )
        .subcommand(
            Command::new("switch")
                .about("Switch to a worktree for the branch, creating it if needed")
                .arg(
                    Arg::new("branch")
                        .help("Branch name for the worktree")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("register-session")
                .about("Record a terminal session id for a branch's worktree")
                .arg(
                    Arg::new("branch")
                        .help("Branch name of the worktree")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("session-id")
                        .help("Session id to associate with the branch")
                        .required(true)
                        .index(2)
                )
        )
}

pub fn get_matches() -> ArgMatches {
    build_cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "wtsweep");
    }

    #[test]
    fn test_cli_cleanup_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "wtsweep", "cleanup", "--mode", "merged", "--dry-run", "-y",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let cleanup_matches = matches.subcommand_matches("cleanup").unwrap();
        assert_eq!(cleanup_matches.get_one::<String>("mode").unwrap(), "merged");
        assert!(cleanup_matches.get_flag("dry-run"));
        assert!(cleanup_matches.get_flag("yes"));
        assert!(!cleanup_matches.get_flag("force"));
    }

    #[test]
    fn test_cli_cleanup_mode_optional() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["wtsweep", "cleanup"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let cleanup_matches = matches.subcommand_matches("cleanup").unwrap();
        assert!(cleanup_matches.get_one::<String>("mode").is_none());
    }

    #[test]
    fn test_cli_invalid_mode() {
        let app = build_cli();
        let matches =
            app.try_get_matches_from(vec!["wtsweep", "cleanup", "--mode", "github"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_kill_flags_conflict() {
        let app = build_cli();
        let matches =
            app.try_get_matches_from(vec!["wtsweep", "cleanup", "--kill", "--no-kill"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_switch_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["wtsweep", "switch", "feature1"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let switch_matches = matches.subcommand_matches("switch").unwrap();
        assert_eq!(
            switch_matches.get_one::<String>("branch").unwrap(),
            "feature1"
        );
    }

    #[test]
    fn test_cli_register_session_command() {
        let app = build_cli();
        let matches =
            app.try_get_matches_from(vec!["wtsweep", "register-session", "feature1", "s-42"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let register_matches = matches.subcommand_matches("register-session").unwrap();
        assert_eq!(
            register_matches.get_one::<String>("branch").unwrap(),
            "feature1"
        );
        assert_eq!(
            register_matches.get_one::<String>("session-id").unwrap(),
            "s-42"
        );
    }
}
