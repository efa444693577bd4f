use std::str::FromStr;

use crate::cleanup::errors::CleanupError;

/// How the selection engine picks worktrees for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    /// Remoteless, identical, and merged branches.
    All,
    /// Branches without a remote-tracking entry.
    Remoteless,
    /// Branches merged into (or identical to) the default branch.
    Merged,
    /// User selects individually.
    Interactive,
}

impl CleanupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupMode::All => "all",
            CleanupMode::Remoteless => "remoteless",
            CleanupMode::Merged => "merged",
            CleanupMode::Interactive => "interactive",
        }
    }
}

impl FromStr for CleanupMode {
    type Err = CleanupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CleanupMode::All),
            "remoteless" => Ok(CleanupMode::Remoteless),
            "merged" => Ok(CleanupMode::Merged),
            "interactive" => Ok(CleanupMode::Interactive),
            other => Err(CleanupError::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// One cleanup invocation's parameters, threaded explicitly through the
/// orchestrator instead of living in ambient state.
#[derive(Debug, Clone)]
pub struct CleanupRequest {
    pub mode: CleanupMode,
    pub dry_run: bool,
    pub auto_confirm: bool,
    /// Remove worktrees with modified files without asking.
    pub force: bool,
    /// CLI override for process killing; `None` falls back to config.
    pub kill_processes: Option<bool>,
}

impl CleanupRequest {
    pub fn new(mode: CleanupMode) -> Self {
        Self {
            mode,
            dry_run: false,
            auto_confirm: false,
            force: false,
            kill_processes: None,
        }
    }
}

/// How a cleanup run ended. Zero removals are reported distinctly from
/// nothing having been selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// No worktrees (or no secondary worktrees) exist.
    NothingToClean,
    /// Selection produced an empty set.
    NothingSelected,
    /// User declined at a confirmation gate.
    Cancelled,
    /// Dry run: reported what would happen, mutated nothing.
    DryRun { targeted: usize, processes: usize },
    Completed { removed: usize, targeted: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for mode in [
            CleanupMode::All,
            CleanupMode::Remoteless,
            CleanupMode::Merged,
            CleanupMode::Interactive,
        ] {
            assert_eq!(mode.as_str().parse::<CleanupMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_parse_unknown() {
        let result = "github".parse::<CleanupMode>();
        assert!(matches!(
            result,
            Err(CleanupError::UnknownMode { mode }) if mode == "github"
        ));
    }

    #[test]
    fn test_request_defaults() {
        let request = CleanupRequest::new(CleanupMode::All);
        assert!(!request.dry_run);
        assert!(!request.auto_confirm);
        assert!(!request.force);
        assert!(request.kill_processes.is_none());
    }
}
