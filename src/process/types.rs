use std::path::PathBuf;

/// A process discovered inside a worktree that is about to be removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Full command line, for display.
    pub command: String,
    pub working_dir: PathBuf,
}

impl ProcessInfo {
    /// Command line truncated for one-line display.
    pub fn display_command(&self) -> String {
        if self.command.chars().count() > 60 {
            let prefix: String = self.command.chars().take(57).collect();
            format!("{}...", prefix)
        } else {
            self.command.clone()
        }
    }
}

/// Result of the two-phase termination sequence.
#[derive(Debug, Clone, Default)]
pub struct TerminationOutcome {
    /// Processes the interrupt signal was sent to.
    pub interrupted: usize,
    /// Processes that needed the forceful kill after the grace period.
    pub forced: usize,
    /// Processes still alive after the full sequence.
    pub survivors: Vec<ProcessInfo>,
}

impl TerminationOutcome {
    pub fn success(&self) -> bool {
        self.survivors.is_empty()
    }
}
