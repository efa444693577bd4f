use std::collections::VecDeque;
use std::path::Path;

use crate::process::operations;
use crate::process::types::{ProcessInfo, TerminationOutcome};

/// Process discovery and shutdown, injected into the cleanup orchestrator
/// so the termination-failure path can be scripted in tests.
pub trait Terminator {
    /// Find processes whose working directory is inside `directory`.
    fn find(&mut self, directory: &Path) -> Vec<ProcessInfo>;
    fn terminate(&mut self, processes: &[ProcessInfo]) -> TerminationOutcome;
}

/// Signals real processes with the standard grace and settle periods.
pub struct SignalTerminator;

impl Terminator for SignalTerminator {
    fn find(&mut self, directory: &Path) -> Vec<ProcessInfo> {
        operations::find_processes_in_directory(directory)
    }

    fn terminate(&mut self, processes: &[ProcessInfo]) -> TerminationOutcome {
        operations::terminate_processes(processes)
    }
}

/// Reports a fixed process list for every directory and termination
/// outcomes from a script; an exhausted script reports full success.
pub struct ScriptedTerminator {
    processes: Vec<ProcessInfo>,
    outcomes: VecDeque<TerminationOutcome>,
}

impl ScriptedTerminator {
    pub fn new(processes: Vec<ProcessInfo>, outcomes: Vec<TerminationOutcome>) -> Self {
        Self {
            processes,
            outcomes: outcomes.into(),
        }
    }
}

impl Terminator for ScriptedTerminator {
    fn find(&mut self, _directory: &Path) -> Vec<ProcessInfo> {
        std::mem::take(&mut self.processes)
    }

    fn terminate(&mut self, processes: &[ProcessInfo]) -> TerminationOutcome {
        self.outcomes
            .pop_front()
            .unwrap_or_else(|| TerminationOutcome {
                interrupted: processes.len(),
                forced: 0,
                survivors: Vec::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn process(pid: u32) -> ProcessInfo {
        ProcessInfo {
            pid,
            command: "npm run dev".to_string(),
            working_dir: PathBuf::from("/tmp/wt"),
        }
    }

    #[test]
    fn test_scripted_terminator_reports_list_once() {
        let mut terminator = ScriptedTerminator::new(vec![process(7)], vec![]);
        assert_eq!(terminator.find(Path::new("/tmp/a")).len(), 1);
        assert!(terminator.find(Path::new("/tmp/b")).is_empty());
    }

    #[test]
    fn test_scripted_terminator_follows_outcome_script() {
        let survivor = process(7);
        let mut terminator = ScriptedTerminator::new(
            vec![],
            vec![TerminationOutcome {
                interrupted: 1,
                forced: 1,
                survivors: vec![survivor.clone()],
            }],
        );

        let outcome = terminator.terminate(&[survivor]);
        assert!(!outcome.success());

        // Exhausted script reports success.
        let outcome = terminator.terminate(&[process(8)]);
        assert!(outcome.success());
        assert_eq!(outcome.interrupted, 1);
    }
}
