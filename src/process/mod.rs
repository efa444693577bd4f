pub mod errors;
pub mod operations;
pub mod terminator;
pub mod types;

pub use errors::ProcessError;
pub use operations::{find_processes_in_directory, is_process_running, terminate_processes};
pub use terminator::{ScriptedTerminator, SignalTerminator, Terminator};
pub use types::{ProcessInfo, TerminationOutcome};
