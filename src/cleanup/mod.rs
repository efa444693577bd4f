pub mod errors;
pub mod handler;
pub mod interactive;
pub mod operations;
pub mod prompt;
pub mod types;

pub use errors::CleanupError;
pub use handler::{execute_cleanup, run_cleanup};
pub use interactive::{default_presenter, SelectionPresenter, StaticPresenter};
pub use operations::{categorize, dedupe_by_branch, format_path_for_display, select_by_rule};
pub use prompt::{Confirmer, ScriptedConfirmer, TerminalConfirmer};
pub use types::{CleanupMode, CleanupOutcome, CleanupRequest};
