pub mod app;
pub mod commands;

pub use app::{build_cli, get_matches};
pub use commands::run_command;
