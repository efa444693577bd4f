pub mod cleanup;
pub mod cli;
pub mod core;
pub mod git;
pub mod process;
pub mod sessions;

pub use cli::app::build_cli;
pub use cli::commands::run_command;
pub use core::logging::init_logging;
