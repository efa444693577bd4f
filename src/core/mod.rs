pub mod config;
pub mod errors;
pub mod logging;

// Re-export commonly used types
pub use config::{CleanupConfig, Config, SweepConfig, WorktreeConfig};
pub use errors::AppError;
