pub mod errors;
pub mod handler;
pub mod types;

pub use errors::SessionError;
pub use handler::{load_app_state, load_session_table, save_app_state, save_session_table};
pub use types::{AppState, SessionTable};
