use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::sessions::errors::SessionError;
use crate::sessions::types::{AppState, SessionTable};

/// Load the session-id table. A missing or unreadable file degrades to an
/// empty table; only writes are allowed to fail hard.
pub fn load_session_table(config: &Config) -> SessionTable {
    load_or_default(&config.session_file(), "sessions.table_load_failed")
}

pub fn save_session_table(config: &Config, table: &SessionTable) -> Result<(), SessionError> {
    save_toml(config, &config.session_file(), table)?;
    debug!(event = "sessions.table_saved", entries = table.len());
    Ok(())
}

pub fn load_app_state(config: &Config) -> AppState {
    load_or_default(&config.state_file(), "sessions.state_load_failed")
}

pub fn save_app_state(config: &Config, state: &AppState) -> Result<(), SessionError> {
    save_toml(config, &config.state_file(), state)?;
    debug!(
        event = "sessions.state_saved",
        current_worktree = state.current_worktree.as_deref().unwrap_or("none")
    );
    Ok(())
}

fn load_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path, failure_event: &str) -> T {
    if !path.exists() {
        debug!(event = "sessions.file_missing", path = %path.display());
        return T::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(event = failure_event, path = %path.display(), error = %e);
            return T::default();
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(event = failure_event, path = %path.display(), error = %e);
            T::default()
        }
    }
}

fn save_toml<T: serde::Serialize>(
    config: &Config,
    path: &Path,
    value: &T,
) -> Result<(), SessionError> {
    fs::create_dir_all(&config.app_dir)?;

    let content = toml::to_string(value).map_err(|e| SessionError::SerializeFailed {
        message: e.to_string(),
    })?;

    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::with_app_dir(temp.path().to_path_buf());
        (temp, config)
    }

    #[test]
    fn test_load_missing_table_is_empty() {
        let (_temp, config) = temp_config();
        let table = load_session_table(&config);
        assert!(table.is_empty());
    }

    #[test]
    fn test_save_and_reload_table() {
        let (_temp, config) = temp_config();

        let mut table = SessionTable::new();
        table.insert("feature1".to_string(), "w0t3p1".to_string());
        save_session_table(&config, &table).unwrap();

        let loaded = load_session_table(&config);
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_corrupt_table_degrades_to_empty() {
        let (_temp, config) = temp_config();
        fs::create_dir_all(&config.app_dir).unwrap();
        fs::write(config.session_file(), "not valid toml [").unwrap();

        let table = load_session_table(&config);
        assert!(table.is_empty());
    }

    #[test]
    fn test_app_state_roundtrip() {
        let (_temp, config) = temp_config();

        let state = AppState {
            current_worktree: Some("feature1".to_string()),
        };
        save_app_state(&config, &state).unwrap();

        let loaded = load_app_state(&config);
        assert_eq!(loaded, state);
    }
}
