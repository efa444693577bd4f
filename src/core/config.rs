use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime paths and logging for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_dir: PathBuf,
    pub log_level: String,
}

/// User/project configuration loaded from config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub worktree: WorktreeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Shut down processes still running inside worktrees before removal.
    #[serde(default = "default_kill_processes")]
    pub kill_processes: bool,
    /// Cleanup mode used when none is given on the command line.
    #[serde(default)]
    pub default_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorktreeConfig {
    /// Base directory for new worktrees. Defaults to `<app_dir>/worktrees`.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

fn default_kill_processes() -> bool {
    true
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            kill_processes: default_kill_processes(),
            default_mode: None,
        }
    }
}

impl SweepConfig {
    /// Load user config, then let project config override it.
    pub fn load_hierarchy(app_dir: &Path) -> Self {
        let mut config = SweepConfig::default();

        if let Some(user_config) = Self::load_config_file(&app_dir.join("config.toml")) {
            config = Self::merge_configs(config, user_config);
        }

        if let Ok(cwd) = std::env::current_dir() {
            for name in ["wtsweep.toml", ".wtsweep.toml"] {
                if let Some(project_config) = Self::load_config_file(&cwd.join(name)) {
                    config = Self::merge_configs(config, project_config);
                    break;
                }
            }
        }

        config
    }

    fn load_config_file(path: &Path) -> Option<SweepConfig> {
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    event = "config.parse_failed",
                    path = %path.display(),
                    error = %e
                );
                None
            }
        }
    }

    fn merge_configs(base: SweepConfig, override_config: SweepConfig) -> SweepConfig {
        SweepConfig {
            cleanup: CleanupConfig {
                kill_processes: override_config.cleanup.kill_processes,
                default_mode: override_config
                    .cleanup
                    .default_mode
                    .or(base.cleanup.default_mode),
            },
            worktree: WorktreeConfig {
                base_dir: override_config.worktree.base_dir.or(base.worktree.base_dir),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = match std::env::var_os("WTSWEEP_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|d| d.join("wtsweep"))
                .unwrap_or_else(|| {
                    dirs::home_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join(".wtsweep")
                }),
        };

        Self {
            app_dir,
            log_level: std::env::var("WTSWEEP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_dir(app_dir: PathBuf) -> Self {
        Self {
            app_dir,
            ..Self::default()
        }
    }

    pub fn worktrees_dir(&self) -> PathBuf {
        self.app_dir.join("worktrees")
    }

    pub fn session_file(&self) -> PathBuf {
        self.app_dir.join("sessionids.toml")
    }

    pub fn state_file(&self) -> PathBuf {
        self.app_dir.join("state.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_app_dir() {
        let config = Config::with_app_dir(PathBuf::from("/tmp/wtsweep-test"));
        assert_eq!(config.app_dir, PathBuf::from("/tmp/wtsweep-test"));
        assert!(config.session_file().ends_with("sessionids.toml"));
        assert!(config.state_file().ends_with("state.toml"));
        assert!(config.worktrees_dir().ends_with("worktrees"));
    }

    #[test]
    fn test_sweep_config_defaults() {
        let config = SweepConfig::default();
        assert!(config.cleanup.kill_processes);
        assert!(config.cleanup.default_mode.is_none());
        assert!(config.worktree.base_dir.is_none());
    }

    #[test]
    fn test_sweep_config_parse() {
        let config: SweepConfig = toml::from_str(
            "[cleanup]\nkill_processes = false\ndefault_mode = \"merged\"\n",
        )
        .unwrap();
        assert!(!config.cleanup.kill_processes);
        assert_eq!(config.cleanup.default_mode.as_deref(), Some("merged"));
    }

    #[test]
    fn test_merge_project_overrides_user() {
        let base: SweepConfig =
            toml::from_str("[cleanup]\ndefault_mode = \"all\"\n").unwrap();
        let project: SweepConfig =
            toml::from_str("[cleanup]\ndefault_mode = \"remoteless\"\n").unwrap();
        let merged = SweepConfig::merge_configs(base, project);
        assert_eq!(merged.cleanup.default_mode.as_deref(), Some("remoteless"));
    }
}
