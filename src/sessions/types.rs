use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Branch name -> opaque terminal session identifier.
///
/// Loaded fully into memory, mutated, and rewritten fully on save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTable {
    entries: BTreeMap<String, String>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, branch: &str) -> Option<&str> {
        self.entries.get(branch).map(|s| s.as_str())
    }

    pub fn insert(&mut self, branch: String, session_id: String) {
        self.entries.insert(branch, session_id);
    }

    pub fn remove(&mut self, branch: &str) -> Option<String> {
        self.entries.remove(branch)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Small application state persisted between invocations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    /// Branch of the worktree the user last switched to, if any.
    #[serde(default)]
    pub current_worktree: Option<String>,
}
