//! Saved-diagram document and the key-value store boundary.
//!
//! The store itself belongs to the host (browser storage, a file, a database). This module only
//! defines the document shape and how restored data is validated before it reaches the model.

use crate::model::{Dependency, DiagramState, Task};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STORAGE_KEY: &str = "taskDiagramData";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedDiagram {
    pub tasks: Vec<Task>,
    pub dependencies: Vec<Dependency>,
}

impl PersistedDiagram {
    pub fn from_state(state: &DiagramState) -> Self {
        Self {
            tasks: state.tasks.clone(),
            dependencies: state.dependencies.clone(),
        }
    }

    /// Parses and validates a document. Both `tasks` and `dependencies` must be present and be
    /// arrays.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::InvalidDocument {
                message: "expected a JSON object".to_string(),
            });
        };
        for field in ["tasks", "dependencies"] {
            match obj.get(field) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(Error::InvalidDocument {
                        message: format!("`{field}` must be an array"),
                    });
                }
                None => {
                    return Err(Error::InvalidDocument {
                        message: format!("missing `{field}`"),
                    });
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds a model state through the same bulk-replace operations a live model uses, so
    /// restored data is held to the model invariants.
    pub fn into_state(self) -> DiagramState {
        DiagramState::new()
            .set_tasks(self.tasks)
            .set_dependencies(self.dependencies)
    }
}

pub fn save(store: &mut dyn KeyValueStore, state: &DiagramState) -> Result<()> {
    let doc = PersistedDiagram::from_state(state).to_json_string()?;
    store.set(STORAGE_KEY, doc);
    Ok(())
}

/// Loads the saved document, or `None` if nothing usable is stored.
pub fn restore(store: &dyn KeyValueStore) -> Option<PersistedDiagram> {
    let raw = store.get(STORAGE_KEY)?;
    match PersistedDiagram::from_json_str(&raw) {
        Ok(doc) => Some(doc),
        Err(err) => {
            tracing::warn!(error = %err, "discarding saved diagram");
            None
        }
    }
}

/// Restores into `state` unless it already has tasks.
pub fn restore_into(store: &dyn KeyValueStore, state: &DiagramState) -> Option<DiagramState> {
    if !state.tasks.is_empty() {
        return None;
    }
    let doc = restore(store)?;
    Some(
        state
            .set_tasks(doc.tasks)
            .set_dependencies(doc.dependencies),
    )
}
