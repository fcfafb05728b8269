//! Storage collaborator boundary
//!
//! The engine never writes; the service layer persists a talk only after it
//! validated. Keys follow the `talks/{id}` pattern.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::{StoreError, Talk};

/// Storage key for a talk id
pub fn talk_key(talk_id: &str) -> String {
    format!("talks/{}", talk_id)
}

/// The persistence contract consumed by the service layer
pub trait TalkStore: Send + Sync {
    fn put(&self, key: &str, talk: &Talk) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<Talk>, StoreError>;
    fn count(&self) -> Result<usize, StoreError>;
}

/// In-memory store backing the HTTP layer and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    talks: RwLock<HashMap<String, Talk>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TalkStore for MemoryStore {
    fn put(&self, key: &str, talk: &Talk) -> Result<(), StoreError> {
        let mut talks = self.talks.write().map_err(|_| StoreError::Poisoned)?;
        talks.insert(key.to_string(), talk.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Talk>, StoreError> {
        let talks = self.talks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(talks.get(key).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let talks = self.talks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(talks.len())
    }
}
