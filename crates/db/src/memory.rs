//! Fluechtiger Key-Value-Speicher fuer Tests und Einmal-Sitzungen

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::SpeicherResult;
use crate::store::KeyValueStore;

/// Key-Value-Speicher im Arbeitsspeicher
#[derive(Debug, Default)]
pub struct InMemoryStore {
    eintraege: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.eintraege.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.eintraege.read().is_empty()
    }
}

impl KeyValueStore for InMemoryStore {
    async fn put(&self, id: &str, value: &str) -> SpeicherResult<()> {
        self.eintraege.write().insert(id.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, id: &str) -> SpeicherResult<Option<String>> {
        Ok(self.eintraege.read().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> SpeicherResult<bool> {
        Ok(self.eintraege.write().remove(id).is_some())
    }
}
