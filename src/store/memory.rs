// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-process key-value store.
//!
//! Keys are rooted like etcd keys: `testing/string` and `/testing/string`
//! name the same entry.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory store.
///
/// Can be told to fail on specific keys to exercise error paths. Stores built
/// with [`MemoryStore::recording`] also log every key they are asked for.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<IndexMap<String, String>>>,
    failures: Arc<RwLock<IndexMap<String, String>>>,
    lookups: Option<Arc<RwLock<Vec<String>>>>,
}

fn normalize(key: &str) -> String {
    key.trim_start_matches('/').to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `entries`.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (normalize(k.as_ref()), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
            ..Self::default()
        }
    }

    /// Log every looked-up key until [`MemoryStore::clear_lookups`].
    ///
    /// Clones made afterwards share the log.
    pub fn recording(mut self) -> Self {
        self.lookups = Some(Arc::default());
        self
    }

    /// Set the value at `key`, returning the previous value.
    pub async fn insert(&self, key: &str, value: impl Into<String>) -> Option<String> {
        let mut entries = self.entries.write().await;
        entries.insert(normalize(key), value.into())
    }

    /// Remove `key`, returning its value if it existed.
    pub async fn remove(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.write().await;
        entries.shift_remove(&normalize(key))
    }

    /// Make every lookup of `key` fail with [`StoreError::Unavailable`].
    pub async fn fail_on(&self, key: &str, message: impl Into<String>) {
        let mut failures = self.failures.write().await;
        failures.insert(normalize(key), message.into());
    }

    /// Keys looked up so far, in order. Always empty unless recording.
    pub async fn lookups(&self) -> Vec<String> {
        match &self.lookups {
            Some(lookups) => lookups.read().await.clone(),
            None => Vec::new(),
        }
    }

    /// Drop the recorded lookups.
    pub async fn clear_lookups(&self) {
        if let Some(lookups) = &self.lookups {
            lookups.write().await.clear();
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = normalize(key);
        if let Some(lookups) = &self.lookups {
            lookups.write().await.push(key.clone());
        }

        if let Some(message) = self.failures.read().await.get(&key) {
            return Err(StoreError::Unavailable(message.clone()));
        }

        Ok(self.entries.read().await.get(&key).cloned())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_get_hit_and_miss() {
        let store = MemoryStore::from_entries([("/testing/string", "foo")]).recording();

        tokio_test::block_on(async {
            assert_eq!(
                store.get("testing/string").await.unwrap(),
                Some("foo".to_string())
            );
            assert_eq!(store.get("testing/missing").await.unwrap(), None);
            assert_eq!(
                store.lookups().await,
                vec!["testing/string".to_string(), "testing/missing".to_string()]
            );
        });
    }

    #[tokio::test]
    async fn test_insert_and_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        assert_eq!(store.insert("a/b", "1").await, None);
        assert_eq!(store.insert("/a/b", "2").await, Some("1".to_string()));
        assert_eq!(store.len().await, 1);

        assert_eq!(store.remove("a/b").await, Some("2".to_string()));
        assert_eq!(store.get("a/b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MemoryStore::from_entries([("a", "1")]);
        store.fail_on("a", "connection reset").await;

        let err = store.get("a").await.unwrap_err();
        assert_matches!(err, StoreError::Unavailable(ref msg) if msg == "connection reset");
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.insert("shared", "yes").await;

        assert_eq!(store.get("shared").await.unwrap(), Some("yes".to_string()));
    }

    #[tokio::test]
    async fn test_lookups_are_not_kept_by_default() {
        let store = MemoryStore::from_entries([("a", "1")]);
        store.get("a").await.unwrap();
        store.get("b").await.unwrap();

        assert!(store.lookups().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_lookups() {
        let store = MemoryStore::new().recording();
        let clone = store.clone();
        clone.get("a").await.unwrap();
        assert_eq!(store.lookups().await, vec!["a".to_string()]);

        store.clear_lookups().await;
        assert!(clone.lookups().await.is_empty());

        clone.get("b").await.unwrap();
        assert_eq!(store.lookups().await, vec!["b".to_string()]);
    }
}
