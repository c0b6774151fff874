//! In-process document store.

use std::collections::BTreeMap;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    CollectionPath, DocPath, DocumentStore, ReadPrecondition, StoreError, VersionedDocument,
    Write, merge_fields,
};

/// Document store backed by an ordered map behind an async lock.
///
/// Commits validate preconditions and apply writes under a single write lock,
/// so concurrent transactions serialize exactly as they would against the
/// database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: BTreeMap<String, VersionedDocument>,
    last_version: u64,
}

impl MemoryState {
    const fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }

    fn version_of(&self, key: &str) -> Option<u64> {
        self.documents.get(key).map(|doc| doc.version)
    }

    fn put(&mut self, key: String, data: Value, merge: bool) {
        let version = self.next_version();
        if merge && let Some(doc) = self.documents.get_mut(&key) {
            merge_fields(&mut doc.data, data);
            doc.version = version;
            return;
        }
        self.documents
            .insert(key.clone(), VersionedDocument { key, data, version });
    }

    fn apply(&mut self, write: Write) {
        match write {
            Write::Set { key, data, merge } => self.put(key, data, merge),
            Write::Delete { key } => {
                self.documents.remove(&key);
            }
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<VersionedDocument>, StoreError> {
        let key = path.key();
        Ok(self.state.read().await.documents.get(&key).cloned())
    }

    async fn set(&self, path: &DocPath, data: Value, merge: bool) -> Result<(), StoreError> {
        self.state.write().await.put(path.key(), data, merge);
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        self.state.write().await.documents.remove(&path.key());
        Ok(())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<VersionedDocument>, StoreError> {
        let prefix = collection.prefix();
        let state = self.state.read().await;
        Ok(state
            .documents
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| collection.contains(key))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn commit(
        &self,
        reads: Vec<ReadPrecondition>,
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        if reads
            .iter()
            .any(|read| state.version_of(&read.key) != read.version)
        {
            return Err(StoreError::Conflict);
        }

        for write in writes {
            state.apply(write);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tezweb_core::{OwnerId, Subdomain, WebsiteId};

    use super::*;

    #[tokio::test]
    async fn test_set_bumps_version() {
        let store = MemoryStore::new();
        let path = DocPath::profile(&OwnerId::new("u1"));

        store.set(&path, json!({"a": 1}), false).await.unwrap();
        let first = store.get(&path).await.unwrap().unwrap();
        store.set(&path, json!({"b": 2}), true).await.unwrap();
        let second = store.get(&path).await.unwrap().unwrap();

        assert!(second.version > first.version);
        assert_eq!(second.data, json!({"a": 1, "b": 2}));
    }

    #[tokio::test]
    async fn test_replace_drops_old_fields() {
        let store = MemoryStore::new();
        let path = DocPath::profile(&OwnerId::new("u1"));

        store.set(&path, json!({"a": 1}), false).await.unwrap();
        store.set(&path, json!({"b": 2}), false).await.unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"b": 2}));
    }

    #[tokio::test]
    async fn test_list_returns_only_owner_websites() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        let other = OwnerId::new("u10");

        for id in ["b", "a"] {
            let path = DocPath::website(&owner, &WebsiteId::new(id));
            store.set(&path, json!({"id": id}), false).await.unwrap();
        }
        let foreign = DocPath::website(&other, &WebsiteId::new("c"));
        store.set(&foreign, json!({"id": "c"}), false).await.unwrap();
        store
            .set(&DocPath::profile(&owner), json!({}), false)
            .await
            .unwrap();

        let listed = store
            .list(&CollectionPath::Websites(owner))
            .await
            .unwrap();
        let keys: Vec<_> = listed.iter().map(|doc| doc.key.as_str()).collect();
        assert_eq!(keys, ["users/u1/websites/a", "users/u1/websites/b"]);
    }

    #[tokio::test]
    async fn test_commit_checks_absent_precondition() {
        let store = MemoryStore::new();
        let path = DocPath::published_site(&Subdomain::from_stored("shop"));
        let read = ReadPrecondition {
            key: path.key(),
            version: None,
        };

        store.set(&path, json!({"ownerUid": "other"}), false).await.unwrap();

        let result = store
            .commit(
                vec![read],
                vec![Write::Set {
                    key: path.key(),
                    data: json!({"ownerUid": "me"}),
                    merge: false,
                }],
            )
            .await;

        assert!(matches!(result, Err(StoreError::Conflict)));
        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"ownerUid": "other"}));
    }

    #[tokio::test]
    async fn test_commit_applies_writes_in_order() {
        let store = MemoryStore::new();
        let path = DocPath::profile(&OwnerId::new("u1"));

        store
            .commit(
                Vec::new(),
                vec![
                    Write::Set {
                        key: path.key(),
                        data: json!({"a": 1}),
                        merge: false,
                    },
                    Write::Delete { key: path.key() },
                ],
            )
            .await
            .unwrap();

        assert!(store.is_empty().await);
    }
}
