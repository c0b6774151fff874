//! Optimistic transactions over a [`DocumentStore`].

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{DocPath, DocumentStore, ReadPrecondition, StoreError, Write};

/// A unit of work that reads documents, then buffers writes.
///
/// All reads must happen before the first write. At commit every document the
/// transaction read must still be at the version it observed, including
/// documents that were absent, otherwise nothing is applied.
pub struct Transaction<'s, S> {
    store: &'s S,
    reads: BTreeMap<String, Option<u64>>,
    writes: Vec<Write>,
}

impl<'s, S: DocumentStore> Transaction<'s, S> {
    pub(crate) const fn new(store: &'s S) -> Self {
        Self {
            store,
            reads: BTreeMap::new(),
            writes: Vec::new(),
        }
    }

    /// Read a document and record its version as a commit precondition.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadAfterWrite` once a write has been buffered, or
    /// any error of the underlying store.
    pub async fn get(&mut self, path: &DocPath) -> Result<Option<Value>, StoreError> {
        let key = path.key();
        if !self.writes.is_empty() {
            return Err(StoreError::ReadAfterWrite { path: key });
        }

        let found = self.store.get(path).await?;
        let version = found.as_ref().map(|doc| doc.version);

        // Re-reading keeps the first observation; a moved document fails the
        // commit rather than this read.
        if let Entry::Vacant(entry) = self.reads.entry(key) {
            entry.insert(version);
        }

        Ok(found.map(|doc| doc.data))
    }

    /// Read and deserialize a document.
    ///
    /// # Errors
    ///
    /// Same as [`Transaction::get`], plus `StoreError::Serialization`.
    pub async fn get_as<T: DeserializeOwned>(
        &mut self,
        path: &DocPath,
    ) -> Result<Option<T>, StoreError> {
        match self.get(path).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    /// Buffer a full replacement of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if `value` cannot be encoded.
    pub fn set<T: Serialize>(&mut self, path: &DocPath, value: &T) -> Result<(), StoreError> {
        self.writes.push(Write::Set {
            key: path.key(),
            data: serde_json::to_value(value)?,
            merge: false,
        });
        Ok(())
    }

    /// Buffer a merge of top-level `fields` into the document at `path`.
    pub fn update(&mut self, path: &DocPath, fields: Value) {
        self.writes.push(Write::Set {
            key: path.key(),
            data: fields,
            merge: true,
        });
    }

    /// Buffer removal of the document at `path`.
    pub fn delete(&mut self, path: &DocPath) {
        self.writes.push(Write::Delete { key: path.key() });
    }

    async fn commit(self) -> Result<(), StoreError> {
        let reads = self
            .reads
            .into_iter()
            .map(|(key, version)| ReadPrecondition { key, version })
            .collect();
        self.store.commit(reads, self.writes).await
    }
}

/// Run `body` in a transaction, retrying on commit conflicts.
///
/// `body` is re-executed from scratch on every attempt, so it must derive all
/// of its writes from what it reads through the transaction. Errors returned
/// by `body` abort immediately without retrying.
///
/// # Errors
///
/// Returns the error produced by `body`, any non-conflict store error, or
/// `StoreError::RetriesExhausted` once `max_attempts` commits have conflicted.
///
/// # Example
///
/// ```rust,ignore
/// let count = run_transaction(&store, 5, |tx| {
///     let path = path.clone();
///     Box::pin(async move {
///         let current: u64 = tx.get_as(&path).await?.unwrap_or_default();
///         tx.set(&path, &(current + 1))?;
///         Ok::<_, StoreError>(current + 1)
///     })
/// })
/// .await?;
/// ```
pub async fn run_transaction<S, T, E, F>(store: &S, max_attempts: u32, mut body: F) -> Result<T, E>
where
    S: DocumentStore,
    E: From<StoreError>,
    F: for<'t> FnMut(&'t mut Transaction<'_, S>) -> BoxFuture<'t, Result<T, E>>,
{
    let attempts = max_attempts.max(1);

    for attempt in 1..=attempts {
        let mut tx = Transaction::new(store);
        let value = body(&mut tx).await?;

        match tx.commit().await {
            Ok(()) => return Ok(value),
            Err(StoreError::Conflict) => {
                debug!(attempt, attempts, "transaction conflict, retrying");
                tokio::task::yield_now().await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(StoreError::RetriesExhausted { attempts }.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use serde_json::json;
    use tezweb_core::OwnerId;

    use super::*;
    use crate::db::MemoryStore;

    fn counter_path() -> DocPath {
        DocPath::profile(&OwnerId::new("counter"))
    }

    #[tokio::test]
    async fn test_commit_applies_buffered_writes() {
        let store = MemoryStore::new();
        let path = counter_path();

        let written = run_transaction(&store, 3, |tx| {
            let path = path.clone();
            Box::pin(async move {
                assert!(tx.get(&path).await?.is_none());
                tx.set(&path, &json!({"count": 1}))?;
                Ok::<_, StoreError>(1)
            })
        })
        .await
        .unwrap();

        assert_eq!(written, 1);
        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"count": 1}));
    }

    #[tokio::test]
    async fn test_read_after_write_is_rejected() {
        let store = MemoryStore::new();
        let path = counter_path();

        let result = run_transaction(&store, 1, |tx| {
            let path = path.clone();
            Box::pin(async move {
                tx.set(&path, &json!({}))?;
                tx.get(&path).await?;
                Ok::<_, StoreError>(())
            })
        })
        .await;

        assert!(matches!(result, Err(StoreError::ReadAfterWrite { .. })));
        assert!(store.get(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conflicting_write_triggers_retry() {
        let store = Arc::new(MemoryStore::new());
        let path = counter_path();
        store.set(&path, json!({"count": 0}), false).await.unwrap();

        let attempts = Arc::new(AtomicU32::new(0));

        let result = run_transaction(store.as_ref(), 3, |tx| {
            let path = path.clone();
            let store = Arc::clone(&store);
            let attempts = Arc::clone(&attempts);
            Box::pin(async move {
                let doc = tx.get(&path).await?.unwrap_or_default();
                let count = doc["count"].as_u64().unwrap_or_default();

                // Interfere on the first attempt only.
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    store.set(&path, json!({"count": 10}), false).await?;
                }

                tx.set(&path, &json!({"count": count + 1}))?;
                Ok::<_, StoreError>(count + 1)
            })
        })
        .await
        .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(result, 11);
        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"count": 11}));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = Arc::new(MemoryStore::new());
        let path = counter_path();

        let result = run_transaction(store.as_ref(), 2, |tx| {
            let path = path.clone();
            let store = Arc::clone(&store);
            Box::pin(async move {
                tx.get(&path).await?;
                // Someone else writes the document on every attempt.
                store.set(&path, json!({"owner": "other"}), false).await?;
                tx.set(&path, &json!({"owner": "me"}))?;
                Ok::<_, StoreError>(())
            })
        })
        .await;

        assert!(matches!(
            result,
            Err(StoreError::RetriesExhausted { attempts: 2 })
        ));
        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"owner": "other"}));
    }

    #[tokio::test]
    async fn test_body_error_aborts_without_retry() {
        #[derive(Debug)]
        enum Outcome {
            Rejected,
            Store,
        }

        impl From<StoreError> for Outcome {
            fn from(_: StoreError) -> Self {
                Self::Store
            }
        }

        let store = MemoryStore::new();
        let calls = AtomicU32::new(0);

        let result: Result<(), Outcome> = run_transaction(&store, 5, |_tx| {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(Outcome::Rejected) })
        })
        .await;

        assert!(matches!(result, Err(Outcome::Rejected)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
