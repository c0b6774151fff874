//! Backend selected at startup.

use serde_json::Value;

use super::{
    CollectionPath, DocPath, DocumentStore, MemoryStore, PgDocumentStore, ReadPrecondition,
    StoreError, VersionedDocument, Write,
};

/// The document store the server runs against.
#[derive(Debug)]
pub enum SiteStore {
    /// Process-local store; contents are lost on restart.
    Memory(MemoryStore),
    Postgres(PgDocumentStore),
}

impl SiteStore {
    /// Short backend name for logs.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl From<MemoryStore> for SiteStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgDocumentStore> for SiteStore {
    fn from(store: PgDocumentStore) -> Self {
        Self::Postgres(store)
    }
}

impl DocumentStore for SiteStore {
    async fn get(&self, path: &DocPath) -> Result<Option<VersionedDocument>, StoreError> {
        match self {
            Self::Memory(store) => store.get(path).await,
            Self::Postgres(store) => store.get(path).await,
        }
    }

    async fn set(&self, path: &DocPath, data: Value, merge: bool) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(path, data, merge).await,
            Self::Postgres(store) => store.set(path, data, merge).await,
        }
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.delete(path).await,
            Self::Postgres(store) => store.delete(path).await,
        }
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<VersionedDocument>, StoreError> {
        match self {
            Self::Memory(store) => store.list(collection).await,
            Self::Postgres(store) => store.list(collection).await,
        }
    }

    async fn commit(
        &self,
        reads: Vec<ReadPrecondition>,
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.commit(reads, writes).await,
            Self::Postgres(store) => store.commit(reads, writes).await,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.ping().await,
            Self::Postgres(store) => store.ping().await,
        }
    }
}
