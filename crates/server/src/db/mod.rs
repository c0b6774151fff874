//! Document store for profiles, websites and the published-site index.
//!
//! # Layout
//!
//! Every record is a JSON document addressed by a slash-separated path:
//!
//! - `users/{uid}` - owner profile
//! - `users/{uid}/websites/{websiteId}` - one website of an owner
//! - `publishedSites/{name}` - global subdomain mapping, one per published name
//!
//! Each document carries a monotonically increasing version. Transactions
//! record the version of every document they read and the store refuses the
//! commit when any of them moved in the meantime, which is what keeps two
//! concurrent publishers from claiming the same name.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process, used by tests and by the server when no
//!   database is configured
//! - [`PgDocumentStore`] - `PostgreSQL` table `documents`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p tezweb-cli -- migrate
//! ```

mod memory;
mod postgres;
mod site_store;
mod transaction;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tezweb_core::{OwnerId, Subdomain, WebsiteId};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::{PgDocumentStore, migrate};
pub use site_store::SiteStore;
pub use transaction::{Transaction, run_transaction};

/// Collection holding the global name mappings.
pub const PUBLISHED_SITES: &str = "publishedSites";

/// Errors raised by document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document read by the transaction changed before commit.
    #[error("transaction conflict")]
    Conflict,

    /// A transaction tried to read after it had buffered a write.
    #[error("read of {path} after a write in the same transaction")]
    ReadAfterWrite { path: String },

    /// Document contents did not match the expected shape.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Every attempt of a transaction hit a conflict.
    #[error("transaction gave up after {attempts} conflicting attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocPath {
    /// `users/{uid}`
    Profile(OwnerId),
    /// `users/{uid}/websites/{websiteId}`
    Website(OwnerId, WebsiteId),
    /// `publishedSites/{name}`
    PublishedSite(Subdomain),
}

impl DocPath {
    #[must_use]
    pub fn profile(owner: &OwnerId) -> Self {
        Self::Profile(owner.clone())
    }

    #[must_use]
    pub fn website(owner: &OwnerId, website: &WebsiteId) -> Self {
        Self::Website(owner.clone(), website.clone())
    }

    #[must_use]
    pub fn published_site(name: &Subdomain) -> Self {
        Self::PublishedSite(name.clone())
    }

    /// Storage key of the document.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(owner) => write!(f, "users/{owner}"),
            Self::Website(owner, website) => write!(f, "users/{owner}/websites/{website}"),
            Self::PublishedSite(name) => write!(f, "{PUBLISHED_SITES}/{name}"),
        }
    }
}

/// Address of a collection of sibling documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionPath {
    /// `users/{uid}/websites`
    Websites(OwnerId),
}

impl CollectionPath {
    /// Key prefix shared by every document in the collection, including the
    /// trailing slash.
    #[must_use]
    pub fn prefix(&self) -> String {
        match self {
            Self::Websites(owner) => format!("users/{owner}/websites/"),
        }
    }

    /// Whether `key` is a direct child of this collection.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        key.strip_prefix(&self.prefix())
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
    }
}

/// A stored document with its version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDocument {
    pub key: String,
    pub data: Value,
    pub version: u64,
}

impl VersionedDocument {
    /// Deserialize the document body.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Version a transaction observed for a document, `None` meaning absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPrecondition {
    pub key: String,
    pub version: Option<u64>,
}

/// A buffered mutation applied at commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Replace the document, or merge top-level fields into it when `merge`.
    Set { key: String, data: Value, merge: bool },
    /// Remove the document if present.
    Delete { key: String },
}

impl Write {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Storage port shared by the in-memory and `PostgreSQL` backends.
///
/// `commit` is the only operation that spans documents: it applies `writes`
/// atomically, and only if every precondition in `reads` still holds.
/// Otherwise it fails with [`StoreError::Conflict`] and applies nothing.
pub trait DocumentStore: Send + Sync {
    fn get(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<VersionedDocument>, StoreError>> + Send;

    fn set(
        &self,
        path: &DocPath,
        data: Value,
        merge: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, path: &DocPath) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Direct children of `collection`, ordered by key.
    fn list(
        &self,
        collection: &CollectionPath,
    ) -> impl Future<Output = Result<Vec<VersionedDocument>, StoreError>> + Send;

    fn commit(
        &self,
        reads: Vec<ReadPrecondition>,
        writes: Vec<Write>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Cheap round trip used by the readiness probe.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Merge the top-level fields of `patch` into `target`.
///
/// Non-object values replace the target outright.
pub(crate) fn merge_fields(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(fields)) => {
            for (name, value) in fields {
                existing.insert(name, value);
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_doc_path_keys() {
        let owner = OwnerId::new("owner-1");
        let website = WebsiteId::new("site-1");
        let name = Subdomain::from_stored("my-shop");

        assert_eq!(DocPath::profile(&owner).key(), "users/owner-1");
        assert_eq!(
            DocPath::website(&owner, &website).key(),
            "users/owner-1/websites/site-1"
        );
        assert_eq!(DocPath::published_site(&name).key(), "publishedSites/my-shop");
    }

    #[test]
    fn test_collection_contains_direct_children_only() {
        let websites = CollectionPath::Websites(OwnerId::new("owner-1"));

        assert!(websites.contains("users/owner-1/websites/a"));
        assert!(!websites.contains("users/owner-1/websites/"));
        assert!(!websites.contains("users/owner-1/websites/a/pages/b"));
        assert!(!websites.contains("users/owner-10/websites/a"));
        assert!(!websites.contains("users/owner-1"));
    }

    #[test]
    fn test_merge_fields() {
        let mut doc = json!({"status": "draft", "subdomain": "shop"});
        merge_fields(&mut doc, json!({"status": "published", "publishedAt": 1}));
        assert_eq!(
            doc,
            json!({"status": "published", "subdomain": "shop", "publishedAt": 1})
        );

        let mut scalar = json!(3);
        merge_fields(&mut scalar, json!({"a": 1}));
        assert_eq!(scalar, json!({"a": 1}));
    }
}
