//! `PostgreSQL` document store.
//!
//! Documents live in the single `documents` table keyed by path. Versions come
//! from `document_version_seq`, so every write produces a fresh version and a
//! precondition can never be satisfied by an unrelated later write.
//!
//! Queries are built at runtime rather than with the checked macros: the
//! table holds untyped JSONB and every statement has the same trivial shape.

use std::collections::BTreeSet;

use serde_json::Value;
use sqlx::migrate::MigrateError;
use sqlx::{PgConnection, PgPool};

use super::{
    CollectionPath, DocPath, DocumentStore, ReadPrecondition, StoreError, VersionedDocument,
    Write,
};

const UPSERT_REPLACE: &str = r"
    INSERT INTO documents (path, data, version, updated_at)
    VALUES ($1, $2, nextval('document_version_seq'), now())
    ON CONFLICT (path) DO UPDATE
    SET data = EXCLUDED.data, version = EXCLUDED.version, updated_at = now()
";

const UPSERT_MERGE: &str = r"
    INSERT INTO documents (path, data, version, updated_at)
    VALUES ($1, $2, nextval('document_version_seq'), now())
    ON CONFLICT (path) DO UPDATE
    SET data = documents.data || EXCLUDED.data, version = EXCLUDED.version, updated_at = now()
";

// Used when the transaction saw the document absent: a concurrent insert then
// surfaces as a unique violation instead of being overwritten.
const INSERT_NEW: &str = r"
    INSERT INTO documents (path, data, version, updated_at)
    VALUES ($1, $2, nextval('document_version_seq'), now())
";

/// Run the server's pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DocumentStore for PgDocumentStore {
    async fn get(&self, path: &DocPath) -> Result<Option<VersionedDocument>, StoreError> {
        let key = path.key();
        let row: Option<(Value, i64)> =
            sqlx::query_as("SELECT data, version FROM documents WHERE path = $1")
                .bind(&key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(data, version)| VersionedDocument {
            key,
            data,
            version: to_version(version),
        }))
    }

    async fn set(&self, path: &DocPath, data: Value, merge: bool) -> Result<(), StoreError> {
        let statement = if merge { UPSERT_MERGE } else { UPSERT_REPLACE };
        sqlx::query(statement)
            .bind(path.key())
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE path = $1")
            .bind(path.key())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<VersionedDocument>, StoreError> {
        let prefix = collection.prefix();
        let rows: Vec<(String, Value, i64)> = sqlx::query_as(
            r"
            SELECT path, data, version
            FROM documents
            WHERE starts_with(path, $1)
            ORDER BY path
            ",
        )
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter(|(key, _, _)| collection.contains(key))
            .map(|(key, data, version)| VersionedDocument {
                key,
                data,
                version: to_version(version),
            })
            .collect())
    }

    async fn commit(
        &self,
        reads: Vec<ReadPrecondition>,
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        for read in &reads {
            check_precondition(&mut *tx, read).await?;
        }

        let mut touched = BTreeSet::new();
        for write in writes {
            let seen_absent = !touched.contains(write.key())
                && reads
                    .iter()
                    .any(|read| read.key == write.key() && read.version.is_none());
            touched.insert(write.key().to_owned());
            apply(&mut *tx, write, seen_absent).await?;
        }

        tx.commit().await.map_err(classify)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Lock the row and compare its version with what the transaction saw.
async fn check_precondition(
    conn: &mut PgConnection,
    read: &ReadPrecondition,
) -> Result<(), StoreError> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT version FROM documents WHERE path = $1 FOR UPDATE")
            .bind(&read.key)
            .fetch_optional(conn)
            .await
            .map_err(classify)?;

    if current.map(to_version) == read.version {
        Ok(())
    } else {
        Err(StoreError::Conflict)
    }
}

async fn apply(conn: &mut PgConnection, write: Write, seen_absent: bool) -> Result<(), StoreError> {
    match write {
        Write::Set { key, data, merge } => {
            let statement = match (seen_absent, merge) {
                (true, _) => INSERT_NEW,
                (false, true) => UPSERT_MERGE,
                (false, false) => UPSERT_REPLACE,
            };
            sqlx::query(statement)
                .bind(key)
                .bind(data)
                .execute(conn)
                .await
                .map_err(classify)?;
        }
        Write::Delete { key } => {
            sqlx::query("DELETE FROM documents WHERE path = $1")
                .bind(key)
                .execute(conn)
                .await
                .map_err(classify)?;
        }
    }
    Ok(())
}

/// Map races lost inside the database to `StoreError::Conflict`.
fn classify(err: sqlx::Error) -> StoreError {
    // unique_violation, serialization_failure, deadlock_detected
    if let sqlx::Error::Database(ref db_err) = err
        && matches!(db_err.code().as_deref(), Some("23505" | "40001" | "40P01"))
    {
        return StoreError::Conflict;
    }
    StoreError::Database(err)
}

fn to_version(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}
