//! Document store and allocator behavior on `PostgreSQL`.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `TEZWEB_TEST_DATABASE_URL`. Migrations are applied on connect. Every test
//! works under fresh owner ids and names, so runs can share one database.
//!
//! Run with: cargo test -p tezweb-integration-tests -- --include-ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;
use tezweb_core::{OwnerId, Subdomain, WebsiteStatus};
use tezweb_integration_tests::{TEST_ATTEMPTS, seed_website, test_database_url, unique_owner};
use tezweb_server::db::{
    self, CollectionPath, DocPath, DocumentStore, PgDocumentStore, ReadPrecondition, StoreError,
    Write,
};
use tezweb_server::services::PublishingService;

async fn store() -> PgDocumentStore {
    let url = test_database_url().expect("TEZWEB_TEST_DATABASE_URL must be set");
    let pool = db::create_pool(&url).await.expect("Failed to connect");
    db::migrate(&pool).await.expect("Failed to migrate");
    PgDocumentStore::new(pool)
}

/// A base name no other run will pick.
fn unique_name(prefix: &str) -> String {
    let id: String = uuid::Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("{prefix}-{id}")
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_set_merge_list_delete() {
    let store = store().await;
    let owner = unique_owner();
    let profile = DocPath::profile(&owner);

    store
        .set(&profile, json!({ "uid": owner, "plan": "trial" }), false)
        .await
        .unwrap();
    store
        .set(&profile, json!({ "fullName": "Asha" }), true)
        .await
        .unwrap();

    let doc = store.get(&profile).await.unwrap().unwrap();
    assert_eq!(doc.data["plan"], "trial");
    assert_eq!(doc.data["fullName"], "Asha");

    let first = seed_website(&store, &owner, "Alpha").await.unwrap();
    let second = seed_website(&store, &owner, "Beta").await.unwrap();
    let listed = store
        .list(&CollectionPath::Websites(owner.clone()))
        .await
        .unwrap();
    let ids: BTreeSet<String> = listed
        .into_iter()
        .map(|doc| doc.data["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        BTreeSet::from([first.id.to_string(), second.id.to_string()])
    );

    store.delete(&profile).await.unwrap();
    store.delete(&profile).await.unwrap();
    assert!(store.get(&profile).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_commit_rejects_stale_reads() {
    let store = store().await;
    let owner = unique_owner();
    let path = DocPath::profile(&owner);

    store.set(&path, json!({ "n": 1 }), false).await.unwrap();
    let seen = store.get(&path).await.unwrap().unwrap();

    // Someone else writes in between.
    store.set(&path, json!({ "n": 2 }), false).await.unwrap();

    let err = store
        .commit(
            vec![ReadPrecondition {
                key: path.key(),
                version: Some(seen.version),
            }],
            vec![Write::Set {
                key: path.key(),
                data: json!({ "n": 3 }),
                merge: false,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict));
    assert_eq!(store.get(&path).await.unwrap().unwrap().data["n"], 2);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_commit_rejects_insert_over_existing() {
    let store = store().await;
    let name = Subdomain::from_stored(unique_name("taken"));
    let path = DocPath::published_site(&name);

    store.set(&path, json!({ "ownerUid": "a" }), false).await.unwrap();

    let err = store
        .commit(
            vec![ReadPrecondition {
                key: path.key(),
                version: None,
            }],
            vec![Write::Set {
                key: path.key(),
                data: json!({ "ownerUid": "b" }),
                merge: false,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict));
    assert_eq!(store.get(&path).await.unwrap().unwrap().data["ownerUid"], "a");

    store.delete(&path).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_publish_lifecycle() {
    let store = store().await;
    let service = PublishingService::new(&store, TEST_ATTEMPTS);
    let owner = unique_owner();
    let base = unique_name("cafe");
    let website = seed_website(&store, &owner, &base).await.unwrap();

    let published = service.publish(&owner, &website.id, &base).await.unwrap();
    assert_eq!(published.status, WebsiteStatus::Published);
    assert_eq!(published.subdomain.as_ref().unwrap().as_str(), base);

    let again = service.publish(&owner, &website.id, &base).await.unwrap();
    assert_eq!(again.subdomain, published.subdomain);

    let resolved = service.resolve(&base).await.unwrap().unwrap();
    assert_eq!(resolved.owner, owner);

    service.unpublish(&owner, &website.id).await.unwrap();
    assert!(service.resolve(&base).await.unwrap().is_none());

    service.delete(&owner, &website.id).await.unwrap();
    let name = Subdomain::from_stored(base);
    assert!(
        store
            .get(&DocPath::published_site(&name))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires running PostgreSQL"]
async fn test_concurrent_publishers_get_distinct_names() {
    const CONTENDERS: usize = 8;
    let store = Arc::new(store().await);
    let base = unique_name("race");

    let mut sites = Vec::new();
    for _ in 0..CONTENDERS {
        let owner: OwnerId = unique_owner();
        let website = seed_website(store.as_ref(), &owner, &base).await.unwrap();
        sites.push((owner, website.id));
    }

    let handles = sites.iter().cloned().map(|(owner, website)| {
        let store = Arc::clone(&store);
        let base = base.clone();
        tokio::spawn(async move {
            PublishingService::new(store.as_ref(), TEST_ATTEMPTS)
                .publish(&owner, &website, &base)
                .await
        })
    });

    let mut names = BTreeSet::new();
    for joined in futures::future::join_all(handles).await {
        let site = joined.unwrap().unwrap();
        names.insert(site.subdomain.unwrap().into_inner());
    }

    let expected: BTreeSet<String> = std::iter::once(base.clone())
        .chain((1..CONTENDERS).map(|n| format!("{base}-{n}")))
        .collect();
    assert_eq!(names, expected);

    let service = PublishingService::new(store.as_ref(), TEST_ATTEMPTS);
    for (owner, website) in &sites {
        service.delete(owner, website).await.unwrap();
    }
    for name in &names {
        assert!(service.resolve(name).await.unwrap().is_none());
    }
}
