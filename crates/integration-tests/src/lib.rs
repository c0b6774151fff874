//! Integration tests for TezWeb.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store and HTTP tests
//! cargo test -p tezweb-integration-tests
//!
//! # Include the PostgreSQL store tests
//! TEZWEB_TEST_DATABASE_URL=postgres://localhost/tezweb_test \
//!     cargo test -p tezweb-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `publishing` - Name allocation against the in-memory store
//! - `http_api` - Full HTTP flows against a server on an ephemeral port
//! - `postgres_store` - Store and allocator behavior on `PostgreSQL`

use std::net::SocketAddr;

use secrecy::SecretString;
use tezweb_core::starter::CreateWebsiteInput;
use tezweb_core::{Language, OwnerId, TemplateId, Website};
use tezweb_server::config::ServerConfig;
use tezweb_server::db::{DocumentStore, SiteStore};
use tezweb_server::error::AppError;
use tezweb_server::services::WebsiteService;
use tezweb_server::state::AppState;
use tokio::net::TcpListener;

/// Commit attempts used by test services. Generous so that races between
/// many tasks settle instead of exhausting retries.
pub const TEST_ATTEMPTS: u32 = 64;

/// A server bound to `127.0.0.1` on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve `store` in a background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(store: impl Into<SiteStore>) -> std::io::Result<Self> {
        let config = ServerConfig {
            transaction_attempts: TEST_ATTEMPTS,
            ..ServerConfig::default()
        };
        let app = tezweb_server::app(AppState::new(config, store.into()));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self {
            addr,
            client: reqwest::Client::new(),
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// A fresh owner id, unique across test runs sharing one database.
#[must_use]
pub fn unique_owner() -> OwnerId {
    OwnerId::new(format!("test-{}", uuid::Uuid::new_v4().simple()))
}

/// Onboarding answers for a business called `name`.
#[must_use]
pub fn onboarding(name: &str) -> CreateWebsiteInput {
    CreateWebsiteInput {
        business_name: name.to_string(),
        business_category: "Cafe".to_string(),
        whatsapp_number: "9876543210".to_string(),
        country_code: "+91".to_string(),
        language: Language::English,
        additional_instructions: String::new(),
    }
}

/// Create a draft website for `owner` directly in `store`.
///
/// # Errors
///
/// Returns `AppError` if the website cannot be written.
pub async fn seed_website<S: DocumentStore>(
    store: &S,
    owner: &OwnerId,
    business_name: &str,
) -> Result<Website, AppError> {
    WebsiteService::new(store, TEST_ATTEMPTS)
        .create(owner, TemplateId::new("shop-lite"), &onboarding(business_name))
        .await
}

/// `PostgreSQL` URL for the store tests, from `TEZWEB_TEST_DATABASE_URL`.
#[must_use]
pub fn test_database_url() -> Option<SecretString> {
    std::env::var("TEZWEB_TEST_DATABASE_URL")
        .ok()
        .map(SecretString::from)
}
