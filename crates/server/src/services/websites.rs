//! Website drafts: creation, listing, content edits and visit counters.

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tezweb_core::starter::{CreateWebsiteInput, generate_starter_site};
use tezweb_core::{
    AnalyticsEvent, OwnerId, SiteSeed, TemplateId, Website, WebsiteAnalytics, WebsiteContent,
    WebsiteId, WebsiteStatus, generate_design_config, templates,
};
use tracing::{info, instrument};

use crate::db::{CollectionPath, DocPath, DocumentStore, StoreError, run_transaction};
use crate::error::AppError;

/// Fields an owner may change on an existing website.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsitePatch {
    pub content: Option<WebsiteContent>,
    pub thumbnail_url: Option<String>,
}

/// Service for website documents under `users/{uid}/websites`.
pub struct WebsiteService<'a, S> {
    store: &'a S,
    attempts: u32,
}

impl<'a, S: DocumentStore> WebsiteService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, attempts: u32) -> Self {
        Self { store, attempts }
    }

    /// Create a draft website with generated design and starter content.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown template or a blank
    /// business name, and `AppError::Store` if the write fails.
    #[instrument(skip(self, input), fields(owner = %owner, template = %template_id))]
    pub async fn create(
        &self,
        owner: &OwnerId,
        template_id: TemplateId,
        input: &CreateWebsiteInput,
    ) -> Result<Website, AppError> {
        if templates::find(template_id.as_str()).is_none() {
            return Err(AppError::BadRequest(format!(
                "unknown template: {template_id}"
            )));
        }
        if input.business_name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "business name is required".to_string(),
            ));
        }

        let now = Utc::now();
        let seed = SiteSeed::for_owner(owner, &template_id);
        let starter = generate_starter_site(input, &seed);

        let website = Website {
            id: WebsiteId::generate(),
            design_config: generate_design_config(seed.as_str(), &template_id),
            template_id,
            thumbnail_url: starter.thumbnail_url,
            status: WebsiteStatus::Draft,
            subdomain: None,
            slug: None,
            published_path: None,
            content: starter.content,
            analytics: WebsiteAnalytics::default(),
            created_at: now,
            updated_at: now,
            published_at: None,
        };

        self.store
            .set(
                &DocPath::website(owner, &website.id),
                serde_json::to_value(&website).map_err(StoreError::from)?,
                false,
            )
            .await?;

        info!(website = %website.id, "Website created");
        Ok(website)
    }

    /// All websites of `owner`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the listing fails or a document is malformed.
    #[instrument(skip(self))]
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<Website>, AppError> {
        let documents = self
            .store
            .list(&CollectionPath::Websites(owner.clone()))
            .await?;

        documents
            .into_iter()
            .map(|doc| doc.decode().map_err(AppError::from))
            .collect()
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the website does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, owner: &OwnerId, website: &WebsiteId) -> Result<Website, AppError> {
        self.store
            .get(&DocPath::website(owner, website))
            .await?
            .ok_or_else(|| not_found(website))?
            .decode()
            .map_err(AppError::from)
    }

    /// Apply an owner edit. Status, subdomain and design are not editable
    /// here, and a concurrent publish is never overwritten. A blank thumbnail
    /// resets to the default image.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the website does not exist.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        owner: &OwnerId,
        website: &WebsiteId,
        patch: WebsitePatch,
    ) -> Result<Website, AppError> {
        run_transaction(self.store, self.attempts, |tx| {
            let path = DocPath::website(owner, website);
            let website = website.clone();
            let patch = patch.clone();
            Box::pin(async move {
                let mut site: Website = tx
                    .get_as(&path)
                    .await?
                    .ok_or_else(|| not_found(&website))?;

                if let Some(content) = patch.content {
                    site.content = content;
                }
                if let Some(thumbnail_url) = patch.thumbnail_url {
                    site.thumbnail_url = if thumbnail_url.trim().is_empty() {
                        templates::DEFAULT_THUMBNAIL_URL.to_string()
                    } else {
                        thumbnail_url
                    };
                }
                site.updated_at = Utc::now();

                tx.set(&path, &site)?;
                Ok(site)
            })
        })
        .await
    }

    /// Count a visitor interaction.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the website does not exist.
    #[instrument(skip(self))]
    pub async fn track(
        &self,
        owner: &OwnerId,
        website: &WebsiteId,
        event: AnalyticsEvent,
    ) -> Result<WebsiteAnalytics, AppError> {
        run_transaction(self.store, self.attempts, |tx| {
            let path = DocPath::website(owner, website);
            let website = website.clone();
            Box::pin(async move {
                let site: Website = tx
                    .get_as(&path)
                    .await?
                    .ok_or_else(|| not_found(&website))?;

                let mut analytics = site.analytics;
                analytics.record(event);
                tx.update(&path, json!({ "analytics": analytics }));
                Ok(analytics)
            })
        })
        .await
    }
}

fn not_found(website: &WebsiteId) -> AppError {
    AppError::NotFound(format!("website {website}"))
}
