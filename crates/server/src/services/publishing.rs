//! Public name allocation.
//!
//! A published website owns exactly one entry in `publishedSites`, keyed by
//! its subdomain. Publishing claims a name inside a store transaction, so two
//! websites racing for the same base name end up with distinct names: the
//! loser's commit conflicts, it re-reads the now-taken mapping, and moves on
//! to the next suffix.

use chrono::Utc;
use tezweb_core::{OwnerId, PublishedSiteRecord, Subdomain, SubdomainError, Website, WebsiteId};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::db::{DocPath, DocumentStore, StoreError, Transaction, run_transaction};

/// Highest numeric suffix tried before giving up on a base name.
pub const MAX_SUFFIX_PROBES: u32 = 50;

/// Name used when publishing with an empty desired name.
pub const FALLBACK_NAME: &str = "shop";

/// Errors raised while publishing, unpublishing or deleting a website.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The website does not exist for this owner.
    #[error("website {website} not found for owner {owner}")]
    NotFound { owner: OwnerId, website: WebsiteId },

    /// The desired name has no characters usable in a subdomain.
    #[error("invalid name: {0}")]
    InvalidName(#[from] SubdomainError),

    /// The base name and all of its suffixes are taken.
    #[error("no free subdomain for {base:?} after {probes} suffixes")]
    AllocationExhausted { base: String, probes: u32 },

    /// Store failure, including transactions that kept conflicting.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A published website together with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSite {
    pub owner: OwnerId,
    pub website: Website,
}

/// Service for the publish lifecycle of websites.
pub struct PublishingService<'a, S> {
    store: &'a S,
    attempts: u32,
}

impl<'a, S: DocumentStore> PublishingService<'a, S> {
    /// Create a publishing service whose transactions retry up to `attempts`
    /// times on conflict.
    #[must_use]
    pub const fn new(store: &'a S, attempts: u32) -> Self {
        Self { store, attempts }
    }

    /// Publish a website under `desired_name`, or under the name it already
    /// holds if that is still mapped to it.
    ///
    /// Republishing is idempotent: a website that already owns its mapping
    /// keeps the same name and no second mapping is created.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::NotFound` if the website does not exist,
    /// `PublishError::InvalidName` if `desired_name` normalizes to nothing,
    /// `PublishError::AllocationExhausted` if every suffix up to
    /// [`MAX_SUFFIX_PROBES`] is taken, or `PublishError::Store` on store
    /// failure.
    #[instrument(skip_all, fields(owner = %owner, website = %website, name = desired_name))]
    pub async fn publish(
        &self,
        owner: &OwnerId,
        website: &WebsiteId,
        desired_name: &str,
    ) -> Result<Website, PublishError> {
        let desired_name = if desired_name.is_empty() {
            FALLBACK_NAME
        } else {
            desired_name
        };

        let published = run_transaction(self.store, self.attempts, |tx| {
            let owner = owner.clone();
            let website = website.clone();
            let desired_name = desired_name.to_owned();
            Box::pin(async move { claim_name(tx, owner, website, &desired_name).await })
        })
        .await?;

        info!(
            subdomain = published.subdomain.as_ref().map(Subdomain::as_str),
            "Website published"
        );
        Ok(published)
    }

    /// Return a website to draft and release its mapping.
    ///
    /// The website keeps its `subdomain` so a later publish can reclaim it.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::NotFound` if the website does not exist, or
    /// `PublishError::Store` on store failure.
    #[instrument(skip_all, fields(owner = %owner, website = %website))]
    pub async fn unpublish(
        &self,
        owner: &OwnerId,
        website: &WebsiteId,
    ) -> Result<Website, PublishError> {
        let draft = run_transaction(self.store, self.attempts, |tx| {
            let owner = owner.clone();
            let website = website.clone();
            Box::pin(async move {
                let path = DocPath::website(&owner, &website);
                let mut site: Website = tx
                    .get_as(&path)
                    .await?
                    .ok_or_else(|| PublishError::NotFound {
                        owner: owner.clone(),
                        website: website.clone(),
                    })?;

                if let Some(mapping) = owned_mapping(tx, &owner, &website, &site).await? {
                    tx.delete(&mapping);
                }

                site.mark_draft(Utc::now());
                tx.set(&path, &site)?;
                Ok::<_, PublishError>(site)
            })
        })
        .await?;

        info!("Website unpublished");
        Ok(draft)
    }

    /// Delete a website and release its mapping in one transaction.
    ///
    /// Deleting a website that does not exist succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Store` on store failure.
    #[instrument(skip_all, fields(owner = %owner, website = %website))]
    pub async fn delete(&self, owner: &OwnerId, website: &WebsiteId) -> Result<(), PublishError> {
        let deleted = run_transaction(self.store, self.attempts, |tx| {
            let owner = owner.clone();
            let website = website.clone();
            Box::pin(async move {
                let path = DocPath::website(&owner, &website);
                let Some(site) = tx.get_as::<Website>(&path).await? else {
                    return Ok::<_, PublishError>(false);
                };

                if let Some(mapping) = owned_mapping(tx, &owner, &website, &site).await? {
                    tx.delete(&mapping);
                }
                tx.delete(&path);
                Ok(true)
            })
        })
        .await?;

        if deleted {
            info!("Website deleted");
        } else {
            debug!("Website already absent");
        }
        Ok(())
    }

    /// Find the website publicly served under `name`.
    ///
    /// `name` is normalized first. Returns `None` when no mapping exists, when
    /// the mapped website is gone, or when it is no longer published under
    /// that name.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Store` on store failure.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<Option<ResolvedSite>, PublishError> {
        let Ok(name) = Subdomain::lookup(name) else {
            return Ok(None);
        };

        let Some(mapping) = self.store.get(&DocPath::published_site(&name)).await? else {
            return Ok(None);
        };
        let record: PublishedSiteRecord = mapping.decode()?;

        let path = DocPath::website(&record.owner_uid, &record.website_id);
        let Some(document) = self.store.get(&path).await? else {
            debug!(subdomain = %name, "Mapping points at a missing website");
            return Ok(None);
        };
        let website: Website = document.decode()?;

        if website.public_subdomain() != Some(&name) {
            debug!(subdomain = %name, status = %website.status, "Mapping is stale");
            return Ok(None);
        }

        Ok(Some(ResolvedSite {
            owner: record.owner_uid,
            website,
        }))
    }

    /// Like [`PublishingService::resolve`], without the owner.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Store` on store failure.
    pub async fn resolve_published_site(&self, name: &str) -> Result<Option<Website>, PublishError> {
        Ok(self.resolve(name).await?.map(|resolved| resolved.website))
    }
}

/// One attempt of the allocation loop.
async fn claim_name<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    owner: OwnerId,
    website: WebsiteId,
    desired_name: &str,
) -> Result<Website, PublishError> {
    let path = DocPath::website(&owner, &website);
    let mut site: Website = tx
        .get_as(&path)
        .await?
        .ok_or_else(|| PublishError::NotFound {
            owner: owner.clone(),
            website: website.clone(),
        })?;

    let base = Subdomain::parse(desired_name)?;
    let first = site.subdomain.clone().unwrap_or_else(|| base.clone());

    let mut chosen = None;
    for suffix in 0..=MAX_SUFFIX_PROBES {
        let candidate = if suffix == 0 {
            first.clone()
        } else {
            base.with_suffix(suffix)
        };
        let mapping = DocPath::published_site(&candidate);

        match tx.get_as::<PublishedSiteRecord>(&mapping).await? {
            None => {
                chosen = Some((candidate, Some(mapping)));
                break;
            }
            Some(record) if record.points_at(&owner, &website) => {
                chosen = Some((candidate, None));
                break;
            }
            Some(_) => debug!(candidate = %candidate, "Subdomain taken"),
        }
    }

    let Some((name, new_mapping)) = chosen else {
        return Err(PublishError::AllocationExhausted {
            base: base.into_inner(),
            probes: MAX_SUFFIX_PROBES,
        });
    };

    let now = Utc::now();
    if let Some(mapping) = new_mapping {
        tx.set(
            &mapping,
            &PublishedSiteRecord {
                owner_uid: owner,
                website_id: website,
                updated_at: now,
            },
        )?;
    }

    site.mark_published(name, now);
    tx.set(&path, &site)?;
    Ok(site)
}

/// The mapping of `site`'s subdomain, if it still belongs to this website.
async fn owned_mapping<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    owner: &OwnerId,
    website: &WebsiteId,
    site: &Website,
) -> Result<Option<DocPath>, PublishError> {
    let Some(name) = &site.subdomain else {
        return Ok(None);
    };

    let mapping = DocPath::published_site(name);
    let record = tx.get_as::<PublishedSiteRecord>(&mapping).await?;
    Ok(record
        .filter(|record| record.points_at(owner, website))
        .map(|_| mapping))
}
