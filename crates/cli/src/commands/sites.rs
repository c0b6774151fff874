//! Publishing commands run directly against the document store.
//!
//! Useful for support work: republishing a site by hand, releasing a name,
//! or checking which website a public name points at.
//!
//! # Environment Variables
//!
//! - `TEZWEB_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `TEZWEB_ROOT_DOMAIN` - Domain used for the printed public URL
//! - `TEZWEB_TRANSACTION_ATTEMPTS` - Commit attempts per transaction

use tezweb_core::{OwnerId, Subdomain, WebsiteId, public_url};
use tezweb_server::services::PublishingService;

use super::{CommandError, connect};

/// Publish a website and log the URL it is served under.
///
/// # Errors
///
/// Returns `CommandError::Publish` if the website is missing, the name is
/// unusable, or no free name is left.
pub async fn publish(owner: &str, website: &str, name: &str) -> Result<(), CommandError> {
    let (config, store) = connect().await?;
    let service = PublishingService::new(&store, config.transaction_attempts);

    let site = service
        .publish(&OwnerId::new(owner), &WebsiteId::new(website), name)
        .await?;

    if let Some(subdomain) = &site.subdomain {
        tracing::info!("Published at {}", public_url(subdomain, &config.root_domain));
    }
    Ok(())
}

/// Return a website to draft and release its public name.
///
/// # Errors
///
/// Returns `CommandError::Publish` if the website does not exist.
pub async fn unpublish(owner: &str, website: &str) -> Result<(), CommandError> {
    let (config, store) = connect().await?;
    let service = PublishingService::new(&store, config.transaction_attempts);

    let site = service
        .unpublish(&OwnerId::new(owner), &WebsiteId::new(website))
        .await?;

    tracing::info!(
        subdomain = site.subdomain.as_ref().map(Subdomain::as_str),
        "Unpublished (name kept for republishing)"
    );
    Ok(())
}

/// Log which website `name` resolves to.
///
/// # Errors
///
/// Returns `CommandError::Publish` on store failure.
pub async fn resolve(name: &str) -> Result<(), CommandError> {
    let (config, store) = connect().await?;
    let service = PublishingService::new(&store, config.transaction_attempts);

    match service.resolve(name).await? {
        Some(resolved) => tracing::info!(
            owner = %resolved.owner,
            website = %resolved.website.id,
            status = %resolved.website.status,
            "{name} is live"
        ),
        None => tracing::warn!("{name} is not published"),
    }
    Ok(())
}
