//! Website route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tezweb_core::starter::CreateWebsiteInput;
use tezweb_core::{OwnerId, TemplateId, Website, WebsiteId, public_url};

use crate::error::Result;
use crate::services::WebsitePatch;
use crate::state::AppState;

/// Request to create a website.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebsiteRequest {
    pub template_id: TemplateId,
    #[serde(flatten)]
    pub details: CreateWebsiteInput,
}

/// Request to publish a website.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    /// Desired name, normalized before use.
    #[serde(default)]
    pub name: String,
}

/// A website together with its public address, when it has one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub website: Website,
}

impl WebsiteResponse {
    pub(crate) fn new(website: Website, root_domain: &str) -> Self {
        Self {
            url: website
                .public_subdomain()
                .map(|name| public_url(name, root_domain)),
            website,
        }
    }
}

/// List the owner's websites.
///
/// GET /api/owners/{owner}/websites
///
/// # Errors
///
/// Returns `AppError` if the store fails.
pub async fn index(
    State(state): State<AppState>,
    Path(owner): Path<OwnerId>,
) -> Result<Json<Vec<WebsiteResponse>>> {
    let root = &state.config().root_domain;
    let websites = state.websites().list(&owner).await?;

    Ok(Json(
        websites
            .into_iter()
            .map(|website| WebsiteResponse::new(website, root))
            .collect(),
    ))
}

/// Create a draft website from onboarding answers.
///
/// POST /api/owners/{owner}/websites
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an unknown template or blank name.
pub async fn create(
    State(state): State<AppState>,
    Path(owner): Path<OwnerId>,
    Json(req): Json<CreateWebsiteRequest>,
) -> Result<(StatusCode, Json<WebsiteResponse>)> {
    let website = state
        .websites()
        .create(&owner, req.template_id, &req.details)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WebsiteResponse::new(website, &state.config().root_domain)),
    ))
}

/// GET /api/owners/{owner}/websites/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the website does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path((owner, id)): Path<(OwnerId, WebsiteId)>,
) -> Result<Json<WebsiteResponse>> {
    let website = state.websites().get(&owner, &id).await?;
    Ok(Json(WebsiteResponse::new(
        website,
        &state.config().root_domain,
    )))
}

/// Edit content or thumbnail.
///
/// PATCH /api/owners/{owner}/websites/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the website does not exist.
pub async fn update(
    State(state): State<AppState>,
    Path((owner, id)): Path<(OwnerId, WebsiteId)>,
    Json(patch): Json<WebsitePatch>,
) -> Result<Json<WebsiteResponse>> {
    let website = state.websites().update(&owner, &id, patch).await?;
    Ok(Json(WebsiteResponse::new(
        website,
        &state.config().root_domain,
    )))
}

/// Delete a website and release its public name.
///
/// DELETE /api/owners/{owner}/websites/{id}
///
/// # Errors
///
/// Returns `AppError` if the store fails.
pub async fn destroy(
    State(state): State<AppState>,
    Path((owner, id)): Path<(OwnerId, WebsiteId)>,
) -> Result<StatusCode> {
    state.publishing().delete(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish under the requested name or a free numbered variant.
///
/// POST /api/owners/{owner}/websites/{id}/publish
///
/// # Errors
///
/// Returns `AppError` with 404 for a missing website, 400 for an unusable
/// name and 409 when no variant of the name is free.
pub async fn publish(
    State(state): State<AppState>,
    Path((owner, id)): Path<(OwnerId, WebsiteId)>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<WebsiteResponse>> {
    let website = state.publishing().publish(&owner, &id, &req.name).await?;
    Ok(Json(WebsiteResponse::new(
        website,
        &state.config().root_domain,
    )))
}

/// POST /api/owners/{owner}/websites/{id}/unpublish
///
/// # Errors
///
/// Returns `AppError::NotFound` if the website does not exist.
pub async fn unpublish(
    State(state): State<AppState>,
    Path((owner, id)): Path<(OwnerId, WebsiteId)>,
) -> Result<Json<WebsiteResponse>> {
    let website = state.publishing().unpublish(&owner, &id).await?;
    Ok(Json(WebsiteResponse::new(
        website,
        &state.config().root_domain,
    )))
}
