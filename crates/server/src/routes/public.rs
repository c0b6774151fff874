//! Public site resolution and visitor events.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
};
use serde::Deserialize;
use tezweb_core::{AnalyticsEvent, subdomain_from_host};

use super::websites::WebsiteResponse;
use crate::error::{AppError, Result};
use crate::services::ResolvedSite;
use crate::state::AppState;

/// Host override for previews and local development.
#[derive(Debug, Default, Deserialize)]
pub struct SiteQuery {
    pub published: Option<String>,
}

/// A visitor interaction.
#[derive(Debug, Deserialize)]
pub struct TrackEventRequest {
    pub event: AnalyticsEvent,
}

/// Published site by name.
///
/// GET /sites/{name} and GET /site/{slug}
///
/// # Errors
///
/// Returns `AppError::NotFound` unless a website is currently published
/// under `name`.
pub async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<WebsiteResponse>> {
    let site = resolve(&state, &name).await?;
    Ok(Json(WebsiteResponse::new(
        site.website,
        &state.config().root_domain,
    )))
}

/// Site addressed by the request, `?published=` taking precedence over the
/// `Host` header.
///
/// GET /site
///
/// # Errors
///
/// Returns `AppError::NotFound` if the request addresses no published site.
pub async fn current(
    State(state): State<AppState>,
    Query(query): Query<SiteQuery>,
    headers: HeaderMap,
) -> Result<Json<WebsiteResponse>> {
    let root = &state.config().root_domain;
    let name = query
        .published
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            headers
                .get(header::HOST)
                .and_then(|host| host.to_str().ok())
                .and_then(|host| subdomain_from_host(host, root))
        })
        .ok_or_else(|| AppError::NotFound("no site addressed by this request".to_string()))?;

    let site = resolve(&state, &name).await?;
    Ok(Json(WebsiteResponse::new(site.website, root)))
}

/// Count a visitor interaction on a published site.
///
/// POST /sites/{name}/events
///
/// # Errors
///
/// Returns `AppError::NotFound` unless a website is currently published
/// under `name`.
pub async fn track(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<TrackEventRequest>,
) -> Result<StatusCode> {
    let site = resolve(&state, &name).await?;
    state
        .websites()
        .track(&site.owner, &site.website.id, req.event)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn resolve(state: &AppState, name: &str) -> Result<ResolvedSite> {
    state
        .publishing()
        .resolve(name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("site {name}")))
}
