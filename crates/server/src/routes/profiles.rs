//! Profile route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tezweb_core::{DesignConfig, OwnerId, TemplateId, UserProfile};

use crate::error::Result;
use crate::state::AppState;

/// Request to create or refresh a profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub phone: Option<String>,
    pub full_name: Option<String>,
}

/// Request to pick a template.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTemplateRequest {
    pub template_id: TemplateId,
}

/// Whether the template choice was recorded.
#[derive(Debug, Serialize)]
pub struct SelectTemplateResponse {
    pub selected: bool,
}

/// GET /api/owners/{owner}/profile
///
/// # Errors
///
/// Returns `AppError::NotFound` if the profile does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(owner): Path<OwnerId>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.profiles().get(&owner).await?))
}

/// PUT /api/owners/{owner}/profile
///
/// # Errors
///
/// Returns `AppError` if the store fails.
pub async fn upsert(
    State(state): State<AppState>,
    Path(owner): Path<OwnerId>,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .profiles()
        .upsert(&owner, req.phone, req.full_name)
        .await?;
    Ok(Json(profile))
}

/// Select a template. Only the first selection is kept.
///
/// POST /api/owners/{owner}/profile/template
///
/// # Errors
///
/// Returns `AppError::NotFound` without a profile and
/// `AppError::BadRequest` for an unknown template.
pub async fn select_template(
    State(state): State<AppState>,
    Path(owner): Path<OwnerId>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<SelectTemplateResponse>> {
    let selected = state
        .profiles()
        .select_template(&owner, &req.template_id)
        .await?;
    Ok(Json(SelectTemplateResponse { selected }))
}

/// Generate the design for the selected template and store it.
///
/// POST /api/owners/{owner}/profile/design
///
/// # Errors
///
/// Returns `AppError::BadRequest` if no template has been selected.
pub async fn generate_design(
    State(state): State<AppState>,
    Path(owner): Path<OwnerId>,
) -> Result<Json<DesignConfig>> {
    Ok(Json(state.profiles().generate_design(&owner).await?))
}
