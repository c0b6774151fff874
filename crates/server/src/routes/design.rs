//! Template catalog and design preview.

use axum::{Json, extract::Query};
use serde::Deserialize;
use tezweb_core::templates::{self, Template};
use tezweb_core::{DesignConfig, TemplateId, generate_design_config};

/// Design preview query parameters.
#[derive(Debug, Deserialize)]
pub struct DesignQuery {
    pub seed: String,
    pub template: TemplateId,
}

/// List the built-in templates.
///
/// GET /api/templates
pub async fn templates() -> Json<&'static [Template]> {
    Json(templates::all())
}

/// Generate the design config for a seed without storing it.
///
/// GET /api/design?seed=owner-1:shop-lite&template=shop-lite
pub async fn preview(Query(query): Query<DesignQuery>) -> Json<DesignConfig> {
    Json(generate_design_config(&query.seed, &query.template))
}
