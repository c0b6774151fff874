//! HTTP route handlers for the API server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                     - Liveness check
//! GET  /health/ready                               - Store reachability
//!
//! # Catalog
//! GET  /api/templates                              - Template catalog
//! GET  /api/design?seed=&template=                 - Design config preview
//!
//! # Profile
//! GET  /api/owners/{owner}/profile                 - Get profile
//! PUT  /api/owners/{owner}/profile                 - Create or refresh profile
//! POST /api/owners/{owner}/profile/template        - One-time template selection
//! POST /api/owners/{owner}/profile/design          - Generate and store design
//!
//! # Websites
//! GET    /api/owners/{owner}/websites              - List websites
//! POST   /api/owners/{owner}/websites              - Create draft website
//! GET    /api/owners/{owner}/websites/{id}         - Get website
//! PATCH  /api/owners/{owner}/websites/{id}         - Edit content
//! DELETE /api/owners/{owner}/websites/{id}         - Delete, releasing its name
//! POST   /api/owners/{owner}/websites/{id}/publish   - Publish under a subdomain
//! POST   /api/owners/{owner}/websites/{id}/unpublish - Return to draft
//!
//! # Public sites
//! GET  /site                                       - Site addressed by Host or ?published=
//! GET  /site/{slug}                                - Published site by its path address
//! GET  /sites/{name}                               - Published site by name
//! POST /sites/{name}/events                        - Count a visitor interaction
//! ```
//!
//! Authentication is handled in front of this service; the owner id is taken
//! from the path.

pub mod design;
pub mod health;
pub mod profiles;
pub mod public;
pub mod websites;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the profile and website routes of one owner.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profiles::show).put(profiles::upsert))
        .route("/profile/template", post(profiles::select_template))
        .route("/profile/design", post(profiles::generate_design))
        .route("/websites", get(websites::index).post(websites::create))
        .route(
            "/websites/{id}",
            get(websites::show)
                .patch(websites::update)
                .delete(websites::destroy),
        )
        .route("/websites/{id}/publish", post(websites::publish))
        .route("/websites/{id}/unpublish", post(websites::unpublish))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(design::templates))
        .route("/design", get(design::preview))
        .nest("/owners/{owner}", owner_routes())
}

/// Create the public site routes router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/site", get(public::current))
        .route("/site/{slug}", get(public::show))
        .route("/sites/{name}", get(public::show))
        .route("/sites/{name}/events", post(public::track))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .merge(public_routes())
}
