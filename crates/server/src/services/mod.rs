//! Business logic services for the API server.
//!
//! # Services
//!
//! - `publishing` - Subdomain allocation, unpublish, delete, public resolution
//! - `websites` - Website creation, listing, content edits, visit counters
//! - `profiles` - Account profiles, template selection, design generation
//!
//! Services borrow the document store and are cheap to construct per request,
//! see [`crate::state::AppState`].

pub mod profiles;
pub mod publishing;
pub mod websites;

pub use profiles::ProfileService;
pub use publishing::{PublishError, PublishingService, ResolvedSite};
pub use websites::{WebsitePatch, WebsiteService};
