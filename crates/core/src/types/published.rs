//! Global name mapping entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OwnerId, WebsiteId};

/// Lookup entry from a public name to the website serving it.
///
/// Keyed by subdomain in a namespace shared by all accounts. It is an index,
/// not an ownership record: the website's own status decides visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSiteRecord {
    pub owner_uid: OwnerId,
    pub website_id: WebsiteId,
    pub updated_at: DateTime<Utc>,
}

impl PublishedSiteRecord {
    /// Whether this entry belongs to the given `(owner, website)` pair.
    #[must_use]
    pub fn points_at(&self, owner: &OwnerId, website: &WebsiteId) -> bool {
        &self.owner_uid == owner && &self.website_id == website
    }
}
