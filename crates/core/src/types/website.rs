//! Website documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TemplateId, WebsiteId, WebsiteStatus};
use crate::design::DesignConfig;
use crate::subdomain::Subdomain;

/// Content language of a generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
}

/// Links shown in the social icons section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// Business content edited by the owner.
///
/// Mutable at any time, whatever the publication status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteContent {
    pub business_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_embed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
}

/// A visitor interaction counted on a published site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEvent {
    View,
    WhatsappClick,
    ProductClick,
}

/// Monotonic visitor counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAnalytics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub whatsapp_clicks: u64,
    #[serde(default)]
    pub product_clicks: u64,
}

impl WebsiteAnalytics {
    /// Count one occurrence of `event`.
    pub const fn record(&mut self, event: AnalyticsEvent) {
        let counter = match event {
            AnalyticsEvent::View => &mut self.views,
            AnalyticsEvent::WhatsappClick => &mut self.whatsapp_clicks,
            AnalyticsEvent::ProductClick => &mut self.product_clicks,
        };
        *counter = counter.saturating_add(1);
    }
}

/// A website owned by one account.
///
/// `subdomain` survives an unpublish so a later publish can reclaim the same
/// name; only `status` decides public visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: WebsiteId,
    pub template_id: TemplateId,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub status: WebsiteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<Subdomain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_path: Option<String>,
    pub design_config: DesignConfig,
    pub content: WebsiteContent,
    #[serde(default)]
    pub analytics: WebsiteAnalytics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Website {
    /// The name this website is currently served under, if it is published.
    #[must_use]
    pub const fn public_subdomain(&self) -> Option<&Subdomain> {
        match (&self.status, &self.subdomain) {
            (WebsiteStatus::Published, Some(name)) => Some(name),
            _ => None,
        }
    }

    /// Mark the website published under `name`.
    ///
    /// The slug and path-style address follow the claimed name, so both
    /// resolve through the same mapping.
    pub fn mark_published(&mut self, name: Subdomain, now: DateTime<Utc>) {
        self.status = WebsiteStatus::Published;
        self.slug = Some(name.as_str().to_owned());
        self.published_path = Some(format!("/site/{name}"));
        self.subdomain = Some(name);
        self.published_at = Some(now);
        self.updated_at = now;
    }

    /// Return the website to draft, keeping its last subdomain.
    pub const fn mark_draft(&mut self, now: DateTime<Utc>) {
        self.status = WebsiteStatus::Draft;
        self.updated_at = now;
    }
}
