//! Core types for TezWeb.
//!
//! This module provides type-safe wrappers and the stored document shapes.

pub mod id;
pub mod profile;
pub mod published;
pub mod status;
pub mod website;

pub use id::*;
pub use profile::UserProfile;
pub use published::PublishedSiteRecord;
pub use status::*;
pub use website::{
    AnalyticsEvent, Language, SocialLinks, Website, WebsiteAnalytics, WebsiteContent,
};
