//! Status enums for websites and accounts.

use serde::{Deserialize, Serialize};

/// Publication status of a website.
///
/// Websites are created as drafts. Only a `Published` website is publicly
/// resolvable, regardless of whether a name mapping exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteStatus {
    #[default]
    Draft,
    Published,
}

impl WebsiteStatus {
    /// Whether the website may be served on its public name.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl std::fmt::Display for WebsiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for WebsiteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(format!("invalid website status: {s}")),
        }
    }
}

/// Billing plan of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Trial,
    Paid,
}

/// Account standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_status_round_trips_through_str() {
        for status in [WebsiteStatus::Draft, WebsiteStatus::Published] {
            assert_eq!(status.to_string().parse::<WebsiteStatus>(), Ok(status));
        }
        assert!("live".parse::<WebsiteStatus>().is_err());
    }

    #[test]
    fn test_only_published_is_public() {
        assert!(WebsiteStatus::Published.is_public());
        assert!(!WebsiteStatus::Draft.is_public());
        assert_eq!(WebsiteStatus::default(), WebsiteStatus::Draft);
    }
}
