//! Account profiles.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountStatus, OwnerId, Plan, TemplateId};
use crate::design::DesignConfig;

/// Length of the free trial granted to new accounts.
pub const TRIAL_DAYS: i64 = 7;

/// Website allowance of a new trial account.
pub const DEFAULT_MAX_WEBSITES: u32 = 2;

/// Per-account profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: OwnerId,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_selected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_config: Option<DesignConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default = "default_max_websites")]
    pub max_websites: u32,
    pub trial_ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

const fn default_max_websites() -> u32 {
    DEFAULT_MAX_WEBSITES
}

impl UserProfile {
    /// A fresh trial profile.
    #[must_use]
    pub fn new_trial(
        uid: OwnerId,
        phone: Option<String>,
        full_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            uid,
            phone,
            full_name,
            template_id: None,
            template_selected_at: None,
            design_config: None,
            design_updated_at: None,
            plan: Plan::Trial,
            status: AccountStatus::Active,
            max_websites: DEFAULT_MAX_WEBSITES,
            trial_ends_at: now + Duration::days(TRIAL_DAYS),
            created_at: now,
        }
    }
}
