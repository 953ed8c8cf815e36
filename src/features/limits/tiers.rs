//! Subscription tiers and the default limits they imply.
//!
//! The table here only feeds the operator hint shown next to a limit input. It
//! is never sent to the Admin API and never used to compute an effective limit;
//! the server-provided base limit is authoritative.

use serde::{Deserialize, Serialize};

use crate::features::limits::LimitKind;

/// Subscription plan as reported in `currentSubscription`.
///
/// Unknown plan names are preserved verbatim so a newer server does not break
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionPlan {
    #[default]
    FreeUser,
    TenKRequests,
    Pro,
    Enterprise,
    Other(String),
}

/// Default limits per kind for a tier. `None` means the default is unknown.
///
/// No tier documents an access-key default, so that hint always reads
/// "Unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierDefaults {
    pub requests: Option<i64>,
    pub access_keys: Option<i64>,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionPlan::FreeUser => "free_user",
            SubscriptionPlan::TenKRequests => "10k_requests",
            SubscriptionPlan::Pro => "pro",
            SubscriptionPlan::Enterprise => "enterprise",
            SubscriptionPlan::Other(name) => name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SubscriptionPlan::FreeUser => "Free",
            SubscriptionPlan::TenKRequests => "10k Requests",
            SubscriptionPlan::Pro => "Pro",
            SubscriptionPlan::Enterprise => "Enterprise",
            SubscriptionPlan::Other(name) => name,
        }
    }

    pub fn defaults(&self) -> TierDefaults {
        match self {
            SubscriptionPlan::FreeUser => TierDefaults {
                requests: Some(3000),
                access_keys: None,
            },
            SubscriptionPlan::TenKRequests => TierDefaults {
                requests: Some(10000),
                access_keys: None,
            },
            SubscriptionPlan::Pro => TierDefaults {
                requests: Some(25000),
                access_keys: None,
            },
            SubscriptionPlan::Enterprise | SubscriptionPlan::Other(_) => TierDefaults::default(),
        }
    }
}

impl TierDefaults {
    pub fn for_kind(&self, kind: LimitKind) -> Option<i64> {
        match kind {
            LimitKind::RequestLimit => self.requests,
            LimitKind::AccessKeyLimit => self.access_keys,
            LimitKind::ProjectLimit | LimitKind::ApiKeyLimit => None,
        }
    }
}

impl From<String> for SubscriptionPlan {
    fn from(value: String) -> Self {
        match value.as_str() {
            "free_user" => SubscriptionPlan::FreeUser,
            "10k_requests" => SubscriptionPlan::TenKRequests,
            "pro" => SubscriptionPlan::Pro,
            "enterprise" => SubscriptionPlan::Enterprise,
            _ => SubscriptionPlan::Other(value),
        }
    }
}

impl From<SubscriptionPlan> for String {
    fn from(plan: SubscriptionPlan) -> Self {
        plan.as_str().to_string()
    }
}
