use serde::{Deserialize, Serialize};

/// The four independent quota dimensions carried by every user.
///
/// Serialized in camelCase (`requestLimit`, `accessKeyLimit`, ...) so the kind
/// can travel in dashboard URLs and form actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitKind {
    RequestLimit,
    AccessKeyLimit,
    ProjectLimit,
    ApiKeyLimit,
}

impl LimitKind {
    pub const ALL: [LimitKind; 4] = [
        LimitKind::RequestLimit,
        LimitKind::AccessKeyLimit,
        LimitKind::ProjectLimit,
        LimitKind::ApiKeyLimit,
    ];

    /// Path segment / form value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::RequestLimit => "requestLimit",
            LimitKind::AccessKeyLimit => "accessKeyLimit",
            LimitKind::ProjectLimit => "projectLimit",
            LimitKind::ApiKeyLimit => "apiKeyLimit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LimitKind::RequestLimit => "Request Limit",
            LimitKind::AccessKeyLimit => "Access Key Limit",
            LimitKind::ProjectLimit => "Project Limit",
            LimitKind::ApiKeyLimit => "API Key Limit",
        }
    }

    /// Label for the usage/count column
    pub fn usage_label(&self) -> &'static str {
        match self {
            LimitKind::RequestLimit => "Requests",
            LimitKind::AccessKeyLimit => "Access Keys",
            LimitKind::ProjectLimit => "Projects",
            LimitKind::ApiKeyLimit => "API Keys",
        }
    }

    /// Whether the tier default table documents a default for this kind.
    /// Projects and API keys are override-only.
    pub fn has_tier_default(&self) -> bool {
        matches!(self, LimitKind::RequestLimit | LimitKind::AccessKeyLimit)
    }
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
