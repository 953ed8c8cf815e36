use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::limits::{LimitInput, LimitKind, QuotaView, RemoveOverrideRule};
use crate::modules::admin_api::{ErrorDetail, User};
use crate::shared::validation::{MAX_USER_ID_LEN, USER_ID_REGEX};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LookupQuery {
    #[validate(
        length(max = MAX_USER_ID_LEN, message = "User ID is too long"),
        regex(
            path = *USER_ID_REGEX,
            message = "User ID must not contain control characters"
        )
    )]
    pub user_id: Option<String>,
}

impl LookupQuery {
    /// Trimmed id, with a blank field treated as no lookup
    pub fn normalized(self) -> Self {
        Self {
            user_id: self
                .user_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}

/// Body of a per-kind Set Limit form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitForm {
    #[serde(default)]
    pub value: String,
    pub unlimited: Option<String>,
}

impl LimitForm {
    pub fn input(&self) -> LimitInput {
        LimitInput::from_form(&self.value, self.unlimited.as_deref())
    }
}

pub fn lookup_url(user_id: &str) -> String {
    format!("/lookup?user_id={}", urlencoding::encode(user_id))
}

/// The looked-up user and one configuration card per quota kind
#[derive(Debug, Clone, Serialize)]
pub struct LookupUserView {
    pub id: String,
    pub display_name: String,
    /// Primary email, or `N/A`
    pub email: String,
    pub image_url: Option<String>,
    pub plan: String,
    pub plan_name: String,
    pub request_usage: i64,
    pub request_limit: String,
    pub limits: Vec<QuotaView>,
    /// Base of the per-kind form actions
    pub limits_url: String,
    pub raw_json: String,
}

impl LookupUserView {
    pub fn new(user: &User, rule: RemoveOverrideRule) -> Self {
        let plan = user.plan();
        let limits = LimitKind::ALL
            .iter()
            .map(|&kind| QuotaView::build(kind, user.quota(kind), &plan, rule))
            .collect();

        let full_name = user.full_name();
        let requests = user.quota(LimitKind::RequestLimit);

        Self {
            id: user.id.clone(),
            display_name: if full_name.is_empty() {
                "Unnamed user".to_string()
            } else {
                full_name
            },
            email: user.primary_email().unwrap_or("N/A").to_string(),
            image_url: user.image_url.clone(),
            plan: plan.as_str().to_string(),
            plan_name: plan.display_name().to_string(),
            request_usage: requests.usage,
            request_limit: requests.effective().to_string(),
            limits,
            limits_url: format!("/lookup/{}/limits", urlencoding::encode(&user.id)),
            raw_json: serde_json::to_string_pretty(user).unwrap_or_default(),
        }
    }

    /// Show submitted input and its error on one card
    pub fn with_submitted(mut self, kind: LimitKind, input: LimitInput, error: Option<String>) -> Self {
        self.limits = self
            .limits
            .into_iter()
            .map(|view| {
                if view.kind == kind {
                    view.with_submitted(input.clone(), error.clone())
                } else {
                    view
                }
            })
            .collect();
        self
    }
}

/// Context for `lookup.html`
#[derive(Debug, Clone, Default, Serialize)]
pub struct LookupView {
    /// Value of the search field
    pub user_id: String,
    pub user: Option<LookupUserView>,
    /// Fetch failure, rendered inline
    pub error: Option<ErrorDetail>,
    /// Failed write, rendered as a blocking alert
    pub alert: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::limits::UNLIMITED;
    use crate::shared::test_helpers::named_user;

    #[test]
    fn test_query_normalization() {
        let query = LookupQuery {
            user_id: Some("  user_1 ".to_string()),
        }
        .normalized();
        assert_eq!(query.user_id.as_deref(), Some("user_1"));
        assert!(query.validate().is_ok());

        let blank = LookupQuery {
            user_id: Some("   ".to_string()),
        }
        .normalized();
        assert_eq!(blank.user_id, None);
    }

    #[test]
    fn test_query_accepts_opaque_ids() {
        for id in ["user.1@x", "a/b", "user 1"] {
            let query = LookupQuery {
                user_id: Some(id.to_string()),
            };
            assert!(query.validate().is_ok(), "{}", id);
        }
    }

    #[test]
    fn test_query_rejects_control_characters_and_long_ids() {
        let query = LookupQuery {
            user_id: Some("user\u{7}1".to_string()),
        };
        assert!(query.validate().is_err());

        let query = LookupQuery {
            user_id: Some("a".repeat(257)),
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_user_view() {
        let mut user = named_user("user_1", "", "", "ada@example.com");
        user.email_addresses = None;
        user.override_project_limit = Some(UNLIMITED);

        let view = LookupUserView::new(&user, RemoveOverrideRule::OverridePresent);
        assert_eq!(view.email, "N/A");
        assert_eq!(view.plan_name, "Free");
        assert_eq!(view.request_limit, "3000");
        assert_eq!(view.limits.len(), 4);
        assert_eq!(view.limits[2].limit_display, "∞ (Override)");
        assert!(view.limits[2].show_remove_override);
        assert!(view.raw_json.contains("\"overrideProjectLimit\": -1"));
    }

    #[test]
    fn test_lookup_url_encodes_id() {
        assert_eq!(lookup_url("user 1"), "/lookup?user_id=user%201");
    }
}
