use serde::Serialize;

use crate::features::limits::codec::{decode, LimitInput};
use crate::features::limits::resolution::{
    effective_limit, format_limit, EffectiveLimit, RemoveOverrideRule,
};
use crate::features::limits::tiers::SubscriptionPlan;
use crate::features::limits::LimitKind;

/// One quota dimension of a user: `{ base, override, usageOrCount }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuotaDimension {
    pub base: Option<i64>,
    pub override_limit: Option<i64>,
    pub usage: i64,
}

impl QuotaDimension {
    pub fn effective(&self) -> EffectiveLimit {
        effective_limit(self.base, self.override_limit)
    }
}

/// Everything a template needs to render one quota dimension.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaView {
    pub kind: LimitKind,
    pub label: &'static str,
    pub usage_label: &'static str,
    pub usage: i64,
    pub limit_display: String,
    pub is_override: bool,
    pub state_label: &'static str,
    /// Tier default hint; `None` when the kind has no documented default
    pub tier_hint: Option<String>,
    pub show_remove_override: bool,
    /// Form value decoded from the current state
    pub current: LimitInput,
    /// Form value to show; the submitted one after a failed save
    pub input: LimitInput,
    pub error: Option<String>,
}

impl QuotaView {
    pub fn build(
        kind: LimitKind,
        dimension: QuotaDimension,
        plan: &SubscriptionPlan,
        rule: RemoveOverrideRule,
    ) -> Self {
        let effective = dimension.effective();
        let tier_default = plan.defaults().for_kind(kind);

        let tier_hint = kind.has_tier_default().then(|| match tier_default {
            Some(value) => format_limit(value),
            None => "Unknown".to_string(),
        });

        Self {
            kind,
            label: kind.label(),
            usage_label: kind.usage_label(),
            usage: dimension.usage,
            limit_display: effective.to_string(),
            is_override: effective.is_override(),
            state_label: if effective.is_override() {
                "(Currently Overridden)"
            } else {
                "(Default)"
            },
            tier_hint,
            show_remove_override: rule.should_show(
                dimension.base,
                dimension.override_limit,
                tier_default,
            ),
            current: decode(dimension.override_limit, dimension.base),
            input: decode(dimension.override_limit, dimension.base),
            error: None,
        }
    }

    /// Replace the prefilled input with what the operator submitted
    pub fn with_submitted(mut self, input: LimitInput, error: Option<String>) -> Self {
        self.input = input;
        self.error = error;
        self
    }
}
