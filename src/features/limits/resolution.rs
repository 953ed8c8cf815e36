use std::fmt;
use std::str::FromStr;

use crate::features::limits::codec::UNLIMITED;

/// The limit actually enforced for a quota dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveLimit {
    /// An explicit per-user override (may be the unlimited sentinel)
    Override(i64),
    /// The server-provided base limit
    Base(i64),
    /// Neither override nor base is known
    Default,
}

impl EffectiveLimit {
    /// Override if present (including `-1` and `0`), else base, else default.
    pub fn resolve(base: Option<i64>, override_limit: Option<i64>) -> Self {
        match (override_limit, base) {
            (Some(value), _) => EffectiveLimit::Override(value),
            (None, Some(value)) => EffectiveLimit::Base(value),
            (None, None) => EffectiveLimit::Default,
        }
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            EffectiveLimit::Override(value) | EffectiveLimit::Base(value) => Some(*value),
            EffectiveLimit::Default => None,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, EffectiveLimit::Override(_))
    }
}

impl fmt::Display for EffectiveLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveLimit::Override(value) => write!(f, "{} (Override)", format_limit(*value)),
            EffectiveLimit::Base(value) => f.write_str(&format_limit(*value)),
            EffectiveLimit::Default => f.write_str("Default"),
        }
    }
}

/// Render a limit value; the unlimited sentinel is never shown as "-1".
pub fn format_limit(value: i64) -> String {
    if value == UNLIMITED {
        "∞".to_string()
    } else {
        value.to_string()
    }
}

pub fn effective_limit(base: Option<i64>, override_limit: Option<i64>) -> EffectiveLimit {
    EffectiveLimit::resolve(base, override_limit)
}

/// When to offer the "Remove Override" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoveOverrideRule {
    /// Only when an override is present
    #[default]
    OverridePresent,
    /// When an override is present, or the base differs from the tier default.
    /// A base changed server-side for other reasons also triggers this.
    DiffersFromTierDefault,
}

impl RemoveOverrideRule {
    pub fn should_show(
        &self,
        base: Option<i64>,
        override_limit: Option<i64>,
        tier_default: Option<i64>,
    ) -> bool {
        if override_limit.is_some() {
            return true;
        }

        match self {
            RemoveOverrideRule::OverridePresent => false,
            RemoveOverrideRule::DiffersFromTierDefault => {
                tier_default.is_some_and(|default| base != Some(default))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoveOverrideRule::OverridePresent => "override_present",
            RemoveOverrideRule::DiffersFromTierDefault => "differs_from_tier_default",
        }
    }
}

impl FromStr for RemoveOverrideRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "override_present" => Ok(RemoveOverrideRule::OverridePresent),
            "differs_from_tier_default" => Ok(RemoveOverrideRule::DiffersFromTierDefault),
            other => Err(format!(
                "unknown remove-override rule '{}' (expected override_present or differs_from_tier_default)",
                other
            )),
        }
    }
}
