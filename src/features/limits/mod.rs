//! Quota limit model shared by every limit-editing surface.
//!
//! - `codec`: form input <-> wire value (`number | null`, `-1` = unlimited)
//! - `tiers`: subscription plans and their default limits (hint only)
//! - `resolution`: effective limit and "Remove Override" visibility
//! - `view`: per-dimension view model consumed by the templates

pub mod codec;
pub mod kind;
pub mod resolution;
pub mod tiers;
pub mod view;

pub use codec::{LimitInput, LimitInputError, UNLIMITED};
pub use kind::LimitKind;
pub use resolution::{EffectiveLimit, RemoveOverrideRule};
pub use tiers::SubscriptionPlan;
pub use view::{QuotaDimension, QuotaView};
