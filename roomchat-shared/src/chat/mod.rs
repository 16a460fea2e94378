//! # Chat presentation
//!
//! Pure derivations computed from the loaded message list on every render:
//! day grouping, reply-parent lookup, and sender display fallbacks.

pub mod display;
pub mod grouping;
pub mod replies;

pub use display::{avatar_initial, avatar_url, display_name, format_time, is_own, reply_banner};
pub use grouping::{DayGroup, DayLabel, group_by_day};
pub use replies::{find_by_id, find_parent};
