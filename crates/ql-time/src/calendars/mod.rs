//! Market calendars used by the revaluation workflow.

/// TARGET (euro settlement) calendar.
pub mod target;

/// United Kingdom calendars.
pub mod united_kingdom;

pub use target::Target;
pub use united_kingdom::{UkMarket, UnitedKingdom};
