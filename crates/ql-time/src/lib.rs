//! # ql-time
//!
//! Date, calendar, day counter, schedule, and business-day-convention types.
//!
//! Only the calendars and conventions the curve-building and swap
//! revaluation workflow needs are provided: TARGET and the UK calendars,
//! Actual/360, Actual/365 (Fixed), 30/360 and Actual/Actual (ISDA).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and the holiday-free calendars.
pub mod calendar;

/// Market calendars.
pub mod calendars;

/// `Date` type.
pub mod date;

/// `DayCounter` trait and day-count conventions.
pub mod day_counter;

/// Payment frequency.
pub mod frequency;

/// IMM futures dates.
pub mod imm;

/// `Period` — a time span in a `TimeUnit`.
pub mod period;

/// `Schedule` — accrual dates of a leg.
pub mod schedule;

/// `TimeUnit` — days, weeks, months, years.
pub mod time_unit;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use calendars::{Target, UkMarket, UnitedKingdom};
pub use chrono::Weekday;
pub use date::Date;
pub use day_counter::{
    Actual360, Actual365Fixed, ActualActualIsda, DayCounter, Thirty360, Thirty360Convention,
};
pub use frequency::Frequency;
pub use imm::IMM;
pub use period::Period;
pub use schedule::{DateGeneration, Schedule, ScheduleBuilder};
pub use time_unit::TimeUnit;
