//! # ql-cashflows
//!
//! Fixed and Ibor coupons, the leg builders that lay them out on a
//! schedule, and leg analytics (NPV, BPS) against a discount curve.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `CashFlow` trait, `Leg`, and the market context coupons are fixed in.
pub mod cashflow;

/// Leg analytics: NPV, BPS, first and last dates.
pub mod cashflows;

/// `Coupon` trait.
pub mod coupon;

/// Fixed-rate coupons and the fixed leg builder.
pub mod fixed_rate_coupon;

/// Ibor coupons and the floating leg builder.
pub mod floating_rate_coupon;

pub use cashflow::{CashFlow, FixingContext, Leg};
pub use cashflows::{bps, latest_relevant_date, maturity_date, npv, start_date};
pub use coupon::Coupon;
pub use fixed_rate_coupon::{FixedRateCoupon, FixedRateLegBuilder};
pub use floating_rate_coupon::{IborCoupon, IborLegBuilder};
