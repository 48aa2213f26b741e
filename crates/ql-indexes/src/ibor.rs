//! Concrete IBOR index factory functions.

use crate::ibor_index::IborIndex;
use ql_time::{
    Actual360, Actual365Fixed, BusinessDayConvention, Period, Target, UkMarket, UnitedKingdom,
};

/// Create a Euribor index with the given tenor.
///
/// - Calendar: TARGET
/// - Day counter: Actual/360
/// - Fixing days: 2
/// - Convention: Modified Following
/// - End of month: true
pub fn euribor(tenor: Period) -> IborIndex {
    IborIndex::new(
        format!("Euribor{tenor}"),
        tenor,
        2,
        Target,
        BusinessDayConvention::ModifiedFollowing,
        true,
        Actual360,
    )
}

/// Create a Euribor index with the given number of months.
pub fn euribor_months(months: i32) -> IborIndex {
    euribor(Period::months(months))
}

/// Create a GBP LIBOR index with the given tenor.
///
/// - Calendar: UK (settlement)
/// - Day counter: Actual/365 (Fixed)
/// - Fixing days: 0
/// - Convention: Modified Following
/// - End of month: true
pub fn gbp_libor(tenor: Period) -> IborIndex {
    IborIndex::new(
        format!("GBPLibor{tenor}"),
        tenor,
        0,
        UnitedKingdom::new(UkMarket::Settlement),
        BusinessDayConvention::ModifiedFollowing,
        true,
        Actual365Fixed,
    )
}
