//! Concrete overnight index factory functions.

use crate::overnight_index::OvernightIndex;
use ql_time::{Actual365Fixed, UkMarket, UnitedKingdom};

/// Create a SONIA (Sterling Overnight Index Average) index.
///
/// - Calendar: UK (settlement)
/// - Day counter: Actual/365 (Fixed)
/// - Fixing days: 0
pub fn sonia() -> OvernightIndex {
    OvernightIndex::new(
        "SONIA",
        0,
        UnitedKingdom::new(UkMarket::Settlement),
        Actual365Fixed,
    )
}
