//! Property tests for date arithmetic.

use proptest::prelude::*;
use ql_time::{Date, Period, TimeUnit};

fn any_date() -> impl Strategy<Value = Date> {
    (1990u16..2100, 1u8..=12, 1u8..=28).prop_map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn day_steps_are_invertible(d in any_date(), n in -5000i32..5000) {
        prop_assert_eq!((d + n) - n, d);
        prop_assert_eq!((d + n) - d, n);
    }

    #[test]
    fn month_steps_land_in_target_month(d in any_date(), n in 0i32..240) {
        let moved = d.advance(n, TimeUnit::Months).unwrap();
        let total = i32::from(d.year()) * 12 + i32::from(d.month()) - 1 + n;
        prop_assert_eq!(i32::from(moved.year()), total / 12);
        prop_assert_eq!(i32::from(moved.month()), total % 12 + 1);
        prop_assert!(moved.day_of_month() <= d.day_of_month());
    }

    #[test]
    fn tenor_strings_round_trip(n in 1i32..100, unit in prop_oneof![
        Just(TimeUnit::Days), Just(TimeUnit::Weeks), Just(TimeUnit::Months), Just(TimeUnit::Years)
    ]) {
        let p = Period::new(n, unit);
        prop_assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
    }
}
