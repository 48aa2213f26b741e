//! Schedules with the conventions of the swaps priced by the revaluation
//! workflow (spot and one-year-forward five-year swaps on the UK calendar).

use ql_time::{
    BusinessDayConvention, Calendar, Date, DateGeneration, Frequency, Period, ScheduleBuilder,
    UnitedKingdom,
};

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

#[test]
fn annual_unadjusted_fixed_leg() {
    let cal = UnitedKingdom::exchange();
    let start = date(2016, 10, 4);
    let end = date(2021, 10, 4);
    let s = ScheduleBuilder::new(start, end, Period::from_frequency(Frequency::Annual).unwrap(), &cal)
        .with_convention(BusinessDayConvention::Unadjusted)
        .with_termination_convention(BusinessDayConvention::Unadjusted)
        .with_rule(DateGeneration::Forward)
        .build()
        .unwrap();
    let expected: Vec<Date> = (2016..=2021).map(|y| date(y, 10, 4)).collect();
    assert_eq!(s.dates(), expected.as_slice());
}

#[test]
fn semiannual_modified_following_float_leg() {
    let cal = UnitedKingdom::exchange();
    let s = ScheduleBuilder::new(date(2016, 10, 4), date(2021, 10, 4), Period::months(6), &cal)
        .with_convention(BusinessDayConvention::ModifiedFollowing)
        .with_termination_convention(BusinessDayConvention::ModifiedFollowing)
        .with_rule(DateGeneration::Forward)
        .build()
        .unwrap();
    assert_eq!(s.size(), 11);
    // 4 April 2020 is a Saturday.
    assert!(s.dates().contains(&date(2020, 4, 6)));
    assert!(s.dates().iter().all(|d| cal.is_business_day(*d)));
}

#[test]
fn forward_start_swap_dates() {
    let cal = UnitedKingdom::exchange();
    let settlement = date(2016, 10, 4);
    let fwd_start = cal
        .advance_period(settlement, Period::years(1), BusinessDayConvention::Following, false)
        .unwrap();
    assert_eq!(fwd_start, date(2017, 10, 4));
    let s = ScheduleBuilder::new(fwd_start, date(2022, 10, 4), Period::years(1), &cal)
        .with_convention(BusinessDayConvention::Unadjusted)
        .with_termination_convention(BusinessDayConvention::Unadjusted)
        .with_rule(DateGeneration::Forward)
        .build()
        .unwrap();
    assert_eq!(s.start_date(), fwd_start);
    assert_eq!(s.end_date(), date(2022, 10, 4));
    assert_eq!(s.periods().count(), 5);
}

#[test]
fn end_of_month_rolls_to_month_end() {
    let cal = UnitedKingdom::exchange();
    let s = ScheduleBuilder::new(date(2016, 9, 30), date(2017, 9, 29), Period::months(3), &cal)
        .with_rule(DateGeneration::Forward)
        .end_of_month(true)
        .build()
        .unwrap();
    assert_eq!(
        s.dates(),
        &[
            date(2016, 9, 30),
            date(2016, 12, 30),
            date(2017, 3, 31),
            date(2017, 6, 30),
            date(2017, 9, 29)
        ]
    );
}
