use dashcal_core::calendar::{
    CalendarDate, EventIndex, EventRecord, GridBuilder, MonthCursor, days_in_month,
    first_weekday_of_month, from_date_key, to_date_key,
};
use dashcal_core::dial::{
    angle_to_hour, angle_to_minute, hour_to_angle, minute_to_angle, point_to_angle,
};
use proptest::prelude::*;

fn arb_cursor() -> impl Strategy<Value = MonthCursor> {
    (-4000i32..=9999, 0u32..12).prop_map(|(year, month0)| {
        MonthCursor::new(year, month0).expect("month0 is in range")
    })
}

fn arb_date() -> impl Strategy<Value = (i32, u32, u32)> {
    (-9999i32..=9999, 1u32..=12).prop_flat_map(|(year, month)| {
        (Just(year), Just(month), 1..=days_in_month(year, month))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn grid_covers_whole_weeks(cursor in arb_cursor()) {
        let today = cursor.first_day();
        let grid = GridBuilder::new(cursor, today).build();
        let month = cursor.month();
        let needed = days_in_month(cursor.year(), month) + first_weekday_of_month(cursor.year(), month);

        prop_assert_eq!(grid.cells.len() % 7, 0);
        prop_assert!(grid.cells.len() >= needed as usize);
        prop_assert!(grid.cells.len() < needed as usize + 7);
    }

    #[test]
    fn grid_cells_are_consecutive_from_sunday(cursor in arb_cursor()) {
        let grid = GridBuilder::new(cursor, cursor.first_day()).build();
        prop_assert_eq!(grid.cells[0].date.weekday(), 0);
        for pair in grid.cells.windows(2) {
            prop_assert_eq!(pair[0].date.add_days(1), pair[1].date);
        }
        let in_month = grid.cells.iter().filter(|c| c.in_current_month).count();
        prop_assert_eq!(in_month, cursor.days_in_month() as usize);
    }

    #[test]
    fn date_key_round_trips((year, month, day) in arb_date()) {
        let key = to_date_key(year, month, day);
        prop_assert_eq!(from_date_key(key.as_str()), Ok((year, month, day)));
    }

    #[test]
    fn date_keys_are_collision_free(a in arb_date(), b in arb_date()) {
        let same_key = to_date_key(a.0, a.1, a.2) == to_date_key(b.0, b.1, b.2);
        prop_assert_eq!(same_key, a == b);
    }

    #[test]
    fn key_order_agrees_with_date_order_for_four_digit_years(
        a in (1000i32..=9999, 1u32..=12, 1u32..=28),
        b in (1000i32..=9999, 1u32..=12, 1u32..=28),
    ) {
        let da = CalendarDate::new(a.0, a.1, a.2).expect("valid date");
        let db = CalendarDate::new(b.0, b.1, b.2).expect("valid date");
        prop_assert_eq!(da.cmp(&db), da.key().cmp(&db.key()));
    }

    #[test]
    fn lookup_never_fails(key in ".{0,16}") {
        let source = vec![EventRecord::new("24/06/2025", "Issue Date", "a")];
        let (index, _) = EventIndex::build(&source);
        let found = index.lookup_str(&key);
        prop_assert!(found.is_empty() || key == "2025-06-24");
    }

    #[test]
    fn every_parsed_record_lands_in_its_own_bucket(
        days in proptest::collection::vec((1u32..=28, 1u32..=12, 1990i32..2040), 0..40)
    ) {
        let source: Vec<EventRecord> = days
            .iter()
            .enumerate()
            .map(|(i, (d, m, y))| EventRecord::new(format!("{d:02}/{m:02}/{y}"), "Issue Date", format!("e{i}")))
            .collect();
        let (index, skipped) = EventIndex::build(&source);
        prop_assert!(skipped.is_empty());
        prop_assert_eq!(index.len(), source.len());
        let bucketed: usize = index.iter().map(|(_, events)| events.len()).sum();
        prop_assert_eq!(bucketed, source.len());
        for (key, events) in index.iter() {
            prop_assert!(events.iter().all(|e| &e.key == key));
        }
    }

    #[test]
    fn pointer_angle_stays_in_range(dx in -1.0e6f64..1.0e6, dy in -1.0e6f64..1.0e6) {
        let angle = point_to_angle(dx, dy);
        prop_assert!((0.0..360.0).contains(&angle));
    }

    #[test]
    fn any_angle_snaps_into_range(angle in -720.0f64..720.0) {
        prop_assert!((1..=12).contains(&angle_to_hour(angle)));
        prop_assert!(angle_to_minute(angle) < 60);
    }
}

#[test]
fn hour_angles_round_trip() {
    for hour in 1..=12 {
        assert_eq!(angle_to_hour(hour_to_angle(hour)), hour);
    }
}

#[test]
fn minute_angles_round_trip() {
    for minute in 0..60 {
        assert_eq!(angle_to_minute(minute_to_angle(minute)), minute);
    }
}
