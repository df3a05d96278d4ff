#![no_main]

use dashcal_core::calendar::{days_in_month, parse_event_date};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(date) = parse_event_date(raw) {
        assert!((1..=12).contains(&date.month));
        assert!(date.day >= 1 && date.day <= days_in_month(date.year, date.month));
        let key = date.key();
        assert_eq!(key.to_date().ok(), Some(date));
    }
});
