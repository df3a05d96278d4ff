#![no_main]

use dashcal_core::calendar::{DateKey, from_date_key, to_date_key};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok((year, month, day)) = from_date_key(raw) {
        // Normalizing is idempotent.
        let key = to_date_key(year, month, day);
        let reparsed: DateKey = key.as_str().parse().expect("normalized key parses");
        assert_eq!(reparsed, key);
    }
});
