#![no_main]

use dashcal_core::dial::{ClockSelectionState, ClockTime, DialMode};
use libfuzzer_sys::fuzz_target;

// Typed edits never leave the dial outside 1..=12 / 0..=59.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let Some(initial) = ClockTime::new(12, 0, false) else {
        return;
    };
    let field = if selector & 1 == 0 { DialMode::Hour } else { DialMode::Minute };

    let mut dial = ClockSelectionState::new(initial);
    if dial.open().is_err() || dial.begin_edit(field).is_err() {
        return;
    }
    for ch in text.chars() {
        let _ = dial.edit_input(ch);
    }
    let _ = dial.commit_edit();
    let pending = dial.pending();
    assert!((1..=12).contains(&pending.hour()));
    assert!(pending.minute() <= 59);
    assert!(ClockTime::parse_hhmm(&pending.to_hhmm()).is_ok());
});
