use crate::Cursor;

use std::str::FromStr;

use googletest::prelude::*;
use proptest::prelude::*;

#[test]
fn given_numeric_string_when_parsed_then_cursor() {
    let cursor = Cursor::from_str("1700000000123").unwrap();
    assert_that!(cursor.as_millis(), eq(1_700_000_000_123));
}

#[test]
fn given_padded_numeric_string_when_parsed_then_trimmed() {
    let cursor = Cursor::from_str(" 42 ").unwrap();
    assert_that!(cursor, eq(Cursor::from_millis(42)));
}

#[test]
fn given_negative_or_garbage_when_parsed_then_error() {
    assert!(Cursor::from_str("-5").is_err());
    assert!(Cursor::from_str("yesterday").is_err());
    assert!(Cursor::from_str("").is_err());
}

#[test]
fn given_small_cursor_when_subtracting_then_clamped_at_origin() {
    let cursor = Cursor::from_millis(10);
    assert_that!(cursor.saturating_sub_millis(100), eq(Cursor::ORIGIN));
}

proptest! {
    #[test]
    fn given_any_non_negative_millis_when_displayed_and_parsed_then_equal(millis in 0i64..i64::MAX) {
        let cursor = Cursor::from_millis(millis);
        prop_assert_eq!(Cursor::from_str(&cursor.to_string()).unwrap(), cursor);
    }

    #[test]
    fn given_two_cursors_when_compared_then_order_matches_millis(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        prop_assert_eq!(Cursor::from_millis(a) < Cursor::from_millis(b), a < b);
    }
}
