//! Calendar-day helpers.
//!
//! Every date in the tracker is a [`NaiveDate`]: a local calendar day with no
//! time-of-day and no timezone, so parsing can never shift a date by one.

use chrono::{Duration, NaiveDate};

/// Storage and CSV date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats accepted by [`parse_flexible_date`], tried in order.
const FLEXIBLE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d",
];

/// Parse a `YYYY-MM-DD` string. Returns `None` on malformed input.
pub fn parse_local_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    // chrono accepts single-digit months and days; the stored format does not.
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Parse a date written in any of the common spreadsheet formats.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    if let Some(date) = parse_local_date(text) {
        return Some(date);
    }
    let text = text.trim();
    FLEXIBLE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Zero-padded `YYYY-MM-DD`.
pub fn format_local_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days from `a` to `b`; positive when `b` is later.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Shift `date` by `n` calendar days, saturating at the representable range.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(n)).unwrap_or(if n < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_local_date("2025-03-01"), Some(d(2025, 3, 1)));
        assert_eq!(parse_local_date(" 2024-02-29 "), Some(d(2024, 2, 29)));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_local_date(""), None);
        assert_eq!(parse_local_date("2025-13-01"), None);
        assert_eq!(parse_local_date("2023-02-29"), None);
        assert_eq!(parse_local_date("2025-3-1"), None);
        assert_eq!(parse_local_date("01/03/2025"), None);
        assert_eq!(parse_local_date("yesterday"), None);
    }

    #[test]
    fn flexible_parse_accepts_spreadsheet_formats() {
        assert_eq!(parse_flexible_date("15/06/2025"), Some(d(2025, 6, 15)));
        assert_eq!(parse_flexible_date("15.06.2025"), Some(d(2025, 6, 15)));
        assert_eq!(parse_flexible_date("2025/06/15"), Some(d(2025, 6, 15)));
        assert_eq!(parse_flexible_date("not a date"), None);
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_local_date(d(2025, 1, 5)), "2025-01-05");
    }

    #[test]
    fn day_arithmetic_rolls_over_boundaries() {
        assert_eq!(add_days(d(2025, 1, 31), 1), d(2025, 2, 1));
        assert_eq!(add_days(d(2024, 12, 31), 1), d(2025, 1, 1));
        assert_eq!(add_days(d(2024, 3, 1), -1), d(2024, 2, 29));
        assert_eq!(days_between(d(2025, 3, 2), d(2025, 3, 4)), 2);
        assert_eq!(days_between(d(2025, 3, 4), d(2025, 3, 2)), -2);
    }

    proptest! {
        #[test]
        fn add_then_measure_is_identity(offset in 0i64..20_000, n in -5_000i64..5_000) {
            let start = add_days(d(1990, 1, 1), offset);
            prop_assert_eq!(days_between(start, add_days(start, n)), n);
        }

        #[test]
        fn format_then_parse_is_identity(offset in 0i64..40_000) {
            let date = add_days(d(1950, 1, 1), offset);
            prop_assert_eq!(parse_local_date(&format_local_date(date)), Some(date));
        }
    }
}
