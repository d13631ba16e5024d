//! Date normalization shared by the loader and the temporal aggregator.
//!
//! Every accepted textual form is reduced to a [`NaiveDate`]; any time of
//! day is dropped.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Parses a date or datetime string into its calendar date.
///
/// Returns `None` if the string matches none of the accepted formats.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_date("2023-01-31"), Some(ymd(2023, 1, 31)));
    }

    #[test]
    fn parses_us_date() {
        assert_eq!(parse_date("01/31/2023"), Some(ymd(2023, 1, 31)));
    }

    #[test]
    fn parses_open_data_export_timestamp() {
        assert_eq!(
            parse_date("06/30/2022 12:00:00 AM"),
            Some(ymd(2022, 6, 30))
        );
    }

    #[test]
    fn drops_time_of_day() {
        assert_eq!(
            parse_date("2023-01-31T23:59:59.500"),
            Some(ymd(2023, 1, 31))
        );
        assert_eq!(parse_date("2023-01-31 08:15:00"), Some(ymd(2023, 1, 31)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2023-13-01"), None);
    }
}
