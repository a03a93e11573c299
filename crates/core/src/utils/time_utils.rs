//! Wire-format date/time helpers.
//!
//! The service expects expense timestamps in UTC with millisecond precision
//! and a literal trailing `Z`, and goal deadlines as bare dates. The same
//! canonical strings are used for local TEXT storage so a value survives a
//! store/load/send round trip unchanged.

use chrono::{DateTime, NaiveDate, NaiveDateTime, ParseError, TimeZone, Utc};

pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_api_timestamp(at: DateTime<Utc>) -> String {
    at.format(API_TIMESTAMP_FORMAT).to_string()
}

pub fn parse_api_timestamp(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(raw, API_TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

pub fn parse_api_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw, API_DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_has_millisecond_precision_and_z() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 30, 5).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(format_api_timestamp(at), "2025-03-07T14:30:05.042Z");
    }

    #[test]
    fn timestamp_round_trips() {
        let raw = "2024-12-31T23:59:59.999Z";
        let parsed = parse_api_timestamp(raw).unwrap();
        assert_eq!(format_api_timestamp(parsed), raw);
    }

    #[test]
    fn date_round_trips() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(format_api_date(date), "2026-01-15");
        assert_eq!(parse_api_date("2026-01-15").unwrap(), date);
    }

    #[test]
    fn garbage_date_is_rejected() {
        assert!(parse_api_date("next tuesday").is_err());
        assert!(parse_api_timestamp("2024-12-31").is_err());
    }
}
