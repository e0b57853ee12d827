//! Measurement date formats.
//!
//! # Invariants
//! - `CANONICAL_DATE_FORMAT` is the only format written by normalization.
//! - Parsing accepts both the entry and canonical formats, so normalizing an
//!   already-normalized store keeps every record.

use chrono::{Local, NaiveDate};

/// Format users type dates in, e.g. `31/01/2023`.
pub const ENTRY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format persisted after normalization, e.g. `2023-01-31`.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_FORMATS: [&str; 2] = [ENTRY_DATE_FORMAT, CANONICAL_DATE_FORMAT];

/// Parses a measurement date in entry or canonical format.
///
/// Surrounding whitespace is ignored. Returns `None` for anything else,
/// including impossible calendar dates such as `31/02/2023`.
pub fn parse_measurement_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Formats a date in canonical ISO form.
pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Formats a date in entry (`day/month/year`) form.
pub fn format_entry(date: NaiveDate) -> String {
    date.format(ENTRY_DATE_FORMAT).to_string()
}

/// Today's local date in entry form, used when a caller leaves the date blank.
pub fn today_entry_string() -> String {
    format_entry(Local::now().date_naive())
}

/// Seconds since the Unix epoch at UTC midnight of `date`.
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|datetime| datetime.and_utc().timestamp())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{date_to_timestamp, format_canonical, format_entry, parse_measurement_date};
    use chrono::NaiveDate;

    #[test]
    fn parses_entry_and_canonical_forms() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        assert_eq!(parse_measurement_date("31/01/2023"), Some(expected));
        assert_eq!(parse_measurement_date(" 2023-01-31 "), Some(expected));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_measurement_date("bad-date"), None);
        assert_eq!(parse_measurement_date("31/02/2023"), None);
        assert_eq!(parse_measurement_date(""), None);
    }

    #[test]
    fn formats_both_directions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_canonical(date), "2024-03-05");
        assert_eq!(format_entry(date), "05/03/2024");
    }

    #[test]
    fn timestamp_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(date_to_timestamp(date), 86_400);
    }
}
