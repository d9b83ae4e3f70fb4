//! Conversions between wire timestamps, `OffsetDateTime` and the integer
//! millisecond timestamps stored in the database.
//!
//! All timestamps are kept in UTC at millisecond precision so that a value
//! survives a round trip through the database unchanged.

use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

/// The number of milliseconds since the Unix epoch for `date_time`.
pub fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Convert milliseconds since the Unix epoch into a UTC `OffsetDateTime`.
///
/// # Errors
/// Returns an error if `millis` is outside the range `time` can represent.
pub fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
}

/// Drop sub-millisecond precision and convert to UTC.
pub fn truncate_to_millis(date_time: OffsetDateTime) -> OffsetDateTime {
    // Anything `OffsetDateTime` can hold fits in an i64 of milliseconds.
    from_unix_millis(to_unix_millis(date_time)).unwrap_or(date_time)
}

/// The current time in UTC, truncated to milliseconds.
pub fn now() -> OffsetDateTime {
    truncate_to_millis(OffsetDateTime::now_utc())
}

/// Parse a timestamp sent by a client.
///
/// Accepts either an RFC 3339 timestamp, e.g. "2025-03-01T09:30:00Z", or a
/// plain calendar date, e.g. "2025-03-01", which is read as midnight UTC.
/// Returns `None` if `text` is neither.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(truncate_to_millis(date_time));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{from_unix_millis, parse_timestamp, to_unix_millis, truncate_to_millis};

    #[test]
    fn parses_rfc3339_and_normalizes_to_utc() {
        let got = parse_timestamp("2025-03-01T09:30:00+13:00");

        assert_eq!(got, Some(datetime!(2025-02-28 20:30:00 UTC)));
        assert_eq!(got.map(|date_time| date_time.offset().is_utc()), Some(true));
    }

    #[test]
    fn parses_plain_date_as_midnight_utc() {
        assert_eq!(
            parse_timestamp("2025-03-01"),
            Some(datetime!(2025-03-01 00:00:00 UTC))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2025-13-01"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn millis_survive_database_round_trip() {
        let date_time = truncate_to_millis(datetime!(2024-07-14 12:34:56.789_123 UTC));

        let millis = to_unix_millis(date_time);

        assert_eq!(date_time, datetime!(2024-07-14 12:34:56.789 UTC));
        assert_eq!(from_unix_millis(millis), Ok(date_time));
    }
}
