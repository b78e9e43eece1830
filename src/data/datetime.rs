//! Timestamp parsing for date columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-and-time layouts tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the result is midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%B-%Y",
];

/// Parse a single cell into a timestamp.
///
/// Offsets in RFC 3339 input are applied and dropped, leaving UTC wall time.
/// Month-only cells (`2021-03`, `Mar 2021`) resolve to the first of the
/// month and a bare year to January 1st.
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return match s.len() {
            4 => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
            8 => NaiveDate::from_ymd_opt(
                s[..4].parse().ok()?,
                s[4..6].parse().ok()?,
                s[6..].parse().ok()?,
            ),
            _ => None,
        };
    }

    // Month resolution.
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{s}/01"), "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("01 {s}"), "%d %B %Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, sec)
            .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        ymd_hms(y, m, d, 0, 0, 0)
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_timestamp("2021-01-31"), Some(ymd(2021, 1, 31)));
        assert_eq!(parse_timestamp(" 2021-01-31 "), Some(ymd(2021, 1, 31)));
        assert_eq!(parse_timestamp("2021/01/31"), Some(ymd(2021, 1, 31)));
    }

    #[test]
    fn parses_date_times() {
        assert_eq!(
            parse_timestamp("2021-01-31 13:05:09"),
            Some(ymd_hms(2021, 1, 31, 13, 5, 9))
        );
        assert_eq!(
            parse_timestamp("2021-01-31T13:05"),
            Some(ymd_hms(2021, 1, 31, 13, 5, 0))
        );
    }

    #[test]
    fn applies_offsets() {
        assert_eq!(
            parse_timestamp("2021-01-31T12:00:00+02:00"),
            Some(ymd_hms(2021, 1, 31, 10, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2021-01-31T12:00:00Z"),
            Some(ymd_hms(2021, 1, 31, 12, 0, 0))
        );
    }

    #[test]
    fn parses_regional_layouts() {
        assert_eq!(parse_timestamp("01/31/2021"), Some(ymd(2021, 1, 31)));
        assert_eq!(parse_timestamp("31.01.2021"), Some(ymd(2021, 1, 31)));
        assert_eq!(parse_timestamp("Jan 31, 2021"), Some(ymd(2021, 1, 31)));
        assert_eq!(parse_timestamp("31 January 2021"), Some(ymd(2021, 1, 31)));
    }

    #[test]
    fn month_only_resolves_to_first_day() {
        assert_eq!(parse_timestamp("1949-01"), Some(ymd(1949, 1, 1)));
        assert_eq!(parse_timestamp("1949/03"), Some(ymd(1949, 3, 1)));
        assert_eq!(parse_timestamp("Mar 1949"), Some(ymd(1949, 3, 1)));
    }

    #[test]
    fn compact_and_year_only() {
        assert_eq!(parse_timestamp("20210131"), Some(ymd(2021, 1, 31)));
        assert_eq!(parse_timestamp("2021"), Some(ymd(2021, 1, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2021-13-01"), None);
        assert_eq!(parse_timestamp("12345"), None);
    }
}
