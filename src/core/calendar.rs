//! Calendar-month arithmetic for forecast timestamps.

use crate::error::{ForecastError, Result};
use chrono::{Months, NaiveDateTime};

/// Shift `timestamp` forward by `months` calendar months.
///
/// The day of month is clamped to the last day of the target month, so
/// `2021-01-31 + 1` is `2021-02-28`. Time of day is preserved.
pub fn add_months(timestamp: NaiveDateTime, months: u32) -> Result<NaiveDateTime> {
    timestamp
        .checked_add_months(Months::new(months))
        .ok_or_else(|| {
            ForecastError::TimestampError(format!(
                "{timestamp} + {months} months is out of range"
            ))
        })
}

/// Timestamps `last + 1 month, ..., last + horizon months`.
///
/// Every offset is taken from `last` directly rather than chained from the
/// previous step, so a clamped February does not drag later months to the
/// 28th.
pub fn month_offsets(last: NaiveDateTime, horizon: usize) -> Result<Vec<NaiveDateTime>> {
    (1..=horizon)
        .map(|i| {
            let months = u32::try_from(i).map_err(|_| {
                ForecastError::InvalidParameter(format!("horizon {horizon} is too large"))
            })?;
            add_months(last, months)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn month_end_is_clamped_not_fixed_duration() {
        let dates = month_offsets(ts(2021, 1, 31), 3).unwrap();
        assert_eq!(dates, vec![ts(2021, 2, 28), ts(2021, 3, 31), ts(2021, 4, 30)]);
    }

    #[test]
    fn leap_year_february() {
        assert_eq!(add_months(ts(2024, 1, 31), 1).unwrap(), ts(2024, 2, 29));
    }

    #[test]
    fn crosses_year_boundary() {
        let dates = month_offsets(ts(2020, 11, 15), 3).unwrap();
        assert_eq!(dates, vec![ts(2020, 12, 15), ts(2021, 1, 15), ts(2021, 2, 15)]);
    }

    #[test]
    fn preserves_time_of_day() {
        let start = NaiveDate::from_ymd_opt(2022, 5, 1)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        let next = add_months(start, 1).unwrap();
        assert_eq!(next.time(), start.time());
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(month_offsets(ts(2021, 1, 1), 0).unwrap().is_empty());
    }

    #[test]
    fn overflow_is_an_error() {
        let far = NaiveDateTime::MAX;
        assert!(matches!(
            add_months(far, 1),
            Err(ForecastError::TimestampError(_))
        ));
    }
}
