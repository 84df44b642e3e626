//! Utility functions for the forex_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

/// Timestamp parsing for observation records
pub mod date_parser {
    use super::*;
    use chrono::NaiveDateTime;

    const OFFSET_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
    ];

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse an ISO-8601 style timestamp.
    ///
    /// Offsets are kept as given. Naive datetimes and plain dates are
    /// read as UTC.
    pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
        let s = input.trim();

        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Ok(ts);
        }
        for format in OFFSET_FORMATS {
            if let Ok(ts) = DateTime::parse_from_str(s, format) {
                return Ok(ts);
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(naive.and_utc().fixed_offset());
            }
        }

        parse_date(s)?
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().fixed_offset())
            .ok_or_else(|| ForecastError::TimestampError(input.to_string()))
    }

    /// Parse a `YYYY-MM-DD` calendar date
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|_| ForecastError::TimestampError(input.to_string()))
    }
}

/// Calendar dates of the `horizon` steps following `last_timestamp`.
///
/// Step `i` lands on `last_timestamp + (i + 1) * step`, read in the
/// timestamp's own offset.
pub fn future_dates(
    last_timestamp: DateTime<FixedOffset>,
    horizon: usize,
    step: Duration,
) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for i in 1..=horizon {
        current = current.checked_add_signed(step).ok_or_else(|| {
            ForecastError::ValidationError(format!(
                "Target date out of range for step {} after {}",
                i, last_timestamp
            ))
        })?;
        dates.push(current.date_naive());
    }

    Ok(dates)
}

/// Difference a series `d` times
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` rounds of differencing for values that continue `original`.
///
/// `differenced` holds future values on the d-th differenced scale; the
/// last value of each intermediate level of `original` anchors the
/// cumulative sums.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 {
        return differenced.to_vec();
    }

    let anchors: Vec<f64> = (0..d)
        .map(|level| difference(original, level).last().copied().unwrap_or(0.0))
        .collect();

    let mut result = differenced.to_vec();
    for anchor in anchors.into_iter().rev() {
        let mut level = anchor;
        for value in result.iter_mut() {
            level += *value;
            *value = level;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::date_parser::parse_timestamp;
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let ts = parse_timestamp("2024-03-01T23:30:00+09:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_offset_without_colon() {
        let ts = parse_timestamp("2024-03-01T09:00:00+0900").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);

        let ts = parse_timestamp("2024-03-01 09:00:00.5-0530").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -(5 * 3600 + 30 * 60));
        assert_eq!(ts.hour(), 9);
    }

    #[test]
    fn test_parse_space_separated_offset() {
        let ts = parse_timestamp("2024-03-01 09:00:00+09:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_parse_naive_with_fraction() {
        let ts = parse_timestamp("2024-03-01T09:15:30.123456").unwrap();
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 15);
        assert_eq!(ts.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_plain_date() {
        let ts = parse_timestamp("2024-02-29").unwrap();
        assert_eq!(ts.day(), 29);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, ForecastError::TimestampError(_)));
    }

    #[test]
    fn test_future_dates_cross_month_end() {
        let last = parse_timestamp("2024-02-27T12:00:00Z").unwrap();
        let dates = future_dates(last, 3, Duration::days(1)).unwrap();
        let expected: Vec<NaiveDate> = ["2024-02-28", "2024-02-29", "2024-03-01"]
            .iter()
            .map(|s| date_parser::parse_date(s).unwrap())
            .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_difference_and_integrate() {
        let series = [1.0, 3.0, 6.0, 10.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0]);
        assert_eq!(difference(&series, 2), vec![1.0, 1.0]);

        // Continuing the second differences at 1.0 extends the quadratic
        let restored = integrate(&[1.0, 1.0], &series, 2);
        assert_eq!(restored, vec![15.0, 21.0]);
    }
}
