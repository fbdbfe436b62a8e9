use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Parse a `YYYY-MM-DD` string as produced by SQLite's `date()`.
pub(crate) fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("unparseable day '{value}' in query result")))
}

pub(crate) fn secs_to_minutes(secs: i64) -> f64 {
    secs as f64 / 60.0
}

pub(crate) fn secs_to_hours(secs: i64) -> f64 {
    secs as f64 / 3600.0
}

/// Reading speed in pages per hour; 0 when no time was recorded.
pub(crate) fn pages_per_hour(pages: i64, secs: i64) -> f64 {
    if secs <= 0 {
        0.0
    } else {
        pages as f64 / secs_to_hours(secs)
    }
}

/// Safe ratio, 0 when the denominator is 0.
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Completion percentage, clipped at 100.
pub(crate) fn completion_pct(pages_read: i64, total_pages: i64) -> f64 {
    if total_pages <= 0 {
        0.0
    } else {
        (pages_read as f64 / total_pages as f64 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_zero_for_zero_duration() {
        assert_eq!(pages_per_hour(120, 0), 0.0);
        assert_eq!(pages_per_hour(120, -5), 0.0);
    }

    #[test]
    fn speed_is_pages_over_hours() {
        assert_eq!(pages_per_hour(60, 3600), 60.0);
        assert_eq!(pages_per_hour(30, 1800), 60.0);
    }

    #[test]
    fn completion_clips_at_100() {
        assert_eq!(completion_pct(150, 100), 100.0);
        assert_eq!(completion_pct(50, 100), 50.0);
        assert_eq!(completion_pct(10, 0), 0.0);
    }

    #[test]
    fn parse_day_accepts_sqlite_format() {
        let day = parse_day("2024-03-09").unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert!(parse_day("not-a-day").is_err());
    }
}
