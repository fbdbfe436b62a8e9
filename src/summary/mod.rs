//! The summary query set: every derived metric and chart dataset the
//! hosting UI renders. Each function is one read query plus a pure
//! transform; none mutate state. `generate_summary` is the flow boundary
//! that collects all sections and keeps partial results when a later
//! section fails.

mod types;

pub use types::{
    BookTotals, CompletionPoint, DailyMinutes, DailyPages, MonthlyBooks, MonthlyMinutes,
    SectionError, SummaryReport, ThirtyDaySummary, TimeCompletionPoint, WeekdayMinutes,
    YearInReview,
};

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::SummaryConfig;
use crate::db::helpers::{completion_pct, pages_per_hour, ratio_or_zero, secs_to_hours,
    secs_to_minutes};
use crate::db::models::BookRef;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Non-excluded books for the host UI's selection dropdown.
pub fn list_books(db: &Database, config: &SummaryConfig) -> Result<Vec<BookRef>> {
    db.list_books(&config.exclusions)
}

/// Lifetime totals per book with derived reading speed.
pub fn book_totals(db: &Database, config: &SummaryConfig) -> Result<Vec<BookTotals>> {
    let rows = db.book_totals_rows(&config.exclusions)?;
    Ok(rows
        .into_iter()
        .map(|row| BookTotals {
            id: row.id,
            title: row.title,
            pages_read: row.pages_read,
            seconds_read: row.seconds_read,
            minutes_read: secs_to_minutes(row.seconds_read),
            hours_read: secs_to_hours(row.seconds_read),
            speed_pages_per_hour: pages_per_hour(row.pages_read, row.seconds_read),
        })
        .collect())
}

/// Year-scoped aggregates plus their derived averages.
pub fn year_in_review(db: &Database, config: &SummaryConfig, year: i32) -> Result<YearInReview> {
    let offset = i64::from(config.time.utc_offset_secs);
    let unique_days = db.year_reading_days(&config.exclusions, offset, year)?;
    let (books_completed, total_seconds, total_pages) =
        db.year_book_counters(&config.exclusions, offset, year)?;

    let total_hours = secs_to_hours(total_seconds);
    Ok(YearInReview {
        year,
        unique_days_reading: unique_days,
        books_completed,
        total_hours_reading: total_hours,
        total_pages_read: total_pages,
        avg_hours_per_day: ratio_or_zero(total_hours, unique_days as f64),
        avg_pages_per_day: ratio_or_zero(total_pages as f64, unique_days as f64),
        avg_speed_pages_per_hour: ratio_or_zero(total_pages as f64, total_hours),
        avg_days_to_complete_book: ratio_or_zero(unique_days as f64, books_completed as f64),
    })
}

/// Distinct books read per month of `year`: exactly 12 entries, months
/// without activity filled with zero.
pub fn books_per_month(
    db: &Database,
    config: &SummaryConfig,
    year: i32,
) -> Result<Vec<MonthlyBooks>> {
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.monthly_book_counts(&config.exclusions, offset)?;

    let by_month: BTreeMap<u32, i64> = rows
        .into_iter()
        .filter(|row| row.year == year)
        .map(|row| (row.month, row.books_read))
        .collect();

    Ok((1..=12)
        .map(|month| MonthlyBooks {
            month,
            books_read: by_month.get(&month).copied().unwrap_or(0),
        })
        .collect())
}

/// Pages read per calendar day of `year`, from January 1 through `today`
/// (or December 31 for past years). Every day in range appears; days
/// without activity are zero.
pub fn pages_per_day(
    db: &Database,
    config: &SummaryConfig,
    year: i32,
    today: NaiveDate,
) -> Result<Vec<DailyPages>> {
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.daily_activity(&config.exclusions, offset)?;

    let by_day: BTreeMap<NaiveDate, i64> = rows
        .into_iter()
        .filter(|row| row.day.year() == year)
        .map(|row| (row.day, row.pages_read))
        .collect();

    let start = first_day_of_year(year)?;
    let end = if today.year() == year {
        today
    } else {
        last_day_of_year(year)?
    };

    Ok(start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| DailyPages {
            date,
            pages_read: by_day.get(&date).copied().unwrap_or(0),
        })
        .collect())
}

/// Minutes read per day of the week over `year`: exactly 7 entries,
/// Sunday through Saturday, zero-filled.
pub fn minutes_by_weekday(
    db: &Database,
    config: &SummaryConfig,
    year: i32,
) -> Result<Vec<WeekdayMinutes>> {
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.daily_activity(&config.exclusions, offset)?;

    let mut buckets = [0i64; 7];
    for row in rows.into_iter().filter(|row| row.day.year() == year) {
        let weekday = row.day.weekday().num_days_from_sunday() as usize;
        buckets[weekday] += row.seconds_read;
    }

    Ok(buckets
        .iter()
        .enumerate()
        .map(|(weekday, secs)| WeekdayMinutes {
            weekday: weekday as u32,
            name: WEEKDAY_NAMES[weekday].to_string(),
            minutes_read: secs_to_minutes(*secs),
        })
        .collect())
}

/// Minutes read per month of `year`: exactly 12 entries, zero-filled.
pub fn minutes_per_month(
    db: &Database,
    config: &SummaryConfig,
    year: i32,
) -> Result<Vec<MonthlyMinutes>> {
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.daily_activity(&config.exclusions, offset)?;

    let mut buckets = [0i64; 12];
    for row in rows.into_iter().filter(|row| row.day.year() == year) {
        buckets[row.day.month0() as usize] += row.seconds_read;
    }

    Ok(buckets
        .iter()
        .enumerate()
        .map(|(month0, secs)| MonthlyMinutes {
            month: month0 as u32 + 1,
            minutes_read: secs_to_minutes(*secs),
        })
        .collect())
}

/// Minutes read for each of the 30 calendar days ending at `today`, with
/// the window's total and per-day average (divided by 30, not by active
/// days).
pub fn past_30_days(
    db: &Database,
    config: &SummaryConfig,
    today: NaiveDate,
) -> Result<ThirtyDaySummary> {
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.daily_activity(&config.exclusions, offset)?;

    let by_day: BTreeMap<NaiveDate, i64> = rows
        .into_iter()
        .map(|row| (row.day, row.seconds_read))
        .collect();

    let start = today - Duration::days(29);
    let days: Vec<DailyMinutes> = start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| DailyMinutes {
            date,
            minutes_read: secs_to_minutes(by_day.get(&date).copied().unwrap_or(0)),
        })
        .collect();

    let total_minutes: f64 = days.iter().map(|d| d.minutes_read).sum();
    Ok(ThirtyDaySummary {
        avg_minutes_per_day: total_minutes / 30.0,
        total_minutes,
        days,
    })
}

/// Completion % of one book over its reading days. The series is
/// non-decreasing, capped at 100, and ends at the first day the book
/// reaches 100%.
pub fn completion_by_day(
    db: &Database,
    config: &SummaryConfig,
    book_id: i64,
) -> Result<Vec<CompletionPoint>> {
    let total_pages = total_pages_for(db, book_id)?;
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.book_progress_rows(book_id, offset)?;

    let mut points = Vec::with_capacity(rows.len());
    let mut cumulative_pages = 0i64;
    for (index, row) in rows.into_iter().enumerate() {
        cumulative_pages += row.pages_read;
        let pct = completion_pct(cumulative_pages, total_pages);
        points.push(CompletionPoint {
            day: index as u32 + 1,
            date: row.day,
            cumulative_pages,
            completion_pct: pct,
        });
        if pct >= 100.0 {
            break;
        }
    }

    Ok(points)
}

/// Completion % of one book against cumulative hours read, ordered by
/// reading day, with the same cap-and-terminate rule as
/// `completion_by_day`.
pub fn completion_by_time(
    db: &Database,
    config: &SummaryConfig,
    book_id: i64,
) -> Result<Vec<TimeCompletionPoint>> {
    let total_pages = total_pages_for(db, book_id)?;
    let offset = i64::from(config.time.utc_offset_secs);
    let rows = db.book_progress_rows(book_id, offset)?;

    let mut points = Vec::with_capacity(rows.len());
    let mut cumulative_pages = 0i64;
    let mut cumulative_secs = 0i64;
    for row in rows {
        cumulative_pages += row.pages_read;
        cumulative_secs += row.seconds_read;
        let pct = completion_pct(cumulative_pages, total_pages);
        points.push(TimeCompletionPoint {
            cumulative_hours: secs_to_hours(cumulative_secs),
            completion_pct: pct,
        });
        if pct >= 100.0 {
            break;
        }
    }

    Ok(points)
}

/// Run every whole-library section, collecting results. Failed sections
/// land in `errors`; everything already computed stays in the report.
pub fn generate_summary(db: &Database, config: &SummaryConfig) -> SummaryReport {
    let today = config.time.today();
    let year = today.year();
    log_info!("generating summary for {} (year {year})", db.path().display());

    let mut report = SummaryReport {
        today: Some(today),
        year,
        ..SummaryReport::default()
    };

    record(&mut report.books, &mut report.errors, "books", || {
        list_books(db, config)
    });
    record(
        &mut report.book_totals,
        &mut report.errors,
        "book_totals",
        || book_totals(db, config),
    );
    record(
        &mut report.year_in_review,
        &mut report.errors,
        "year_in_review",
        || year_in_review(db, config, year),
    );
    record(
        &mut report.books_per_month,
        &mut report.errors,
        "books_per_month",
        || books_per_month(db, config, year),
    );
    record(
        &mut report.pages_per_day,
        &mut report.errors,
        "pages_per_day",
        || pages_per_day(db, config, year, today),
    );
    record(
        &mut report.minutes_by_weekday,
        &mut report.errors,
        "minutes_by_weekday",
        || minutes_by_weekday(db, config, year),
    );
    record(
        &mut report.minutes_per_month,
        &mut report.errors,
        "minutes_per_month",
        || minutes_per_month(db, config, year),
    );
    record(
        &mut report.past_30_days,
        &mut report.errors,
        "past_30_days",
        || past_30_days(db, config, today),
    );

    if report.errors.is_empty() {
        log_info!("summary complete");
    } else {
        log_info!("summary complete with {} failed sections", report.errors.len());
    }

    report
}

fn record<T>(
    slot: &mut Option<T>,
    errors: &mut Vec<SectionError>,
    section: &str,
    compute: impl FnOnce() -> Result<T>,
) {
    match compute() {
        Ok(value) => *slot = Some(value),
        Err(err) => {
            log_error!("summary section {section} failed: {err}");
            errors.push(SectionError {
                section: section.to_string(),
                message: err.to_string(),
            });
        }
    }
}

/// Completion denominator: the book row's page count when usable,
/// otherwise the highest page seen in its stat rows.
fn total_pages_for(db: &Database, book_id: i64) -> Result<i64> {
    let book = db.get_book(book_id)?;
    if book.page_count() > 0 {
        return Ok(book.page_count());
    }
    match db.max_page(book_id)? {
        Some(max) if max > 0 => Ok(max),
        _ => Err(Error::validation(format!(
            "book '{}' has no page count",
            book.title
        ))),
    }
}

fn first_day_of_year(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::validation(format!("invalid year {year}")))
}

fn last_day_of_year(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| Error::validation(format!("invalid year {year}")))
}
