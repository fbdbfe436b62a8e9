use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::TimePolicy;
use crate::db::{models::PageStat, Database};
use crate::error::{Error, Result};
use crate::log_info;

const ENABLE_LOGS: bool = true;

/// Simulated sessions start at this local wall-clock time.
const SESSION_START: (u32, u32) = (19, 30);
/// Every synthetic page read is stamped with this duration.
const PAGE_DURATION_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryParams {
    pub book_id: i64,
    /// Expected as MM/DD/YYYY.
    pub start_date: String,
    pub days: u32,
    pub minutes_per_day: u32,
    pub pages_per_minute: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    pub book_id: i64,
    pub inserted: usize,
    pub last_page: i64,
    pub total_pages: i64,
}

/// Synthesize one page-level reading-session row per page read, spread
/// across daily sessions starting at 19:30 local time, and insert them as
/// a single batch. Generation stops once the book's page count is reached
/// and never overshoots it. A validation failure inserts nothing.
pub fn create_reading_entries(
    db: &mut Database,
    time: &TimePolicy,
    params: &EntryParams,
) -> Result<EntryReport> {
    if params.days == 0 {
        return Err(Error::validation("days must be at least 1"));
    }
    if params.minutes_per_day == 0 {
        return Err(Error::validation("minutes per day must be at least 1"));
    }
    if params.pages_per_minute <= 0.0 {
        return Err(Error::validation("pages per minute must be positive"));
    }

    let start_date = NaiveDate::parse_from_str(&params.start_date, "%m/%d/%Y").map_err(|_| {
        Error::validation(format!(
            "invalid start date '{}', expected MM/DD/YYYY",
            params.start_date
        ))
    })?;

    let book = db.get_book(params.book_id)?;
    let total_pages = book.page_count();
    if total_pages <= 0 {
        return Err(Error::validation(format!(
            "book '{}' has no page count",
            book.title
        )));
    }

    let session_start =
        NaiveTime::from_hms_opt(SESSION_START.0, SESSION_START.1, 0).unwrap_or_default();
    let daily_budget = (params.pages_per_minute * f64::from(params.minutes_per_day)).floor() as i64;

    let mut rows = Vec::new();
    let mut current_page = 0i64;
    'days: for day in 0..i64::from(params.days) {
        let day_start = (start_date + Duration::days(day)).and_time(session_start);

        for page_index in 0..daily_budget {
            current_page += 1;
            if current_page > total_pages {
                break 'days;
            }

            let minutes_in = (page_index as f64 / params.pages_per_minute).floor() as i64;
            let session_time = day_start + Duration::minutes(minutes_in);
            rows.push(PageStat {
                id_book: params.book_id,
                page: current_page,
                start_time: time.epoch_from_local(session_time),
                duration: PAGE_DURATION_SECS,
                total_pages,
            });
        }

        if current_page >= total_pages {
            break;
        }
    }

    let inserted = if rows.is_empty() {
        0
    } else {
        db.insert_page_stats(&rows)?
    };
    let last_page = rows.last().map(|row| row.page).unwrap_or(0);

    log_info!(
        "inserted {inserted} reading entries for book {} (last page {last_page})",
        params.book_id
    );

    Ok(EntryReport {
        book_id: params.book_id,
        inserted,
        last_page,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_book, open_empty};

    fn params(book_id: i64) -> EntryParams {
        EntryParams {
            book_id,
            start_date: "01/01/2024".to_string(),
            days: 1,
            minutes_per_day: 60,
            pages_per_minute: 1.0,
        }
    }

    fn stat_count(db: &crate::db::Database) -> i64 {
        db.conn()
            .query_row("SELECT COUNT(*) FROM page_stat_data", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn one_day_at_one_page_per_minute_inserts_sixty_rows() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Hundred Pager", Some(100), None, None);

        let report = create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &params(1)).unwrap();
        assert_eq!(report.inserted, 60);
        assert_eq!(report.last_page, 60);
        assert_eq!(stat_count(&fixture.db), 60);
    }

    #[test]
    fn generation_never_overshoots_the_page_count() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Novella", Some(45), None, None);

        let mut overshoot = params(1);
        overshoot.days = 10;
        let report =
            create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &overshoot).unwrap();
        assert_eq!(report.inserted, 45);
        assert_eq!(report.last_page, 45);

        let max_page: i64 = fixture
            .db
            .conn()
            .query_row("SELECT MAX(page) FROM page_stat_data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(max_page, 45);
    }

    #[test]
    fn sessions_start_at_half_past_seven_local() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Evening Read", Some(100), None, None);

        create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &params(1)).unwrap();
        let first: i64 = fixture
            .db
            .conn()
            .query_row("SELECT MIN(start_time) FROM page_stat_data", [], |row| {
                row.get(0)
            })
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        assert_eq!(first, expected);
    }

    #[test]
    fn invalid_date_fails_validation_and_inserts_nothing() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Untouched", Some(100), None, None);

        let mut bad = params(1);
        bad.start_date = "13/40/2024".to_string();
        let err = create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &bad).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(stat_count(&fixture.db), 0);
    }

    #[test]
    fn unknown_book_fails_with_not_found() {
        let mut fixture = open_empty();
        let err = create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &params(7))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(7)));
        assert_eq!(stat_count(&fixture.db), 0);
    }

    #[test]
    fn missing_page_count_fails_validation() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "No Pages", None, None, None);
        let err = create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &params(1))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn fractional_rate_spreads_pages_over_minutes() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Slow Burn", Some(100), None, None);

        let mut slow = params(1);
        slow.pages_per_minute = 0.5;
        slow.minutes_per_day = 10;
        let report = create_reading_entries(&mut fixture.db, &TimePolicy::utc(), &slow).unwrap();
        // floor(0.5 * 10) = 5 pages, two minutes apart.
        assert_eq!(report.inserted, 5);

        let times: Vec<i64> = {
            let conn = fixture.db.conn();
            let mut stmt = conn
                .prepare("SELECT start_time FROM page_stat_data ORDER BY page")
                .unwrap();
            let rows = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<std::result::Result<Vec<i64>, _>>()
                .unwrap();
            rows
        };
        assert_eq!(times[1] - times[0], 120);
    }
}
