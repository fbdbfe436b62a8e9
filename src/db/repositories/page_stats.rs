use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, types::Value};

use crate::config::ExclusionFilter;
use crate::db::{helpers::parse_day, models::PageStat, Database};
use crate::error::Result;

/// Per-calendar-day activity across all non-excluded books.
#[derive(Debug, Clone)]
pub(crate) struct DailyActivityRow {
    pub(crate) day: NaiveDate,
    /// Distinct (book, page) pairs touched that day.
    pub(crate) pages_read: i64,
    pub(crate) seconds_read: i64,
}

/// Distinct books with activity in one calendar month.
#[derive(Debug, Clone)]
pub(crate) struct MonthlyBooksRow {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) books_read: i64,
}

/// Lifetime totals for one book.
#[derive(Debug, Clone)]
pub(crate) struct BookTotalsRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) pages_read: i64,
    pub(crate) seconds_read: i64,
}

/// One reading day of a single book.
#[derive(Debug, Clone)]
pub(crate) struct BookProgressRow {
    pub(crate) day: NaiveDate,
    pub(crate) pages_read: i64,
    pub(crate) seconds_read: i64,
}

impl Database {
    /// Activity grouped by calendar day under the given UTC offset, over
    /// the whole table. Callers window and zero-fill the result.
    pub(crate) fn daily_activity(
        &self,
        exclusions: &ExclusionFilter,
        utc_offset_secs: i64,
    ) -> Result<Vec<DailyActivityRow>> {
        let (predicate, predicate_values) = exclusions.sql_predicate("b.id", "b.title");
        let sql = format!(
            "SELECT date(psd.start_time + ?, 'unixepoch') AS day,
                    COUNT(DISTINCT psd.id_book || ':' || psd.page) AS pages_read,
                    COALESCE(SUM(psd.duration), 0) AS seconds_read
             FROM page_stat_data psd
             JOIN book b ON psd.id_book = b.id
             WHERE {predicate}
             GROUP BY day
             ORDER BY day"
        );

        let mut values = vec![Value::from(utc_offset_secs)];
        values.extend(predicate_values);

        let mut stmt = self.conn().prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;

        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            let day: String = row.get(0)?;
            days.push(DailyActivityRow {
                day: parse_day(&day)?,
                pages_read: row.get(1)?,
                seconds_read: row.get(2)?,
            });
        }

        Ok(days)
    }

    /// Distinct book titles read per calendar month.
    pub(crate) fn monthly_book_counts(
        &self,
        exclusions: &ExclusionFilter,
        utc_offset_secs: i64,
    ) -> Result<Vec<MonthlyBooksRow>> {
        let (predicate, predicate_values) = exclusions.sql_predicate("b.id", "b.title");
        let sql = format!(
            "SELECT strftime('%Y', psd.start_time + ?, 'unixepoch') AS y,
                    strftime('%m', psd.start_time + ?, 'unixepoch') AS m,
                    COUNT(DISTINCT b.title) AS books_read
             FROM page_stat_data psd
             JOIN book b ON psd.id_book = b.id
             WHERE {predicate}
             GROUP BY y, m
             ORDER BY y, m"
        );

        let mut values = vec![Value::from(utc_offset_secs), Value::from(utc_offset_secs)];
        values.extend(predicate_values);

        let mut stmt = self.conn().prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;

        let mut months = Vec::new();
        while let Some(row) = rows.next()? {
            let year: String = row.get(0)?;
            let month: String = row.get(1)?;
            months.push(MonthlyBooksRow {
                year: year.parse().unwrap_or(0),
                month: month.parse().unwrap_or(0),
                books_read: row.get(2)?,
            });
        }

        Ok(months)
    }

    /// Lifetime per-book totals: distinct pages and summed duration.
    pub(crate) fn book_totals_rows(
        &self,
        exclusions: &ExclusionFilter,
    ) -> Result<Vec<BookTotalsRow>> {
        let (predicate, values) = exclusions.sql_predicate("b.id", "b.title");
        let sql = format!(
            "SELECT b.id, b.title,
                    COUNT(DISTINCT psd.page) AS pages_read,
                    COALESCE(SUM(psd.duration), 0) AS seconds_read
             FROM page_stat_data psd
             JOIN book b ON psd.id_book = b.id
             WHERE {predicate}
             GROUP BY b.id, b.title
             ORDER BY b.title"
        );

        let mut stmt = self.conn().prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;

        let mut totals = Vec::new();
        while let Some(row) = rows.next()? {
            totals.push(BookTotalsRow {
                id: row.get(0)?,
                title: row.get(1)?,
                pages_read: row.get(2)?,
                seconds_read: row.get(3)?,
            });
        }

        Ok(totals)
    }

    /// Distinct calendar days with any non-excluded activity in `year`.
    pub(crate) fn year_reading_days(
        &self,
        exclusions: &ExclusionFilter,
        utc_offset_secs: i64,
        year: i32,
    ) -> Result<i64> {
        let (predicate, predicate_values) = exclusions.sql_predicate("b.id", "b.title");
        let sql = format!(
            "SELECT COUNT(DISTINCT date(psd.start_time + ?, 'unixepoch'))
             FROM page_stat_data psd
             JOIN book b ON psd.id_book = b.id
             WHERE CAST(strftime('%Y', psd.start_time + ?, 'unixepoch') AS INTEGER) = ?
               AND {predicate}"
        );

        let mut values = vec![
            Value::from(utc_offset_secs),
            Value::from(utc_offset_secs),
            Value::from(i64::from(year)),
        ];
        values.extend(predicate_values);

        let count = self
            .conn()
            .query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count)
    }

    /// Count and cumulative counters of non-excluded books with activity
    /// in `year`. Returns (books, total seconds, total pages); the totals
    /// come from the book rows' lifetime counters, each counted once.
    pub(crate) fn year_book_counters(
        &self,
        exclusions: &ExclusionFilter,
        utc_offset_secs: i64,
        year: i32,
    ) -> Result<(i64, i64, i64)> {
        let (predicate, predicate_values) = exclusions.sql_predicate("b.id", "b.title");
        let sql = format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(COALESCE(b.total_read_time, 0)), 0),
                    COALESCE(SUM(COALESCE(b.total_read_pages, 0)), 0)
             FROM book b
             WHERE b.id IN (
                 SELECT DISTINCT psd.id_book
                 FROM page_stat_data psd
                 WHERE CAST(strftime('%Y', psd.start_time + ?, 'unixepoch') AS INTEGER) = ?
             )
               AND {predicate}"
        );

        let mut values = vec![Value::from(utc_offset_secs), Value::from(i64::from(year))];
        values.extend(predicate_values);

        let counters = self
            .conn()
            .query_row(&sql, params_from_iter(values), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
        Ok(counters)
    }

    /// Per-reading-day progress of one book, ordered by day.
    pub(crate) fn book_progress_rows(
        &self,
        book_id: i64,
        utc_offset_secs: i64,
    ) -> Result<Vec<BookProgressRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT date(psd.start_time + ?1, 'unixepoch') AS day,
                    COUNT(DISTINCT psd.page) AS pages_read,
                    COALESCE(SUM(psd.duration), 0) AS seconds_read
             FROM page_stat_data psd
             WHERE psd.id_book = ?2
             GROUP BY day
             ORDER BY day",
        )?;

        let mut rows = stmt.query(params![utc_offset_secs, book_id])?;
        let mut progress = Vec::new();
        while let Some(row) = rows.next()? {
            let day: String = row.get(0)?;
            progress.push(BookProgressRow {
                day: parse_day(&day)?,
                pages_read: row.get(1)?,
                seconds_read: row.get(2)?,
            });
        }

        Ok(progress)
    }

    /// Highest page number ever recorded for a book.
    pub(crate) fn max_page(&self, book_id: i64) -> Result<Option<i64>> {
        let max = self.conn().query_row(
            "SELECT MAX(page) FROM page_stat_data WHERE id_book = ?1",
            params![book_id],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// Insert a batch of synthetic reading-session rows in one
    /// transaction. Either every row lands or none do.
    pub(crate) fn insert_page_stats(&mut self, stats: &[PageStat]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO page_stat_data (id_book, page, start_time, duration, total_pages)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for stat in stats {
                stmt.execute(params![
                    stat.id_book,
                    stat.page,
                    stat.start_time,
                    stat.duration,
                    stat.total_pages,
                ])?;
            }
        }

        tx.commit()?;
        Ok(stats.len())
    }
}
