use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::models::BookRef;

/// Lifetime totals and derived reading speed for one book. Feeds the
/// per-book tables and bar charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTotals {
    pub id: i64,
    pub title: String,
    pub pages_read: i64,
    pub seconds_read: i64,
    pub minutes_read: f64,
    pub hours_read: f64,
    /// Pages per hour; 0 when no reading time was recorded.
    pub speed_pages_per_hour: f64,
}

/// Aggregates scoped to one calendar year. Every ratio reports 0 when its
/// denominator is 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearInReview {
    pub year: i32,
    pub unique_days_reading: i64,
    pub books_completed: i64,
    pub total_hours_reading: f64,
    pub total_pages_read: i64,
    pub avg_hours_per_day: f64,
    pub avg_pages_per_day: f64,
    pub avg_speed_pages_per_hour: f64,
    pub avg_days_to_complete_book: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPages {
    pub date: NaiveDate,
    pub pages_read: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMinutes {
    pub date: NaiveDate,
    pub minutes_read: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBooks {
    /// 1 = January.
    pub month: u32,
    pub books_read: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyMinutes {
    pub month: u32,
    pub minutes_read: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayMinutes {
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u32,
    pub name: String,
    pub minutes_read: f64,
}

/// The rolling 30-day window: one entry per calendar day ending today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirtyDaySummary {
    pub days: Vec<DailyMinutes>,
    pub total_minutes: f64,
    pub avg_minutes_per_day: f64,
}

/// One point of a book's completion-over-days series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionPoint {
    /// 1-based reading-day index.
    pub day: u32,
    pub date: NaiveDate,
    pub cumulative_pages: i64,
    pub completion_pct: f64,
}

/// One point of a book's completion-vs-time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeCompletionPoint {
    pub cumulative_hours: f64,
    pub completion_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionError {
    pub section: String,
    pub message: String,
}

/// Everything the summary tab renders, computed in one pass. A section
/// that fails leaves its slot empty and adds an entry to `errors`;
/// sections computed before the failure stay in the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    pub today: Option<NaiveDate>,
    pub year: i32,
    pub books: Option<Vec<BookRef>>,
    pub book_totals: Option<Vec<BookTotals>>,
    pub year_in_review: Option<YearInReview>,
    pub books_per_month: Option<Vec<MonthlyBooks>>,
    pub pages_per_day: Option<Vec<DailyPages>>,
    pub minutes_by_weekday: Option<Vec<WeekdayMinutes>>,
    pub minutes_per_month: Option<Vec<MonthlyMinutes>>,
    pub past_30_days: Option<ThirtyDaySummary>,
    pub errors: Vec<SectionError>,
}
