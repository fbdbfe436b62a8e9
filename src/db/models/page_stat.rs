use serde::{Deserialize, Serialize};

/// One row of the external `page_stat_data` table: a single page read at a
/// point in time. `start_time` is Unix epoch seconds (UTC), `duration` is
/// seconds, `total_pages` is the denormalized page-count snapshot the
/// e-reader stores alongside each session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStat {
    pub id_book: i64,
    pub page: i64,
    pub start_time: i64,
    pub duration: i64,
    pub total_pages: i64,
}
