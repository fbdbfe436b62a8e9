use serde::{Deserialize, Serialize};

/// One row of the external `book` table. The cumulative counters are
/// maintained by the e-reader and may be NULL for never-opened books.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub pages: Option<i64>,
    pub total_read_time: Option<i64>,
    pub total_read_pages: Option<i64>,
}

impl Book {
    /// Page count as recorded on the book row, 0 when absent.
    pub fn page_count(&self) -> i64 {
        self.pages.unwrap_or(0)
    }
}

/// Slim projection for selection lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRef {
    pub id: i64,
    pub title: String,
    pub pages: Option<i64>,
}
