//! Reading-activity statistics over a KOReader `statistics.sqlite3` file.
//!
//! Two flows share one connector: the summary flow runs read-only
//! aggregate queries and derives chart-ready datasets; the utilities flow
//! mutates the database with synthetic reading entries or a book merge.
//! Everything the crate returns is serializable so a hosting web UI can
//! render it directly.
//!
//! ```no_run
//! use readstats::{config::SummaryConfig, db::Database, summary};
//!
//! # fn main() -> readstats::error::Result<()> {
//! let config = SummaryConfig::default();
//! let db = Database::open("statistics.sqlite3")?;
//! let report = summary::generate_summary(&db, &config);
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod summary;
pub mod utilities;
pub mod utils;

pub use config::{ExclusionFilter, SummaryConfig, TimePolicy};
pub use db::Database;
pub use error::{Error, Result};
pub use utils::logging::init_logging;
