//! Maintenance utilities that mutate the statistics database: synthetic
//! reading-entry generation and duplicate-book merging. Each operation
//! commits fully or reports an error without leaving partial writes.

mod entries;
mod merge;

pub use entries::{create_reading_entries, EntryParams, EntryReport};
pub use merge::{merge_books, MergeReport};
