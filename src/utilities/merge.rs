use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::log_info;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub source_id: i64,
    pub target_id: i64,
    /// Reading-session rows repointed from source to target.
    pub moved_entries: usize,
}

/// Merge a duplicate book record into its canonical one: repoint every
/// reading-session row, fold the cumulative counters into the target, and
/// delete the source row. The three steps run in one transaction.
pub fn merge_books(db: &mut Database, source_id: i64, target_id: i64) -> Result<MergeReport> {
    if source_id == target_id {
        return Err(Error::validation(
            "source and target book ids must be different",
        ));
    }

    let moved_entries = db.merge_book_rows(source_id, target_id)?;
    log_info!("merged book {source_id} into {target_id}, repointed {moved_entries} entries");

    Ok(MergeReport {
        source_id,
        target_id,
        moved_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{epoch_utc, insert_book, insert_stat, open_empty};

    #[test]
    fn merge_moves_rows_sums_counters_and_deletes_source() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Duplicate Copy", Some(200), Some(1200), Some(40));
        insert_book(&fixture.db, 2, "Canonical Copy", Some(200), Some(1800), Some(60));
        for page in 1..=3i64 {
            insert_stat(
                &fixture.db,
                1,
                page,
                epoch_utc(2024, 4, 1, 19, 30) + page * 60,
                60,
                200,
            );
        }

        let report = merge_books(&mut fixture.db, 1, 2).unwrap();
        assert_eq!(report.moved_entries, 3);

        // Source is gone.
        assert!(matches!(
            fixture.db.get_book(1),
            Err(Error::NotFound(1))
        ));

        // Target carries the pre-merge sum of both counters.
        let target = fixture.db.get_book(2).unwrap();
        assert_eq!(target.total_read_time, Some(3000));
        assert_eq!(target.total_read_pages, Some(100));

        // All session rows now reference the target.
        let orphaned: i64 = fixture
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM page_stat_data WHERE id_book = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphaned, 0);
        let moved: i64 = fixture
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM page_stat_data WHERE id_book = 2",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(moved, 3);
    }

    #[test]
    fn merge_treats_null_counters_as_zero() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Fresh Duplicate", Some(120), None, None);
        insert_book(&fixture.db, 2, "Canonical", Some(120), Some(600), Some(20));

        merge_books(&mut fixture.db, 1, 2).unwrap();
        let target = fixture.db.get_book(2).unwrap();
        assert_eq!(target.total_read_time, Some(600));
        assert_eq!(target.total_read_pages, Some(20));
    }

    #[test]
    fn merging_a_book_into_itself_is_rejected() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Self", Some(100), Some(60), Some(2));

        let err = merge_books(&mut fixture.db, 1, 1).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Nothing changed.
        let book = fixture.db.get_book(1).unwrap();
        assert_eq!(book.total_read_time, Some(60));
    }

    #[test]
    fn merge_with_missing_source_reports_not_found() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 2, "Only Target", Some(100), None, None);
        let err = merge_books(&mut fixture.db, 9, 2).unwrap_err();
        assert!(matches!(err, Error::NotFound(9)));
    }
}
