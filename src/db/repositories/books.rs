use rusqlite::{params, params_from_iter, OptionalExtension};

use crate::config::ExclusionFilter;
use crate::db::{
    models::{Book, BookRef},
    Database,
};
use crate::error::{Error, Result};

impl Database {
    /// Non-excluded books ordered by title, for selection lists.
    pub fn list_books(&self, exclusions: &ExclusionFilter) -> Result<Vec<BookRef>> {
        let (predicate, values) = exclusions.sql_predicate("b.id", "b.title");
        let sql = format!(
            "SELECT b.id, b.title, b.pages
             FROM book b
             WHERE {predicate}
             ORDER BY b.title"
        );

        let mut stmt = self.conn().prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;

        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(BookRef {
                id: row.get(0)?,
                title: row.get(1)?,
                pages: row.get(2)?,
            });
        }

        Ok(books)
    }

    /// Fetch one book row or fail with `Error::NotFound`.
    pub fn get_book(&self, id: i64) -> Result<Book> {
        let book = self
            .conn()
            .query_row(
                "SELECT id, title, pages, total_read_time, total_read_pages
                 FROM book
                 WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Book {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        pages: row.get(2)?,
                        total_read_time: row.get(3)?,
                        total_read_pages: row.get(4)?,
                    })
                },
            )
            .optional()?;

        book.ok_or(Error::NotFound(id))
    }

    /// Repoint every reading-session row from `source_id` to `target_id`,
    /// fold source's cumulative counters into target, then delete the
    /// source row. All three steps happen in one transaction; a failure at
    /// any point leaves the database untouched. Returns the number of
    /// repointed rows.
    pub(crate) fn merge_book_rows(&mut self, source_id: i64, target_id: i64) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;

        for id in [source_id, target_id] {
            let exists: Option<i64> = tx
                .query_row("SELECT 1 FROM book WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()?;
            if exists.is_none() {
                return Err(Error::NotFound(id));
            }
        }

        let moved = tx.execute(
            "UPDATE page_stat_data SET id_book = ?1 WHERE id_book = ?2",
            params![target_id, source_id],
        )?;

        tx.execute(
            "UPDATE book
             SET total_read_time = COALESCE(total_read_time, 0) +
                                   (SELECT COALESCE(total_read_time, 0) FROM book WHERE id = ?1),
                 total_read_pages = COALESCE(total_read_pages, 0) +
                                    (SELECT COALESCE(total_read_pages, 0) FROM book WHERE id = ?1)
             WHERE id = ?2",
            params![source_id, target_id],
        )?;

        tx.execute("DELETE FROM book WHERE id = ?1", params![source_id])?;

        tx.commit()?;
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ExclusionFilter;
    use crate::db::test_support::{insert_book, open_empty};
    use crate::error::Error;

    #[test]
    fn list_books_orders_by_title_and_filters_sentinels() {
        let fixture = open_empty();
        insert_book(&fixture.db, 1, "Zebra Crossing", Some(200), None, None);
        insert_book(&fixture.db, 2, "Aardvark Nights", Some(150), None, None);
        insert_book(&fixture.db, 10, "KOReader Quickstart Guide", Some(5), None, None);

        let books = fixture.db.list_books(&ExclusionFilter::default()).unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Aardvark Nights", "Zebra Crossing"]);
    }

    #[test]
    fn get_book_reports_not_found() {
        let fixture = open_empty();
        let err = fixture.db.get_book(42).unwrap_err();
        assert!(matches!(err, Error::NotFound(42)));
    }

    #[test]
    fn merge_rolls_back_when_target_is_missing() {
        let mut fixture = open_empty();
        insert_book(&fixture.db, 1, "Lonely Book", Some(100), Some(600), Some(10));

        let err = fixture.db.merge_book_rows(1, 99).unwrap_err();
        assert!(matches!(err, Error::NotFound(99)));

        // Source must survive the failed merge.
        let book = fixture.db.get_book(1).unwrap();
        assert_eq!(book.total_read_time, Some(600));
    }
}
