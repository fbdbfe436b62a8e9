use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

pub(crate) mod helpers;
pub mod models;
mod repositories;

/// Handle on one statistics database file.
///
/// Scoped acquisition: `open` either yields a working connection or fails
/// with `Error::Connection`; the connection is released when the handle is
/// dropped, on every exit path. No pooling, no retry. Reads borrow the
/// handle shared, mutations require exclusive access, so a summary query
/// can never interleave with an in-flight write on the same handle.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open an existing database file. A missing, unreadable or corrupt
    /// file surfaces here, not on the first query.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|err| Error::Connection(err.to_string()))?;

        // SQLite opens lazily; probe the catalog so a non-database file
        // fails at open time.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|err| Error::Connection(err.to_string()))?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
