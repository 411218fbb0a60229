//! Open and build the catalog database.

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::io::Read;
use std::path::Path;

use crate::engine::progress::{
    create_counter, flush_progress_remainder, refresh_bar, report_progress_batched,
};
use crate::utils::config::CATALOG_PROGRESS_BATCH;

use super::{CSV_COLUMNS, INSERT_SOUND_SQL, SCHEMA};

/// Open an existing catalog read-only. Each query source opens its own connection.
pub fn open_catalog(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("open catalog {}", path.display()))
}

/// Open an in-memory catalog with the schema applied (tests and previews of ad-hoc data).
pub fn open_catalog_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory catalog")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(conn)
}

/// Create the schema and load every csv record (header skipped) in one transaction.
/// Returns the number of records inserted.
pub fn init_catalog<R: Read>(conn: &mut Connection, csv_data: R, verbose: bool) -> Result<usize> {
    conn.execute_batch(SCHEMA).context("create schema")?;

    let bar = verbose.then(|| {
        let b = create_counter("Indexing", " records");
        refresh_bar(&b);
        b
    });

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data);

    let tx = conn.transaction().context("begin transaction")?;
    let mut count = 0_usize;
    {
        let mut stmt = tx.prepare(INSERT_SOUND_SQL).context("prepare insert")?;
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("read csv record {}", i + 1))?;
            if record.len() < CSV_COLUMNS {
                anyhow::bail!(
                    "csv record {} has {} fields, expected {}",
                    i + 1,
                    record.len(),
                    CSV_COLUMNS
                );
            }
            stmt.execute(rusqlite::params![
                &record[0], &record[1], &record[2], &record[3], &record[4], &record[5], &record[6],
            ])
            .context("insert sound")?;
            count += 1;
            report_progress_batched(bar.as_ref(), count, CATALOG_PROGRESS_BATCH);
        }
    }
    tx.commit().context("commit transaction")?;
    flush_progress_remainder(bar.as_ref(), count, CATALOG_PROGRESS_BATCH);

    Ok(count)
}

/// Number of sounds in the catalog.
pub fn catalog_size(conn: &Connection) -> Option<usize> {
    conn.query_row("SELECT COUNT(*) FROM sounds", [], |row| row.get::<_, i64>(0))
        .ok()
        .map(|n| n.max(0) as usize)
}
