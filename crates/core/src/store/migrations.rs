//! Schema bootstrap for the `cars` table.
//!
//! Applied versions are recorded in `_migrations`. Opening an existing file
//! only runs versions newer than the highest recorded one, so a store created
//! by an older build picks up later schema changes on its next open.

use super::Error;
use super::records::{format_timestamp, timestamp_now};
use tokio_rusqlite::{Connection, params};

/// Schema versions in apply order.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_cars.sql"))];

/// Bring the schema up to the latest version.
///
/// Each pending version runs in its own transaction together with its
/// `_migrations` row, so a failed script leaves no partial schema behind.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
            tracing::debug!(version, "applying schema migration");

            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
            tx.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, format_timestamp(&timestamp_now())],
            )?;
            tx.commit()?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
