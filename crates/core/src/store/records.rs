//! Vehicle record reads and writes.
//!
//! Provides point lookups, upsert-with-touch, and the search history.

use super::connection::RecordStore;
use crate::{Error, VehicleRecord};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, TransactionBehavior, types::Type};

const SELECT_COLUMNS: &str = "SELECT vin, make, model, year_prod, engine, fuel, search_date FROM cars";

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for the VIN; a new one was written.
    Inserted,
    /// A row already existed; only its search timestamp changed.
    Touched,
}

/// Current time at the precision the store keeps.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 form, so lexical order matches chronological order.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<VehicleRecord> {
    let searched: String = row.get(6)?;
    let last_searched_at = DateTime::parse_from_rfc3339(&searched)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(VehicleRecord {
        vin: row.get(0)?,
        make: row.get(1)?,
        model: row.get(2)?,
        year_produced: row.get(3)?,
        engine_type: row.get(4)?,
        fuel_type: row.get(5)?,
        last_searched_at,
    })
}

impl RecordStore {
    /// Get a record by VIN.
    ///
    /// Returns None if the VIN has never been stored.
    pub async fn get(&self, vin: &str) -> Result<Option<VehicleRecord>, Error> {
        let vin = vin.to_string();
        self.conn
            .call(move |conn| -> Result<Option<VehicleRecord>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE vin = ?1"))?;

                match stmt.query_row(params![vin], row_to_record) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Store a record, stamping it with the current time.
    pub async fn upsert(&self, record: &VehicleRecord) -> Result<UpsertOutcome, Error> {
        self.upsert_at(record, timestamp_now()).await
    }

    /// Store a record, stamping it with `at`.
    ///
    /// Inserts every field when the VIN is new. When a row already exists only
    /// its `search_date` is updated; the stored descriptive fields are kept even
    /// if `record` carries different values. The existence check and the write
    /// run in one immediate transaction.
    pub async fn upsert_at(&self, record: &VehicleRecord, at: DateTime<Utc>) -> Result<UpsertOutcome, Error> {
        if record.vin.is_empty() {
            return Err(Error::InvalidInput("vin cannot be empty".into()));
        }

        let record = record.clone();
        let stamp = format_timestamp(&at);
        self.conn
            .call(move |conn| -> Result<UpsertOutcome, Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM cars WHERE vin = ?1)",
                    params![&record.vin],
                    |row| row.get(0),
                )?;

                let outcome = if exists {
                    tx.execute("UPDATE cars SET search_date = ?2 WHERE vin = ?1", params![&record.vin, &stamp])?;
                    UpsertOutcome::Touched
                } else {
                    tx.execute(
                        "INSERT INTO cars (vin, make, model, year_prod, engine, fuel, search_date)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![
                            &record.vin,
                            &record.make,
                            &record.model,
                            &record.year_produced,
                            &record.engine_type,
                            &record.fuel_type,
                            &stamp,
                        ],
                    )?;
                    UpsertOutcome::Inserted
                };

                tx.commit()?;
                Ok(outcome)
            })
            .await
            .map_err(Error::from)
    }

    /// Every stored record, most recently searched first.
    ///
    /// Each call re-queries the store.
    pub async fn list_all(&self) -> Result<Vec<VehicleRecord>, Error> {
        self.query_history(None).await
    }

    /// The `limit` most recently searched records.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<VehicleRecord>, Error> {
        self.query_history(Some(limit)).await
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cars", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    async fn query_history(&self, limit: Option<usize>) -> Result<Vec<VehicleRecord>, Error> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX)).unwrap_or(-1);
        self.conn
            .call(move |conn| -> Result<Vec<VehicleRecord>, Error> {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY search_date DESC, vin ASC LIMIT ?1"))?;
                let records = stmt
                    .query_map(params![limit], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_record(vin: &str, make: &str, model: &str) -> VehicleRecord {
        VehicleRecord {
            make: Some(make.to_string()),
            model: Some(model.to_string()),
            year_produced: Some("2020".to_string()),
            engine_type: Some("2.0 Diesel".to_string()),
            fuel_type: Some("Diesel".to_string()),
            ..VehicleRecord::new(vin, timestamp_now())
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let record = make_record("TEST1234567890XYZ", "BMW", "3 Series");

        let outcome = store.upsert_at(&record, record.last_searched_at).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let retrieved = store.get("TEST1234567890XYZ").await.unwrap().unwrap();
        assert_eq!(retrieved, record);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = RecordStore::open_in_memory().await.unwrap();
        assert!(store.get("NOSUCHVIN").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_fields_round_trip_as_null() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let record = VehicleRecord::new("PARTIAL1", timestamp_now());

        store.upsert(&record).await.unwrap();

        let retrieved = store.get("PARTIAL1").await.unwrap().unwrap();
        assert!(retrieved.make.is_none());
        assert!(retrieved.fuel_type.is_none());
    }

    #[tokio::test]
    async fn test_second_upsert_only_touches() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let first_seen = timestamp_now() - Duration::hours(1);
        let original = make_record("WBA123", "BMW", "3 Series");
        store.upsert_at(&original, first_seen).await.unwrap();

        let refetched = make_record("WBA123", "Audi", "A4");
        let later = first_seen + Duration::minutes(30);
        let outcome = store.upsert_at(&refetched, later).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Touched);

        let stored = store.get("WBA123").await.unwrap().unwrap();
        assert_eq!(stored.make.as_deref(), Some("BMW"));
        assert_eq!(stored.model.as_deref(), Some("3 Series"));
        assert_eq!(stored.year_produced, original.year_produced);
        assert_eq!(stored.engine_type, original.engine_type);
        assert_eq!(stored.fuel_type, original.fuel_type);
        assert_eq!(stored.last_searched_at, later);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_empty_vin() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let record = VehicleRecord::new("", timestamp_now());

        let result = store.upsert(&record).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_most_recent_first() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let base = timestamp_now() - Duration::days(1);

        for (i, vin) in ["FIRST", "SECOND", "THIRD"].iter().enumerate() {
            let record = make_record(vin, "Ford", "Focus");
            store.upsert_at(&record, base + Duration::seconds(i as i64)).await.unwrap();
        }

        let history = store.list_all().await.unwrap();
        let vins: Vec<&str> = history.iter().map(|r| r.vin.as_str()).collect();
        assert_eq!(vins, ["THIRD", "SECOND", "FIRST"]);
        assert!(history.windows(2).all(|w| w[0].last_searched_at > w[1].last_searched_at));
    }

    #[tokio::test]
    async fn test_touch_moves_record_to_front() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let base = timestamp_now() - Duration::days(1);

        store.upsert_at(&make_record("OLD", "Ford", "Focus"), base).await.unwrap();
        store
            .upsert_at(&make_record("NEW", "Dacia", "Logan"), base + Duration::seconds(10))
            .await
            .unwrap();
        store
            .upsert_at(&make_record("OLD", "Ford", "Focus"), base + Duration::seconds(20))
            .await
            .unwrap();

        let history = store.list_all().await.unwrap();
        assert_eq!(history[0].vin, "OLD");
        assert_eq!(history[1].vin, "NEW");
    }

    #[tokio::test]
    async fn test_list_recent_limit() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let base = timestamp_now() - Duration::days(1);

        for i in 0..5 {
            let record = make_record(&format!("VIN{i}"), "Ford", "Focus");
            store.upsert_at(&record, base + Duration::seconds(i)).await.unwrap();
        }

        let recent = store.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].vin, "VIN4");
        assert_eq!(recent[1].vin, "VIN3");

        assert_eq!(store.list_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let store = RecordStore::open_in_memory().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.sqlite");

        {
            let store = RecordStore::open(&path).await.unwrap();
            store.upsert(&make_record("PERSIST1", "Skoda", "Octavia")).await.unwrap();
        }

        let store = RecordStore::open(&path).await.unwrap();
        let record = store.get("PERSIST1").await.unwrap().unwrap();
        assert_eq!(record.make.as_deref(), Some("Skoda"));
    }

    #[test]
    fn test_format_timestamp_fixed_width() {
        let a = DateTime::parse_from_rfc3339("2025-01-20T00:00:00Z").unwrap().with_timezone(&Utc);
        let b = a + Duration::microseconds(1);
        assert_eq!(format_timestamp(&a), "2025-01-20T00:00:00.000000Z");
        assert!(format_timestamp(&a) < format_timestamp(&b));
    }
}
