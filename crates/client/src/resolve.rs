//! Local-first VIN resolution.
//!
//! `ResolutionService::resolve` checks the record store first and only goes
//! to the decoder page on a miss:
//!
//! 1. Store hit: return the stored record. No network call, no write.
//! 2. Store miss (or unreadable store): fetch the page once, no retry.
//! 3. Extract the label/value table and map it through the `LabelMap`.
//! 4. Persist with upsert-with-touch and return the new record.
//!
//! Every failure after input validation is reported as `Error::NotFound`;
//! the `MissCause` it carries says which step failed.

use std::sync::Arc;

use vinlookup_core::store::timestamp_now;
use vinlookup_core::{AppConfig, Error, LabelMap, MissCause, RecordStore, VehicleRecord};

use crate::extract::FieldExtractor;
use crate::fetch::{FetchConfig, LookupSource, RemoteLookupClient};

/// Resolves VINs against the record store and the decoder page.
#[derive(Clone)]
pub struct ResolutionService {
    store: RecordStore,
    source: Arc<dyn LookupSource>,
    extractor: FieldExtractor,
    labels: LabelMap,
}

impl ResolutionService {
    pub fn new(store: RecordStore, source: Arc<dyn LookupSource>, extractor: FieldExtractor, labels: LabelMap) -> Self {
        Self { store, source, extractor, labels }
    }

    /// Build the production service: file-backed store and HTTP lookup client.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let store = RecordStore::open(&config.db_path).await?;
        let client = RemoteLookupClient::new(FetchConfig::from(config))?;
        let extractor = FieldExtractor::new(&config.markers)?;

        Ok(Self::new(store, Arc::new(client), extractor, config.labels.clone()))
    }

    /// The underlying record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Resolve a VIN to a vehicle record.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` if the VIN is empty.
    /// - `Error::NotFound` for every other failure: unreachable page, non-200
    ///   response, missing or empty data table.
    pub async fn resolve(&self, vin: &str) -> Result<VehicleRecord, Error> {
        let vin = vin.trim();
        if vin.is_empty() {
            return Err(Error::InvalidInput("vin cannot be empty".into()));
        }

        match self.store.get(vin).await {
            Ok(Some(record)) => {
                tracing::debug!(vin, "cache hit");
                return Ok(record);
            }
            Ok(None) => tracing::debug!(vin, "cache miss"),
            Err(e) => tracing::warn!(vin, error = %e, "record store read failed; falling back to remote lookup"),
        }

        let record = self.fetch_record(vin).await?;

        match self.store.upsert_at(&record, record.last_searched_at).await {
            Ok(outcome) => tracing::info!(vin, ?outcome, make = ?record.make, "stored vehicle record"),
            Err(e) => tracing::warn!(vin, error = %e, "failed to persist vehicle record"),
        }

        Ok(record)
    }

    /// Stored records, most recently searched first.
    pub async fn history(&self) -> Result<Vec<VehicleRecord>, Error> {
        self.store.list_all().await
    }

    /// At most `limit` stored records, most recently searched first.
    pub async fn history_limited(&self, limit: usize) -> Result<Vec<VehicleRecord>, Error> {
        self.store.list_recent(limit).await
    }

    async fn fetch_record(&self, vin: &str) -> Result<VehicleRecord, Error> {
        let document = self.source.fetch(vin).await.map_err(|e| {
            tracing::warn!(vin, error = %e, cause = %MissCause::Transport, "remote lookup failed");
            Error::not_found(vin, MissCause::Transport)
        })?;

        let Some(fields) = self.extractor.parse_table(&document.body) else {
            tracing::warn!(vin, url = %document.url, cause = %MissCause::ExtractionMiss, "no data table in page");
            return Err(Error::not_found(vin, MissCause::ExtractionMiss));
        };

        if fields.is_empty() {
            tracing::warn!(vin, url = %document.url, cause = %MissCause::ExtractionMiss, "data table has no label/value rows");
            return Err(Error::not_found(vin, MissCause::ExtractionMiss));
        }

        tracing::debug!(vin, rows = fields.len(), fetch_ms = document.fetch_ms, "extracted decoder fields");

        Ok(self.labels.build_record(vin, &fields, timestamp_now()))
    }
}
