//! SQLite-backed store for decoded vehicle records.
//!
//! This module provides a persistent record store using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - One row per VIN, keyed by primary key
//! - Upsert-with-touch: repeat writes only refresh the search timestamp
//! - History reads ordered by most recent search
//! - Automatic schema migrations and WAL mode

pub mod connection;
pub mod migrations;
pub mod records;

pub use crate::Error;

pub use connection::RecordStore;
pub use records::{UpsertOutcome, format_timestamp, timestamp_now};
