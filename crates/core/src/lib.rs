//! Core types and shared functionality for vinlookup.
//!
//! This crate provides:
//! - The `VehicleRecord` model and the label table used to build it
//! - Record store implementation with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod record;
pub mod store;

pub use config::{AppConfig, ConfigError, TableMarkers};
pub use error::{Error, MissCause};
pub use record::{ExtractedFields, LabelMap, VehicleRecord};
pub use store::{RecordStore, UpsertOutcome};
