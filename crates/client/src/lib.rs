//! Client code for vinlookup.
//!
//! This crate provides the decoder page fetch, label/value extraction, the
//! local-first resolution pipeline, and related helpers shared by the server.

pub mod extract;
pub mod fetch;
pub mod manual;
pub mod resolve;

pub use extract::FieldExtractor;
pub use fetch::{FetchConfig, LookupSource, RawDocument, RemoteLookupClient};
pub use manual::{FALLBACK_SEARCH_URL, manual_search_url};
pub use resolve::ResolutionService;
