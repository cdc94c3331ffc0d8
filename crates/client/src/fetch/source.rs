//! The seam between resolution and the remote decoder page.

use async_trait::async_trait;
use vinlookup_core::Error;

/// Raw response body from a decoder page.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// The URL that was requested
    pub url: String,
    /// Response body decoded as UTF-8 (lossy)
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Something that can fetch the decoder page for a VIN.
///
/// `RemoteLookupClient` is the production implementation; tests substitute
/// their own.
#[async_trait]
pub trait LookupSource: Send + Sync {
    /// Fetch the page for `vin`. Any failure is final for this call.
    async fn fetch(&self, vin: &str) -> Result<RawDocument, Error>;
}
