//! vin_manual_search tool implementation.
//!
//! Builds a service manual search link for a VIN. The VIN is resolved the
//! same way as vin_resolve; unresolvable VINs get the fallback link.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vinlookup_client::{ResolutionService, manual_search_url};
use vinlookup_core::Error;

/// Parameters for the vin_manual_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VinManualSearchParams {
    /// The vehicle identification number.
    pub vin: String,
}

/// Output from the vin_manual_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VinManualSearchOutput {
    pub vin: String,
    pub url: String,
    /// Whether a resolved record was used to build the query.
    pub from_record: bool,
}

pub async fn manual_search_output(
    service: &ResolutionService, params: VinManualSearchParams,
) -> Result<VinManualSearchOutput, Error> {
    let record = match service.resolve(&params.vin).await {
        Ok(record) => Some(record),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e),
    };

    let url = manual_search_url(record.as_ref());
    Ok(VinManualSearchOutput { vin: params.vin.trim().to_string(), url, from_record: record.is_some() })
}

/// Implementation of the vin_manual_search tool.
pub async fn manual_search_impl(
    service: &ResolutionService, params: VinManualSearchParams,
) -> Result<CallToolResult, McpError> {
    let output = manual_search_output(service, params).await?;
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize search link: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
