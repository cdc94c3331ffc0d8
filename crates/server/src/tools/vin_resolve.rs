//! vin_resolve tool implementation.
//!
//! Resolves a VIN through the local store, falling back to the decoder page.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vinlookup_client::ResolutionService;
use vinlookup_core::{Error, VehicleRecord};

/// Parameters for the vin_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VinResolveParams {
    /// The vehicle identification number to decode.
    pub vin: String,
}

/// Output from the vin_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VinResolveOutput {
    /// The decoded vehicle.
    pub record: VehicleRecord,
    /// Human-readable summary, with unreported fields shown as "unknown".
    pub summary: String,
}

pub async fn resolve_output(service: &ResolutionService, params: VinResolveParams) -> Result<VinResolveOutput, Error> {
    let record = service.resolve(&params.vin).await?;
    let summary = record.to_string();
    Ok(VinResolveOutput { record, summary })
}

/// Implementation of the vin_resolve tool.
pub async fn resolve_impl(service: &ResolutionService, params: VinResolveParams) -> Result<CallToolResult, McpError> {
    let output = resolve_output(service, params).await?;
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize record: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
