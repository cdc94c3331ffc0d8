//! vin_history tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vinlookup_client::ResolutionService;
use vinlookup_core::{Error, VehicleRecord};

/// Parameters for the vin_history tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VinHistoryParams {
    /// Maximum number of records to return. All records when omitted.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output from the vin_history tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VinHistoryOutput {
    /// Records ordered by last search time, newest first.
    pub records: Vec<VehicleRecord>,
    pub count: usize,
}

pub async fn history_output(service: &ResolutionService, params: VinHistoryParams) -> Result<VinHistoryOutput, Error> {
    let records = match params.limit {
        Some(limit) => service.history_limited(limit).await?,
        None => service.history().await?,
    };
    Ok(VinHistoryOutput { count: records.len(), records })
}

/// Implementation of the vin_history tool.
pub async fn history_impl(service: &ResolutionService, params: VinHistoryParams) -> Result<CallToolResult, McpError> {
    let output = history_output(service, params).await?;
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize history: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
