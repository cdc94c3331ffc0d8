//! MCP tool implementations.
//!
//! This module contains all tools exposed by the vin-mcp server.

pub mod vin_history;
pub mod vin_manual_search;
pub mod vin_resolve;
