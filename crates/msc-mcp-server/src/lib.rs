//! msc-mcp-server: MCP server for Android screenshot capture
//!
//! Thin protocol layer that wraps msc-core with MCP tool routing
//! and response formatting.

pub mod mcp;
pub mod mcp_content;
