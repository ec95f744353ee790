//! MCP Server Test Harness
//!
//! Provides reusable fixtures for exercising the msc-mcp server against
//! in-memory registry and backend fakes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::{ContentValidator, McpTestContext};
//!
//! #[tokio::test]
//! async fn test_capture() {
//!     let ctx = McpTestContext::new_with_mock();
//!     let result = ctx.capture_screenshot("emulator-5554", "adb").await.unwrap();
//!     let png = ContentValidator::validate_base64_image(&result, "image/png").unwrap();
//!     assert!(png.starts_with(&[0x89, 0x50, 0x4e, 0x47]));
//! }
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use msc_core::{
    capture::MockBackendFactory, device::mock::MockRegistry, encode::PngFrameEncoder,
    service::MscService,
};
use msc_mcp_server::mcp::{CaptureScreenshotParams, DeviceParams, MscMcpServer};
use rmcp::{handler::server::wrapper::Parameters, model::CallToolResult};

/// Test fixture for MCP server integration tests
///
/// Wraps an `MscMcpServer` built over a [`MockRegistry`] and a
/// [`MockBackendFactory`], keeping a handle on the factory so tests can
/// inspect what the server asked it to build.
pub struct McpTestContext {
    /// The MCP server instance
    pub server: MscMcpServer,
    /// Backend factory used by the server
    pub factory: Arc<MockBackendFactory>,
}

impl McpTestContext {
    /// Context with two attached phones and always-succeeding backends
    pub fn new_with_mock() -> Self {
        let registry = MockRegistry::new()
            .with_phone("emulator-5554", "sdk_gphone64_x86_64", "34", "Google")
            .with_phone("R58M123", "SM-G973F", "31", "samsung");
        Self::new_with_configured_mock(registry, MockBackendFactory::new())
    }

    /// Context with an explicit registry and factory
    ///
    /// Use this to inject registry failures or backend errors.
    pub fn new_with_configured_mock(registry: MockRegistry, factory: MockBackendFactory) -> Self {
        let factory = Arc::new(factory);
        let service = MscService::new(
            Arc::new(registry),
            factory.clone(),
            Arc::new(PngFrameEncoder::default()),
        );
        Self {
            server: MscMcpServer::new(service),
            factory,
        }
    }

    // --- Tool invocation helpers ---

    /// Call list_devices tool
    pub async fn list_devices(&self) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.server.list_devices().await
    }

    /// Call get_device_info tool
    pub async fn get_device_info(
        &self,
        device_id: &str,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.server
            .get_device_info(Parameters(DeviceParams {
                device_id: device_id.to_string(),
            }))
            .await
    }

    /// Call install_droidcast tool
    pub async fn install_droidcast(
        &self,
        device_id: &str,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.server
            .install_droidcast(Parameters(DeviceParams {
                device_id: device_id.to_string(),
            }))
            .await
    }

    /// Call capture_screenshot tool
    pub async fn capture_screenshot(
        &self,
        device_id: &str,
        method: &str,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.server
            .capture_screenshot(Parameters(CaptureScreenshotParams {
                device_id: device_id.to_string(),
                method: method.to_string(),
            }))
            .await
    }
}

// ============================================================================
// Content Validators
// ============================================================================

/// Validation utilities for MCP tool responses
pub struct ContentValidator;

impl ContentValidator {
    /// Validate and decode the single base64 image of a capture result
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)` - decoded image bytes
    /// - `Err(String)` - description of what failed
    pub fn validate_base64_image(
        result: &CallToolResult,
        expected_mime: &str,
    ) -> Result<Vec<u8>, String> {
        if result.content.len() != 1 {
            return Err(format!("Expected 1 content item, got {}", result.content.len()));
        }

        let image = result.content[0]
            .as_image()
            .ok_or("First content is not an image")?;

        if image.mime_type != expected_mime {
            return Err(format!(
                "Expected MIME type '{}', got '{}'",
                expected_mime, image.mime_type
            ));
        }

        let bytes = STANDARD
            .decode(&image.data)
            .map_err(|e| format!("Invalid base64: {}", e))?;
        if bytes.is_empty() {
            return Err("Image data is empty".to_string());
        }
        Ok(bytes)
    }

    /// Extract the single text block of a result
    pub fn text(result: &CallToolResult) -> Result<String, String> {
        let text = result
            .content
            .first()
            .ok_or("Missing content")?
            .as_text()
            .ok_or("First content is not text")?;
        Ok(text.text.clone())
    }

    /// Parse the JSON string array returned by list_devices
    pub fn device_list(result: &CallToolResult) -> Result<Vec<String>, String> {
        let text = Self::text(result)?;
        serde_json::from_str(&text).map_err(|e| format!("Invalid device list JSON: {}", e))
    }
}
