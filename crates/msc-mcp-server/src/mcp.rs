//! MCP service implementation with tool routing
//!
//! This module provides the msc-mcp MCP server with four tools:
//! device listing, device info, DroidCast installation and screenshot
//! capture. All device work is delegated to [`MscService`]; this layer only
//! turns typed results into MCP content.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, ErrorData as McpError, Implementation, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::mcp_content::{build_image_content, build_list_result, build_text_result};
use msc_core::{
    capture::MockBackendFactory,
    device::mock::MockRegistry,
    encode::PngFrameEncoder,
    error::MscError,
    model::CaptureMethod,
    service::MscService,
};

/// Parameters for tools addressing one device by serial
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DeviceParams {
    /// ADB serial of the device (e.g., "emulator-5554")
    pub device_id: String,
}

/// Parameters for the capture_screenshot tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CaptureScreenshotParams {
    /// ADB serial, or the MuMu instance index (e.g., "0") when method is
    /// "mumu"
    pub device_id: String,

    /// Capture method: "adb", "droidcast", "minicap" or "mumu"
    /// Default: "adb"
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    CaptureMethod::default().as_str().to_string()
}

fn log_failure(operation: &str, error: &MscError) {
    warn!("{} failed: {} (hint: {})", operation, error, error.remediation_hint());
}

/// Android screenshot MCP server
///
/// # Tools
///
/// - `list_devices`: Serials of attached devices
/// - `get_device_info`: Model, SDK level and manufacturer of one device
/// - `install_droidcast`: Install the DroidCast helper app
/// - `capture_screenshot`: Capture one screenshot as PNG
#[derive(Clone)]
pub struct MscMcpServer {
    /// Tool router for dispatching tool calls
    tool_router: ToolRouter<Self>,
    service: Arc<MscService>,
}

#[tool_router]
impl MscMcpServer {
    /// Creates a server over an existing service
    ///
    /// # Examples
    ///
    /// ```
    /// use msc_core::{config::BackendConfig, service::MscService};
    /// use msc_mcp_server::mcp::MscMcpServer;
    ///
    /// let service = MscService::from_config(BackendConfig::default());
    /// let server = MscMcpServer::new(service);
    /// ```
    pub fn new(service: MscService) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service: Arc::new(service),
        }
    }

    /// Creates a server over in-memory fakes with one attached emulator
    ///
    /// # Examples
    ///
    /// ```
    /// use msc_mcp_server::mcp::MscMcpServer;
    ///
    /// let server = MscMcpServer::new_with_mock();
    /// ```
    pub fn new_with_mock() -> Self {
        let registry =
            MockRegistry::new().with_phone("emulator-5554", "sdk_gphone64_x86_64", "34", "Google");
        Self::new(MscService::new(
            Arc::new(registry),
            Arc::new(MockBackendFactory::new()),
            Arc::new(PngFrameEncoder::default()),
        ))
    }

    /// Lists attached devices
    ///
    /// Returns a JSON array of serials in the order the ADB server reports
    /// them, also as structured content under `result`. A registry failure
    /// is not a tool error: the list then holds a single
    /// `"Error listing devices: ..."` string.
    ///
    /// # Examples
    ///
    /// Response:
    /// ```json
    /// {
    ///   "content": [{ "type": "text", "text": "[\"emulator-5554\"]" }],
    ///   "structuredContent": { "result": ["emulator-5554"] }
    /// }
    /// ```
    #[tool(description = "List all Android devices attached to the ADB server")]
    pub async fn list_devices(&self) -> Result<CallToolResult, McpError> {
        let devices = match self.service.list_devices().await {
            Ok(serials) => serials,
            Err(e) => {
                log_failure("list_devices", &e);
                vec![format!("Error listing devices: {}", e)]
            }
        };
        Ok(build_list_result(&devices))
    }

    /// Reports model, SDK level and manufacturer of a device
    ///
    /// Missing properties read `Unknown`. Failures come back as
    /// `"Error getting device info: ..."` text.
    #[tool(description = "Get model, SDK version and manufacturer of an Android device")]
    pub async fn get_device_info(
        &self,
        Parameters(params): Parameters<DeviceParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.service.device_info(&params.device_id).await {
            Ok(info) => info.to_string(),
            Err(e) => {
                log_failure("get_device_info", &e);
                format!("Error getting device info: {}", e)
            }
        };
        Ok(build_text_result(text))
    }

    /// Installs the DroidCast helper app needed by the `droidcast` method
    #[tool(description = "Install the DroidCast helper app on an Android device")]
    pub async fn install_droidcast(
        &self,
        Parameters(params): Parameters<DeviceParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.service.install_droidcast(&params.device_id).await {
            Ok(()) => "DroidCast installed successfully.".to_string(),
            Err(e) => {
                log_failure("install_droidcast", &e);
                format!("Error installing DroidCast: {}", e)
            }
        };
        Ok(build_text_result(text))
    }

    /// Captures one screenshot and returns it as a base64 PNG image
    ///
    /// Unlike the other tools, every failure here (unknown method, bad
    /// MuMu index, device or helper errors, encoding) is a tool error with
    /// the message `"Failed to capture screenshot: ..."`.
    #[tool(
        description = "Capture a screenshot from an Android device. Methods: adb (default), droidcast, minicap, mumu (device_id is the MuMu instance index). Returns a PNG image."
    )]
    pub async fn capture_screenshot(
        &self,
        Parameters(params): Parameters<CaptureScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let image = self
            .service
            .capture_screenshot(&params.device_id, &params.method)
            .await
            .map_err(|e| {
                log_failure("capture_screenshot", &e);
                McpError::internal_error(format!("Failed to capture screenshot: {}", e), None)
            })?;

        info!(
            "Captured {} screenshot from {} ({} bytes)",
            params.method,
            params.device_id,
            image.bytes.len()
        );
        Ok(CallToolResult::success(vec![build_image_content(
            &image.bytes,
            image.mime_type,
        )]))
    }
}

impl Default for MscMcpServer {
    fn default() -> Self {
        Self::new_with_mock()
    }
}

#[tool_handler]
impl ServerHandler for MscMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Android screenshot capture over ADB. Use list_devices to find device serials, \
                 then capture_screenshot. The droidcast method needs install_droidcast first."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msc_core::capture::mock::Phase;

    fn text_of(result: &CallToolResult) -> &str {
        &result.content[0].as_text().unwrap().text
    }

    #[test]
    fn test_default_method_is_adb() {
        let params: CaptureScreenshotParams =
            serde_json::from_str(r#"{"device_id":"emulator-5554"}"#).unwrap();
        assert_eq!(params.method, "adb");
    }

    #[test]
    fn test_params_schema_names() {
        let schema = serde_json::to_value(schemars::schema_for!(CaptureScreenshotParams)).unwrap();
        let props = schema["properties"].as_object().unwrap();

        assert!(props.contains_key("device_id"));
        assert!(props.contains_key("method"));
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = MscMcpServer::new_with_mock().get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("list_devices"));
    }

    #[tokio::test]
    async fn test_list_devices_with_mock() {
        let server = MscMcpServer::new_with_mock();
        let result = server.list_devices().await.unwrap();

        assert_eq!(text_of(&result), r#"["emulator-5554"]"#);
    }

    #[tokio::test]
    async fn test_install_droidcast_failure_is_text() {
        let service = MscService::new(
            Arc::new(MockRegistry::new()),
            Arc::new(MockBackendFactory::new().failing_at(Phase::Install)),
            Arc::new(PngFrameEncoder::default()),
        );
        let server = MscMcpServer::new(service);

        let result = server
            .install_droidcast(Parameters(DeviceParams {
                device_id: "emulator-5554".to_string(),
            }))
            .await
            .unwrap();

        assert!(!result.is_error.unwrap_or(false));
        assert!(text_of(&result).starts_with("Error installing DroidCast: "));
    }

    #[tokio::test]
    async fn test_capture_unknown_method_is_tool_error() {
        let server = MscMcpServer::new_with_mock();

        let err = server
            .capture_screenshot(Parameters(CaptureScreenshotParams {
                device_id: "emulator-5554".to_string(),
                method: "invalid".to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(err.message, "Failed to capture screenshot: Unknown capture method: invalid");
    }
}
