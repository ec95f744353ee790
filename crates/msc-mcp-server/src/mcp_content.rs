//! MCP content builders for tool results
//!
//! Every tool answers with exactly one content item: an inline image for
//! `capture_screenshot`, plain text for the others.
//!
//! # Examples
//!
//! ```
//! use msc_mcp_server::mcp_content::build_json_text;
//!
//! let result = build_json_text(&["emulator-5554"]);
//! assert!(!result.is_error.unwrap_or(false));
//! assert_eq!(result.content.len(), 1);
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Builds MCP image content from encoded image bytes
///
/// The bytes are base64-encoded (standard alphabet, padded) into an
/// `image` content item carrying `mime_type`.
///
/// # Examples
///
/// ```
/// use msc_mcp_server::mcp_content::build_image_content;
///
/// let png_data = vec![137, 80, 78, 71, 13, 10, 26, 10];
/// let content = build_image_content(&png_data, "image/png");
///
/// let image = content.as_image().unwrap();
/// assert_eq!(image.mime_type, "image/png");
/// assert_eq!(image.data, "iVBORw0KGgo=");
/// ```
pub fn build_image_content(data: &[u8], mime_type: &str) -> Content {
    Content::image(STANDARD.encode(data), mime_type)
}

/// Wraps a single text block in a successful tool result
pub fn build_text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Serializes `value` as JSON text in a successful tool result
///
/// Serialization of the plain values used here cannot fail; if it ever
/// does, the error text is returned in place of the JSON.
pub fn build_json_text<T: Serialize + ?Sized>(value: &T) -> CallToolResult {
    let text = serde_json::to_string(value)
        .unwrap_or_else(|e| format!("Failed to serialize result: {}", e));
    build_text_result(text)
}

/// JSON array text plus the same items as structured content
///
/// The structured form is an object with the list under `result`, since MCP
/// requires structured content to be a JSON object.
pub fn build_list_result<T: Serialize>(items: &[T]) -> CallToolResult {
    let mut result = build_json_text(items);
    result.structured_content = serde_json::to_value(items)
        .ok()
        .map(|list| serde_json::json!({ "result": list }));
    result
}
