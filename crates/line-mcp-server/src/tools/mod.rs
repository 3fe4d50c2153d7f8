//! MCP tool implementations
//!
//! main.rs holds thin `#[tool]` wrappers that delegate to these functions.
//! Every tool returns a JSON string; failures use [`error_response`].

pub mod basic;
pub mod history;
pub mod message;

use line_mcp_automation::AutomationError;
use line_mcp_protocol::ChatTarget;
use serde_json::json;

/// Common result type for tool implementations
pub type ToolResult = String;

/// Error kind for arguments that fail validation
pub const INVALID_ARGUMENT: &str = "invalid_argument";

/// Helper to create an error JSON response
pub fn error_response(error_type: &str, message: impl Into<String>) -> ToolResult {
    json!({
        "error": error_type,
        "message": message.into()
    })
    .to_string()
}

/// Error response classified by the fault kind
pub fn automation_error_response(err: &AutomationError) -> ToolResult {
    error_response(err.kind().as_str(), err.to_string())
}

/// Helper to validate a chat name argument
pub fn parse_chat_target(name: &str) -> Result<ChatTarget, ToolResult> {
    ChatTarget::new(name).map_err(|e| error_response(INVALID_ARGUMENT, e.to_string()))
}
