//! Message sending tool implementations

use super::{ToolResult, automation_error_response, parse_chat_target};
use crate::requests::SendMessageRequest;
use chrono::{DateTime, SecondsFormat, Utc};
use line_mcp_automation::LineAutomation;
use line_mcp_protocol::ActionResult;
use serde_json::json;

/// Type `req.message` into a chat; `auto_send` presses Enter afterwards
pub async fn send_message(
    engine: &LineAutomation,
    req: SendMessageRequest,
    auto_send: bool,
) -> ToolResult {
    let target = match parse_chat_target(&req.chat_name) {
        Ok(target) => target,
        Err(e) => return e,
    };

    match engine
        .send_chat_message(&target, &req.message, auto_send)
        .await
    {
        Ok(result) => send_response(&result, target.as_str(), &req.message, Utc::now()),
        Err(e) => {
            tracing::error!("Cannot send to {}: {}", target, e);
            automation_error_response(&e)
        }
    }
}

pub fn send_response(
    result: &ActionResult,
    chat_name: &str,
    message: &str,
    at: DateTime<Utc>,
) -> ToolResult {
    json!({
        "success": result.success,
        "chatName": chat_name,
        "message": message,
        "timestamp": at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "error": result.error,
        "degraded": result.degraded,
        "warnings": result.warnings
    })
    .to_string()
}
