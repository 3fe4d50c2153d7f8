//! Basic tool implementations (ping, process check, activation)

use super::ToolResult;
use line_mcp_automation::LineAutomation;
use serde_json::json;

/// Ping the server to check if it's running
pub fn ping() -> String {
    "pong".to_string()
}

/// Report whether the LINE desktop app is running
pub async fn is_line_running(engine: &LineAutomation) -> ToolResult {
    let running = engine.is_line_running().await;
    json!({
        "running": running,
        "backend": engine.backend_name()
    })
    .to_string()
}

/// Bring LINE to the foreground
pub async fn activate_line(engine: &LineAutomation) -> ToolResult {
    serde_json::to_string(&engine.activate().await)
        .unwrap_or_else(|e| super::error_response("automation_error", e.to_string()))
}
