//! Chat history tool implementations

use super::{INVALID_ARGUMENT, ToolResult, automation_error_response, error_response, parse_chat_target};
use crate::constants::{DATE_FORMAT, DEFAULT_MESSAGE_LIMIT, UPDATED_AT_FORMAT};
use crate::requests::ChatHistoryRequest;
use chrono::{DateTime, Local, NaiveDate};
use line_mcp_automation::LineAutomation;
use line_mcp_protocol::{ChatHistory, ScrollPreset};
use serde_json::json;

/// Read the recent conversation of a chat, scrolling back as far as `preset` says
pub async fn get_chat_history(
    engine: &LineAutomation,
    req: ChatHistoryRequest,
    preset: ScrollPreset,
) -> ToolResult {
    let target = match parse_chat_target(&req.chat_name) {
        Ok(target) => target,
        Err(e) => return e,
    };
    let date = match resolve_date(req.date.as_deref(), Local::now().date_naive()) {
        Ok(date) => date,
        Err(e) => return e,
    };
    let message_limit = req.message_limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);

    match engine.get_chat_history(&target, preset.presses()).await {
        Ok(history) => history_response(&history, &date, message_limit, Local::now()),
        Err(e) => {
            tracing::error!("Failed to get chat history for {}: {}", target, e);
            automation_error_response(&e)
        }
    }
}

/// Validate the optional `date` argument, defaulting to `today`
pub fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<String, ToolResult> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(today.format(DATE_FORMAT).to_string()),
        Some(date) => NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .map_err(|_| {
                error_response(
                    INVALID_ARGUMENT,
                    format!("Invalid date '{}': expected YYYY-MM-DD", date),
                )
            }),
    }
}

pub fn history_response(
    history: &ChatHistory,
    date: &str,
    message_limit: u32,
    updated_at: DateTime<Local>,
) -> ToolResult {
    json!({
        "chatName": history.chat_name,
        "date": date,
        "messageLimit": message_limit,
        "history": history.text,
        "truncated": history.truncated,
        "degraded": history.degraded,
        "warnings": history.warnings,
        "chatRoomUpdatedAt": updated_at.format(UPDATED_AT_FORMAT).to_string()
    })
    .to_string()
}
