//! MCP tool request types
//!
//! This module contains all request types used by MCP tool handlers.

use rmcp::schemars;
use serde::Deserialize;

/// Request for the get_line_chatroom_history_* tools
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryRequest {
    #[schemars(description = "Chat room or contact name exactly as shown in LINE")]
    pub chat_name: String,
    #[schemars(description = "Date in YYYY-MM-DD format (optional, defaults to today)")]
    pub date: Option<String>,
    #[schemars(description = "Maximum number of messages to retrieve (default: 100)")]
    pub message_limit: Option<u32>,
}

/// Request for the send_message_* tools
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[schemars(description = "Chat room or contact name exactly as shown in LINE")]
    pub chat_name: String,
    #[schemars(
        description = "Message text. Line breaks are kept; '@name ' (with a trailing space) is typed as a mention"
    )]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_request_uses_camel_case() {
        let req: ChatHistoryRequest = serde_json::from_value(json!({
            "chatName": "家族",
            "date": "2024-05-01",
            "messageLimit": 20
        }))
        .unwrap();
        assert_eq!(req.chat_name, "家族");
        assert_eq!(req.date.as_deref(), Some("2024-05-01"));
        assert_eq!(req.message_limit, Some(20));
    }

    #[test]
    fn test_history_request_optional_fields() {
        let req: ChatHistoryRequest =
            serde_json::from_value(json!({ "chatName": "team" })).unwrap();
        assert!(req.date.is_none());
        assert!(req.message_limit.is_none());
    }

    #[test]
    fn test_send_request_requires_message() {
        // 事前条件違反: message が無い
        let result: Result<SendMessageRequest, _> =
            serde_json::from_value(json!({ "chatName": "team" }));
        assert!(result.is_err());
    }
}
