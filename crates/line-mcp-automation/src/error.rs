//! Error types for the automation engine
//!
//! Every fault below the orchestrator boundary is an [`AutomationError`].
//! [`FaultKind`] groups them the way callers need to react: fix the chat
//! name, retry later, or install missing tooling.

use line_mcp_protocol::UiRegion;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The named chat or UI element could not be resolved
    Resolution,
    /// A primitive ran but failed or produced unusable output
    Automation,
    /// Required OS tooling is missing or the platform is unsupported
    Environment,
    /// An expected copy produced no clipboard content
    Content,
}

impl FaultKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resolution => "chat_not_found",
            Self::Automation => "automation_error",
            Self::Environment => "environment_error",
            Self::Content => "content_error",
        }
    }
}

/// Errors that can occur while driving the target application
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The search did not yield a chat to open
    #[error("Chat \"{name}\" not found")]
    ChatNotFound { name: String },

    /// A UI region could not be located
    #[error("UI element '{region}' not found: {detail}")]
    ElementNotFound { region: UiRegion, detail: String },

    /// The scripting host ran the script but reported a failure
    #[error("{tool} script failed{}: {message}", exit_suffix(.code))]
    ScriptFailed {
        tool: &'static str,
        message: String,
        code: Option<i32>,
    },

    /// The scripting host did not finish in time
    #[error("{tool} did not finish within {}s", .timeout.as_secs())]
    ScriptTimeout {
        tool: &'static str,
        timeout: Duration,
    },

    /// The scripting host produced output we could not interpret
    #[error("Unexpected {tool} output: {output}")]
    UnexpectedOutput { tool: &'static str, output: String },

    /// A helper program is not installed or not on PATH
    #[error("{tool} is not installed or not in PATH. {hint}")]
    ToolMissing { tool: String, hint: String },

    /// The process could not be spawned for another reason
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// No backend exists for this operating system
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Copy produced no clipboard content
    #[error("Clipboard is empty after copy")]
    EmptyClipboard,

    /// Filesystem error (temp scripts, setup marker)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit code {})", c))
        .unwrap_or_default()
}

impl AutomationError {
    /// Create a ChatNotFound error
    pub fn chat_not_found(name: impl Into<String>) -> Self {
        Self::ChatNotFound { name: name.into() }
    }

    /// Create an ElementNotFound error
    pub fn element_not_found(region: UiRegion, detail: impl Into<String>) -> Self {
        Self::ElementNotFound {
            region,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            Self::ChatNotFound { .. } | Self::ElementNotFound { .. } => FaultKind::Resolution,
            Self::ScriptFailed { .. }
            | Self::ScriptTimeout { .. }
            | Self::UnexpectedOutput { .. }
            | Self::Io(_) => FaultKind::Automation,
            Self::ToolMissing { .. } | Self::Spawn { .. } | Self::UnsupportedPlatform(_) => {
                FaultKind::Environment
            }
            Self::EmptyClipboard => FaultKind::Content,
        }
    }

    /// True when a locator query found no matching element
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_not_found_message() {
        let err = AutomationError::chat_not_found("家族");
        assert_eq!(err.to_string(), "Chat \"家族\" not found");
        assert_eq!(err.kind(), FaultKind::Resolution);
    }

    #[test]
    fn test_script_failed_message_includes_exit_code() {
        let err = AutomationError::ScriptFailed {
            tool: "osascript",
            message: "execution error".into(),
            code: Some(1),
        };
        assert_eq!(
            err.to_string(),
            "osascript script failed (exit code 1): execution error"
        );

        let err = AutomationError::ScriptFailed {
            tool: "AutoHotkey",
            message: "killed".into(),
            code: None,
        };
        assert_eq!(err.to_string(), "AutoHotkey script failed: killed");
    }

    #[test]
    fn test_element_not_found_is_resolution_fault() {
        let err = AutomationError::element_not_found(UiRegion::ResultRow, "row 2 missing");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("resultRow"));
        assert_eq!(err.kind(), FaultKind::Resolution);
    }

    #[test]
    fn test_fault_classification() {
        let spawn = AutomationError::Spawn {
            program: "osascript".into(),
            source: std::io::Error::other("denied"),
        };
        assert_eq!(spawn.kind(), FaultKind::Environment);
        assert_eq!(AutomationError::EmptyClipboard.kind(), FaultKind::Content);
        assert_eq!(
            AutomationError::ScriptTimeout {
                tool: "osascript",
                timeout: Duration::from_secs(30),
            }
            .kind(),
            FaultKind::Automation
        );
        // 事後条件: kind の文字列は MCP 側のエラー種別として使われる
        assert_eq!(FaultKind::Resolution.as_str(), "chat_not_found");
        assert_eq!(FaultKind::Environment.as_str(), "environment_error");
    }
}
