//! Common type definitions for line-mcp
//!
//! This crate defines the data model shared between the automation engine
//! and the MCP server: chat targets, screen geometry, key chords, message
//! chunks and the structured results returned across the public boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of characters returned by a history extraction
pub const MAX_HISTORY_CHARS: usize = 50_000;

/// Validation errors for values crossing the public boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Chat name must not be empty")]
    EmptyChatName,
    #[error("Message must not be empty")]
    EmptyMessage,
}

/// A conversation identified by its display name.
///
/// Resolution happens by matching UI text, so two chats with the same
/// display name are indistinguishable; the engine always picks the first
/// search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTarget(String);

impl ChatTarget {
    /// Create a chat target, rejecting blank names
    pub fn new(name: impl Into<String>) -> Result<Self, ProtocolError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProtocolError::EmptyChatName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift the point by a pixel offset
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle (integer division, rounding toward the origin)
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Named regions of the target application's window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UiRegion {
    /// Chat search box in the chat list
    SearchField,
    /// First search result below the search field
    ResultRow,
    /// Scrollable list of messages in the open chat
    MessageList,
    /// Selectable message area used as the copy target
    MessagePane,
    /// Message composer
    InputBox,
    /// Autocomplete popup shown while typing a mention
    MentionPopup,
}

impl UiRegion {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SearchField => "searchField",
            Self::ResultRow => "resultRow",
            Self::MessageList => "messageList",
            Self::MessagePane => "messagePane",
            Self::InputBox => "inputBox",
            Self::MentionPopup => "mentionPopup",
        }
    }
}

impl fmt::Display for UiRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// The platform's shortcut modifier: Command on macOS, Control on Windows
    Primary,
    Command,
    Control,
    Shift,
}

/// Non-modifier keys used by the automation sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    End,
    PageUp,
}

/// A key pressed together with zero or more modifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

impl KeyChord {
    /// A bare key with no modifiers
    pub fn key(key: Key) -> Self {
        Self {
            modifiers: Vec::new(),
            key,
        }
    }

    /// A character with the platform shortcut modifier (e.g. Cmd+V / Ctrl+V)
    pub fn primary(c: char) -> Self {
        Self {
            modifiers: vec![Modifier::Primary],
            key: Key::Char(c),
        }
    }

    /// Add a modifier to the chord
    pub fn with(mut self, modifier: Modifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn select_all() -> Self {
        Self::primary('a')
    }

    pub fn copy() -> Self {
        Self::primary('c')
    }

    pub fn paste() -> Self {
        Self::primary('v')
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{:?}+", m)?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c),
            other => write!(f, "{:?}", other),
        }
    }
}

/// One typed piece of an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text")]
pub enum MessageChunk {
    /// Text pasted as-is
    PlainText(String),
    /// A `@name` token followed by the whitespace character that ended it
    Mention { name: String, trailing: char },
}

impl MessageChunk {
    pub fn mention(name: impl Into<String>, trailing: char) -> Self {
        Self::Mention {
            name: name.into(),
            trailing,
        }
    }

    /// The original source text covered by this chunk
    pub fn source_text(&self) -> String {
        match self {
            Self::PlainText(text) => text.clone(),
            Self::Mention { name, trailing } => format!("{name}{trailing}"),
        }
    }
}

/// Structured outcome of an orchestrator operation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<String>,
    /// Set when a best-effort step failed but the operation carried on
    pub degraded: bool,
    pub warnings: Vec<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Attach warnings collected from best-effort steps
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.degraded = self.degraded || !warnings.is_empty();
        self.warnings.extend(warnings);
        self
    }
}

/// Conversation text extracted from a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub chat_name: String,
    pub text: String,
    /// True when older text was dropped to stay within [`MAX_HISTORY_CHARS`]
    pub truncated: bool,
    pub degraded: bool,
    pub warnings: Vec<String>,
}

/// How far back to scroll before copying a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollPreset {
    Short,
    #[default]
    Default,
    Long,
}

impl ScrollPreset {
    /// Number of page-up presses issued for this preset
    pub const fn presses(&self) -> u32 {
        match self {
            Self::Short => 5,
            Self::Default => 10,
            Self::Long => 50,
        }
    }
}
