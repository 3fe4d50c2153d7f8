//! Action primitive backends
//!
//! A [`Backend`] performs single UI actions against the LINE desktop app:
//! click a point, press a key chord, read or write the clipboard, locate a
//! region. The orchestrator only talks to this trait; the platform-specific
//! differences in *sequencing* (extra shortcuts, confirmation keys, settle
//! times) are described by the backend's [`Profile`].
//!
//! Every primitive acts on OS-global state (the real clipboard and input
//! focus), so no two automation sessions may run at the same time.

pub mod macos;
pub mod script;
pub mod windows;

#[cfg(target_os = "windows")]
mod uia;

use crate::constants::*;
use crate::error::AutomationError;
use async_trait::async_trait;
use line_mcp_protocol::{Key, KeyChord, Modifier, Point, UiRegion};
use std::sync::Arc;
use std::time::Duration;

pub use macos::MacOsBackend;
pub use windows::WindowsBackend;

/// Calibrated settle delay classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// After a single click or keystroke
    Short,
    /// After a UI transition (search filter, popup)
    Medium,
    /// After content loads (opening a chat)
    Long,
}

/// Concrete durations for each settle class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub short: Duration,
    pub medium: Duration,
    pub long: Duration,
    /// Interval between clipboard reads while waiting for a copy
    pub clipboard_poll: Duration,
}

impl Timings {
    pub const fn from_millis(short: u64, medium: u64, long: u64) -> Self {
        Self {
            short: Duration::from_millis(short),
            medium: Duration::from_millis(medium),
            long: Duration::from_millis(long),
            clipboard_poll: Duration::from_millis(CLIPBOARD_POLL_INTERVAL_MS),
        }
    }

    pub const fn duration(&self, settle: Settle) -> Duration {
        match settle {
            Settle::Short => self.short,
            Settle::Medium => self.medium,
            Settle::Long => self.long,
        }
    }
}

/// How a mention is confirmed once LINE's autocomplete popup is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionConfirm {
    /// Click the first entry of the popup
    ClickPopup,
    /// Press the soft-newline chord, which accepts the entry without a line break
    SoftNewline,
}

/// Platform-specific shape of the automation sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub timings: Timings,
    /// Shortcut that focuses the search box after the search region is clicked
    pub search_shortcut: Option<KeyChord>,
    /// Press Enter after pasting the chat name
    pub submit_search: bool,
    /// Clicks on the result row (a second click survives a slow list refresh)
    pub result_row_clicks: u32,
    /// Wait after opening a chat
    pub chat_load: Settle,
    /// Clicks used to focus the message list
    pub scroll_focus_clicks: u32,
    /// Wait between the focus clicks
    pub scroll_focus_settle: Settle,
    /// Keys pressed after focusing the list and before paging
    pub scroll_prelude: Vec<KeyChord>,
    /// Key pressed once per scroll step
    pub scroll_key: KeyChord,
    /// Click [`UiRegion::MessagePane`] before select-all
    pub focus_pane_before_copy: bool,
    /// Wait after each paste
    pub paste_settle: Settle,
    /// Chord inserting a line break in the composer without sending
    pub newline: KeyChord,
    pub mention_confirm: MentionConfirm,
}

impl Profile {
    pub fn macos() -> Self {
        Self {
            timings: Timings::from_millis(
                MACOS_DELAY_SHORT_MS,
                MACOS_DELAY_MEDIUM_MS,
                MACOS_DELAY_LONG_MS,
            ),
            search_shortcut: None,
            submit_search: false,
            result_row_clicks: 2,
            chat_load: Settle::Long,
            scroll_focus_clicks: 2,
            scroll_focus_settle: Settle::Long,
            scroll_prelude: Vec::new(),
            scroll_key: KeyChord::key(Key::PageUp),
            focus_pane_before_copy: false,
            paste_settle: Settle::Medium,
            newline: KeyChord::key(Key::Enter).with(Modifier::Shift),
            mention_confirm: MentionConfirm::ClickPopup,
        }
    }

    pub fn windows() -> Self {
        Self {
            timings: Timings::from_millis(
                WINDOWS_DELAY_SHORT_MS,
                WINDOWS_DELAY_MEDIUM_MS,
                WINDOWS_DELAY_LONG_MS,
            ),
            search_shortcut: Some(KeyChord::primary('f').with(Modifier::Shift)),
            submit_search: true,
            result_row_clicks: 1,
            chat_load: Settle::Medium,
            scroll_focus_clicks: 1,
            scroll_focus_settle: Settle::Short,
            scroll_prelude: vec![KeyChord::key(Key::Tab), KeyChord::key(Key::End)],
            scroll_key: KeyChord::key(Key::PageUp),
            focus_pane_before_copy: true,
            paste_settle: Settle::Short,
            newline: KeyChord::key(Key::Enter).with(Modifier::Shift),
            mention_confirm: MentionConfirm::SoftNewline,
        }
    }
}

/// Result of the best-effort input method switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMethodSwitch {
    Switched,
    /// The backend cannot switch reliably; the reason is reported as a warning
    Unsupported(String),
}

/// One set of UI action primitives for a host operating system
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    fn profile(&self) -> &Profile;

    /// Run one program in the platform scripting host and return its stdout
    async fn run_script(&self, script: &str) -> Result<String, AutomationError>;

    async fn is_running(&self) -> Result<bool, AutomationError>;

    /// Bring LINE to the foreground
    async fn activate(&self) -> Result<(), AutomationError>;

    /// Switch the keyboard input method to English
    async fn switch_input_method(&self) -> Result<InputMethodSwitch, AutomationError>;

    /// Click point of a region, computed fresh on every call
    async fn locate(&self, region: UiRegion) -> Result<Point, AutomationError>;

    async fn click(&self, point: Point) -> Result<(), AutomationError>;

    /// Press a chord in the focused application
    async fn send_keys(&self, chord: &KeyChord) -> Result<(), AutomationError>;

    async fn set_clipboard(&self, text: &str) -> Result<(), AutomationError>;

    async fn get_clipboard(&self) -> Result<String, AutomationError>;

    /// Sleep for a settle class
    async fn wait(&self, settle: Settle) {
        let duration = self.profile().timings.duration(settle);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Pick the backend for an operating system name as reported by
/// [`std::env::consts::OS`]
pub fn select_backend(
    os: &str,
    script_timeout: Duration,
) -> Result<Arc<dyn Backend>, AutomationError> {
    match os {
        "macos" => Ok(Arc::new(MacOsBackend::new(script_timeout))),
        "windows" => Ok(Arc::new(WindowsBackend::new(script_timeout))),
        other => Err(AutomationError::UnsupportedPlatform(other.to_string())),
    }
}

/// Backend for the operating system this process runs on
pub fn current_backend(script_timeout: Duration) -> Result<Arc<dyn Backend>, AutomationError> {
    select_backend(std::env::consts::OS, script_timeout)
}
