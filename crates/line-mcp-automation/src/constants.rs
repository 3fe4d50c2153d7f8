//! Constants used throughout the automation engine
//!
//! Timings are the settle delays the LINE desktop app needs between actions;
//! they were tuned by hand and are not caller-configurable.

/// Application name used by AppleScript `tell application`
pub const LINE_APP_NAME: &str = "LINE";

/// Process name as listed by System Events
pub const LINE_PROCESS_NAME: &str = "LINE";

/// Exact window title of the main LINE window on Windows
pub const LINE_WINDOW_TITLE: &str = "LINE";

/// Executable image name on Windows
pub const LINE_EXE_NAME: &str = "LINE.exe";

/// macOS settle delay after a single click or keystroke (ms)
pub const MACOS_DELAY_SHORT_MS: u64 = 150;

/// macOS settle delay for a UI transition (ms)
pub const MACOS_DELAY_MEDIUM_MS: u64 = 350;

/// macOS settle delay for content loading (ms)
pub const MACOS_DELAY_LONG_MS: u64 = 3000;

/// Windows settle delay after a single click or keystroke (ms)
pub const WINDOWS_DELAY_SHORT_MS: u64 = 200;

/// Windows settle delay for a UI transition (ms)
pub const WINDOWS_DELAY_MEDIUM_MS: u64 = 600;

/// Windows settle delay for content loading (ms)
pub const WINDOWS_DELAY_LONG_MS: u64 = 3000;

/// Interval between clipboard reads while waiting for a copy to land (ms)
pub const CLIPBOARD_POLL_INTERVAL_MS: u64 = 100;

/// Number of clipboard reads before giving up (20 x 100 ms = 2 s)
pub const CLIPBOARD_POLL_ATTEMPTS: u32 = 20;

/// Upper bound on a single scripting-host invocation (s)
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Upper bound on `brew install` during first-run setup (s)
pub const INSTALL_TIMEOUT_SECS: u64 = 600;

/// Character typed after a mention to force LINE's autocomplete popup
pub const MENTION_SENTINEL: char = 'k';

/// Marker file written to the home directory once setup has succeeded
pub const SETUP_MARKER_FILE: &str = ".line-mcp-setup-complete";

/// Directory for chat logs when `CHAT_LOG_PATH` is unset
pub const DEFAULT_CHAT_LOG_DIR: &str = "logs";
