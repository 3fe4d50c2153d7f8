//! UI automation engine for the LINE desktop app
//!
//! The engine drives LINE the way a person would: clicks at located screen
//! points, keyboard shortcuts, and the shared clipboard. It exposes four
//! session steps (`select_chat`, `scroll_back`, `read_visible_conversation`,
//! `compose_and_send`) and the top-level operations built from them on
//! [`LineAutomation`].
//!
//! Platform specifics live behind the [`backend::Backend`] trait: AppleScript
//! and `cliclick` on macOS, AutoHotkey v2 on Windows.

pub mod backend;
pub mod chat_log;
pub mod compose;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod locator;
pub mod orchestrator;
pub mod segment;
pub mod setup;

#[cfg(test)]
mod mock;

pub use config::{ChatLogConfig, ConfigError, EngineConfig};
pub use error::{AutomationError, FaultKind};
pub use orchestrator::{LineAutomation, Session, SessionState};
