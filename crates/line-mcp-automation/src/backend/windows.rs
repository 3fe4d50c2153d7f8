//! Windows backend: AutoHotkey v2 scripts run from temporary files
//!
//! Script output is captured as raw bytes and decoded with
//! [`decode_console_output`], since AutoHotkey and the console tools write in
//! the active code page.

use super::script::{ahk_string, run_command};
use super::{Backend, InputMethodSwitch, Profile};
use crate::constants::{LINE_EXE_NAME, LINE_WINDOW_TITLE};
use crate::encoding::{decode_console_output, normalize_line_endings};
use crate::error::AutomationError;
use crate::locator::{parse_bounds, windows_offset};
use async_trait::async_trait;
use line_mcp_protocol::{Key, KeyChord, Modifier, Point, Rect, UiRegion};
use std::io::Write;
use std::time::Duration;

const AUTOHOTKEY: &str = "AutoHotkey";
const AUTOHOTKEY_PROGRAM: &str = "autohotkey";

/// Exit code used by our scripts when the LINE window does not exist.
/// AutoHotkey itself exits with 2 on load and runtime errors.
const EXIT_WINDOW_MISSING: i32 = 10;

/// Directives prepended to every generated script
const SCRIPT_HEADER: &str = "#SingleInstance force\n\
#Requires AutoHotkey v2.0\n\
SendMode \"Input\"\n\
SetTitleMatchMode 3\n\
CoordMode \"Mouse\", \"Screen\"\n";

pub struct WindowsBackend {
    profile: Profile,
    timeout: Duration,
}

impl WindowsBackend {
    pub fn new(timeout: Duration) -> Self {
        Self {
            profile: Profile::windows(),
            timeout,
        }
    }

    /// Window bounds from UI Automation, or `None` when it is unavailable
    #[cfg(target_os = "windows")]
    async fn uia_window_bounds(&self) -> Option<Rect> {
        match super::uia::find_window_bounds(LINE_WINDOW_TITLE).await {
            Ok(bounds) => bounds,
            Err(e) => {
                tracing::debug!("UI Automation lookup failed: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    async fn uia_window_bounds(&self) -> Option<Rect> {
        None
    }

    async fn window_bounds(&self, region: UiRegion) -> Result<Rect, AutomationError> {
        if let Some(rect) = self.uia_window_bounds().await {
            return Ok(rect);
        }

        let output = self
            .run_script(&window_bounds_script())
            .await
            .map_err(|e| window_missing_as_not_found(region, e))?;
        parse_bounds(&output).ok_or(AutomationError::UnexpectedOutput {
            tool: AUTOHOTKEY,
            output,
        })
    }
}

/// Only our own exit code means the window is missing; other failures stay script errors
fn window_missing_as_not_found(region: UiRegion, err: AutomationError) -> AutomationError {
    match err {
        AutomationError::ScriptFailed {
            code: Some(EXIT_WINDOW_MISSING),
            ..
        } => AutomationError::element_not_found(region, "LINE window not found"),
        other => other,
    }
}

/// Full program text for a script body
pub fn wrap_script(body: &str) -> String {
    format!("{}{}\n", SCRIPT_HEADER, body)
}

/// Body that brings LINE forward if it exists, used before input actions
fn focus_line() -> String {
    let title = ahk_string(LINE_WINDOW_TITLE);
    format!("if WinExist({title})\n    WinActivate {title}\n")
}

fn window_bounds_script() -> String {
    let title = ahk_string(LINE_WINDOW_TITLE);
    format!(
        "if !WinExist({title})\n    ExitApp({EXIT_WINDOW_MISSING})\n\
         WinGetPos &winX, &winY, &winW, &winH, {title}\n\
         FileAppend winX \",\" winY \",\" winW \",\" winH, \"*\"\n"
    )
}

/// AutoHotkey `Send` notation for a chord, e.g. `^v` or `+{Enter}`
pub fn send_notation(chord: &KeyChord) -> String {
    let mut notation = String::new();
    for modifier in &chord.modifiers {
        let symbol = match modifier {
            Modifier::Primary | Modifier::Control => '^',
            Modifier::Shift => '+',
            Modifier::Command => '#',
        };
        if !notation.contains(symbol) {
            notation.push(symbol);
        }
    }

    let key = match chord.key {
        Key::Char(c) if "+^!#{}".contains(c) => format!("{{{}}}", c),
        Key::Char(c) => c.to_string(),
        Key::Enter => "{Enter}".to_string(),
        Key::Backspace => "{Backspace}".to_string(),
        Key::Delete => "{Delete}".to_string(),
        Key::Tab => "{Tab}".to_string(),
        Key::End => "{End}".to_string(),
        Key::PageUp => "{PgUp}".to_string(),
    };
    notation.push_str(&key);
    notation
}

#[async_trait]
impl Backend for WindowsBackend {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn profile(&self) -> &Profile {
        &self.profile
    }

    async fn run_script(&self, script: &str) -> Result<String, AutomationError> {
        let mut file = tempfile::Builder::new()
            .prefix("line-mcp-")
            .suffix(".ahk")
            .tempfile()?;
        file.write_all(wrap_script(script).as_bytes())?;
        file.flush()?;

        let output = run_command(
            AUTOHOTKEY,
            AUTOHOTKEY_PROGRAM,
            [file.path().as_os_str()],
            &[],
            self.timeout,
        )
        .await?;

        let stderr = decode_console_output(&output.stderr);
        if !stderr.text.trim().is_empty() {
            tracing::warn!("AutoHotkey stderr: {}", stderr.text.trim());
        }

        if !output.success() {
            return Err(AutomationError::ScriptFailed {
                tool: AUTOHOTKEY,
                message: stderr.text.trim().to_string(),
                code: output.code,
            });
        }

        let stdout = decode_console_output(&output.stdout);
        if stdout.encoding != "UTF-8" {
            tracing::debug!("AutoHotkey stdout decoded from {}", stdout.encoding);
        }
        Ok(stdout.text)
    }

    async fn is_running(&self) -> Result<bool, AutomationError> {
        let filter = format!("IMAGENAME eq {}", LINE_EXE_NAME);
        let output = run_command("tasklist", "tasklist", ["/FI", filter.as_str()], &[], self.timeout)
            .await?;
        let listing = decode_console_output(&output.stdout).text.to_lowercase();
        Ok(listing.contains(&LINE_EXE_NAME.to_lowercase()))
    }

    async fn activate(&self) -> Result<(), AutomationError> {
        let title = ahk_string(LINE_WINDOW_TITLE);
        let script = format!(
            "if WinExist({title}) {{\n\
             \x20   WinActivate {title}\n\
             \x20   WinWaitActive {title},, 2\n\
             \x20   ExitApp(0)\n\
             }}\n\
             ExitApp({EXIT_WINDOW_MISSING})\n"
        );
        self.run_script(&script).await.map(|_| ()).map_err(|e| match e {
            AutomationError::ScriptFailed {
                code: Some(EXIT_WINDOW_MISSING),
                ..
            } => AutomationError::ScriptFailed {
                tool: AUTOHOTKEY,
                message: "LINE window not found".to_string(),
                code: Some(EXIT_WINDOW_MISSING),
            },
            other => other,
        })
    }

    async fn switch_input_method(&self) -> Result<InputMethodSwitch, AutomationError> {
        Ok(InputMethodSwitch::Unsupported(
            "Input method switching is not supported on Windows; assuming an English input method is active"
                .to_string(),
        ))
    }

    async fn locate(&self, region: UiRegion) -> Result<Point, AutomationError> {
        let window = self.window_bounds(region).await?;
        let point = windows_offset(region).resolve(window);
        tracing::debug!("Located {} at {}", region, point);
        Ok(point)
    }

    async fn click(&self, point: Point) -> Result<(), AutomationError> {
        tracing::debug!("Click at {}", point);
        self.run_script(&format!("Click {}, {}", point.x, point.y))
            .await
            .map(|_| ())
    }

    async fn send_keys(&self, chord: &KeyChord) -> Result<(), AutomationError> {
        tracing::debug!("Send keys {}", chord);
        let script = format!("{}Send {}", focus_line(), ahk_string(&send_notation(chord)));
        self.run_script(&script).await.map(|_| ())
    }

    async fn set_clipboard(&self, text: &str) -> Result<(), AutomationError> {
        tracing::debug!("Set clipboard ({} chars)", text.chars().count());
        self.run_script(&format!("A_Clipboard := {}", ahk_string(text)))
            .await
            .map(|_| ())
    }

    async fn get_clipboard(&self) -> Result<String, AutomationError> {
        self.run_script("FileAppend A_Clipboard, \"*\", \"UTF-8\"")
            .await
            .map(|text| normalize_line_endings(&text))
    }
}
