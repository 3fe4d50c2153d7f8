//! macOS backend: AppleScript through `osascript`, mouse clicks through `cliclick`

use super::script::{applescript_string, run_command, strip_trailing_newline};
use super::{Backend, InputMethodSwitch, Profile};
use crate::constants::{LINE_APP_NAME, LINE_PROCESS_NAME};
use crate::error::AutomationError;
use crate::locator::{macos_element, parse_bounds};
use async_trait::async_trait;
use line_mcp_protocol::{Key, KeyChord, Modifier, Point, UiRegion};
use std::path::Path;
use std::time::Duration;

const OSASCRIPT: &str = "osascript";

/// Install locations probed before falling back to PATH
pub(crate) const CLICLICK_CANDIDATES: &[&str] =
    &["/opt/homebrew/bin/cliclick", "/usr/local/bin/cliclick"];

/// AppleScript error fragments that mean "no such UI element"
const NOT_FOUND_MARKERS: &[&str] = &["-1728", "-1719", "Can’t get", "Can't get"];

pub struct MacOsBackend {
    profile: Profile,
    timeout: Duration,
    cliclick: String,
}

impl MacOsBackend {
    pub fn new(timeout: Duration) -> Self {
        Self {
            profile: Profile::macos(),
            timeout,
            cliclick: find_cliclick(),
        }
    }

    /// Wrap statements in a System Events block targeting the LINE process
    fn in_line_process(body: &str) -> String {
        format!(
            "tell application \"System Events\"\n\
             \ttell process {}\n\
             {}\n\
             \tend tell\n\
             end tell",
            applescript_string(LINE_PROCESS_NAME),
            body
        )
    }
}

pub(crate) fn find_cliclick() -> String {
    CLICLICK_CANDIDATES
        .iter()
        .find(|path| Path::new(path).exists())
        .map(|path| path.to_string())
        .unwrap_or_else(|| "cliclick".to_string())
}

/// Format one coordinate for cliclick; negative absolute values need a `=` prefix
fn cliclick_coord(value: i32) -> String {
    if value < 0 {
        format!("={}", value)
    } else {
        value.to_string()
    }
}

/// AppleScript `key code` for keys that have no printable character
fn key_code(key: Key) -> Option<u16> {
    match key {
        Key::Enter => Some(36),
        Key::Tab => Some(48),
        Key::Backspace => Some(51),
        Key::PageUp => Some(116),
        Key::Delete => Some(117),
        Key::End => Some(119),
        Key::Char(_) => None,
    }
}

/// System Events statement pressing `chord`
pub fn keystroke_statement(chord: &KeyChord) -> String {
    let action = match chord.key {
        Key::Char(c) => format!("keystroke {}", applescript_string(&c.to_string())),
        key => format!("key code {}", key_code(key).unwrap_or_default()),
    };

    if chord.modifiers.is_empty() {
        return action;
    }

    let mut modifiers: Vec<&str> = Vec::new();
    for modifier in &chord.modifiers {
        let name = match modifier {
            Modifier::Primary | Modifier::Command => "command down",
            Modifier::Control => "control down",
            Modifier::Shift => "shift down",
        };
        if !modifiers.contains(&name) {
            modifiers.push(name);
        }
    }
    format!("{} using {{{}}}", action, modifiers.join(", "))
}

/// Script printing `x,y,width,height` of a System Events element path
fn bounds_script(path: &str) -> String {
    MacOsBackend::in_line_process(&format!(
        "\t\tset theElement to {path}\n\
         \t\tset {{xPosition, yPosition}} to position of theElement\n\
         \t\tset {{xSize, ySize}} to size of theElement\n\
         \t\treturn ((xPosition as integer) as text) & \",\" & ((yPosition as integer) as text) & \",\" & ((xSize as integer) as text) & \",\" & ((ySize as integer) as text)"
    ))
}

const SWITCH_TO_ENGLISH: &str = r#"tell application "System Events"
	tell application process "TextInputMenuAgent"
		set inputMenu to menu bar item 1 of menu bar 2
		click inputMenu
		tell menu 1 of inputMenu
			repeat with sourceRef in {"ABC", "美國", "U.S."}
				set sourceName to contents of sourceRef
				if exists menu item sourceName then
					click menu item sourceName
					return "switched"
				end if
			end repeat
		end tell
		key code 53
		return "none"
	end tell
end tell"#;

/// Outcome of [`SWITCH_TO_ENGLISH`] from its printed result
fn input_method_outcome(output: &str) -> InputMethodSwitch {
    if output.trim() == "switched" {
        InputMethodSwitch::Switched
    } else {
        InputMethodSwitch::Unsupported(
            "No English input source (ABC, 美國, U.S.) in the input menu".to_string(),
        )
    }
}

fn is_not_found_error(err: &AutomationError) -> bool {
    match err {
        AutomationError::ScriptFailed { message, .. } => {
            NOT_FOUND_MARKERS.iter().any(|marker| message.contains(marker))
        }
        _ => false,
    }
}

#[async_trait]
impl Backend for MacOsBackend {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn profile(&self) -> &Profile {
        &self.profile
    }

    async fn run_script(&self, script: &str) -> Result<String, AutomationError> {
        let output = run_command(OSASCRIPT, OSASCRIPT, ["-e", script], &[], self.timeout).await?;
        if !output.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!("osascript failed: {}", message);
            return Err(AutomationError::ScriptFailed {
                tool: OSASCRIPT,
                message,
                code: output.code,
            });
        }
        Ok(strip_trailing_newline(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }

    async fn is_running(&self) -> Result<bool, AutomationError> {
        let script = format!(
            "tell application \"System Events\" to return (name of processes) contains {}",
            applescript_string(LINE_PROCESS_NAME)
        );
        let output = self.run_script(&script).await?;
        Ok(output.trim() == "true")
    }

    async fn activate(&self) -> Result<(), AutomationError> {
        let script = format!(
            "tell application {} to activate",
            applescript_string(LINE_APP_NAME)
        );
        self.run_script(&script).await.map(|_| ())
    }

    async fn switch_input_method(&self) -> Result<InputMethodSwitch, AutomationError> {
        let output = self.run_script(SWITCH_TO_ENGLISH).await?;
        Ok(input_method_outcome(&output))
    }

    async fn locate(&self, region: UiRegion) -> Result<Point, AutomationError> {
        let spec = macos_element(region);
        let output = self
            .run_script(&bounds_script(spec.path))
            .await
            .map_err(|e| {
                if is_not_found_error(&e) {
                    AutomationError::element_not_found(region, e.to_string())
                } else {
                    e
                }
            })?;
        let rect = parse_bounds(&output).ok_or_else(|| AutomationError::UnexpectedOutput {
            tool: OSASCRIPT,
            output: output.clone(),
        })?;
        let point = spec.anchor.apply(rect);
        tracing::debug!("Located {} at {}", region, point);
        Ok(point)
    }

    async fn click(&self, point: Point) -> Result<(), AutomationError> {
        tracing::debug!("Click at {}", point);
        let arg = format!("c:{},{}", cliclick_coord(point.x), cliclick_coord(point.y));
        let output = run_command("cliclick", &self.cliclick, [arg], &[], self.timeout).await?;
        if !output.success() {
            return Err(AutomationError::ScriptFailed {
                tool: "cliclick",
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                code: output.code,
            });
        }
        Ok(())
    }

    async fn send_keys(&self, chord: &KeyChord) -> Result<(), AutomationError> {
        tracing::debug!("Send keys {}", chord);
        let script = Self::in_line_process(&format!("\t\t{}", keystroke_statement(chord)));
        self.run_script(&script).await.map(|_| ())
    }

    async fn set_clipboard(&self, text: &str) -> Result<(), AutomationError> {
        tracing::debug!("Set clipboard ({} chars)", text.chars().count());
        let script = format!("set the clipboard to {}", applescript_string(text));
        self.run_script(&script).await.map(|_| ())
    }

    async fn get_clipboard(&self) -> Result<String, AutomationError> {
        self.run_script("try\n\treturn (the clipboard as text)\non error\n\treturn \"\"\nend try")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystroke_with_primary_modifier() {
        assert_eq!(
            keystroke_statement(&KeyChord::paste()),
            "keystroke \"v\" using {command down}"
        );
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(keystroke_statement(&KeyChord::key(Key::Enter)), "key code 36");
        assert_eq!(keystroke_statement(&KeyChord::key(Key::Backspace)), "key code 51");
        assert_eq!(keystroke_statement(&KeyChord::key(Key::Delete)), "key code 117");
        assert_eq!(keystroke_statement(&KeyChord::key(Key::PageUp)), "key code 116");
        assert_eq!(
            keystroke_statement(&KeyChord::key(Key::Enter).with(Modifier::Shift)),
            "key code 36 using {shift down}"
        );
    }

    #[test]
    fn test_primary_and_command_collapse() {
        let chord = KeyChord::primary('a').with(Modifier::Command);
        assert_eq!(keystroke_statement(&chord), "keystroke \"a\" using {command down}");
    }

    #[test]
    fn test_missing_english_source_is_reported() {
        assert_eq!(input_method_outcome("switched\n"), InputMethodSwitch::Switched);
        // 事後条件: 英語入力が無ければ劣化として報告される
        assert!(matches!(
            input_method_outcome("none"),
            InputMethodSwitch::Unsupported(_)
        ));
        assert!(SWITCH_TO_ENGLISH.contains("return \"none\""));
        assert!(SWITCH_TO_ENGLISH.contains("key code 53"));
    }

    #[test]
    fn test_cliclick_negative_coordinates() {
        assert_eq!(cliclick_coord(120), "120");
        assert_eq!(cliclick_coord(-1280), "=-1280");
    }

    #[test]
    fn test_bounds_script_targets_line_process() {
        let script = bounds_script("row 2 of list 1 of splitter group 1 of window 1");
        assert!(script.contains("tell process \"LINE\""));
        assert!(script.contains("set theElement to row 2 of list 1 of splitter group 1 of window 1"));
        assert!(script.contains("position of theElement"));
    }

    #[test]
    fn test_not_found_errors_are_recognized() {
        let err = AutomationError::ScriptFailed {
            tool: OSASCRIPT,
            message: "execution error: System Events got an error: Can’t get row 2 of list 1. (-1719)"
                .into(),
            code: Some(1),
        };
        assert!(is_not_found_error(&err));

        let err = AutomationError::ScriptFailed {
            tool: OSASCRIPT,
            message: "not authorized to send Apple events (-1743)".into(),
            code: Some(1),
        };
        assert!(!is_not_found_error(&err));
    }
}
