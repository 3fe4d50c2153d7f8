//! Subprocess execution and script-literal escaping shared by the backends

use crate::error::AutomationError;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::process::Command;

/// Raw result of a finished subprocess
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `program` with `args` and extra environment variables, bounded by `timeout`.
///
/// A program that is not installed maps to [`AutomationError::ToolMissing`] so
/// the caller can report it as an environment problem. The child is killed
/// if the timeout elapses.
pub async fn run_command<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
    envs: &[(&str, &str)],
    timeout: Duration,
) -> Result<CommandOutput, AutomationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    for (key, value) in envs {
        command.env(key, value);
    }

    tracing::debug!("Running {} ({})", tool, program);
    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| AutomationError::ScriptTimeout { tool, timeout })?
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => AutomationError::ToolMissing {
                tool: program.to_string(),
                hint: install_hint(tool).to_string(),
            },
            _ => AutomationError::Spawn {
                program: program.to_string(),
                source: e,
            },
        })?;

    Ok(CommandOutput {
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "cliclick" => "Install it with: brew install cliclick",
        "AutoHotkey" => "Install AutoHotkey v2 from https://www.autohotkey.com/ and add it to PATH.",
        "osascript" => "osascript ships with macOS; check that this is a macOS host.",
        _ => "Check that it is installed and on PATH.",
    }
}

/// Quote `text` as an AppleScript string literal
pub fn applescript_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Quote `text` as an AutoHotkey v2 string literal
pub fn ahk_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '`' => quoted.push_str("``"),
            '"' => quoted.push_str("`\""),
            '\n' => quoted.push_str("`n"),
            '\r' => quoted.push_str("`r"),
            '\t' => quoted.push_str("`t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Remove one trailing line break added by the scripting host
pub fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
