//! Engine configuration

use crate::constants::{DEFAULT_CHAT_LOG_DIR, DEFAULT_SCRIPT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Enables chat-log persistence
pub const ENV_CHAT_LOG_ON: &str = "CHAT_LOG_ON";
/// Directory for chat logs
pub const ENV_CHAT_LOG_PATH: &str = "CHAT_LOG_PATH";
/// Clear the composer when sending fails halfway
pub const ENV_CLEAR_ON_FAILURE: &str = "LINE_MCP_CLEAR_ON_FAILURE";
/// Upper bound for one scripting-host invocation, in seconds
pub const ENV_SCRIPT_TIMEOUT_SECS: &str = "LINE_MCP_SCRIPT_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Where extracted conversations are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLogConfig {
    pub dir: PathBuf,
}

impl Default for ChatLogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CHAT_LOG_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// `None` disables chat logs
    pub chat_log: Option<ChatLogConfig>,
    pub clear_input_on_failure: bool,
    pub script_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chat_log: None,
            clear_input_on_failure: false,
            script_timeout: Duration::from_secs(DEFAULT_SCRIPT_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_vars(|name| std::env::var(name).ok())
    }

    /// Build the configuration from a variable lookup.
    ///
    /// Unset variables keep their defaults. `CHAT_LOG_PATH` only matters when
    /// `CHAT_LOG_ON` is true.
    pub fn from_env_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if parse_flag(ENV_CHAT_LOG_ON, lookup(ENV_CHAT_LOG_ON))? {
            let dir = lookup(ENV_CHAT_LOG_PATH)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHAT_LOG_DIR));
            config.chat_log = Some(ChatLogConfig { dir });
        }

        config.clear_input_on_failure =
            parse_flag(ENV_CLEAR_ON_FAILURE, lookup(ENV_CLEAR_ON_FAILURE))?;

        if let Some(raw) = lookup(ENV_SCRIPT_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: ENV_SCRIPT_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.script_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Enable chat logs in `dir`, or in the default directory
    pub fn with_chat_log(mut self, dir: Option<PathBuf>) -> Self {
        self.chat_log = Some(dir.map(|dir| ChatLogConfig { dir }).unwrap_or_default());
        self
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_env_vars(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.chat_log.is_none());
        assert_eq!(config.script_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_chat_log_enabled_with_default_dir() {
        let config = EngineConfig::from_env_vars(lookup(&[("CHAT_LOG_ON", "true")])).unwrap();
        assert_eq!(config.chat_log, Some(ChatLogConfig::default()));
        assert_eq!(config.chat_log.unwrap().dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_chat_log_path_requires_flag() {
        // 事前条件: CHAT_LOG_ON が無ければパスだけ指定しても無効
        let config =
            EngineConfig::from_env_vars(lookup(&[("CHAT_LOG_PATH", "/tmp/chats")])).unwrap();
        assert!(config.chat_log.is_none());

        let config = EngineConfig::from_env_vars(lookup(&[
            ("CHAT_LOG_ON", "TRUE"),
            ("CHAT_LOG_PATH", "/tmp/chats"),
        ]))
        .unwrap();
        assert_eq!(config.chat_log.unwrap().dir, PathBuf::from("/tmp/chats"));
    }

    #[test]
    fn test_clear_on_failure_and_timeout() {
        let config = EngineConfig::from_env_vars(lookup(&[
            ("LINE_MCP_CLEAR_ON_FAILURE", "1"),
            ("LINE_MCP_SCRIPT_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();
        assert!(config.clear_input_on_failure);
        assert_eq!(config.script_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineConfig::from_env_vars(lookup(&[("CHAT_LOG_ON", "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "CHAT_LOG_ON",
                value: "maybe".into(),
            }
        );

        for bad in ["0", "-3", "soon"] {
            let err = EngineConfig::from_env_vars(lookup(&[("LINE_MCP_SCRIPT_TIMEOUT_SECS", bad)]));
            assert!(err.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_with_chat_log() {
        let config = EngineConfig::default().with_chat_log(None);
        assert_eq!(config.chat_log, Some(ChatLogConfig::default()));

        let config = EngineConfig::default().with_chat_log(Some(PathBuf::from("out")));
        assert_eq!(config.chat_log.unwrap().dir, PathBuf::from("out"));
    }
}
