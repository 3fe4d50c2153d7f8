//! One-time dependency check
//!
//! The host runs [`ensure_dependencies`] before constructing the engine.
//! Once every helper program is present a marker file is written to the
//! home directory and later runs skip the check.

use crate::backend::macos::{CLICLICK_CANDIDATES, find_cliclick};
use crate::backend::script::run_command;
use crate::backend::{Backend, WindowsBackend};
use crate::constants::{INSTALL_TIMEOUT_SECS, SETUP_MARKER_FILE};
use crate::error::AutomationError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome for one helper program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "detail")]
pub enum DependencyStatus {
    Found,
    /// Missing at first, installed during this run
    Installed,
    Missing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheck {
    pub name: String,
    pub status: DependencyStatus,
}

impl DependencyCheck {
    fn new(name: &str, status: DependencyStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self.status, DependencyStatus::Missing(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub marker: PathBuf,
    /// The marker already existed and nothing was checked
    pub already_complete: bool,
    pub checks: Vec<DependencyCheck>,
}

/// `~/.line-mcp-setup-complete`
pub fn default_marker_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SETUP_MARKER_FILE))
}

/// Check (and on macOS try to install) the helper programs for `os`.
///
/// Returns the report when everything is present and the marker was written.
/// A missing dependency is an environment fault; the marker is left alone so
/// the check runs again next time.
pub async fn ensure_dependencies(marker: &Path, os: &str) -> Result<SetupReport, AutomationError> {
    if marker.exists() {
        tracing::debug!("Setup marker exists at {}", marker.display());
        return Ok(SetupReport {
            marker: marker.to_path_buf(),
            already_complete: true,
            checks: Vec::new(),
        });
    }

    tracing::info!("First-time setup...");
    let checks = match os {
        "macos" => vec![check_cliclick().await],
        "windows" => vec![check_autohotkey().await],
        other => return Err(AutomationError::UnsupportedPlatform(other.to_string())),
    };

    if let Some(missing) = checks.iter().find(|check| !check.is_ok()) {
        let hint = match &missing.status {
            DependencyStatus::Missing(hint) => hint.clone(),
            _ => String::new(),
        };
        tracing::error!("{} is not available: {}", missing.name, hint);
        return Err(AutomationError::ToolMissing {
            tool: missing.name.clone(),
            hint,
        });
    }

    write_marker(marker).await?;
    tracing::info!("Setup complete");
    Ok(SetupReport {
        marker: marker.to_path_buf(),
        already_complete: false,
        checks,
    })
}

async fn write_marker(marker: &Path) -> Result<(), AutomationError> {
    if let Some(parent) = marker.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(marker, chrono::Utc::now().to_rfc3339()).await?;
    Ok(())
}

async fn cliclick_present() -> bool {
    if CLICLICK_CANDIDATES.iter().any(|path| Path::new(path).exists()) {
        return true;
    }
    matches!(
        run_command("which", "which", ["cliclick"], &[], PROBE_TIMEOUT).await,
        Ok(output) if output.success()
    )
}

async fn check_cliclick() -> DependencyCheck {
    if cliclick_present().await {
        tracing::info!("cliclick found at {}", find_cliclick());
        return DependencyCheck::new("cliclick", DependencyStatus::Found);
    }

    tracing::warn!("cliclick not installed, attempting to install via Homebrew...");
    let install = run_command(
        "brew",
        "brew",
        ["install", "cliclick"],
        &[("HOMEBREW_NO_AUTO_UPDATE", "1")],
        Duration::from_secs(INSTALL_TIMEOUT_SECS),
    )
    .await;

    match install {
        Ok(output) if output.success() && cliclick_present().await => {
            tracing::info!("cliclick installed successfully");
            DependencyCheck::new("cliclick", DependencyStatus::Installed)
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("brew install cliclick failed: {}", stderr.trim());
            DependencyCheck::new(
                "cliclick",
                DependencyStatus::Missing(
                    "Install it manually with: brew install cliclick".to_string(),
                ),
            )
        }
        Err(e) => {
            tracing::error!("Failed to run Homebrew: {}", e);
            DependencyCheck::new(
                "cliclick",
                DependencyStatus::Missing(
                    "Install Homebrew from https://brew.sh/, then run: brew install cliclick"
                        .to_string(),
                ),
            )
        }
    }
}

async fn check_autohotkey() -> DependencyCheck {
    let backend = WindowsBackend::new(PROBE_TIMEOUT);
    match backend.run_script("ExitApp(0)").await {
        Ok(_) => {
            tracing::info!("AutoHotkey found");
            DependencyCheck::new("AutoHotkey", DependencyStatus::Found)
        }
        Err(e) => {
            tracing::error!("AutoHotkey test script failed: {}", e);
            DependencyCheck::new(
                "AutoHotkey",
                DependencyStatus::Missing(
                    "Install AutoHotkey v2 from https://www.autohotkey.com/ and add it to PATH."
                        .to_string(),
                ),
            )
        }
    }
}
