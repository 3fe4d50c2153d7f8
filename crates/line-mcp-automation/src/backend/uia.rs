//! UI Automation lookup of the LINE window bounds on Windows
//!
//! COM objects are not `Send`, so every query creates its own client on a
//! blocking thread.

use line_mcp_protocol::Rect;
use uiautomation::UIAutomation;

/// Boxed error type for UI Automation operations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// UI Automation client for top-level window queries
pub struct UiaClient {
    automation: UIAutomation,
}

impl UiaClient {
    pub fn new() -> Result<Self, BoxError> {
        let automation = UIAutomation::new()
            .map_err(|e| format!("Failed to initialize UI Automation: {}", e))?;
        Ok(Self { automation })
    }

    /// Bounding rectangle of the first top-level element named `name`
    pub fn window_bounds(&self, name: &str) -> Result<Option<Rect>, BoxError> {
        let root = self
            .automation
            .get_root_element()
            .map_err(|e| format!("Failed to get root element: {}", e))?;

        let matcher = self
            .automation
            .create_matcher()
            .from(root)
            .depth(2)
            .name(name)
            .timeout(1000);
        let window = match matcher.find_first() {
            Ok(window) => window,
            Err(_) => return Ok(None),
        };

        let rect = window
            .get_bounding_rectangle()
            .map_err(|e| format!("Failed to get bounding rectangle: {}", e))?;
        Ok(Some(Rect::new(
            rect.get_left(),
            rect.get_top(),
            rect.get_width(),
            rect.get_height(),
        )))
    }
}

/// Look up window bounds off the async runtime
pub async fn find_window_bounds(name: &str) -> Result<Option<Rect>, BoxError> {
    let name = name.to_string();
    tokio::task::spawn_blocking(move || UiaClient::new()?.window_bounds(&name))
        .await
        .map_err(|e| format!("UI Automation task failed: {}", e))?
}
