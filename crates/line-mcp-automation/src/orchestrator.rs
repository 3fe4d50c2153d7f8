//! Automation orchestrator
//!
//! [`LineAutomation`] owns the backend and runs every public operation
//! inside a [`Session`]. A session holds the process-wide automation lock for
//! its whole lifetime, so concurrent callers queue up and never share the
//! clipboard or keyboard focus.
//!
//! A session walks `Idle -> InputMethodNormalized -> Activated ->
//! ChatSelected -> Reading | Composing` and returns to idle when it is
//! finished or dropped.

use crate::backend::{Backend, InputMethodSwitch, Settle, current_backend};
use crate::chat_log::write_chat_log;
use crate::compose::{Step, clear_input_steps, plan_message};
use crate::config::EngineConfig;
use crate::constants::CLIPBOARD_POLL_ATTEMPTS;
use crate::error::{AutomationError, FaultKind};
use crate::segment::segment_message;
use line_mcp_protocol::{
    ActionResult, ChatHistory, ChatTarget, Key, KeyChord, MAX_HISTORY_CHARS, ProtocolError,
    UiRegion,
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InputMethodNormalized,
    Activated,
    ChatSelected,
    Reading,
    Composing,
}

/// The automation engine
pub struct LineAutomation {
    backend: Arc<dyn Backend>,
    config: EngineConfig,
    lock: Mutex<()>,
}

impl LineAutomation {
    pub fn new(backend: Arc<dyn Backend>, config: EngineConfig) -> Self {
        Self {
            backend,
            config,
            lock: Mutex::new(()),
        }
    }

    /// Engine for the host operating system
    pub fn for_current_platform(config: EngineConfig) -> Result<Self, AutomationError> {
        let backend = current_backend(config.script_timeout)?;
        tracing::info!("Using {} automation backend", backend.name());
        Ok(Self::new(backend, config))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Wait for exclusive use of the UI and start a session
    pub async fn session(&self) -> Session<'_> {
        let guard = self.lock.lock().await;
        Session {
            _guard: guard,
            backend: self.backend.as_ref(),
            state: SessionState::Idle,
            warnings: Vec::new(),
        }
    }

    /// Open a chat, scroll back `presses` pages and copy the visible conversation.
    ///
    /// Text longer than [`MAX_HISTORY_CHARS`] keeps only its tail. An empty
    /// copy is reported as a warning with empty text.
    pub async fn get_chat_history(
        &self,
        target: &ChatTarget,
        presses: u32,
    ) -> Result<ChatHistory, AutomationError> {
        tracing::info!("Reading chat history from {} ({} pages)", target, presses);

        let mut session = self.session().await;
        session.prepare().await;
        if !session.select_chat(target).await? {
            tracing::warn!("Chat {} not found", target);
            return Err(AutomationError::chat_not_found(target.as_str()));
        }
        session.scroll_back(presses).await?;
        let copied = session.read_visible_conversation().await?;
        let mut warnings = session.finish();

        let (text, truncated) = match copied {
            Some(full) => {
                self.save_chat_log(target, &full).await;
                truncate_tail(&full, MAX_HISTORY_CHARS)
            }
            None => {
                warnings.push(AutomationError::EmptyClipboard.to_string());
                (String::new(), false)
            }
        };

        Ok(ChatHistory {
            chat_name: target.as_str().to_string(),
            text,
            truncated,
            degraded: !warnings.is_empty(),
            warnings,
        })
    }

    /// Open a chat and type `message` into the composer, pressing Enter when `auto_send` is set.
    ///
    /// Failures become `success: false`; only environment faults (missing
    /// tooling, unsupported platform) are returned as errors.
    pub async fn send_chat_message(
        &self,
        target: &ChatTarget,
        message: &str,
        auto_send: bool,
    ) -> Result<ActionResult, AutomationError> {
        if message.is_empty() {
            return Ok(ActionResult::failed(ProtocolError::EmptyMessage.to_string()));
        }
        tracing::info!("Sending message to {} (auto_send: {})", target, auto_send);

        let mut session = self.session().await;
        session.prepare().await;

        let outcome = match session.select_chat(target).await {
            Ok(true) => {
                session
                    .compose_and_send(message, auto_send, self.config.clear_input_on_failure)
                    .await
            }
            Ok(false) => Err(AutomationError::chat_not_found(target.as_str())),
            Err(e) => Err(e),
        };
        let warnings = session.finish();

        match outcome {
            Ok(()) => Ok(ActionResult::ok().with_warnings(warnings)),
            Err(e) if e.kind() == FaultKind::Environment => Err(e),
            Err(e) => {
                tracing::error!("Sending to {} failed: {}", target, e);
                Ok(ActionResult::failed(e.to_string()).with_warnings(warnings))
            }
        }
    }

    /// Whether the LINE process is running; query failures count as "not running"
    pub async fn is_line_running(&self) -> bool {
        match self.backend.is_running().await {
            Ok(running) => running,
            Err(e) => {
                tracing::warn!("Could not query the process list: {}", e);
                false
            }
        }
    }

    /// Bring LINE to the foreground
    pub async fn activate(&self) -> ActionResult {
        let _guard = self.lock.lock().await;
        match self.backend.activate().await {
            Ok(()) => ActionResult::ok(),
            Err(e) => {
                tracing::warn!("Activating LINE failed: {}", e);
                ActionResult::failed(e.to_string())
            }
        }
    }

    async fn save_chat_log(&self, target: &ChatTarget, text: &str) {
        let Some(chat_log) = &self.config.chat_log else {
            return;
        };
        let at = chrono::Utc::now();
        if let Err(e) = write_chat_log(&chat_log.dir, target.as_str(), text, at).await {
            tracing::error!("Failed to write chat history to log file: {}", e);
        }
    }
}

/// Exclusive use of the UI for one operation
pub struct Session<'a> {
    _guard: MutexGuard<'a, ()>,
    backend: &'a dyn Backend,
    state: SessionState,
    warnings: Vec<String>,
}

impl Session<'_> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn degrade(&mut self, warning: String) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Switch to an English input method; never fails the session
    pub async fn normalize_input_method(&mut self) {
        match self.backend.switch_input_method().await {
            Ok(InputMethodSwitch::Switched) => {}
            Ok(InputMethodSwitch::Unsupported(reason)) => self.degrade(reason),
            Err(e) => self.degrade(format!("Input method switch failed: {}", e)),
        }
        self.state = SessionState::InputMethodNormalized;
    }

    /// Bring LINE forward; never fails the session
    pub async fn activate(&mut self) {
        if let Err(e) = self.backend.activate().await {
            self.degrade(format!("LINE activation failed: {}", e));
        }
        self.backend.wait(Settle::Short).await;
        self.state = SessionState::Activated;
    }

    /// Input method normalization followed by activation
    pub async fn prepare(&mut self) {
        self.normalize_input_method().await;
        self.activate().await;
    }

    async fn click_region(&self, region: UiRegion) -> Result<(), AutomationError> {
        let point = self.backend.locate(region).await?;
        self.backend.click(point).await
    }

    async fn key(&self, chord: KeyChord) -> Result<(), AutomationError> {
        self.backend.send_keys(&chord).await
    }

    /// Write `text` to the clipboard and paste it right away
    async fn paste(&self, text: &str) -> Result<(), AutomationError> {
        self.backend.set_clipboard(text).await?;
        self.key(KeyChord::paste()).await
    }

    /// Search for `target` and open the first result.
    ///
    /// Returns `Ok(false)` when a UI element needed for the search cannot be
    /// found, which is how an unmatched chat name shows up.
    pub async fn select_chat(&mut self, target: &ChatTarget) -> Result<bool, AutomationError> {
        tracing::debug!("Selecting chat {}", target);
        match self.run_select_chat(target).await {
            Ok(()) => {
                self.state = SessionState::ChatSelected;
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("Chat selection stopped: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn run_select_chat(&self, target: &ChatTarget) -> Result<(), AutomationError> {
        let backend = self.backend;
        let profile = backend.profile();

        self.click_region(UiRegion::SearchField).await?;
        backend.wait(Settle::Short).await;
        if let Some(shortcut) = &profile.search_shortcut {
            self.key(shortcut.clone()).await?;
            backend.wait(Settle::Short).await;
        }

        self.key(KeyChord::select_all()).await?;
        self.key(KeyChord::key(Key::Delete)).await?;
        backend.wait(Settle::Short).await;
        self.paste(target.as_str()).await?;
        backend.wait(Settle::Medium).await;

        if profile.submit_search {
            self.key(KeyChord::key(Key::Enter)).await?;
            backend.wait(Settle::Short).await;
        }

        for click in 0..profile.result_row_clicks {
            if click > 0 {
                backend.wait(Settle::Short).await;
            }
            self.click_region(UiRegion::ResultRow).await?;
        }
        backend.wait(profile.chat_load).await;
        Ok(())
    }

    /// Focus the message list and page up `times` times
    pub async fn scroll_back(&mut self, times: u32) -> Result<(), AutomationError> {
        tracing::debug!("Scrolling back {} pages", times);
        let backend = self.backend;
        let profile = backend.profile();

        for click in 0..profile.scroll_focus_clicks.max(1) {
            if click > 0 {
                backend.wait(profile.scroll_focus_settle).await;
            }
            self.click_region(UiRegion::MessageList).await?;
        }
        backend.wait(Settle::Short).await;

        for chord in &profile.scroll_prelude {
            self.key(chord.clone()).await?;
            backend.wait(Settle::Short).await;
        }
        for _ in 0..times {
            self.key(profile.scroll_key.clone()).await?;
            backend.wait(Settle::Short).await;
        }
        Ok(())
    }

    /// Select everything in the conversation and copy it.
    ///
    /// The clipboard is cleared before copying and polled until it has
    /// content; `None` means nothing arrived in time.
    pub async fn read_visible_conversation(&mut self) -> Result<Option<String>, AutomationError> {
        self.state = SessionState::Reading;
        let backend = self.backend;
        let profile = backend.profile();

        if profile.focus_pane_before_copy {
            self.click_region(UiRegion::MessagePane).await?;
            backend.wait(Settle::Short).await;
        }
        self.key(KeyChord::select_all()).await?;
        backend.wait(Settle::Medium).await;

        backend.set_clipboard("").await?;
        self.key(KeyChord::copy()).await?;

        let poll = profile.timings.clipboard_poll;
        for _ in 0..CLIPBOARD_POLL_ATTEMPTS {
            let text = backend.get_clipboard().await?;
            if !text.is_empty() {
                tracing::debug!("Copied {} characters", text.chars().count());
                return Ok(Some(text));
            }
            if !poll.is_zero() {
                tokio::time::sleep(poll).await;
            }
        }
        tracing::warn!("Clipboard stayed empty after copy");
        Ok(None)
    }

    /// Type `message` into the composer of the selected chat.
    ///
    /// On failure the partially typed text stays in the composer unless
    /// `clear_on_failure` is set, in which case a best-effort clear runs first.
    pub async fn compose_and_send(
        &mut self,
        message: &str,
        auto_send: bool,
        clear_on_failure: bool,
    ) -> Result<(), AutomationError> {
        self.state = SessionState::Composing;
        let chunks = segment_message(message);
        let steps = plan_message(&chunks, self.backend.profile(), auto_send);
        tracing::debug!("Composing {} chunks in {} steps", chunks.len(), steps.len());

        for step in &steps {
            if let Err(e) = self.run_step(step).await {
                if clear_on_failure {
                    self.clear_input().await;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    async fn run_step(&self, step: &Step) -> Result<(), AutomationError> {
        match step {
            Step::Paste(text) => self.paste(text).await,
            Step::Key(chord) => self.key(chord.clone()).await,
            Step::Click(region) => self.click_region(*region).await,
            Step::Wait(settle) => {
                self.backend.wait(*settle).await;
                Ok(())
            }
        }
    }

    async fn clear_input(&mut self) {
        for step in clear_input_steps() {
            if let Err(e) = self.run_step(&step).await {
                self.degrade(format!("Clearing the input box failed: {}", e));
                return;
            }
        }
    }

    /// End the session and hand back its warnings
    pub fn finish(mut self) -> Vec<String> {
        self.state = SessionState::Idle;
        std::mem::take(&mut self.warnings)
    }
}

/// Keep the last `max_chars` characters of `text`; the flag reports whether anything was cut
pub fn truncate_tail(text: &str, max_chars: usize) -> (String, bool) {
    let total = text.chars().count();
    if total <= max_chars {
        return (text.to_string(), false);
    }
    let start = text
        .char_indices()
        .nth(total - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    (text[start..].to_string(), true)
}
