//! Recording backend used by the orchestrator tests
//!
//! It keeps a tiny model of LINE: a clipboard, the composer text, the
//! conversation pane, and the list of sent messages. Typing only reaches the
//! composer after the input box was clicked. Every primitive yields
//! to the runtime once so concurrent sessions would interleave without the
//! session lock.

use crate::backend::{Backend, InputMethodSwitch, Profile, Timings};
use crate::error::AutomationError;
use async_trait::async_trait;
use line_mcp_protocol::{Key, KeyChord, Modifier, Point, UiRegion};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SwitchInputMethod,
    Activate,
    IsRunning,
    Locate(UiRegion),
    Click(Point),
    Keys(KeyChord),
    SetClipboard(String),
    GetClipboard,
}

#[derive(Debug, Default)]
struct State {
    events: Vec<Event>,
    clipboard: String,
    composer: String,
    selected: bool,
    sent: Vec<String>,
    /// Region the last click landed on
    focus: Option<UiRegion>,
    last_located: Option<UiRegion>,
}

pub struct MockBackend {
    profile: Profile,
    state: Mutex<State>,
    /// Text produced by select-all + copy
    pub pane_text: Mutex<String>,
    pub missing: Mutex<HashSet<UiRegion>>,
    /// Paste fails when the clipboard holds this text
    pub fail_paste_of: Mutex<Option<String>>,
    pub running: bool,
    pub fail_activate: bool,
    pub input_method_unsupported: bool,
}

impl MockBackend {
    pub fn new(base: Profile) -> Self {
        let mut profile = base;
        profile.timings = Timings {
            short: Duration::ZERO,
            medium: Duration::ZERO,
            long: Duration::ZERO,
            clipboard_poll: Duration::ZERO,
        };
        Self {
            profile,
            state: Mutex::new(State::default()),
            pane_text: Mutex::new(String::new()),
            missing: Mutex::new(HashSet::new()),
            fail_paste_of: Mutex::new(None),
            running: true,
            fail_activate: false,
            input_method_unsupported: false,
        }
    }

    pub fn macos() -> Self {
        Self::new(Profile::macos())
    }

    /// Windows profile; like the real backend it cannot switch input methods
    pub fn windows() -> Self {
        let mut mock = Self::new(Profile::windows());
        mock.input_method_unsupported = true;
        mock
    }

    pub fn with_pane_text(self, text: &str) -> Self {
        *self.pane_text.lock().unwrap() = text.to_string();
        self
    }

    pub fn with_missing(self, region: UiRegion) -> Self {
        self.missing.lock().unwrap().insert(region);
        self
    }

    pub fn with_failing_paste(self, text: &str) -> Self {
        *self.fail_paste_of.lock().unwrap() = Some(text.to_string());
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn composer(&self) -> String {
        self.state.lock().unwrap().composer.clone()
    }

    pub fn clipboard_writes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::SetClipboard(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn keys(&self) -> Vec<KeyChord> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Keys(chord) => Some(chord),
                _ => None,
            })
            .collect()
    }

    pub fn region_point(region: UiRegion) -> Point {
        let n = match region {
            UiRegion::SearchField => 1,
            UiRegion::ResultRow => 2,
            UiRegion::MessageList => 3,
            UiRegion::MessagePane => 4,
            UiRegion::InputBox => 5,
            UiRegion::MentionPopup => 6,
        };
        Point::new(n * 100, n * 10)
    }

    fn record(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn profile(&self) -> &Profile {
        &self.profile
    }

    async fn run_script(&self, _script: &str) -> Result<String, AutomationError> {
        Ok(String::new())
    }

    async fn is_running(&self) -> Result<bool, AutomationError> {
        self.record(Event::IsRunning);
        Ok(self.running)
    }

    async fn activate(&self) -> Result<(), AutomationError> {
        tokio::task::yield_now().await;
        self.record(Event::Activate);
        if self.fail_activate {
            return Err(AutomationError::ScriptFailed {
                tool: "mock",
                message: "LINE window not found".into(),
                code: Some(1),
            });
        }
        Ok(())
    }

    async fn switch_input_method(&self) -> Result<InputMethodSwitch, AutomationError> {
        self.record(Event::SwitchInputMethod);
        if self.input_method_unsupported {
            return Ok(InputMethodSwitch::Unsupported("not supported here".into()));
        }
        Ok(InputMethodSwitch::Switched)
    }

    async fn locate(&self, region: UiRegion) -> Result<Point, AutomationError> {
        tokio::task::yield_now().await;
        self.record(Event::Locate(region));
        if self.missing.lock().unwrap().contains(&region) {
            return Err(AutomationError::element_not_found(region, "mock"));
        }
        self.state.lock().unwrap().last_located = Some(region);
        Ok(Self::region_point(region))
    }

    async fn click(&self, point: Point) -> Result<(), AutomationError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Click(point));
        // Picking a mention returns focus to the composer
        state.focus = match state.last_located {
            Some(UiRegion::MentionPopup) => Some(UiRegion::InputBox),
            other => other,
        };
        Ok(())
    }

    async fn send_keys(&self, chord: &KeyChord) -> Result<(), AutomationError> {
        tokio::task::yield_now().await;
        self.record(Event::Keys(chord.clone()));

        let fail_paste_of = self.fail_paste_of.lock().unwrap().clone();
        let pane_text = self.pane_text.lock().unwrap().clone();
        let mut state = self.state.lock().unwrap();
        let primary = chord.has(Modifier::Primary);

        if primary && chord.key == Key::Char('c') {
            state.clipboard = pane_text;
            return Ok(());
        }
        if state.focus != Some(UiRegion::InputBox) {
            return Ok(());
        }

        match chord.key {
            Key::Char('v') if primary => {
                if fail_paste_of.as_deref() == Some(state.clipboard.as_str()) {
                    return Err(AutomationError::ScriptFailed {
                        tool: "mock",
                        message: "paste failed".into(),
                        code: Some(1),
                    });
                }
                let text = state.clipboard.clone();
                if state.selected {
                    state.composer.clear();
                    state.selected = false;
                }
                state.composer.push_str(&text);
            }
            Key::Char('a') if primary => state.selected = true,
            Key::Delete | Key::Backspace if state.selected => {
                state.composer.clear();
                state.selected = false;
            }
            Key::Backspace => {
                state.composer.pop();
            }
            Key::Enter if chord.has(Modifier::Shift) => state.composer.push('\n'),
            Key::Enter => {
                let message = std::mem::take(&mut state.composer);
                state.sent.push(message);
            }
            _ => {}
        }
        Ok(())
    }

    async fn set_clipboard(&self, text: &str) -> Result<(), AutomationError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::SetClipboard(text.to_string()));
        state.clipboard = text.to_string();
        Ok(())
    }

    async fn get_clipboard(&self) -> Result<String, AutomationError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::GetClipboard);
        Ok(state.clipboard.clone())
    }
}
