//! Keystroke plans for the message composer
//!
//! A message is turned into a flat list of [`Step`]s before anything is
//! typed, so the whole sequence can be inspected (and tested) without a
//! running LINE.

use crate::backend::{MentionConfirm, Profile, Settle};
use crate::constants::MENTION_SENTINEL;
use crate::segment::split_lines;
use line_mcp_protocol::{Key, KeyChord, MessageChunk, UiRegion};

/// One action in a compose plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Put text on the clipboard and paste it
    Paste(String),
    Key(KeyChord),
    /// Locate a region and click it
    Click(UiRegion),
    Wait(Settle),
}

/// Focus the composer and remove whatever it contains
pub fn clear_input_steps() -> Vec<Step> {
    vec![
        Step::Click(UiRegion::InputBox),
        Step::Wait(Settle::Short),
        Step::Key(KeyChord::select_all()),
        Step::Key(KeyChord::key(Key::Delete)),
        Step::Wait(Settle::Short),
    ]
}

/// Build the full plan for typing `chunks` into the composer.
///
/// Plain text is pasted line by line with the profile's newline chord in
/// between; no pasted string ever contains a line break. A mention is typed
/// with a sentinel character that forces LINE's autocomplete popup open, and
/// is then confirmed from the popup.
pub fn plan_message(chunks: &[MessageChunk], profile: &Profile, auto_send: bool) -> Vec<Step> {
    let mut steps = clear_input_steps();
    // A mention ended by the `\r` of a CRLF leaves the `\n` to the next chunk
    let mut pending_lf = false;

    for chunk in chunks {
        match chunk {
            MessageChunk::PlainText(text) => {
                let text = match text.strip_prefix('\n') {
                    Some(rest) if pending_lf => rest,
                    _ => text.as_str(),
                };
                pending_lf = false;
                if text.is_empty() {
                    continue;
                }
                let lines = split_lines(text);
                let last = lines.len().saturating_sub(1);
                for (i, line) in lines.iter().enumerate() {
                    if !line.is_empty() {
                        steps.push(Step::Paste(line.to_string()));
                        steps.push(Step::Wait(profile.paste_settle));
                    }
                    if i < last {
                        steps.push(Step::Key(profile.newline.clone()));
                        steps.push(Step::Wait(Settle::Short));
                    }
                }
            }
            MessageChunk::Mention { name, trailing } => {
                plan_mention(&mut steps, name, profile);
                pending_lf = *trailing == '\r';
                if matches!(*trailing, '\n' | '\r') {
                    steps.push(Step::Key(profile.newline.clone()));
                    steps.push(Step::Wait(Settle::Short));
                }
            }
        }
    }

    if auto_send {
        steps.push(Step::Key(KeyChord::key(Key::Enter)));
        steps.push(Step::Wait(Settle::Short));
    }

    steps
}

fn plan_mention(steps: &mut Vec<Step>, name: &str, profile: &Profile) {
    steps.push(Step::Paste(" ".to_string()));
    steps.push(Step::Wait(profile.paste_settle));
    steps.push(Step::Paste(format!("{}{}", name, MENTION_SENTINEL)));
    steps.push(Step::Wait(Settle::Medium));
    steps.push(Step::Key(KeyChord::key(Key::Backspace)));
    steps.push(Step::Wait(Settle::Medium));
    match profile.mention_confirm {
        MentionConfirm::ClickPopup => steps.push(Step::Click(UiRegion::MentionPopup)),
        MentionConfirm::SoftNewline => steps.push(Step::Key(profile.newline.clone())),
    }
    steps.push(Step::Wait(Settle::Short));
}
