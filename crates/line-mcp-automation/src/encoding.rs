//! Console output decoding
//!
//! AutoHotkey writes to stdout in the console's ANSI code page (Big5 on a
//! Traditional Chinese Windows, Shift_JIS on a Japanese one, ...), so the bytes
//! captured from the scripting subprocess are detected and decoded to UTF-8
//! before they reach the orchestrator.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Text decoded from subprocess output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Name of the encoding the bytes were decoded from
    pub encoding: &'static str,
    /// True when decoding fell back to lossy UTF-8
    pub lossy: bool,
}

/// Detect the encoding of `bytes` and decode them to UTF-8.
///
/// A byte order mark wins, valid UTF-8 is taken as is, and anything else goes
/// through statistical detection. If the detected encoding cannot decode the
/// bytes cleanly the raw bytes are read as (lossy) UTF-8 instead.
pub fn decode_console_output(bytes: &[u8]) -> DecodedText {
    if bytes.is_empty() {
        return DecodedText {
            text: String::new(),
            encoding: UTF_8.name(),
            lossy: false,
        };
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if !had_errors {
            return DecodedText {
                text: text.into_owned(),
                encoding: encoding.name(),
                lossy: false,
            };
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
            lossy: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let detected = detector.guess(None, true);
    tracing::debug!("Detected console output encoding: {}", detected.name());

    let (text, had_errors) = detected.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!(
            "Output is not valid {}; falling back to lossy UTF-8",
            detected.name()
        );
        return DecodedText {
            text: String::from_utf8_lossy(bytes).into_owned(),
            encoding: UTF_8.name(),
            lossy: true,
        };
    }

    DecodedText {
        text: text.into_owned(),
        encoding: detected.name(),
        lossy: false,
    }
}

/// Turn Windows `\r\n` line endings into `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}
