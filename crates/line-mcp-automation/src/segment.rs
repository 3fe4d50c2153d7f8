//! Message segmentation
//!
//! LINE only turns `@name` into a mention when the name is picked from its
//! autocomplete popup, so outgoing text is split into plain runs and mention
//! tokens that are typed with different key sequences.

use line_mcp_protocol::MessageChunk;
use regex::Regex;
use std::sync::LazyLock;

/// `@`, one or more non-whitespace characters, then exactly one whitespace
/// character that terminates the token.
static MENTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\S+\s").expect("mention pattern is valid"));

/// Split a message into plain-text runs and mention tokens, left to right.
///
/// Mentions keep their `@` and lose the terminating whitespace, which is kept
/// alongside so [`join_chunks`] can rebuild the input. An `@` that is not
/// followed by whitespace before the end of the message stays plain text.
pub fn segment_message(message: &str) -> Vec<MessageChunk> {
    let mut chunks = Vec::new();
    let mut plain_start = 0;

    for token in MENTION_TOKEN.find_iter(message) {
        if token.start() > plain_start {
            chunks.push(MessageChunk::PlainText(
                message[plain_start..token.start()].to_string(),
            ));
        }

        let text = token.as_str();
        // The pattern guarantees a trailing whitespace character
        let Some(trailing) = text.chars().next_back() else {
            continue;
        };
        let name = &text[..text.len() - trailing.len_utf8()];
        chunks.push(MessageChunk::mention(name, trailing));
        plain_start = token.end();
    }

    if plain_start < message.len() {
        chunks.push(MessageChunk::PlainText(message[plain_start..].to_string()));
    }

    chunks
}

/// Rebuild the source text from a chunk sequence
pub fn join_chunks(chunks: &[MessageChunk]) -> String {
    chunks.iter().map(MessageChunk::source_text).collect()
}

/// Split plain text into lines on `\r\n`, `\n` or `\r`.
///
/// A trailing line break yields a trailing empty line, so the number of
/// separators between lines always equals `lines.len() - 1`.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    lines.push(&text[start..]);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> MessageChunk {
        MessageChunk::PlainText(s.to_string())
    }

    #[test]
    fn test_mentions_and_plain_text() {
        let chunks = segment_message("@alice hello @bob ");
        assert_eq!(
            chunks,
            vec![
                MessageChunk::mention("@alice", ' '),
                plain("hello "),
                MessageChunk::mention("@bob", ' '),
            ]
        );
    }

    #[test]
    fn test_no_mention() {
        assert_eq!(segment_message("just text"), vec![plain("just text")]);
    }

    #[test]
    fn test_at_sign_at_end_is_plain_text() {
        assert_eq!(segment_message("contact @bob"), vec![plain("contact @bob")]);
        assert_eq!(segment_message("@"), vec![plain("@")]);
        assert_eq!(segment_message("mail me @ home"), vec![plain("mail me @ home")]);
    }

    #[test]
    fn test_repeated_and_multibyte_mentions() {
        let chunks = segment_message("@小明 早安 @小明\t好");
        assert_eq!(
            chunks,
            vec![
                MessageChunk::mention("@小明", ' '),
                plain("早安 "),
                MessageChunk::mention("@小明", '\t'),
                plain("好"),
            ]
        );
    }

    #[test]
    fn test_adjacent_mentions_produce_no_empty_text() {
        let chunks = segment_message("@a @b x");
        assert_eq!(
            chunks,
            vec![
                MessageChunk::mention("@a", ' '),
                MessageChunk::mention("@b", ' '),
                plain("x"),
            ]
        );
    }

    #[test]
    fn test_mention_ended_by_newline() {
        let chunks = segment_message("hi @team\nsee below");
        assert_eq!(
            chunks,
            vec![
                plain("hi "),
                MessageChunk::mention("@team", '\n'),
                plain("see below"),
            ]
        );
    }

    #[test]
    fn test_empty_message() {
        assert!(segment_message("").is_empty());
    }

    #[test]
    fn test_join_reconstructs_original() {
        // 事後条件: 分割結果を連結すると元のメッセージに戻る
        for message in [
            "@alice hello @bob ",
            "contact @bob",
            "line1\nline2 @x\r\n@y  tail",
            "@全員 明天 10:00 開會，請 @王小明 準備資料 ",
            "email@example.com and @ alone",
            "",
        ] {
            assert_eq!(join_chunks(&segment_message(message)), message);
        }
    }

    #[test]
    fn test_email_domain_is_tokenized() {
        // No lookbehind: "@example.com " is a token even inside an address
        let chunks = segment_message("write to a@example.com today");
        assert_eq!(
            chunks,
            vec![
                plain("write to a"),
                MessageChunk::mention("@example.com", ' '),
                plain("today"),
            ]
        );
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("line1\nline2"), vec!["line1", "line2"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("end\n"), vec!["end", ""]);
        assert_eq!(split_lines("\n\n"), vec!["", "", ""]);
        assert_eq!(split_lines("single"), vec!["single"]);
        assert_eq!(split_lines(""), vec![""]);
    }
}
