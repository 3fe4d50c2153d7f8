//! Chat-log persistence
//!
//! When enabled, every extracted conversation is written to its own file
//! named after the chat and the UTC extraction instant.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters that are unsafe in file names on macOS or Windows
static UNSAFE_FILE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1f\x7f]"#).expect("file name pattern is valid")
});

/// Replace file-system-unsafe characters with `_`, keeping everything else (CJK included)
pub fn sanitize_chat_name(name: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(name, "_").into_owned()
}

/// `<sanitizedName>_<timestamp>.txt`, the timestamp being the ISO-8601 instant
/// with `:` and `.` replaced by `-`
pub fn log_file_name(chat_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}.txt",
        sanitize_chat_name(chat_name),
        at.format("%Y-%m-%dT%H-%M-%S-%3fZ")
    )
}

/// Write `text` to a new log file in `dir`, creating the directory if needed
pub async fn write_chat_log(
    dir: &Path,
    chat_name: &str,
    text: &str,
    at: DateTime<Utc>,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(log_file_name(chat_name, at));
    tokio::fs::write(&path, text).await?;
    tracing::info!("Chat history saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap() + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_sanitize_chat_name() {
        assert_eq!(sanitize_chat_name(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_chat_name("tab\there\u{7f}"), "tab_here_");
        // 事後条件: CJK や絵文字は保持される
        assert_eq!(sanitize_chat_name("家族群組 🏠"), "家族群組 🏠");
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(
            log_file_name("team/ops", instant()),
            "team_ops_2024-03-09T07-05-01-042Z.txt"
        );
    }

    #[tokio::test]
    async fn test_write_chat_log_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");

        let path = write_chat_log(&dir, "家族", "早安\n晚安", instant())
            .await
            .unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "家族_2024-03-09T07-05-01-042Z.txt"
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "早安\n晚安");
    }
}
