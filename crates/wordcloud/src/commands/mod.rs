//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use wordcloud_core::{Config, StopWords};

pub mod info;
pub mod layout;
pub mod words;

/// Read a file and validate its size against the configured limit.
///
/// The size check runs on file metadata so oversized inputs are rejected
/// before anything is read into memory.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Built-in English stop words plus any listed in the config.
pub fn stop_words(config: &Config) -> StopWords {
    let stop_words = StopWords::english();
    match config.stop_words {
        Some(ref extra) => stop_words.with_extra(extra),
        None => stop_words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_file(contents: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("input.txt")).unwrap();
        std::fs::write(&path, contents).unwrap();
        (tmp, path)
    }

    #[test]
    fn reads_file_under_limit() {
        let (_tmp, path) = temp_file("cloud cloud");
        assert_eq!(read_input_file(&path, Some(1024)).unwrap(), "cloud cloud");
    }

    #[test]
    fn rejects_file_over_limit() {
        let (_tmp, path) = temp_file("cloud cloud");
        let err = read_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn no_limit_reads_anything() {
        let (_tmp, path) = temp_file("cloud cloud");
        assert!(read_input_file(&path, None).is_ok());
    }

    #[test]
    fn config_stop_words_extend_builtin_list() {
        let config = Config {
            stop_words: Some(vec!["Reddit".to_string()]),
            ..Config::default()
        };
        let stop_words = stop_words(&config);
        assert!(stop_words.contains("reddit"));
        assert!(stop_words.contains("the"));
        assert!(!stop_words.contains("cloud"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Utf8PathBuf::from("/nonexistent/input.txt");
        assert!(read_input_file(&path, None).is_err());
    }
}
