//! Configuration for copy-to-play.
//!
//! Every value has a compile-time default and can be overridden through an
//! environment variable. Command-line flags take precedence over both (see
//! `main.rs`).

use std::path::PathBuf;

/// Data directory under `$HOME`.
const DEFAULT_DATA_DIR: &str = ".local/share/puzzler";

/// Fallback data directory when `HOME` is unset.
const DEV_DATA_DIR: &str = "./data";

/// Database file name inside the data directory.
const DB_FILE_NAME: &str = "puzzler.db";

/// Build puzzles fetched per query.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidPageSize { var: &'static str, value: String },
}

/// Get the data directory.
///
/// Priority:
/// 1. `PUZZLER_DATA_DIR` env variable if set
/// 2. `$HOME/.local/share/puzzler` if HOME is set
/// 3. `./data` as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PUZZLER_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_DATA_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Get the database path.
///
/// Priority:
/// 1. `PUZZLER_DB_PATH` env variable if set
/// 2. `puzzler.db` inside `data_dir`
pub fn get_db_path(data_dir: &std::path::Path) -> PathBuf {
    if let Ok(path) = std::env::var("PUZZLER_DB_PATH") {
        return PathBuf::from(path);
    }

    data_dir.join(DB_FILE_NAME)
}

/// Get the number of build puzzles fetched per query.
///
/// Unlike the path settings, a malformed `PUZZLER_PAGE_SIZE` is an error
/// rather than silently replaced by the default.
pub fn get_page_size() -> Result<u32, ConfigError> {
    match std::env::var("PUZZLER_PAGE_SIZE") {
        Ok(value) => parse_page_size("PUZZLER_PAGE_SIZE", &value),
        Err(_) => Ok(DEFAULT_PAGE_SIZE),
    }
}

/// Get the optional directory for rolling log files.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("PUZZLER_LOG_DIR").ok().map(PathBuf::from)
}

fn parse_page_size(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidPageSize {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_fallback() {
        // Returns the env override if PUZZLER_DATA_DIR happens to be set.
        let dir = get_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_db_path_defaults_into_data_dir() {
        if std::env::var("PUZZLER_DB_PATH").is_ok() {
            return;
        }
        let path = get_db_path(std::path::Path::new("/tmp/puzzler-data"));
        assert_eq!(path, PathBuf::from("/tmp/puzzler-data/puzzler.db"));
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("X", "250"), Ok(250));
        assert_eq!(parse_page_size("X", " 10 "), Ok(10));
        assert!(parse_page_size("X", "0").is_err());
        assert!(parse_page_size("X", "-3").is_err());
        assert!(parse_page_size("X", "many").is_err());
    }
}
