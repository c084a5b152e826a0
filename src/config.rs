// Runtime configuration.
// Resolves store files, key prefix, download root, and theme flag from the environment.

use std::env;
use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};

use crate::error::{Result, WidgetError};
use crate::store::keys::DEFAULT_PREFIX;

pub const PREFS_ENV: &str = "WINGTABLE_PREFS";
pub const WIDGET_PREFS_ENV: &str = "WINGTABLE_WIDGET_PREFS";
pub const KEY_PREFIX_ENV: &str = "WINGTABLE_KEY_PREFIX";
pub const DOWNLOAD_DIR_ENV: &str = "WINGTABLE_DOWNLOAD_DIR";
pub const DARK_ENV: &str = "WINGTABLE_DARK";

/// Configuration loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file shared with the application shell.
    pub prefs_path: PathBuf,
    /// JSON file holding per-widget toggle state.
    pub widget_prefs_path: PathBuf,
    /// Namespace prefix of every shell key.
    pub key_prefix: String,
    /// Root under which downloads land in `CQUT-Helper/`.
    pub download_dir: PathBuf,
    /// Whether the system is in dark mode.
    pub system_dark: bool,
    /// Where log files are written.
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to platform directories.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let dirs = ProjectDirs::from("", "", "wingtable");

        let data_dir = || {
            dirs.as_ref()
                .map(|d| d.data_dir().to_path_buf())
                .ok_or_else(|| WidgetError::Config("no home directory found".to_string()))
        };

        let prefs_path = match var(PREFS_ENV) {
            Some(path) => PathBuf::from(path),
            None => data_dir()?.join("shared_prefs.json"),
        };
        let widget_prefs_path = match var(WIDGET_PREFS_ENV) {
            Some(path) => PathBuf::from(path),
            None => data_dir()?.join("widget_prefs.json"),
        };
        let download_dir = match var(DOWNLOAD_DIR_ENV) {
            Some(path) => PathBuf::from(path),
            None => match UserDirs::new().and_then(|u| u.download_dir().map(|d| d.to_path_buf())) {
                Some(dir) => dir,
                None => data_dir()?.join("downloads"),
            },
        };
        let log_dir = match dirs.as_ref() {
            Some(d) => d.cache_dir().join("logs"),
            None => env::temp_dir().join("wingtable"),
        };

        Ok(Self {
            prefs_path,
            widget_prefs_path,
            key_prefix: lookup(KEY_PREFIX_ENV).unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            download_dir,
            system_dark: var(DARK_ENV).is_some_and(|v| parse_flag(&v)),
            log_dir,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
