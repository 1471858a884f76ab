use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dispatcher configuration
///
/// `log_directory` and `default_category_name` are fixed by the first
/// successful `init`; `enabled` may be toggled at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Directory holding every category file (created if missing)
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// Name of the file that receives every message, without extension
    #[serde(default = "default_category_name")]
    pub default_category_name: String,

    /// Global logging switch
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Size in bytes above which a category file is rolled over
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Highest rollover suffix before wrapping back to 1
    #[serde(default = "default_max_rollover_index")]
    pub max_rollover_index: u32,

    /// Append ` (Location: file:line)` to lines that carry a source location
    #[serde(default = "default_include_location")]
    pub include_location: bool,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_category_name() -> String {
    "app".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_max_file_size_bytes() -> u64 {
    2 * 500 * 1024
}

const fn default_max_rollover_index() -> u32 {
    100
}

const fn default_include_location() -> bool {
    cfg!(debug_assertions)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            default_category_name: default_category_name(),
            enabled: true,
            max_file_size_bytes: default_max_file_size_bytes(),
            max_rollover_index: default_max_rollover_index(),
            include_location: default_include_location(),
        }
    }
}
