//! Log file rollover
//!
//! A category file that grows past the size limit is renamed to
//! `<category>.log.<index>` and a fresh file is started under the original
//! name. The index is one past the highest suffix already present in the
//! directory, wrapping back to 1 once `max_rollover_index` is exceeded, in
//! which case the old rotated file at that index is replaced.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::category::{CategoryRegistry, LogCategory, LOG_EXTENSION};
use crate::domain::errors::{LogError, LogResult};
use crate::domain::models::Config;

/// Path a category file is renamed to for a given rollover index.
pub fn rollover_path(log_directory: &Path, category: &str, index: u32) -> PathBuf {
    log_directory.join(format!("{category}{LOG_EXTENSION}.{index}"))
}

/// Next free rollover index for `category` in `log_directory`.
///
/// Only regular files named `<category>.log.<suffix>` are considered, where
/// the category is matched literally. The index is parsed from the text after
/// the last `.`; non-numeric suffixes are ignored. An unreadable directory
/// counts as empty.
pub fn next_rollover_index(log_directory: &Path, category: &str, max_rollover_index: u32) -> u32 {
    let prefix = format!("{category}{LOG_EXTENSION}.");

    let entries = match fs::read_dir(log_directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %log_directory.display(), error = %e, "failed to scan log directory");
            return 1;
        }
    };

    let mut available: u64 = 1;

    for entry in entries.filter_map(Result::ok) {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        if !file_name.starts_with(&prefix) {
            continue;
        }

        let Some((_, suffix)) = file_name.rsplit_once('.') else {
            continue;
        };

        if let Ok(index) = suffix.parse::<u32>() {
            available = available.max(u64::from(index) + 1);
        }
    }

    if available > u64::from(max_rollover_index) {
        debug!(category, max_rollover_index, "rollover index wrapped");
        return 1;
    }

    // available <= max_rollover_index, so it fits
    u32::try_from(available).unwrap_or(1)
}

/// Log file rotator with a size threshold and an index ceiling
#[derive(Debug, Clone)]
pub struct LogRotator {
    log_directory: PathBuf,
    /// Maximum file size in bytes before rotation
    max_file_size: u64,
    /// Highest suffix before wrapping back to 1
    max_rollover_index: u32,
}

impl LogRotator {
    pub fn new(log_directory: impl Into<PathBuf>, max_file_size: u64, max_rollover_index: u32) -> Self {
        Self {
            log_directory: log_directory.into(),
            max_file_size,
            max_rollover_index,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.log_directory.clone(),
            config.max_file_size_bytes,
            config.max_rollover_index,
        )
    }

    /// Check if a category file is past the size limit
    pub fn needs_rollover(&self, category: &LogCategory) -> bool {
        match category.size() {
            Ok(size) => size > self.max_file_size,
            Err(e) => {
                warn!(category = category.name(), error = %e, "failed to read category file size");
                false
            }
        }
    }

    /// Roll every oversized category over.
    ///
    /// Every oversized category is attempted and the failures returned. A
    /// category that failed keeps its oversized file and is retried on the
    /// next pass.
    pub fn perform_maintenance(&self, registry: &mut CategoryRegistry) -> Vec<LogError> {
        let oversized: Vec<String> = registry
            .names()
            .into_iter()
            .filter(|name| registry.get(name).is_some_and(|c| self.needs_rollover(c)))
            .collect();

        oversized
            .iter()
            .filter_map(|name| self.rotate(registry, name).err())
            .collect()
    }

    /// Rename the active file of `name` to its next rollover path and start
    /// a fresh one. Returns the rotated path.
    pub fn rotate(&self, registry: &mut CategoryRegistry, name: &str) -> LogResult<PathBuf> {
        let index = next_rollover_index(&self.log_directory, name, self.max_rollover_index);
        let target = rollover_path(&self.log_directory, name, index);

        if target.exists() {
            fs::remove_file(&target).map_err(|source| LogError::RolloverRemove {
                path: target.clone(),
                source,
            })?;
            debug!(path = %target.display(), "removed rollover file being reused");
        }

        let Some(current) = registry.remove(name) else {
            return Err(LogError::CategoryOpen {
                category: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        };

        let active_path = current.path().to_path_buf();
        if let Err(e) = current.close() {
            warn!(category = name, error = %e, "failed to flush category before rollover");
        }

        if let Err(source) = fs::rename(&active_path, &target) {
            // Keep appending to the oversized file until a later pass succeeds
            match LogCategory::open(&self.log_directory, name) {
                Ok(reopened) => registry.insert(reopened),
                Err(e) => warn!(category = name, error = %e, "failed to reopen category after failed rollover"),
            }
            return Err(LogError::RolloverRename {
                from: active_path,
                to: target,
                source,
            });
        }

        let fresh = LogCategory::create(&self.log_directory, name).map_err(|source| {
            LogError::CategoryOpen {
                category: name.to_string(),
                source,
            }
        })?;
        registry.insert(fresh);

        info!(
            category = name,
            old_path = %active_path.display(),
            new_path = %target.display(),
            index,
            "rotated log file"
        );

        Ok(target)
    }
}
