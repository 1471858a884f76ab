//! Category store
//!
//! Maps a category name to its open log file. Entries are created lazily on
//! first use and exclusively own their writer, so dropping an entry flushes
//! and closes the file.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Extension appended to every category name.
pub const LOG_EXTENSION: &str = ".log";

/// Categories that only ever land in the default file.
pub const RESERVED_CATEGORIES: [&str; 2] = ["default", "main"];

/// Path of the active file for `name` inside `log_directory`.
pub fn category_file_path(log_directory: &Path, name: &str) -> PathBuf {
    log_directory.join(format!("{name}{LOG_EXTENSION}"))
}

fn check_name(name: &str) -> io::Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid category name '{name}'"),
        ));
    }
    Ok(())
}

/// One open category file
#[derive(Debug)]
pub struct LogCategory {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogCategory {
    /// Open (or create) the category file in append mode
    pub fn open(log_directory: &Path, name: &str) -> io::Result<Self> {
        check_name(name)?;
        let path = category_file_path(log_directory, name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self::from_file(name, path, file))
    }

    /// Create the category file, discarding any stale content
    pub fn create(log_directory: &Path, name: &str) -> io::Result<Self> {
        check_name(name)?;
        let path = category_file_path(log_directory, name);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self::from_file(name, path, file))
    }

    fn from_file(name: &str, path: PathBuf, file: File) -> Self {
        debug!(category = name, path = %path.display(), "opened category file");
        Self {
            name: name.to_string(),
            path,
            writer: BufWriter::new(file),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line and flush it to the file.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    /// Current size of the file on disk.
    pub fn size(&self) -> io::Result<u64> {
        self.writer.get_ref().metadata().map(|m| m.len())
    }

    /// Flush pending bytes and close the file.
    pub fn close(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Mapping from category name to its open file
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    categories: BTreeMap<String, LogCategory>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&LogCategory> {
        self.categories.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LogCategory> {
        self.categories.get_mut(name)
    }

    /// Return the open entry for `name`, opening its file on first use.
    pub fn get_or_open(&mut self, log_directory: &Path, name: &str) -> io::Result<&mut LogCategory> {
        if !self.categories.contains_key(name) {
            let category = LogCategory::open(log_directory, name)?;
            self.categories.insert(name.to_string(), category);
        }

        self.categories
            .get_mut(name)
            .ok_or_else(|| io::Error::other(format!("category '{name}' vanished after open")))
    }

    /// Register `category`, closing whatever entry it supersedes.
    pub fn insert(&mut self, category: LogCategory) {
        if let Some(previous) = self.categories.insert(category.name.clone(), category) {
            let name = previous.name.clone();
            if let Err(e) = previous.close() {
                warn!(category = %name, error = %e, "failed to flush superseded category");
            }
        }
    }

    /// Detach an entry without closing it.
    pub fn remove(&mut self, name: &str) -> Option<LogCategory> {
        self.categories.remove(name)
    }

    /// Flush and close one category. Returns `false` if it was not open.
    pub fn clean(&mut self, name: &str) -> bool {
        let Some(category) = self.categories.remove(name) else {
            return false;
        };

        if let Err(e) = category.close() {
            warn!(category = name, error = %e, "failed to flush category on close");
        }
        debug!(category = name, "closed category file");
        true
    }

    /// Flush and close every category.
    pub fn clean_all(&mut self) {
        for name in self.names() {
            self.clean(&name);
        }
    }

    /// Names of all open categories in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
