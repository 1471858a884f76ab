//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use catlog::{Config, LogDispatcher};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// In-memory console standing in for stdout
#[derive(Clone, Default)]
pub struct CapturedConsole(Arc<Mutex<Vec<u8>>>);

impl CapturedConsole {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("console output is UTF-8")
    }

    pub fn line_count(&self) -> usize {
        self.contents().lines().count()
    }
}

impl Write for CapturedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Dispatcher initialized in `dir` with default category `app` and a
/// captured console.
pub fn dispatcher_in(dir: &Path, config: Config) -> (LogDispatcher, CapturedConsole) {
    let console = CapturedConsole::default();
    let dispatcher = LogDispatcher::with_config(config).with_console_writer(console.clone());
    dispatcher.init(dir, "app").expect("init should succeed");
    (dispatcher, console)
}

/// Config without source locations so line contents are predictable
pub fn quiet_config() -> Config {
    Config {
        include_location: false,
        ..Default::default()
    }
}

pub fn read_lines(path: impl AsRef<Path>) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
