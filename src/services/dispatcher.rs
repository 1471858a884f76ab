//! Log dispatcher
//!
//! The single entry point for every message. One mutex serializes the whole
//! dispatch: console write, default file, category file, rollover
//! maintenance and listener notification. Lines from concurrent callers are
//! therefore never interleaved within a file.
//!
//! The host constructs the dispatcher, calls [`LogDispatcher::init`] before
//! spawning workers and shares it as an `Arc`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{LogError, LogResult};
use crate::domain::models::{Config, LogEvent, Severity, SourceLocation};
use crate::infrastructure::logging::category::{
    category_file_path, CategoryRegistry, LogCategory, RESERVED_CATEGORIES,
};
use crate::infrastructure::logging::console::ConsoleWriter;
use crate::infrastructure::logging::line::format_line;
use crate::infrastructure::logging::rotation::LogRotator;
use crate::services::notifier::Notifier;

/// Category used for the dispatcher's own error reports.
const INTERNAL_CATEGORY: &str = "default";

struct DispatcherState {
    config: Config,
    initialized: bool,
    registry: CategoryRegistry,
    rotator: LogRotator,
    console: ConsoleWriter,
    notifier: Notifier,
    /// Error reports waiting to be emitted after the message that caused them
    pending_reports: Vec<LogEvent>,
}

/// Category-aware log dispatcher
pub struct LogDispatcher {
    state: Mutex<DispatcherState>,
}

impl LogDispatcher {
    /// Create an uninitialized dispatcher with the default configuration
    /// writing colored lines to stdout.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rotator = LogRotator::from_config(&config);
        Self {
            state: Mutex::new(DispatcherState {
                config,
                initialized: false,
                registry: CategoryRegistry::new(),
                rotator,
                console: ConsoleWriter::stdout(),
                notifier: Notifier::new(),
                pending_reports: Vec::new(),
            }),
        }
    }

    /// Replace the console sink (stdout by default).
    #[must_use]
    pub fn with_console_writer(mut self, out: impl Write + Send + 'static) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .console = ConsoleWriter::new(out);
        self
    }

    fn lock(&self) -> MutexGuard<'_, DispatcherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create the log directory and open the default category file.
    ///
    /// Only the first successful call has any effect; later calls return
    /// `Ok(())` without touching the files, even with other arguments.
    /// Empty arguments are always rejected. Directory or default-file
    /// failures are fatal configuration errors (see [`LogError::is_fatal`]).
    pub fn init(&self, log_directory: impl AsRef<Path>, default_category_name: &str) -> LogResult<()> {
        let log_directory = log_directory.as_ref();

        if log_directory.as_os_str().is_empty() {
            return Err(LogError::InvalidArgument("Invalid log path provided".to_string()));
        }

        if default_category_name.is_empty() {
            return Err(LogError::InvalidArgument(
                "Invalid log name provided for the default log file".to_string(),
            ));
        }

        let mut state = self.lock();

        if state.initialized {
            debug!(path = %log_directory.display(), "dispatcher already initialized, ignoring init");
            return Ok(());
        }

        std::fs::create_dir_all(log_directory).map_err(|source| LogError::DirectoryCreation {
            path: log_directory.to_path_buf(),
            source,
        })?;

        let default_category =
            LogCategory::open(log_directory, default_category_name).map_err(|source| {
                LogError::DefaultFileOpen {
                    path: category_file_path(log_directory, default_category_name),
                    source,
                }
            })?;

        state.config.log_directory = log_directory.to_path_buf();
        state.config.default_category_name = default_category_name.to_string();
        state.rotator = LogRotator::from_config(&state.config);
        state.registry.insert(default_category);
        state.initialized = true;

        info!(
            path = %log_directory.display(),
            default_category = default_category_name,
            "log dispatcher initialized"
        );

        Ok(())
    }

    /// Initialize with the directory and default name held in the config.
    pub fn init_from_config(&self) -> LogResult<()> {
        let (directory, name) = {
            let state = self.lock();
            (
                state.config.log_directory.clone(),
                state.config.default_category_name.clone(),
            )
        };
        self.init(directory, &name)
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Dispatch one message.
    ///
    /// Empty messages and messages sent while logging is disabled are
    /// dropped. Category file failures are reported on the console and in
    /// the default file, never to the caller; the only error returned is
    /// [`LogError::OutOfMemory`].
    pub fn handle_message(
        &self,
        severity: Severity,
        category: &str,
        location: Option<&SourceLocation>,
        message: &str,
    ) -> LogResult<()> {
        if message.is_empty() {
            return Ok(());
        }

        let mut state = self.lock();

        if !state.config.enabled {
            return Ok(());
        }

        let location = location.filter(|_| state.config.include_location);
        let line = format_line(&Local::now(), severity, category, message, location)?;
        state.dispatch(severity, category, line);

        Ok(())
    }

    /// Dispatch without a source location.
    pub fn log(&self, severity: Severity, category: &str, message: &str) -> LogResult<()> {
        self.handle_message(severity, category, None, message)
    }

    pub fn debug(&self, category: &str, message: &str) -> LogResult<()> {
        self.log(Severity::Debug, category, message)
    }

    pub fn info(&self, category: &str, message: &str) -> LogResult<()> {
        self.log(Severity::Info, category, message)
    }

    pub fn warning(&self, category: &str, message: &str) -> LogResult<()> {
        self.log(Severity::Warning, category, message)
    }

    pub fn critical(&self, category: &str, message: &str) -> LogResult<()> {
        self.log(Severity::Critical, category, message)
    }

    /// Log at fatal severity. Terminating the process is left to the caller.
    pub fn fatal(&self, category: &str, message: &str) -> LogResult<()> {
        self.log(Severity::Fatal, category, message)
    }

    /// Turn logging on or off. Open files are left untouched.
    pub fn set_use_logs(&self, enabled: bool) {
        self.lock().config.enabled = enabled;
        debug!(enabled, "logging toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().config.enabled
    }

    /// Receive `(severity, line)` for every message dispatched from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<LogEvent> {
        self.lock().notifier.subscribe()
    }

    /// Roll over every oversized category file. Runs automatically after
    /// each dispatched message.
    pub fn perform_maintenance(&self) {
        let mut state = self.lock();
        if state.initialized {
            state.maintain();
            state.emit_reports();
        }
    }

    /// Flush and close one category. Safe to call on unknown or already
    /// cleaned categories; a later message reopens the file.
    pub fn clean_category(&self, name: &str) -> bool {
        self.lock().registry.clean(name)
    }

    /// Flush and close every category file.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.registry.clean_all();
        debug!("log dispatcher shut down");
    }

    pub fn config(&self) -> Config {
        self.lock().config.clone()
    }

    pub fn log_directory(&self) -> PathBuf {
        self.lock().config.log_directory.clone()
    }

    /// Names of the categories with an open file.
    pub fn open_categories(&self) -> Vec<String> {
        self.lock().registry.names()
    }
}

impl DispatcherState {
    fn has_own_file(&self, category: &str) -> bool {
        !RESERVED_CATEGORIES.contains(&category) && category != self.config.default_category_name
    }

    fn dispatch(&mut self, severity: Severity, category: &str, line: String) {
        if let Err(e) = self.console.write_line(&line, severity.color()) {
            warn!(error = %e, "failed to write log line to console");
        }

        if self.initialized {
            if let Err(source) = self.write_to_default(&line) {
                let category = self.config.default_category_name.clone();
                self.report(&LogError::CategoryWrite { category, source });
            }

            if self.has_own_file(category) {
                self.write_to_category(category, &line);
            }

            self.maintain();
        }

        self.notifier.emit(&LogEvent { severity, line });
        self.emit_reports();
    }

    fn emit_reports(&mut self) {
        for event in std::mem::take(&mut self.pending_reports) {
            self.notifier.emit(&event);
        }
    }

    fn write_to_default(&mut self, line: &str) -> std::io::Result<()> {
        let name = &self.config.default_category_name;
        self.registry
            .get_or_open(&self.config.log_directory, name)?
            .write_line(line)
    }

    fn write_to_category(&mut self, category: &str, line: &str) {
        let written = match self.registry.get_or_open(&self.config.log_directory, category) {
            Ok(entry) => entry.write_line(line).map_err(|source| LogError::CategoryWrite {
                category: category.to_string(),
                source,
            }),
            Err(source) => Err(LogError::CategoryOpen {
                category: category.to_string(),
                source,
            }),
        };

        if let Err(e) = written {
            self.report(&e);
        }
    }

    fn maintain(&mut self) {
        for failure in self.rotator.perform_maintenance(&mut self.registry) {
            self.report(&failure);
        }
    }

    /// Write an error as a critical line to the console and default file.
    /// Listeners get it after the event of the message being dispatched.
    fn report(&mut self, err: &LogError) {
        error!(error = %err, "log dispatcher error");

        let Ok(line) = format_line(
            &Local::now(),
            Severity::Critical,
            INTERNAL_CATEGORY,
            &format!("Log - {err}"),
            None,
        ) else {
            return;
        };

        let _ = self.console.write_line(&line, Severity::Critical.color());
        if self.initialized {
            let _ = self.write_to_default(&line);
        }
        self.pending_reports.push(LogEvent {
            severity: Severity::Critical,
            line,
        });
    }
}

impl Default for LogDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogDispatcher {
    fn drop(&mut self) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .registry
            .clean_all();
    }
}

impl std::fmt::Debug for LogDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("LogDispatcher")
            .field("config", &state.config)
            .field("initialized", &state.initialized)
            .field("categories", &state.registry.names())
            .finish_non_exhaustive()
    }
}
