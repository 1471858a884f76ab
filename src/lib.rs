//! Catlog - category-aware file logging
//!
//! Every message is timestamped, printed to the console in a color matching
//! its severity, appended to one unified default file and to a file of its
//! own category. Files that grow past a size limit are rolled over to
//! `<category>.log.<index>`.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): severities, configuration, records and errors
//! - **Service Layer** (`services`): the dispatcher facade and listener fan-out
//! - **Infrastructure Layer** (`infrastructure`): category files, rollover,
//!   console colors, config loading and the `tracing` bridge
//!
//! # Example
//!
//! ```no_run
//! use catlog::{LogDispatcher, Severity};
//!
//! let dispatcher = LogDispatcher::new();
//! dispatcher.init("/tmp/logs", "app").expect("log directory must be writable");
//!
//! // Appended to /tmp/logs/app.log and /tmp/logs/net.log
//! dispatcher
//!     .handle_message(Severity::Warning, "net", None, "connection lost")
//!     .expect("out of memory");
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{LogError, LogResult};
pub use domain::models::{Config, ConsoleColor, LogEvent, Severity, SourceLocation};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::bridge;
pub use infrastructure::logging::{next_rollover_index, rollover_path, CategoryLayer};
pub use services::LogDispatcher;
