//! Logging infrastructure
//!
//! File and console plumbing behind the dispatcher:
//! - Category store (one open file per category)
//! - Size-based rollover
//! - Severity colors and line formatting
//! - Tracing bridge
pub mod bridge;
pub mod category;
pub mod console;
pub mod line;
pub mod rotation;

pub use bridge::CategoryLayer;
pub use category::{CategoryRegistry, LogCategory, LOG_EXTENSION, RESERVED_CATEGORIES};
pub use console::ConsoleWriter;
pub use rotation::{next_rollover_index, rollover_path, LogRotator};
