pub mod config;
pub mod record;
pub mod severity;

pub use config::Config;
pub use record::{LogEvent, SourceLocation};
pub use severity::{ConsoleColor, Severity};
