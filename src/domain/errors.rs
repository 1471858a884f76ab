//! Domain errors for the catlog logging facility.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while initializing or driving the dispatcher.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not create log directory {}: {source}", path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error("Could not open default log file {}: {source}", path.display())]
    DefaultFileOpen { path: PathBuf, source: io::Error },

    #[error("Could not open log file for category '{category}': {source}")]
    CategoryOpen { category: String, source: io::Error },

    #[error("Could not write to log file for category '{category}': {source}")]
    CategoryWrite { category: String, source: io::Error },

    #[error("Could not delete existing log file {}: {source}", path.display())]
    RolloverRemove { path: PathBuf, source: io::Error },

    #[error("Could not rename log file {} to {}: {source}", from.display(), to.display())]
    RolloverRename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Out of memory while formatting a log line")]
    OutOfMemory,

    #[error("Could not install tracing subscriber: {0}")]
    SubscriberInstall(String),
}

impl LogError {
    /// Configuration errors raised by `init`. The host must not continue
    /// in an unlogged state when one of these is returned.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::DirectoryCreation { .. } | Self::DefaultFileOpen { .. }
        )
    }
}

pub type LogResult<T> = Result<T, LogError>;

impl From<std::collections::TryReserveError> for LogError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_fatal() {
        let err = LogError::InvalidArgument("empty path".to_string());
        assert!(err.is_fatal());

        let err = LogError::DirectoryCreation {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn test_category_errors_are_not_fatal() {
        let err = LogError::CategoryOpen {
            category: "net".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(!err.is_fatal());
        assert!(!LogError::OutOfMemory.is_fatal());
    }

    #[test]
    fn test_rename_error_message_names_both_paths() {
        let err = LogError::RolloverRename {
            from: PathBuf::from("logs/net.log"),
            to: PathBuf::from("logs/net.log.3"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let message = err.to_string();
        assert!(message.contains("logs/net.log"));
        assert!(message.contains("logs/net.log.3"));
    }

    #[test]
    fn test_try_reserve_error_maps_to_out_of_memory() {
        let mut buf = String::new();
        let err: LogError = buf.try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(err, LogError::OutOfMemory));
    }
}
