/// Message severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Critical,
    Fatal,
}

/// Console color for a severity. `Plain` means the line is written uncolored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleColor {
    Plain,
    Green,
    Yellow,
    Red,
}

impl Severity {
    /// Three-letter code written into every log line.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Debug => "DBG",
            Self::Info => "INF",
            Self::Warning => "WRN",
            Self::Critical => "CRI",
            Self::Fatal => "FAT",
        }
    }

    pub const fn color(self) -> ConsoleColor {
        match self {
            Self::Debug => ConsoleColor::Green,
            Self::Info => ConsoleColor::Plain,
            Self::Warning => ConsoleColor::Yellow,
            Self::Critical | Self::Fatal => ConsoleColor::Red,
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Self::Critical
        } else if level == tracing::Level::WARN {
            Self::Warning
        } else if level == tracing::Level::INFO {
            Self::Info
        } else {
            Self::Debug
        }
    }
}
