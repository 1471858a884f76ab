use chrono::{DateTime, TimeZone};

use crate::domain::errors::LogResult;
use crate::domain::models::{Severity, SourceLocation};

/// Timestamp layout of every line: `yyyy-MM-dd hh:mm:ss:zzz`.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S:%3f";

/// Build `timestamp CODE category: message[ (Location: file:line)]`.
///
/// The buffer is reserved up front so allocation failure surfaces as
/// `LogError::OutOfMemory` instead of aborting.
pub fn format_line<Tz>(
    timestamp: &DateTime<Tz>,
    severity: Severity,
    category: &str,
    message: &str,
    location: Option<&SourceLocation>,
) -> LogResult<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = timestamp.format(TIME_FORMAT).to_string();
    let location = location.map(|l| format!(" (Location: {l})"));
    let code = severity.code();

    let mut line = String::new();
    line.try_reserve_exact(
        stamp.len() + code.len() + category.len() + message.len() + location.as_ref().map_or(0, String::len) + 4,
    )?;

    line.push_str(&stamp);
    line.push(' ');
    line.push_str(code);
    line.push(' ');
    line.push_str(category);
    line.push_str(": ");
    line.push_str(message);
    if let Some(location) = location {
        line.push_str(&location);
    }

    Ok(line)
}
