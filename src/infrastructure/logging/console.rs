//! Severity colors for console output.
//!
//! Styling is forced so lines are colored even when stdout is not a terminal.

use std::io::{self, Write};

use console::Style;

use crate::domain::models::ConsoleColor;

/// Wrap `line` in the ANSI color for `color`. Plain lines are returned as-is.
pub fn colorize(line: &str, color: ConsoleColor) -> String {
    let style = match color {
        ConsoleColor::Plain => return line.to_string(),
        ConsoleColor::Green => Style::new().green(),
        ConsoleColor::Yellow => Style::new().yellow(),
        ConsoleColor::Red => Style::new().red(),
    };

    style.force_styling(true).apply_to(line).to_string()
}

/// Console sink receiving one colored line per message
pub struct ConsoleWriter {
    out: Box<dyn Write + Send>,
}

impl ConsoleWriter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn write_line(&mut self, line: &str, color: ConsoleColor) -> io::Result<()> {
        writeln!(self.out, "{}", colorize(line, color))?;
        self.out.flush()
    }
}

impl std::fmt::Debug for ConsoleWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleWriter").finish_non_exhaustive()
    }
}
