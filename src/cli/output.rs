//! Terminal output formatting with colors
//!
//! Writers are passed in so callers (and tests) choose the destination.
//! `colored` already respects NO_COLOR, CLICOLOR and CLICOLOR_FORCE; the
//! `color` argument switches styling off on top of that.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;

/// Print error (red bold "error:" prefix)
pub fn error(w: &mut dyn Write, msg: &(impl Display + ?Sized), color: bool) -> io::Result<()> {
    let label = if color {
        "error".red().bold().to_string()
    } else {
        "error".to_string()
    };
    writeln!(w, "{}: {}", label, msg)
}

/// Print hint line (dimmed when colored)
pub fn hint(w: &mut dyn Write, msg: &(impl Display + ?Sized), color: bool) -> io::Result<()> {
    if color {
        writeln!(w, "{}", msg.to_string().dimmed())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Print plain output (no color, for data)
pub fn info(w: &mut dyn Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}", msg)
}
