//! Terminal output for query verdicts

use crate::server::{RESPONSE_EXISTS, RESPONSE_NOT_FOUND};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print a server verdict line, colorized when stdout is a terminal.
///
/// Green for a hit, yellow for a miss, red for an `Error:` line. The
/// text itself is printed exactly as received.
pub fn print_verdict(response: &str, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    if response == RESPONSE_EXISTS {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    } else if response == RESPONSE_NOT_FOUND {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    } else {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    }

    write!(stdout, "{}", response)?;
    stdout.reset()?;
    Ok(())
}
