use crate::render::DEFAULT_WIDTH;
use anyhow::Result;
use crossterm::{cursor::Show, execute};
use std::io::stdout;

/// Current terminal width in columns, or the default when it cannot be read.
pub fn width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .ok()
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Puts the terminal back into a normal state before exiting.
pub fn restore() -> Result<()> {
    if crossterm::terminal::is_raw_mode_enabled()? {
        crossterm::terminal::disable_raw_mode()?;
    }
    execute!(stdout(), Show)?;
    Ok(())
}
