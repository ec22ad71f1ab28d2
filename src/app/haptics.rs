//! Terminal "haptics": the closest thing a terminal has to a tactile tick is
//! the bell.

use std::io::Write;

use crate::core::error::HapticsError;
use crate::core::notify::Haptics;

/// Rings the terminal bell on every settle.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<std::io::Stderr> {
    /// Bell on stderr, where the TUI is drawn.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> Haptics for TerminalBell<W> {
    fn click(&mut self) -> Result<(), HapticsError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}
