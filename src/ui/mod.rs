//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* dial engine and turns it into cells on the
//! terminal.  No file I/O happens here.

pub mod dial_widget;
pub mod layout;
pub mod theme;
