//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Screen layout: the dial box centered above a one-line status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub dial_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// `dial_size` is the dial box's preferred (width, height) in cells,
    /// borders included; it is shrunk to fit.
    pub fn from_area(area: Rect, dial_size: (u16, u16)) -> Self {
        let [main, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let [column] = Layout::horizontal([Constraint::Length(dial_size.0)])
            .flex(Flex::Center)
            .areas(main);
        let [dial_area] = Layout::vertical([Constraint::Length(dial_size.1)])
            .flex(Flex::Center)
            .areas(column);

        Self {
            dial_area,
            status_area,
        }
    }
}
