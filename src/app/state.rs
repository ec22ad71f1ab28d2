//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use ratatui::layout::{Margin, Rect};

use crate::config::AppConfig;
use crate::core::dial::DialPicker;
use crate::core::error::DialError;
use crate::core::geometry::MeasureSpec;
use crate::ui::dial_widget::{dial_padding, row_height, viewport_for, CellMeasure};
use crate::ui::layout::AppLayout;

use super::haptics::TerminalBell;

/// Top-level application state.
pub struct AppState {
    pub picker: DialPicker,
    pub config: AppConfig,
    /// Item confirmed by the user; printed on exit.
    pub selected: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Screen regions from the last layout pass.
    pub layout: AppLayout,
    /// Area inside the dial's border; the picker is laid out for it.
    pub dial_area: Rect,
    terminal_area: Rect,
    /// Last item the picker settled on, written by its settle callback.
    settled: Rc<RefCell<Option<String>>>,
    /// Set by the picker's tap callback, consumed by the mouse handler.
    tapped: Rc<Cell<bool>>,
    started: Instant,
}

impl AppState {
    pub fn new(items: Vec<String>, config: AppConfig, position: usize) -> Result<Self, DialError> {
        let mut picker = DialPicker::new(items, config.dial.clone())?;
        picker.set_haptics(TerminalBell::stderr());
        picker.set_position(position as i64);

        let settled = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&settled);
        picker.on_snap(move |item| *sink.borrow_mut() = Some(item.to_string()));

        let tapped = Rc::new(Cell::new(false));
        let flag = Rc::clone(&tapped);
        picker.on_tap(move || flag.set(true));

        Ok(Self {
            picker,
            config,
            selected: None,
            should_quit: false,
            status_message: None,
            layout: AppLayout::from_area(Rect::default(), (0, 0)),
            dial_area: Rect::default(),
            terminal_area: Rect::default(),
            settled,
            tapped,
            started: Instant::now(),
        })
    }

    /// Milliseconds since startup, the clock pointer samples are stamped with.
    pub fn now_ms(&self) -> i64 {
        self.started.elapsed().as_millis() as i64
    }

    /// Engine units per terminal row.
    pub fn row_height(&self) -> f32 {
        row_height(self.picker.config().leading)
    }

    /// Re-measure and re-layout the dial when the terminal size or the
    /// list changed.
    pub fn sync_layout(&mut self, terminal: Rect) -> AppLayout {
        if terminal == self.terminal_area && !self.picker.needs_measure() {
            return self.layout;
        }
        self.terminal_area = terminal;

        let row_height = self.row_height();
        let (width, height) = self.picker.measure(
            MeasureSpec::Unspecified,
            MeasureSpec::Unspecified,
            dial_padding(),
            &CellMeasure { row_height },
        );
        // Two extra cells each way for the border.
        let size = (
            width.ceil() as u16 + 2,
            (height / row_height).ceil() as u16 + 2,
        );
        self.layout = AppLayout::from_area(terminal, size);

        let inner = self.layout.dial_area.inner(Margin::new(1, 1));
        self.dial_area = inner;
        self.picker.layout(viewport_for(inner, row_height));
        self.layout
    }

    /// Item the picker last announced.
    pub fn settled_item(&self) -> Option<String> {
        self.settled.borrow().clone()
    }

    /// Whether the last pointer release was a tap; clears the flag.
    pub fn take_tap(&self) -> bool {
        self.tapped.replace(false)
    }

    /// Confirm the centered item and stop.
    pub fn select(&mut self) {
        self.selected = Some(self.picker.current_item().to_string());
        self.should_quit = true;
    }

    pub fn toggle_haptics(&mut self) {
        let enabled = !self.picker.haptic_feedback_enabled();
        self.picker.set_haptic_feedback_enabled(enabled);
        self.status_message = Some(format!(
            "Haptic bell {}",
            if enabled { "on" } else { "off" }
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let items = ["a", "b", "c", "d", "e", "f"].map(String::from).to_vec();
        let mut config = AppConfig::default();
        config.dial.haptic_feedback = false;
        AppState::new(items, config, 2).unwrap()
    }

    #[test]
    fn test_first_layout_announces_start_item() {
        let mut state = state();
        assert_eq!(state.settled_item(), None);
        let layout = state.sync_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(state.settled_item().as_deref(), Some("c"));
        assert_eq!(state.dial_area, layout.dial_area.inner(Margin::new(1, 1)));
        // Five items two rows apart.
        assert_eq!(state.dial_area.height, 10);
    }

    #[test]
    fn test_select_records_centered_item() {
        let mut state = state();
        state.sync_layout(Rect::new(0, 0, 80, 24));
        state.select();
        assert!(state.should_quit);
        assert_eq!(state.selected.as_deref(), Some("c"));
    }

    #[test]
    fn test_toggle_haptics() {
        let mut state = state();
        state.toggle_haptics();
        assert!(state.picker.haptic_feedback_enabled());
        assert_eq!(state.status_message.as_deref(), Some("Haptic bell on"));
    }

    #[test]
    fn test_short_list_is_an_error() {
        let items = vec!["x".to_string(); 4];
        assert!(AppState::new(items, AppConfig::default(), 0).is_err());
    }
}
