//! Input handling: maps key/mouse events to dial operations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::config::Action;
use crate::core::roller::SLOTS;
use crate::ui::dial_widget::ROWS_PER_ITEM;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, whatever the bindings say.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    state.status_message = None;
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    tracing::debug!(?action, "key action");
    match action {
        Action::StepUp => state.picker.step(-1),
        Action::StepDown => state.picker.step(1),
        Action::PageUp => state.picker.step(-(SLOTS as i64)),
        Action::PageDown => state.picker.step(SLOTS as i64),
        Action::Select => state.select(),
        Action::ToggleHaptics => state.toggle_haptics(),
        Action::Quit => state.should_quit = true,
    }
}

/// Process a mouse event.  Left-button drags turn the dial, the wheel steps
/// it, and a click without a drag either steps to the clicked row or, on
/// the center row, selects.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let area = state.dial_area;
    let inside = area.contains(Position::new(mouse.column, mouse.row));
    let y = pointer_y(area, mouse.row, state.row_height());
    let now = state.now_ms();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            state.picker.pointer_down(y, now);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            state.picker.pointer_move(y, now);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.picker.pointer_up(y, now);
            if state.take_tap() {
                match rows_from_center(state, mouse.row) {
                    0 => state.select(),
                    rows => state.picker.step(rows),
                }
            }
        }
        MouseEventKind::ScrollUp if inside => state.picker.step(-1),
        MouseEventKind::ScrollDown if inside => state.picker.step(1),
        _ => {}
    }
}

/// Engine height of the middle of terminal `row`.
fn pointer_y(area: Rect, row: u16, row_height: f32) -> f32 {
    (row as f32 - area.y as f32 + 0.5) * row_height
}

/// Items between the center line and terminal `row`, rounded to the
/// nearest; negative above.
fn rows_from_center(state: &AppState, row: u16) -> i64 {
    let center = state.picker.geometry().center_y() / state.row_height();
    let clicked = row as f32 - state.dial_area.y as f32 + 0.5;
    ((clicked - center) / ROWS_PER_ITEM as f32).round() as i64
}
