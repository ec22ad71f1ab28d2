//! The dial picker engine.
//!
//! [`DialPicker`] ties the roller window, the motion state machine, the
//! geometry and the snap notifier together.  The host drives it with plain
//! method calls: `measure`/`layout` when its area changes, `pointer_*` for
//! input, `tick` once per frame while [`DialPicker::is_animating`], and
//! `draw` whenever it repaints.

use std::time::Duration;

use super::error::{DialError, MIN_ITEMS};
use super::geometry::{widest_item, Boundary, DialGeometry, MeasureSpec, Padding, Viewport};
use super::motion::{Motion, MotionConfig, PhaseKind, Tick};
use super::notify::{Haptics, SnapNotifier};
use super::physics::SpringForce;
use super::render::{DialCanvas, Rgba, TextAlign, TextMeasure, TextStyle};
use super::roller::{RollerWindow, CENTER_SLOT, SLOTS};

/// Styling and physics supplied once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DialConfig {
    pub text_color: Rgba,
    /// Color of the fade at the top and bottom edges.
    pub gradient_edge_color: Rgba,
    /// Color of the fade at the center line.
    pub gradient_middle_color: Rgba,
    /// Fraction of half the dial height covered by each fade.
    pub gradient_view_window: f32,
    pub text_size: f32,
    /// Vertical distance between rows.
    pub leading: f32,
    /// Label drawn to the right of the centered item.
    pub description: String,
    pub description_text_size: f32,
    pub description_start_padding: f32,
    pub magnet_damping_ratio: f32,
    pub magnet_stiffness: f32,
    /// Fling speed (units/s) below which the magnet takes over.
    pub magnet_engage_speed: f32,
    pub friction: f32,
    pub max_fling_velocity: f32,
    pub velocity_window_ms: u64,
    pub tap_slop: f32,
    pub min_visible_change: f32,
    pub haptic_feedback: bool,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            text_color: Rgba::BLACK,
            gradient_edge_color: Rgba::WHITE,
            gradient_middle_color: Rgba::TRANSPARENT,
            gradient_view_window: 0.9,
            text_size: 30.0,
            leading: 70.0,
            description: "Min".to_string(),
            description_text_size: 20.0,
            description_start_padding: 10.0,
            magnet_damping_ratio: 0.8,
            magnet_stiffness: 80.0,
            magnet_engage_speed: 1000.0,
            friction: 1.0,
            max_fling_velocity: 4000.0,
            velocity_window_ms: 1000,
            tap_slop: 8.0,
            min_visible_change: 1.0,
            haptic_feedback: true,
        }
    }
}

impl DialConfig {
    pub fn motion(&self) -> MotionConfig {
        MotionConfig {
            friction: self.friction,
            engage_speed: self.magnet_engage_speed,
            spring: SpringForce {
                stiffness: self.magnet_stiffness,
                damping_ratio: self.magnet_damping_ratio,
            },
            max_velocity: self.max_fling_velocity,
            velocity_window_ms: self.velocity_window_ms,
            min_visible_change: self.min_visible_change,
            tap_slop: self.tap_slop,
        }
    }
}

/// Whether the picker used a pointer event.  A release is never consumed so
/// an enclosing click handler still sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    NotConsumed,
}

/// The only state that survives instance recreation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedState {
    pub position: usize,
}

/// One of the five rows as it should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRow<'a> {
    pub index: usize,
    pub text: &'a str,
    pub baseline: f32,
    pub centered: bool,
}

#[derive(Debug)]
pub struct DialPicker {
    items: Vec<String>,
    config: DialConfig,
    window: RollerWindow,
    motion: Motion,
    geometry: DialGeometry,
    notifier: SnapNotifier,
    offset: f32,
    laid_out: bool,
    needs_measure: bool,
    needs_redraw: bool,
}

fn validate(items: &[String]) -> Result<(), DialError> {
    if items.len() < MIN_ITEMS {
        return Err(DialError::ListTooShort { len: items.len() });
    }
    Ok(())
}

impl DialPicker {
    pub fn new(items: Vec<String>, config: DialConfig) -> Result<Self, DialError> {
        validate(&items)?;
        let window = RollerWindow::new(items.len(), config.leading)?;
        Ok(Self {
            motion: Motion::new(config.motion()),
            geometry: DialGeometry::new(
                config.leading,
                config.gradient_view_window,
                config.description_start_padding,
            ),
            notifier: SnapNotifier::new(config.haptic_feedback),
            items,
            config,
            window,
            offset: 0.0,
            laid_out: false,
            needs_measure: true,
            needs_redraw: true,
        })
    }

    pub fn config(&self) -> &DialConfig {
        &self.config
    }

    // ── list & position ────────────────────────────────────────

    pub fn list(&self) -> &[String] {
        &self.items
    }

    /// Replace the items.  A list shorter than five is rejected and the
    /// current one stays in effect.
    pub fn set_list(&mut self, items: Vec<String>) -> Result<(), DialError> {
        validate(&items)?;
        let mut window = RollerWindow::new(items.len(), self.config.leading)?;
        window.resync(self.position() as i64, self.geometry.rest_offset());

        self.items = items;
        self.window = window;
        self.offset = self.window.sticky();
        self.motion.reset(self.offset);
        self.notifier.reset();
        self.needs_measure = true;
        self.needs_redraw = true;
        tracing::debug!(len = self.items.len(), "dial list replaced");

        if self.laid_out {
            self.notify_current();
        }
        Ok(())
    }

    /// Index of the centered item.
    pub fn position(&self) -> usize {
        self.window.centered()
    }

    /// Jump straight to `position` (wrapped into the list).  Any gesture or
    /// animation in flight is dropped.
    pub fn set_position(&mut self, position: i64) {
        self.window.resync(position, self.geometry.rest_offset());
        self.offset = self.window.sticky();
        self.motion.reset(self.offset);
        self.needs_redraw = true;
        if self.laid_out {
            self.notify_current();
        }
    }

    pub fn current_item(&self) -> &str {
        &self.items[self.position()]
    }

    pub fn save_state(&self) -> SavedState {
        SavedState {
            position: self.position(),
        }
    }

    pub fn restore_state(&mut self, state: SavedState) {
        self.set_position(state.position as i64);
    }

    // ── callbacks ──────────────────────────────────────────────

    /// Called with the centered item every time the dial settles on a new one.
    pub fn on_snap(&mut self, callback: impl FnMut(&str) + 'static) {
        self.notifier.set_on_snap(Box::new(callback));
    }

    /// Called when a pointer release did not travel far enough to be a drag.
    pub fn on_tap(&mut self, callback: impl FnMut() + 'static) {
        self.notifier.set_on_tap(Box::new(callback));
    }

    pub fn set_haptics(&mut self, haptics: impl Haptics + 'static) {
        self.notifier.set_haptics(Box::new(haptics));
    }

    pub fn set_haptic_feedback_enabled(&mut self, enabled: bool) {
        self.notifier.set_haptic_feedback(enabled);
    }

    pub fn haptic_feedback_enabled(&self) -> bool {
        self.notifier.haptic_feedback()
    }

    // ── layout ─────────────────────────────────────────────────

    /// `true` after the list changed until the next [`DialPicker::measure`].
    pub fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// Measure the text and return the size the dial wants.
    pub fn measure(
        &mut self,
        width: MeasureSpec,
        height: MeasureSpec,
        padding: Padding,
        measure: &dyn TextMeasure,
    ) -> (f32, f32) {
        let item_bounds = widest_item(&self.items, measure, self.config.text_size)
            .map(|(_, bounds)| bounds)
            .unwrap_or_default();
        let description_bounds =
            measure.text_bounds(&self.config.description, self.config.description_text_size);
        self.geometry.set_text_metrics(item_bounds, description_bounds);
        self.needs_measure = false;
        self.geometry.measure(width, height, padding)
    }

    /// Place the dial in `viewport`.  Re-centers the current item and drops
    /// any motion in flight.
    pub fn layout(&mut self, viewport: Viewport) {
        self.geometry.set_viewport(viewport);
        self.window
            .resync(self.position() as i64, self.geometry.rest_offset());
        self.offset = self.window.sticky();
        self.motion.reset(self.offset);
        self.laid_out = true;
        self.needs_redraw = true;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            center = self.geometry.center_y(),
            "dial laid out"
        );
        self.notify_current();
    }

    pub fn geometry(&self) -> &DialGeometry {
        &self.geometry
    }

    // ── input ──────────────────────────────────────────────────

    pub fn pointer_down(&mut self, y: f32, time_ms: i64) -> EventResult {
        self.motion.pointer_down(y, time_ms, self.offset);
        self.needs_redraw = true;
        EventResult::Consumed
    }

    pub fn pointer_move(&mut self, y: f32, time_ms: i64) -> EventResult {
        match self.motion.pointer_move(y, time_ms) {
            Some(offset) => {
                self.apply_offset(offset);
                EventResult::Consumed
            }
            None => EventResult::NotConsumed,
        }
    }

    pub fn pointer_up(&mut self, y: f32, time_ms: i64) -> EventResult {
        let sticky = self.window.sticky();
        if let Some(release) = self.motion.pointer_up(y, time_ms, self.offset, sticky) {
            if release.tap {
                self.notifier.tap();
            }
        }
        EventResult::NotConsumed
    }

    /// Animate `rows` items forward (positive) or back (negative).  Repeated
    /// steps while the magnet is running add up.
    pub fn step(&mut self, rows: i64) {
        if self.motion.kind() == PhaseKind::Dragging || rows == 0 {
            return;
        }
        let base = self
            .motion
            .magnet_target()
            .unwrap_or_else(|| self.window.sticky());
        let target = base - rows as f32 * self.config.leading;
        self.motion.animate_to(self.offset, target);
    }

    // ── animation ──────────────────────────────────────────────

    pub fn is_animating(&self) -> bool {
        self.motion.is_animating()
    }

    pub fn phase(&self) -> PhaseKind {
        self.motion.kind()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Advance the running fling or magnet by `dt`.  Returns `true` when the
    /// offset moved.
    pub fn tick(&mut self, dt: Duration) -> bool {
        match self.motion.tick(dt) {
            Tick::Still => false,
            Tick::Moved(offset) => {
                self.apply_offset(offset);
                true
            }
            Tick::Engage { offset, velocity } => {
                self.apply_offset(offset);
                self.motion
                    .engage_magnet(self.offset, velocity, self.window.sticky());
                true
            }
            Tick::Settled(offset) => {
                self.apply_offset(offset);
                let delta = self.window.rebase();
                self.offset += delta;
                self.motion.rebase(delta);
                self.notify_current();
                true
            }
        }
    }

    /// Take the redraw request raised by the last offset change.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    fn apply_offset(&mut self, offset: f32) {
        self.offset = offset;
        self.needs_redraw = true;
        if !self.laid_out {
            return;
        }

        let boundary = self.geometry.boundary(
            offset,
            self.window.first_position(),
            self.window.last_position(),
        );
        match boundary {
            Boundary::Inside => return,
            Boundary::CrossedTop(rows) => self.window.shift_up(rows),
            Boundary::CrossedBottom(rows) => self.window.shift_down(rows),
        }
        tracing::trace!(?boundary, position = self.position(), "dial window shifted");
    }

    fn notify_current(&mut self) {
        let index = self.window.centered();
        self.notifier.notify(index, &self.items[index]);
    }

    // ── drawing ────────────────────────────────────────────────

    /// The five rows, top to bottom on screen.
    pub fn rows(&self) -> [VisibleRow<'_>; SLOTS] {
        let indices = self.window.indices();
        let positions = self.window.positions();
        std::array::from_fn(|slot| VisibleRow {
            index: indices[slot],
            text: &self.items[indices[slot]],
            baseline: self.geometry.baseline(self.offset, positions[slot]),
            centered: slot == CENTER_SLOT,
        })
    }

    pub fn draw(&self, canvas: &mut dyn DialCanvas) {
        if !self.laid_out || !self.geometry.is_drawable() {
            return;
        }

        let item_style = TextStyle {
            color: self.config.text_color,
            size: self.config.text_size,
            align: TextAlign::Center,
        };
        let x = self.geometry.text_x();
        for row in self.rows() {
            canvas.draw_text(row.text, x, row.baseline, &item_style);
        }

        if !self.config.description.is_empty() {
            let description_style = TextStyle {
                color: self.config.text_color,
                size: self.config.description_text_size,
                align: TextAlign::Left,
            };
            canvas.draw_text(
                &self.config.description,
                self.geometry.description_x(),
                self.geometry.description_baseline(),
                &description_style,
            );
        }

        let edge = self.config.gradient_edge_color;
        let middle = self.config.gradient_middle_color;
        let (rect, gradient) = self.geometry.upper_gradient(edge, middle);
        canvas.fill_gradient(rect, &gradient);
        let (rect, gradient) = self.geometry.lower_gradient(edge, middle);
        canvas.fill_gradient(rect, &gradient);
    }
}
