//! The five-row roller window.
//!
//! Only five rows are ever laid out.  When the strip is scrolled far enough
//! that the top row leaves the dial, that row is recycled to the bottom with
//! the next item index (and vice versa).  Which items occupy the rows is
//! derived from a wrapped raw counter, so the window stays correct no matter
//! how far the user has scrolled historically.

use super::counter::RollerCounter;
use super::error::DialError;

/// Number of visible rows.
pub const SLOTS: usize = 5;

/// Row holding the centered item.
pub const CENTER_SLOT: usize = SLOTS / 2;

/// Item indices and vertical positions of the five visible rows.
///
/// `indices[i]` and `positions[i]` always describe the same physical row;
/// both arrays are rotated together.
#[derive(Debug, Clone, PartialEq)]
pub struct RollerWindow {
    indices: [usize; SLOTS],
    positions: [f32; SLOTS],
    /// Item index held by slot 0.
    raw: RollerCounter,
    /// Item index held by the center slot.
    centered: RollerCounter,
    /// Offset at which the centered row sits exactly on the dial center.
    sticky: f32,
    leading: f32,
}

impl RollerWindow {
    pub fn new(len: usize, leading: f32) -> Result<Self, DialError> {
        let mut window = Self {
            indices: [0; SLOTS],
            positions: [0.0; SLOTS],
            raw: RollerCounter::new(len)?,
            centered: RollerCounter::new(len)?,
            sticky: 0.0,
            leading,
        };
        window.resync(0, 0.0);
        Ok(window)
    }

    /// Rebuild every row around `center` and park the sticky target at
    /// `rest_offset`.
    pub fn resync(&mut self, center: i64, rest_offset: f32) {
        self.centered.set(center);
        self.raw.set(center - CENTER_SLOT as i64);
        for (slot, (index, position)) in self
            .indices
            .iter_mut()
            .zip(self.positions.iter_mut())
            .enumerate()
        {
            *index = self.raw.value_with_offset(slot as i64);
            *position = (slot + 1) as f32 * self.leading;
        }
        self.sticky = rest_offset;
    }

    /// Recycle the top row to the bottom `times` times (content moves up,
    /// the centered item advances).
    pub fn shift_up(&mut self, times: usize) {
        let height = self.height();
        for _ in 0..times {
            self.positions[0] += height;
            self.positions.rotate_left(1);
            self.indices[0] = self.raw.value_with_offset(SLOTS as i64);
            self.indices.rotate_left(1);
            self.sticky -= self.leading;
            self.raw.advance(1);
            self.centered.advance(1);
        }
    }

    /// Recycle the bottom row to the top `times` times (content moves down,
    /// the centered item steps back).
    pub fn shift_down(&mut self, times: usize) {
        let height = self.height();
        for _ in 0..times {
            self.centered.advance(-1);
            self.raw.advance(-1);
            self.positions[SLOTS - 1] -= height;
            self.positions.rotate_right(1);
            self.indices[SLOTS - 1] = self.raw.value();
            self.indices.rotate_right(1);
            self.sticky += self.leading;
        }
    }

    /// Pull the row positions back to `[1..=5]·leading` so they do not grow
    /// without bound over a long session.  Returns the amount every offset
    /// (including the sticky target, which is updated here) must move by to
    /// keep the rows where they are on screen.
    pub fn rebase(&mut self) -> f32 {
        let delta = self.positions[0] - self.leading;
        for position in &mut self.positions {
            *position -= delta;
        }
        self.sticky += delta;
        delta
    }

    pub fn indices(&self) -> &[usize; SLOTS] {
        &self.indices
    }

    pub fn positions(&self) -> &[f32; SLOTS] {
        &self.positions
    }

    pub fn first_position(&self) -> f32 {
        self.positions[0]
    }

    pub fn last_position(&self) -> f32 {
        self.positions[SLOTS - 1]
    }

    pub fn centered(&self) -> usize {
        self.centered.value()
    }

    pub fn raw(&self) -> usize {
        self.raw.value()
    }

    pub fn sticky(&self) -> f32 {
        self.sticky
    }

    pub fn leading(&self) -> f32 {
        self.leading
    }

    /// Distance a row travels when it is recycled across the window.
    pub fn height(&self) -> f32 {
        SLOTS as f32 * self.leading
    }

    pub fn item_count(&self) -> usize {
        self.centered.max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consecutive(window: &RollerWindow) {
        let n = window.item_count();
        let idx = window.indices();
        for pair in idx.windows(2) {
            assert_eq!((pair[0] + 1) % n, pair[1], "indices {idx:?}");
        }
        let mut sorted = idx.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), SLOTS);

        let pos = window.positions();
        for pair in pos.windows(2) {
            assert_eq!(pair[1] - pair[0], window.leading());
        }
        assert_eq!(idx[CENTER_SLOT], window.centered());
        assert_eq!(idx[0], window.raw());
    }

    #[test]
    fn test_initial_window_for_five_items() {
        let window = RollerWindow::new(5, 70.0).unwrap();
        assert_eq!(window.indices(), &[3, 4, 0, 1, 2]);
        assert_eq!(window.positions(), &[70.0, 140.0, 210.0, 280.0, 350.0]);
        assert_eq!(window.centered(), 0);
    }

    #[test]
    fn test_shift_up_advances_center() {
        let mut window = RollerWindow::new(7, 10.0).unwrap();
        window.shift_up(1);
        assert_eq!(window.indices(), &[6, 0, 1, 2, 3]);
        assert_eq!(window.positions(), &[20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(window.centered(), 1);
        assert_eq!(window.sticky(), -10.0);
    }

    #[test]
    fn test_shift_down_steps_back() {
        let mut window = RollerWindow::new(7, 10.0).unwrap();
        window.shift_down(2);
        assert_eq!(window.indices(), &[3, 4, 5, 6, 0]);
        assert_eq!(window.centered(), 5);
        assert_eq!(window.sticky(), 20.0);
        assert_consecutive(&window);
    }

    #[test]
    fn test_shift_round_trip_restores_window() {
        for times in 0..12 {
            let start = RollerWindow::new(8, 70.0).unwrap();

            let mut up_down = start.clone();
            up_down.shift_up(times);
            up_down.shift_down(times);
            assert_eq!(up_down, start);

            let mut down_up = start.clone();
            down_up.shift_down(times);
            down_up.shift_up(times);
            assert_eq!(down_up, start);
        }
    }

    #[test]
    fn test_long_walks_keep_window_consecutive() {
        let mut window = RollerWindow::new(6, 5.0).unwrap();
        for step in 0..40 {
            if step % 3 == 0 {
                window.shift_down(step % 7);
            } else {
                window.shift_up(step % 5);
            }
            assert_consecutive(&window);
        }
    }

    #[test]
    fn test_rebase_keeps_rows_on_screen() {
        let mut window = RollerWindow::new(9, 70.0).unwrap();
        window.shift_up(4);
        let offset = window.sticky();
        let on_screen: Vec<f32> = window.positions().iter().map(|p| p + offset).collect();

        let delta = window.rebase();
        assert_eq!(delta, 280.0);
        assert_eq!(window.positions(), &[70.0, 140.0, 210.0, 280.0, 350.0]);
        let rebased: Vec<f32> = window
            .positions()
            .iter()
            .map(|p| p + offset + delta)
            .collect();
        assert_eq!(rebased, on_screen);
        assert_eq!(window.sticky(), offset + delta);
        assert_eq!(window.centered(), 4);
    }

    #[test]
    fn test_resync_places_center_in_middle_row() {
        let mut window = RollerWindow::new(10, 70.0).unwrap();
        window.shift_up(13);
        window.resync(9, -35.0);
        assert_eq!(window.indices(), &[7, 8, 9, 0, 1]);
        assert_eq!(window.positions(), &[70.0, 140.0, 210.0, 280.0, 350.0]);
        assert_eq!(window.sticky(), -35.0);
        assert_consecutive(&window);
    }
}
