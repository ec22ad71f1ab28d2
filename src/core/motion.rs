//! Pointer motion and the fling → magnet hand-off.
//!
//! Exactly one source owns the scroll offset at any instant: the finger while
//! [`Phase::Dragging`], the fling while [`Phase::Flinging`], the magnet spring
//! while [`Phase::Settling`].  Hand-offs replace the phase wholesale, so a
//! cancelled animation leaves nothing behind.

use std::time::Duration;

use super::physics::{Fling, Spring, SpringForce};
use super::velocity::VelocityTracker;

/// Physics and gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    pub friction: f32,
    /// Below this speed (units/s) the fling hands off to the magnet.
    pub engage_speed: f32,
    pub spring: SpringForce,
    /// Release velocity cap, units/s.
    pub max_velocity: f32,
    /// Trailing window used for the release velocity.
    pub velocity_window_ms: u64,
    /// Smallest offset change worth animating.
    pub min_visible_change: f32,
    /// A release that travelled no further than this is a tap.
    pub tap_slop: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Dragging,
    Flinging(Fling),
    Settling(Spring),
}

/// Phase without its payload, for hosts and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Dragging,
    Flinging,
    Settling,
}

/// What a pointer release turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub velocity: f32,
    pub tap: bool,
}

/// Result of advancing the animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Nothing is animating.
    Still,
    Moved(f32),
    /// The fling slowed below the engage speed at `offset`.  The caller
    /// applies the offset, then starts the magnet with
    /// [`Motion::engage_magnet`] toward the now-current sticky target.
    Engage { offset: f32, velocity: f32 },
    /// The magnet reached its target.
    Settled(f32),
}

#[derive(Debug, Clone)]
pub struct Motion {
    phase: Phase,
    config: MotionConfig,
    anchor_y: f32,
    /// Offset a new drag is measured from.
    offset_at_release: f32,
    /// Largest distance the pointer strayed from the anchor.
    travel: f32,
    tracker: VelocityTracker,
}

impl Motion {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            phase: Phase::Idle,
            config,
            anchor_y: 0.0,
            offset_at_release: 0.0,
            travel: 0.0,
            tracker: VelocityTracker::new(config.velocity_window_ms),
        }
    }

    pub fn kind(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Dragging => PhaseKind::Dragging,
            Phase::Flinging(_) => PhaseKind::Flinging,
            Phase::Settling(_) => PhaseKind::Settling,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Flinging(_) | Phase::Settling(_))
    }

    pub fn offset_at_release(&self) -> f32 {
        self.offset_at_release
    }

    /// Drop any gesture or animation and park at `offset`.
    pub fn reset(&mut self, offset: f32) {
        self.phase = Phase::Idle;
        self.offset_at_release = offset;
    }

    /// Shift the drag reference after the host rebased the offset.
    pub fn rebase(&mut self, delta: f32) {
        self.offset_at_release += delta;
    }

    /// Start a drag at the dial's current `offset`, cancelling any fling or
    /// magnet where it stands.
    pub fn pointer_down(&mut self, y: f32, time_ms: i64, offset: f32) {
        if self.is_animating() {
            tracing::debug!(phase = ?self.kind(), offset, "animation cancelled by pointer down");
        }
        self.offset_at_release = offset;
        self.phase = Phase::Dragging;
        self.anchor_y = y;
        self.travel = 0.0;
        self.tracker.reset();
        self.tracker.add(time_ms, y);
    }

    /// New offset for a drag sample, or `None` when no drag is active.
    pub fn pointer_move(&mut self, y: f32, time_ms: i64) -> Option<f32> {
        if !matches!(self.phase, Phase::Dragging) {
            return None;
        }
        self.tracker.add(time_ms, y);
        self.travel = self.travel.max((y - self.anchor_y).abs());
        Some((y - self.anchor_y) + self.offset_at_release)
    }

    /// End the drag at `offset` and start the release animation toward
    /// `sticky`.
    pub fn pointer_up(&mut self, y: f32, time_ms: i64, offset: f32, sticky: f32) -> Option<Release> {
        if !matches!(self.phase, Phase::Dragging) {
            return None;
        }
        self.tracker.add(time_ms, y);
        self.travel = self.travel.max((y - self.anchor_y).abs());
        self.offset_at_release = offset;

        let velocity = self.tracker.velocity(self.config.max_velocity);
        if velocity.abs() < self.config.engage_speed {
            self.engage_magnet(offset, velocity, sticky);
        } else {
            tracing::debug!(velocity, "fling started");
            self.phase = Phase::Flinging(Fling::new(
                offset,
                velocity,
                self.config.friction,
                self.config.min_visible_change,
            ));
        }

        Some(Release {
            velocity,
            tap: self.travel <= self.config.tap_slop,
        })
    }

    /// Start the magnet spring at `offset` toward `target`.
    pub fn engage_magnet(&mut self, offset: f32, velocity: f32, target: f32) {
        tracing::debug!(offset, velocity, target, "magnet engaged");
        self.phase = Phase::Settling(Spring::new(
            offset,
            velocity,
            target,
            self.config.spring,
            self.config.min_visible_change,
        ));
    }

    /// Where the magnet is heading, if it is running.
    pub fn magnet_target(&self) -> Option<f32> {
        match &self.phase {
            Phase::Settling(spring) => Some(spring.target()),
            _ => None,
        }
    }

    /// Send the dial to `target` from wherever it is now.  Ignored mid-drag.
    pub fn animate_to(&mut self, offset: f32, target: f32) {
        let velocity = match &mut self.phase {
            Phase::Dragging => return,
            Phase::Settling(spring) => {
                spring.retarget(target);
                return;
            }
            Phase::Flinging(fling) => fling.velocity(),
            Phase::Idle => 0.0,
        };
        self.engage_magnet(offset, velocity, target);
    }

    pub fn tick(&mut self, dt: Duration) -> Tick {
        match &mut self.phase {
            Phase::Idle | Phase::Dragging => Tick::Still,
            Phase::Flinging(fling) => {
                let finished = fling.step(dt);
                let offset = fling.value();
                let velocity = fling.velocity();
                if finished || velocity.abs() < self.config.engage_speed {
                    self.phase = Phase::Idle;
                    self.offset_at_release = offset;
                    Tick::Engage { offset, velocity }
                } else {
                    Tick::Moved(offset)
                }
            }
            Phase::Settling(spring) => {
                let settled = spring.step(dt);
                let offset = spring.value();
                if settled {
                    self.phase = Phase::Idle;
                    self.offset_at_release = offset;
                    Tick::Settled(offset)
                } else {
                    Tick::Moved(offset)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn config() -> MotionConfig {
        MotionConfig {
            friction: 1.0,
            engage_speed: 1000.0,
            spring: SpringForce {
                stiffness: 80.0,
                damping_ratio: 0.8,
            },
            max_velocity: 4000.0,
            velocity_window_ms: 1000,
            min_visible_change: 1.0,
            tap_slop: 8.0,
        }
    }

    #[test]
    fn test_drag_offsets_accumulate_across_gestures() {
        let mut motion = Motion::new(config());
        motion.reset(-35.0);

        motion.pointer_down(100.0, 0, -35.0);
        assert_eq!(motion.pointer_move(80.0, 100), Some(-55.0));
        motion.pointer_up(80.0, 300, -55.0, -35.0);

        motion.pointer_down(10.0, 1000, -55.0);
        assert_eq!(motion.pointer_move(15.0, 1100), Some(-50.0));
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut motion = Motion::new(config());
        assert_eq!(motion.pointer_move(10.0, 0), None);
        assert_eq!(motion.pointer_up(10.0, 0, 0.0, 0.0), None);
        assert_eq!(motion.kind(), PhaseKind::Idle);
    }

    #[test]
    fn test_slow_release_skips_fling() {
        let mut motion = Motion::new(config());
        motion.pointer_down(0.0, 0, 0.0);
        motion.pointer_move(-70.0, 500);
        let release = motion.pointer_up(-70.0, 1000, -70.0, -70.0).unwrap();
        assert_eq!(release.velocity, 0.0);
        assert!(!release.tap);
        assert_eq!(motion.kind(), PhaseKind::Settling);
        assert_eq!(motion.magnet_target(), Some(-70.0));
    }

    #[test]
    fn test_fast_release_flings_then_engages() {
        let mut motion = Motion::new(config());
        motion.pointer_down(0.0, 0, 0.0);
        for i in 1..=5 {
            motion.pointer_move(-(i as f32) * 40.0, i * 10);
        }
        let release = motion.pointer_up(-200.0, 50, -200.0, -175.0).unwrap();
        assert!(release.velocity <= -1000.0);
        assert_eq!(motion.kind(), PhaseKind::Flinging);

        let mut frames = 0;
        loop {
            frames += 1;
            assert!(frames < 500);
            match motion.tick(FRAME) {
                Tick::Moved(_) => assert_eq!(motion.kind(), PhaseKind::Flinging),
                Tick::Engage { velocity, .. } => {
                    assert!(velocity.abs() < 1000.0);
                    break;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(motion.kind(), PhaseKind::Idle);
    }

    #[test]
    fn test_magnet_settles_and_updates_release_offset() {
        let mut motion = Motion::new(config());
        motion.engage_magnet(-20.0, 0.0, -35.0);
        let mut settled = None;
        for _ in 0..1000 {
            if let Tick::Settled(offset) = motion.tick(FRAME) {
                settled = Some(offset);
                break;
            }
        }
        assert_eq!(settled, Some(-35.0));
        assert_eq!(motion.offset_at_release(), -35.0);
        assert_eq!(motion.tick(FRAME), Tick::Still);
    }

    #[test]
    fn test_pointer_down_cancels_animation() {
        let mut motion = Motion::new(config());
        motion.engage_magnet(0.0, 500.0, -70.0);
        let offset = match motion.tick(FRAME) {
            Tick::Moved(offset) => offset,
            other => panic!("unexpected {other:?}"),
        };
        motion.pointer_down(5.0, 0, offset);
        assert_eq!(motion.kind(), PhaseKind::Dragging);
        assert_eq!(motion.tick(FRAME), Tick::Still);
        assert_eq!(motion.pointer_move(5.0, 16), Some(offset));
    }

    #[test]
    fn test_still_release_is_a_tap() {
        let mut motion = Motion::new(config());
        motion.pointer_down(50.0, 0, 0.0);
        motion.pointer_move(53.0, 30);
        let release = motion.pointer_up(52.0, 60, 0.0, 0.0).unwrap();
        assert!(release.tap);
    }

    #[test]
    fn test_animate_to_retargets_running_magnet() {
        let mut motion = Motion::new(config());
        motion.animate_to(0.0, -70.0);
        motion.tick(FRAME);
        motion.animate_to(0.0, -140.0);
        assert_eq!(motion.magnet_target(), Some(-140.0));
    }
}
