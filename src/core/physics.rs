//! The two physical models driving the dial after release.
//!
//! [`Fling`] is a friction-only deceleration; [`Spring`] is a damped harmonic
//! oscillator pulling toward a target.  Both are closed-form, so a long frame
//! never makes them unstable, and both advance over a single scalar.

use std::time::Duration;

/// Scales the user-facing friction into the exponential drag coefficient.
const FRICTION_SCALE: f32 = -4.2;

/// Velocity thresholds are this multiple of the value threshold.
const VELOCITY_THRESHOLD_MULTIPLIER: f32 = 62.5;

/// Value threshold as a fraction of the smallest visible change.
const THRESHOLD_MULTIPLIER: f32 = 0.75;

/// Friction-only deceleration seeded with a release velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fling {
    value: f32,
    velocity: f32,
    drag: f32,
    velocity_threshold: f32,
}

impl Fling {
    pub fn new(value: f32, velocity: f32, friction: f32, min_visible_change: f32) -> Self {
        Self {
            value,
            velocity,
            drag: FRICTION_SCALE * friction.max(f32::EPSILON),
            velocity_threshold: min_visible_change
                * THRESHOLD_MULTIPLIER
                * VELOCITY_THRESHOLD_MULTIPLIER,
        }
    }

    /// Advance by `dt`.  Returns `true` once the fling has died out on its own.
    pub fn step(&mut self, dt: Duration) -> bool {
        let t = dt.as_secs_f32();
        let decay = (self.drag * t).exp();
        self.value += self.velocity / self.drag * (decay - 1.0);
        self.velocity *= decay;
        self.is_at_rest()
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity.abs() < self.velocity_threshold
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

/// Spring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringForce {
    pub stiffness: f32,
    pub damping_ratio: f32,
}

/// A damped spring animating one value toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    force: SpringForce,
    value_threshold: f32,
    velocity_threshold: f32,
}

impl Spring {
    pub fn new(
        value: f32,
        velocity: f32,
        target: f32,
        force: SpringForce,
        min_visible_change: f32,
    ) -> Self {
        let value_threshold = min_visible_change * THRESHOLD_MULTIPLIER;
        Self {
            value,
            velocity,
            target,
            force: SpringForce {
                stiffness: force.stiffness.max(f32::EPSILON),
                damping_ratio: force.damping_ratio.max(0.0),
            },
            value_threshold,
            velocity_threshold: value_threshold * VELOCITY_THRESHOLD_MULTIPLIER,
        }
    }

    /// Advance by `dt`.  Returns `true` when the spring has settled; the value
    /// is then exactly the target.
    pub fn step(&mut self, dt: Duration) -> bool {
        let t = dt.as_secs_f32();
        let omega = self.force.stiffness.sqrt();
        let zeta = self.force.damping_ratio;
        let x0 = self.value - self.target;
        let v0 = self.velocity;

        let (x, v) = if zeta > 1.0 {
            let root = (zeta * zeta - 1.0).sqrt();
            let gamma_plus = -zeta * omega + omega * root;
            let gamma_minus = -zeta * omega - omega * root;
            let coeff_b = (gamma_minus * x0 - v0) / (gamma_minus - gamma_plus);
            let coeff_a = x0 - coeff_b;
            let e_minus = (gamma_minus * t).exp();
            let e_plus = (gamma_plus * t).exp();
            (
                coeff_a * e_minus + coeff_b * e_plus,
                coeff_a * gamma_minus * e_minus + coeff_b * gamma_plus * e_plus,
            )
        } else if zeta == 1.0 {
            let coeff_a = x0;
            let coeff_b = v0 + omega * x0;
            let e = (-omega * t).exp();
            let x = (coeff_a + coeff_b * t) * e;
            (x, x * -omega + coeff_b * e)
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let cos_coeff = x0;
            let sin_coeff = (zeta * omega * x0 + v0) / damped;
            let e = (-zeta * omega * t).exp();
            let (sin, cos) = (damped * t).sin_cos();
            let x = e * (cos_coeff * cos + sin_coeff * sin);
            let v = x * -omega * zeta + e * (-damped * cos_coeff * sin + damped * sin_coeff * cos);
            (x, v)
        };

        self.value = self.target + x;
        self.velocity = v;

        if self.is_at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            return true;
        }
        false
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity.abs() < self.velocity_threshold
            && (self.value - self.target).abs() < self.value_threshold
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Move the target while keeping position and velocity continuous.
    pub fn retarget(&mut self, target: f32) {
        self.target = target;
    }
}
