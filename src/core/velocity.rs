//! Release-velocity estimation from recent pointer samples.
//!
//! A small ring buffer of `(time, y)` samples; the velocity is the slope of a
//! recency-weighted least-squares line through the samples inside the
//! horizon.

const HISTORY_SIZE: usize = 20;

/// Gap between samples after which the pointer counts as having stopped.
const ASSUME_STOPPED_MS: i64 = 40;

/// Per-sample weight decay, newest sample first.
const DECAY: f32 = 0.95;

#[derive(Debug, Clone, Copy)]
struct Sample {
    time_ms: i64,
    y: f32,
}

/// One-dimensional velocity tracker.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
    horizon_ms: i64,
}

impl VelocityTracker {
    pub fn new(horizon_ms: u64) -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
            horizon_ms: horizon_ms.max(1) as i64,
        }
    }

    pub fn add(&mut self, time_ms: i64, y: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, y });
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Velocity in units/second, magnitude capped at `max_velocity`.
    pub fn velocity(&self, max_velocity: f32) -> f32 {
        let raw = self.raw_velocity();
        let cap = max_velocity.abs();
        raw.clamp(-cap, cap)
    }

    fn raw_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut window = [(0.0f32, 0.0f32); HISTORY_SIZE];
        let mut count = 0;
        let mut cursor = self.index;
        let mut newer = newest;
        while count < HISTORY_SIZE {
            let Some(sample) = self.samples[cursor] else {
                break;
            };
            let age = newest.time_ms - sample.time_ms;
            if age > self.horizon_ms || age < 0 {
                break;
            }
            // A gap this long means the pointer stopped; older samples
            // describe a previous motion.
            if newer.time_ms - sample.time_ms > ASSUME_STOPPED_MS {
                break;
            }
            window[count] = (-(age as f32), sample.y);
            count += 1;
            newer = sample;
            cursor = (cursor + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }

        let mut sum_w = 0.0f32;
        let mut sum_t = 0.0f32;
        let mut sum_y = 0.0f32;
        let mut sum_tt = 0.0f32;
        let mut sum_ty = 0.0f32;
        for (i, &(t, y)) in window[..count].iter().enumerate() {
            let w = DECAY.powi(i as i32);
            sum_w += w;
            sum_t += w * t;
            sum_y += w * y;
            sum_tt += w * t * t;
            sum_ty += w * t * y;
        }

        let denom = sum_w * sum_tt - sum_t * sum_t;
        if denom.abs() < f32::EPSILON {
            return 0.0;
        }
        let per_ms = (sum_w * sum_ty - sum_t * sum_y) / denom;
        per_ms * 1000.0
    }
}
