//! Drag momentum
//!
//! Turns a stream of drag displacement samples into velocity and
//! acceleration, and projects how much further a fling should travel.
//! Units are sample units and milliseconds.

use lamina_core::{Clock, MomentumConfig, MonotonicClock};

/// Second-order fling estimator
#[derive(Debug, Clone)]
pub struct Momentum<C: Clock = MonotonicClock> {
    clock: C,
    duration_ms: f64,
    min_acceleration: f64,
    friction: f64,
    direction: i8,
    velocity: f64,
    acceleration: f64,
    previous_value: f64,
    previous_time: Option<f64>,
}

impl Momentum {
    /// Estimator on the monotonic clock with default thresholds
    pub fn new(duration_ms: f64) -> Self {
        Self::with_clock(duration_ms, MonotonicClock::new())
    }
}

impl<C: Clock> Momentum<C> {
    pub fn with_clock(duration_ms: f64, clock: C) -> Self {
        let defaults = MomentumConfig::default();
        Self {
            clock,
            duration_ms,
            min_acceleration: defaults.min_acceleration,
            friction: defaults.friction,
            direction: 0,
            velocity: 0.0,
            acceleration: 0.0,
            previous_value: 0.0,
            previous_time: None,
        }
    }

    pub fn with_config(config: &MomentumConfig, clock: C) -> Self {
        let mut momentum = Self::with_clock(config.duration_ms, clock);
        momentum.min_acceleration = config.min_acceleration;
        momentum.friction = config.friction;
        momentum
    }

    /// Change the projection window; running state is kept
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn min_acceleration(&self) -> f64 {
        self.min_acceleration
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// -1, +1, or 0 before the first sample
    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn reset(&mut self) {
        self.direction = 0;
        self.velocity = 0.0;
        self.acceleration = 0.0;
        self.previous_value = 0.0;
        self.previous_time = None;
    }

    /// Record a sample taken now
    pub fn inject_value(&mut self, value: f64) {
        let now = self.clock.now_ms();
        self.inject_value_at(value, now);
    }

    /// Record a sample taken at `time_ms`.
    ///
    /// A change of sign starts a new segment: velocity and acceleration are
    /// zero on that sample. Samples with no elapsed time only update the
    /// stored value.
    pub fn inject_value_at(&mut self, value: f64, time_ms: f64) {
        let direction = if value >= 0.0 { 1 } else { -1 };

        if direction != self.direction {
            self.direction = direction;
            self.velocity = 0.0;
            self.acceleration = 0.0;
        } else if let Some(previous_time) = self.previous_time {
            let elapsed = time_ms - previous_time;
            if elapsed != 0.0 {
                let velocity = (value - self.previous_value) / elapsed;
                self.acceleration = (velocity - self.velocity) / elapsed;
                self.velocity = velocity;
            }
        }

        self.previous_value = value;
        self.previous_time = Some(time_ms);
    }

    /// Remaining displacement over the projection window, or 0 when the
    /// acceleration does not exceed the threshold
    pub fn compute_delta(&self) -> f64 {
        if self.acceleration.abs() <= self.min_acceleration {
            return 0.0;
        }
        let d = self.duration_ms;
        self.velocity * d + self.acceleration * self.friction * d * d
    }
}
