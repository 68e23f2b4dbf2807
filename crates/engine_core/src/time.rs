// crates/engine_core/src/time.rs

use std::time::Instant;

use engine_shared::Clock;

/// Frame timer driven by the platform runner.
///
/// `tick` is called once per frame before the game updates. The delta is
/// clamped to 0.25s so dragging the window or sitting on a breakpoint doesn't
/// produce a giant step.
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed: f64,
    delta: f32,
    max_delta: f32,
}

impl FrameClock {
    pub const DEFAULT_MAX_DELTA: f32 = 0.25;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed: 0.0,
            delta: 0.0,
            max_delta: Self::DEFAULT_MAX_DELTA,
        }
    }

    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Advances to now and returns the clamped frame delta.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let frame_dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta = frame_dt.min(self.max_delta);
        self.elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        self.delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrameClock {
    fn current(&self) -> f64 {
        self.elapsed
    }

    fn delta_time(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn delta_is_clamped_but_elapsed_is_not() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta_time(), 0.0);

        let base = clock.start;
        let dt = clock.tick_at(base + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);

        let dt = clock.tick_at(base + Duration::from_secs(3));
        assert_eq!(dt, FrameClock::DEFAULT_MAX_DELTA);
        assert!((clock.current() - 3.0).abs() < 1e-9);
    }
}
