// crates/engine_shared/src/clock.rs

/// Frame time source. The platform runner advances it once per frame.
pub trait Clock {
    /// Seconds since the clock started.
    fn current(&self) -> f64;

    /// Seconds elapsed during the previous frame.
    fn delta_time(&self) -> f32;
}
