//! Frame timing and spin rates for the animation loop

use glam::Vec3;

/// Tracks the previous frame timestamp to derive per-frame deltas.
///
/// The very first tick has nothing to compare against and yields a zero delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    previous_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `timestamp_ms` and return milliseconds since the previous tick
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let delta = timestamp_ms - self.previous_ms.unwrap_or(timestamp_ms);
        self.previous_ms = Some(timestamp_ms);
        delta
    }

    pub fn previous(&self) -> Option<f64> {
        self.previous_ms
    }
}

/// Angular velocity around each local axis, in radians per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpinRate {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SpinRate {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euler angle increment (XYZ order) for a frame lasting `delta_ms`
    pub fn advance(&self, delta_ms: f64) -> Vec3 {
        let seconds = (delta_ms / 1000.0) as f32;
        Vec3::new(self.x, self.y, self.z) * seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.previous(), None);
        let delta = clock.tick(12_345.6);
        assert_eq!(delta, 0.0);
        assert!(!delta.is_nan());
        assert_eq!(clock.previous(), Some(12_345.6));
    }

    #[test]
    fn test_subsequent_ticks() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        assert_eq!(clock.tick(1016.0), 16.0);
        assert_eq!(clock.tick(1050.0), 34.0);
    }

    #[test]
    fn test_first_frame_does_not_rotate() {
        let mut clock = FrameClock::new();
        let spin = SpinRate::new(PI, PI / 2.0, 0.0);
        assert_eq!(spin.advance(clock.tick(500.0)), Vec3::ZERO);
    }

    #[test]
    fn test_advance_is_proportional() {
        let spin = SpinRate::new(PI, PI / 2.0, 0.0);
        let step = spin.advance(500.0);
        assert!((step.x - PI / 2.0).abs() < 1e-6);
        assert!((step.y - PI / 4.0).abs() < 1e-6);
        assert_eq!(step.z, 0.0);

        let yaw = SpinRate::new(0.0, 45f32.to_radians(), 0.0);
        assert!((yaw.advance(2000.0).y - 90f32.to_radians()).abs() < 1e-6);
        assert_eq!(SpinRate::default().advance(1000.0), Vec3::ZERO);
    }
}
