//! Orbit camera navigation (Y-up)

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

const MAX_ELEVATION: f32 = 1.5;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 40.0;

/// Tunables for mouse-driven orbiting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSettings {
    /// Radians per pixel of drag
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Fractional distance change per scroll line
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    /// Fraction of the remaining distance covered per 60 Hz frame
    #[serde(default = "default_smooth_factor")]
    pub smooth_factor: f32,
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

fn default_smooth_factor() -> f32 {
    0.15
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
            smooth_factor: default_smooth_factor(),
        }
    }
}

/// Spherical camera position around a focus point.
///
/// `distance`/`target` chase `target_distance`/`target_focus` so zoom and pan
/// ease in instead of jumping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3,
}

impl OrbitState {
    /// Derive the orbit that places the camera at `eye` looking at `target`
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let elevation = if offset.length_squared() > 0.0 {
            (offset.y / offset.length())
                .clamp(-1.0, 1.0)
                .asin()
                .clamp(-MAX_ELEVATION, MAX_ELEVATION)
        } else {
            0.0
        };
        let azimuth = offset.x.atan2(offset.z);

        Self {
            distance,
            target_distance: distance,
            azimuth,
            elevation,
            target,
            target_focus: target,
        }
    }

    /// Rotate around the focus point by a pointer drag in pixels
    pub fn orbit(&mut self, drag: Vec2, settings: &OrbitSettings) {
        self.azimuth -= drag.x * settings.sensitivity;
        self.elevation =
            (self.elevation + drag.y * settings.sensitivity).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Slide the focus point in the camera plane by a pointer drag in pixels
    pub fn pan(&mut self, drag: Vec2) {
        let (right, up) = self.camera_axes();
        let pan_speed = self.distance * 0.002;
        self.target_focus += (-right * drag.x + up * drag.y) * pan_speed;
    }

    /// Zoom by scroll lines (positive = closer)
    pub fn zoom(&mut self, lines: f32, settings: &OrbitSettings) {
        let factor = 1.0 - lines * settings.zoom_speed;
        self.target_distance = (self.target_distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Ease current values toward their targets over `dt` seconds
    pub fn smooth(&mut self, dt: f32, settings: &OrbitSettings) {
        let lerp = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
        self.distance += (self.target_distance - self.distance) * lerp;
        self.target += (self.target_focus - self.target) * lerp;
    }

    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.elevation.cos();
        self.target
            + Vec3::new(
                horizontal * self.azimuth.sin(),
                self.distance * self.elevation.sin(),
                horizontal * self.azimuth.cos(),
            )
    }

    fn camera_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        (right, up)
    }
}
