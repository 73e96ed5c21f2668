//! Translate gizmo state and pointer-ray hit testing

use glam::Vec3;

/// Which scene object a gizmo manipulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoKind {
    /// The model container (demo cube or dropped model)
    Mesh,
    /// The directional light
    Light,
}

impl GizmoKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mesh => "mesh transform control",
            Self::Light => "light transform control",
        }
    }
}

/// Settings panel checkboxes; both gizmos start hidden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GizmoToggles {
    pub mesh_transform_control: bool,
    pub light_transform_control: bool,
}

impl GizmoToggles {
    pub fn is_visible(&self, kind: GizmoKind) -> bool {
        match kind {
            GizmoKind::Mesh => self.mesh_transform_control,
            GizmoKind::Light => self.light_transform_control,
        }
    }

    pub fn set(&mut self, kind: GizmoKind, visible: bool) {
        match kind {
            GizmoKind::Mesh => self.mesh_transform_control = visible,
            GizmoKind::Light => self.light_transform_control = visible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(&self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// World-space pointer ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameters `(t, s)` of the closest points between this ray and the
    /// line `origin + s * axis`, or `None` when they are parallel
    pub fn closest_to_line(&self, origin: Vec3, axis: Vec3) -> Option<(f32, f32)> {
        let w0 = self.origin - origin;
        let a = self.direction.dot(self.direction);
        let b = self.direction.dot(axis);
        let c = axis.dot(axis);
        let d = self.direction.dot(w0);
        let e = axis.dot(w0);

        let denom = a * c - b * b;
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (b * e - c * d) / denom;
        let s = (a * e - b * d) / denom;
        Some((t, s))
    }
}

/// Axis handle under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisHit {
    pub axis: Axis,
    /// Position along the axis where the ray passes closest
    pub param: f32,
    pub distance: f32,
}

/// Find the axis handle (segment of `length` from `origin`) nearest to the
/// ray within `radius`
pub fn pick_axis(ray: &PickRay, origin: Vec3, length: f32, radius: f32) -> Option<AxisHit> {
    Axis::ALL
        .iter()
        .filter_map(|axis| {
            let (t, s) = ray.closest_to_line(origin, axis.unit())?;
            if t < 0.0 || !(0.0..=length).contains(&s) {
                return None;
            }
            let distance = ray.at(t).distance(origin + axis.unit() * s);
            (distance <= radius).then_some(AxisHit {
                axis: *axis,
                param: s,
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Position along `axis` through `origin` that the ray currently points at
pub fn drag_param(ray: &PickRay, origin: Vec3, axis: Axis) -> Option<f32> {
    ray.closest_to_line(origin, axis.unit()).map(|(_, s)| s)
}
