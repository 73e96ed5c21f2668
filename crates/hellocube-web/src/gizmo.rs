//! Translate gizmos for the model container and the directional light
//!
//! Each gizmo shows three axis arrows while its settings checkbox is on.
//! Pressing near an arrow starts a drag that moves the target along that axis.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use hellocube_core::gizmo::{drag_param, pick_axis};
use hellocube_core::{Axis, AxisHit, GizmoKind, GizmoToggles, PickRay};

use crate::app::DemoSettings;
use crate::camera::update_camera;
use crate::scene::{MainCamera, SceneLight};
use crate::ui::PointerOverUi;

/// Translate handle attached to a scene object
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformGizmo {
    pub kind: GizmoKind,
    pub visible: bool,
}

impl TransformGizmo {
    pub fn new(kind: GizmoKind) -> Self {
        Self {
            kind,
            visible: false,
        }
    }
}

/// Checkbox state of the settings panel
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct PanelToggles(pub GizmoToggles);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub entity: Entity,
    pub axis: Axis,
    /// Axis parameter under the pointer when the drag started
    pub grab_param: f32,
    /// Target position when the drag started
    pub start: Vec3,
}

/// Gizmo drag in progress, if any
#[derive(Resource, Debug, Default)]
pub struct GizmoDrag(pub Option<ActiveDrag>);

impl GizmoDrag {
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

pub struct TransformGizmoPlugin;

impl Plugin for TransformGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelToggles>()
            .init_resource::<GizmoDrag>()
            .add_systems(
                Update,
                (
                    sync_gizmo_visibility,
                    drag_gizmos.before(update_camera),
                    draw_gizmos,
                )
                    .chain(),
            );
    }
}

/// Push checkbox changes onto the gizmo components
pub fn sync_gizmo_visibility(
    toggles: Res<PanelToggles>,
    mut gizmos: Query<(Entity, &mut TransformGizmo)>,
    mut drag: ResMut<GizmoDrag>,
) {
    if !toggles.is_changed() {
        return;
    }

    for (entity, mut gizmo) in &mut gizmos {
        let visible = toggles.is_visible(gizmo.kind);
        if gizmo.visible != visible {
            gizmo.visible = visible;
            tracing::debug!(kind = gizmo.kind.label(), visible, "Gizmo visibility changed");
        }

        // A hidden gizmo can't keep dragging
        if !visible && drag.0.is_some_and(|active| active.entity == entity) {
            drag.0 = None;
        }
    }
}

fn drag_gizmos(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut targets: Query<(Entity, &TransformGizmo, &mut Transform, Has<SceneLight>)>,
    settings: Res<DemoSettings>,
    pointer_over_ui: Res<PointerOverUi>,
    mut drag: ResMut<GizmoDrag>,
) {
    if !mouse_button.pressed(MouseButton::Left) {
        if drag.0.take().is_some() {
            tracing::debug!("Gizmo drag finished");
        }
        return;
    }

    let Some(ray) = cursor_ray(&windows, &cameras) else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) {
        if pointer_over_ui.0 {
            return;
        }
        let candidates = targets
            .iter()
            .filter(|(_, gizmo, _, _)| gizmo.visible)
            .map(|(entity, _, transform, _)| (entity, transform.translation));
        let controls = &settings.controls;
        if let Some((entity, start, hit)) =
            nearest_handle(&ray, candidates, controls.gizmo_length, controls.gizmo_pick_radius)
        {
            tracing::debug!(axis = ?hit.axis, "Gizmo drag started");
            drag.0 = Some(ActiveDrag {
                entity,
                axis: hit.axis,
                grab_param: hit.param,
                start,
            });
        }
        return;
    }

    let Some(active) = drag.0 else {
        return;
    };
    let Ok((_, gizmo, mut transform, is_light)) = targets.get_mut(active.entity) else {
        drag.0 = None;
        return;
    };
    if !gizmo.visible {
        drag.0 = None;
        return;
    }

    if let Some(param) = drag_param(&ray, active.start, active.axis) {
        transform.translation = active.start + active.axis.unit() * (param - active.grab_param);
        if is_light {
            // Directional lights keep shining at the origin
            transform.look_at(Vec3::ZERO, Vec3::Y);
        }
    }
}

fn draw_gizmos(
    mut painter: Gizmos,
    targets: Query<(Entity, &TransformGizmo, &GlobalTransform)>,
    settings: Res<DemoSettings>,
    drag: Res<GizmoDrag>,
) {
    let length = settings.controls.gizmo_length;

    for (entity, gizmo, global) in &targets {
        if !gizmo.visible {
            continue;
        }
        let origin = global.translation();
        for axis in Axis::ALL {
            let dragging = drag
                .0
                .is_some_and(|active| active.entity == entity && active.axis == axis);
            let color = if dragging {
                Color::srgb(1.0, 0.9, 0.1)
            } else {
                axis_color(axis)
            };
            painter.arrow(origin, origin + axis.unit() * length, color);
        }
    }
}

fn axis_color(axis: Axis) -> Color {
    match axis {
        Axis::X => Color::srgb(0.9, 0.2, 0.2),
        Axis::Y => Color::srgb(0.2, 0.8, 0.2),
        Axis::Z => Color::srgb(0.2, 0.4, 0.9),
    }
}

fn cursor_ray(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<PickRay> {
    let cursor = windows.single().ok()?.cursor_position()?;
    let (camera, camera_transform) = cameras.single().ok()?;
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    Some(PickRay::new(ray.origin, *ray.direction))
}

/// Closest axis handle among all gizmo origins
fn nearest_handle(
    ray: &PickRay,
    candidates: impl Iterator<Item = (Entity, Vec3)>,
    length: f32,
    radius: f32,
) -> Option<(Entity, Vec3, AxisHit)> {
    candidates
        .filter_map(|(entity, origin)| {
            pick_axis(ray, origin, length, radius).map(|hit| (entity, origin, hit))
        })
        .min_by(|a, b| a.2.distance.total_cmp(&b.2.distance))
}
