//! Orbit camera controls

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use hellocube_core::{OrbitSettings, OrbitState};

use crate::app::{ActiveScene, DemoSettings};
use crate::gizmo::GizmoDrag;
use crate::scene::MainCamera;
use crate::ui::PointerOverUi;

/// Pixel scroll deltas per wheel line
const PIXELS_PER_LINE: f32 = 100.0;

/// Orbit state of the main camera
#[derive(Debug, Clone, Copy, Resource)]
pub struct OrbitCamera {
    pub state: OrbitState,
    pub settings: OrbitSettings,
}

impl FromWorld for OrbitCamera {
    fn from_world(world: &mut World) -> Self {
        let eye = world.resource::<ActiveScene>().camera.position;
        let settings = world.resource::<DemoSettings>().controls.orbit;
        Self {
            state: OrbitState::looking_at(eye, Vec3::ZERO),
            settings,
        }
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .add_systems(Update, update_camera);
    }
}

pub(crate) fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    pointer_over_ui: Res<PointerOverUi>,
    gizmo_drag: Res<GizmoDrag>,
    time: Res<Time>,
) {
    // Always drain input so nothing queued leaks in once control resumes
    let total_motion: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    let scroll_lines: f32 = mouse_wheel
        .read()
        .map(|scroll| match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / PIXELS_PER_LINE,
        })
        .sum();

    // The settings panel and an active gizmo drag own the pointer
    let blocked = pointer_over_ui.0 || gizmo_drag.is_active();
    let OrbitCamera { state, settings } = &mut *orbit;

    if !blocked {
        if mouse_button.pressed(MouseButton::Left) {
            state.orbit(total_motion, settings);
        } else if mouse_button.pressed(MouseButton::Right) {
            state.pan(total_motion);
        }

        if scroll_lines != 0.0 {
            state.zoom(scroll_lines, settings);
        }
    }

    state.smooth(time.delta_secs(), settings);

    for mut transform in &mut camera_query {
        transform.translation = state.eye();
        transform.look_at(state.target, Vec3::Y);
    }
}
