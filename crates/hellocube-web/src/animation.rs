//! Per-frame spin animation

use bevy::prelude::*;
use hellocube_core::{FrameClock, SpinRate};
use std::f32::consts::TAU;

/// Continuous rotation, accumulated as XYZ Euler angles kept within [0, 2π)
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin {
    pub rate: SpinRate,
    pub angles: Vec3,
}

impl Spin {
    pub fn new(rate: SpinRate) -> Self {
        Self {
            rate,
            angles: Vec3::ZERO,
        }
    }
}

/// Timestamp of the previous animation frame
#[derive(Resource, Default, Deref, DerefMut)]
pub struct AnimationClock(pub FrameClock);

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationClock>()
            .add_systems(Update, spin_objects);
    }
}

fn spin_objects(
    time: Res<Time>,
    mut clock: ResMut<AnimationClock>,
    mut spinning: Query<(&mut Spin, &mut Transform)>,
) {
    let delta_ms = clock.tick(time.elapsed_secs_f64() * 1000.0);

    for (mut spin, mut transform) in &mut spinning {
        let step = spin.rate.advance(delta_ms);
        // Wrapped so long sessions keep full f32 precision
        spin.angles = (spin.angles + step).rem_euclid(Vec3::splat(TAU));
        transform.rotation =
            Quat::from_euler(EulerRot::XYZ, spin.angles.x, spin.angles.y, spin.angles.z);
    }
}
