//! Scene bootstrap: camera, lights, ground, demo cube and helpers

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::{DirectionalLightShadowMap, NotShadowCaster};
use bevy::prelude::*;
use hellocube_core::variant::{
    hex_to_rgb, AmbientDescription, CubeColors, CubeDescription, SpinTarget, ToneMapping,
};
use hellocube_core::GizmoKind;

use crate::animation::Spin;
use crate::app::ActiveScene;
use crate::gizmo::TransformGizmo;

/// Illuminance (lux) of a directional light with intensity 1
const DIRECTIONAL_LUX: f32 = 10_000.0;
/// Ambient brightness of an ambient light with intensity 1
const AMBIENT_BRIGHTNESS: f32 = 500.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Fixed parent of the demo cube and dropped models
#[derive(Component)]
pub struct ModelContainer;

/// Marker for the scene's directional light
#[derive(Component)]
pub struct SceneLight;

/// Marker for the demo cube
#[derive(Component)]
pub struct DemoCube;

/// Marker component for grid lines
#[derive(Component)]
pub struct GridLine;

/// Marker component for world axis indicator
#[derive(Component)]
pub struct WorldAxis;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

/// sRGB colour from `0xRRGGBB`
pub fn hex_color(hex: u32) -> Color {
    let [r, g, b] = hex_to_rgb(hex);
    Color::srgb(r, g, b)
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scene: Res<ActiveScene>,
) {
    let camera = scene.camera;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        match camera.tone_mapping {
            ToneMapping::None => Tonemapping::None,
            ToneMapping::Neutral => Tonemapping::TonyMcMapface,
        },
        Transform::from_translation(camera.position).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(AmbientLight {
        color: ambient_color(&scene.ambient),
        brightness: scene.ambient.intensity * AMBIENT_BRIGHTNESS,
        ..default()
    });

    let light = scene.directional;
    commands.spawn((
        DirectionalLight {
            color: hex_color(light.color),
            illuminance: light.intensity * DIRECTIONAL_LUX,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(light.position).looking_at(Vec3::ZERO, Vec3::Y),
        SceneLight,
        TransformGizmo::new(GizmoKind::Light),
    ));
    if let Some(size) = light.shadow_map_size {
        commands.insert_resource(DirectionalLightShadowMap { size });
    }

    // Ground receives shadows but never casts them
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(scene.ground_size, scene.ground_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_color(scene.ground_color),
            perceptual_roughness: 1.0,
            ..default()
        })),
        NotShadowCaster,
    ));

    let container = commands
        .spawn((
            Name::new("model container"),
            Transform::default(),
            Visibility::default(),
            ModelContainer,
            TransformGizmo::new(GizmoKind::Mesh),
        ))
        .id();

    let cube = commands
        .spawn((
            Name::new("demo cube"),
            Mesh3d(meshes.add(cube_mesh(&scene.cube))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: match scene.cube.colors {
                    CubeColors::Solid(hex) => hex_color(hex),
                    // Vertex colours carry the faces
                    CubeColors::PerFace(_) => Color::WHITE,
                },
                ..default()
            })),
            Transform::from_translation(scene.cube.position),
            DemoCube,
        ))
        .id();

    if scene.cube.in_container {
        commands.entity(container).add_child(cube);
    }

    let spinning = match scene.spin_target {
        SpinTarget::Container => container,
        SpinTarget::Cube => cube,
    };
    commands.entity(spinning).insert(Spin::new(scene.spin));

    spawn_helpers(&mut commands, &mut meshes, &mut materials, &scene);

    tracing::info!(variant = %scene.variant, "Scene ready");
}

/// Hemisphere lighting is approximated by the average of sky and ground
fn ambient_color(ambient: &AmbientDescription) -> Color {
    let sky = hex_to_rgb(ambient.color);
    match ambient.ground_color.map(hex_to_rgb) {
        Some(ground) => Color::srgb(
            (sky[0] + ground[0]) / 2.0,
            (sky[1] + ground[1]) / 2.0,
            (sky[2] + ground[2]) / 2.0,
        ),
        None => Color::srgb(sky[0], sky[1], sky[2]),
    }
}

fn cube_mesh(cube: &CubeDescription) -> Mesh {
    let mut mesh = Mesh::from(Cuboid::from_length(cube.size));

    if let CubeColors::PerFace(faces) = cube.colors {
        let vertex_colors: Option<Vec<[f32; 4]>> = mesh
            .attribute(Mesh::ATTRIBUTE_NORMAL)
            .and_then(|normals| normals.as_float3())
            .map(|normals| {
                normals
                    .iter()
                    .map(|n| {
                        let hex = faces[face_index(Vec3::from_array(*n))];
                        hex_color(hex).to_linear().to_f32_array()
                    })
                    .collect()
            });

        if let Some(colors) = vertex_colors {
            mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
        }
    }

    mesh
}

/// Face slot (+X, -X, +Y, -Y, +Z, -Z) an outward normal belongs to
fn face_index(normal: Vec3) -> usize {
    let abs = normal.abs();
    let (axis, component) = if abs.x >= abs.y && abs.x >= abs.z {
        (0, normal.x)
    } else if abs.y >= abs.z {
        (1, normal.y)
    } else {
        (2, normal.z)
    };
    axis * 2 + usize::from(component < 0.0)
}

fn spawn_helpers(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    scene: &ActiveScene,
) {
    // Grid on the X-Z plane, slightly above the ground to avoid z-fighting
    let half_extent = scene.grid_size / 2.0;
    let spacing = scene.grid_size / scene.grid_divisions.max(1) as f32;
    let thickness = 0.01;

    let line_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.3, 0.3, 0.3, 0.6),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let line_mesh_x = meshes.add(Cuboid::new(scene.grid_size, thickness, thickness));
    let line_mesh_z = meshes.add(Cuboid::new(thickness, thickness, scene.grid_size));

    for i in 0..=scene.grid_divisions {
        let offset = -half_extent + i as f32 * spacing;
        commands.spawn((
            Mesh3d(line_mesh_x.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_xyz(0.0, 0.002, offset),
            NotShadowCaster,
            GridLine,
        ));
        commands.spawn((
            Mesh3d(line_mesh_z.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_xyz(offset, 0.002, 0.0),
            NotShadowCaster,
            GridLine,
        ));
    }

    // World axes: X red, Y green, Z blue, each a cylinder with a cone tip
    let length = scene.axes_length;
    let radius = 0.01;
    let cone_height = radius * 6.0;
    let shaft = meshes.add(Cylinder::new(radius, length));
    let tip = meshes.add(Cone {
        radius: radius * 2.5,
        height: cone_height,
    });

    for (direction, color) in [
        (Vec3::X, Color::srgb(0.9, 0.2, 0.2)),
        (Vec3::Y, Color::srgb(0.2, 0.8, 0.2)),
        (Vec3::Z, Color::srgb(0.2, 0.4, 0.9)),
    ] {
        let material = materials.add(StandardMaterial {
            base_color: color,
            unlit: true,
            ..default()
        });
        // Cylinder and cone meshes point along +Y
        let rotation = Quat::from_rotation_arc(Vec3::Y, direction);
        commands.spawn((
            Mesh3d(shaft.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(direction * length / 2.0).with_rotation(rotation),
            NotShadowCaster,
            WorldAxis,
        ));
        commands.spawn((
            Mesh3d(tip.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(direction * (length + cone_height / 2.0))
                .with_rotation(rotation),
            NotShadowCaster,
            WorldAxis,
        ));
    }
}
