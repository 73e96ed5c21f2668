//! Dropped resource loader
//!
//! Dispatch is keyed on the file name suffix only:
//! - `.exr` / `.hdr` become the skybox and the environment light, and the
//!   ambient light is switched off
//! - `.glb` / `.gltf` replace whatever the model container holds, with
//!   shadows enabled on opaque meshes and the model resting on y = 0
//! - anything else is reported as unsupported
//!
//! Decoding and cubemap projection run on the async compute pool; results
//! are applied in drop order.

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::core_pipeline::Skybox;
use bevy::gltf::Gltf;
use bevy::light::{GeneratedEnvironmentMapLight, NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use bevy::scene::{SceneInstance, SceneSpawner};
use bevy::tasks::futures::check_ready;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use half::f16;
use hellocube_core::config::LoaderConfig;
use hellocube_core::gltf_inspect;
use hellocube_core::{
    Bounds, CubeMap, EquirectMap, LoadOutcome, ModelFormat, ResourceError, ResourceKind,
};
use std::path::Path;

use crate::app::{DemoSettings, DroppedAssets, DROPPED_SOURCE};
use crate::drop_target::{DropIntake, DroppedFile, PendingDrops};
use crate::scene::{MainCamera, ModelContainer};

/// Environment light intensity (cd/m²) for a dropped environment map
const ENVIRONMENT_INTENSITY: f32 = 1000.0;
/// Skybox brightness (cd/m²) for a dropped environment map
const SKYBOX_BRIGHTNESS: f32 = 1000.0;

/// Outcome of the most recent drop, shown in the settings panel
#[derive(Resource, Debug, Default)]
pub struct LastLoad(pub Option<LoadOutcome>);

impl LastLoad {
    fn record(&mut self, outcome: LoadOutcome) {
        let name = outcome.name();
        match &outcome {
            LoadOutcome::Loaded { .. } => tracing::info!(name, "{}", outcome),
            LoadOutcome::Unsupported { .. } => tracing::warn!(name, "{}", outcome),
            LoadOutcome::Failed { .. } => tracing::error!(name, "{}", outcome),
        }
        self.0 = Some(outcome);
    }
}

/// Dropped files being decoded on the async compute pool, oldest first
#[derive(Resource, Default)]
pub struct PendingPreparations(Vec<Preparation>);

struct Preparation {
    name: String,
    task: Task<Result<PreparedResource, ResourceError>>,
}

/// glTF documents handed to the asset server, waiting to finish loading
#[derive(Resource, Default)]
pub struct PendingModels {
    loads: Vec<PendingModel>,
    next_id: u64,
}

struct PendingModel {
    name: String,
    kind: ResourceKind,
    /// Location inside the `dropped://` source, released once the load settles
    path: String,
    handle: Handle<Gltf>,
}

/// Model root spawned into the container, waiting for its scene instance
#[derive(Component, Debug)]
pub struct PendingPlacement {
    name: String,
    kind: ResourceKind,
}

/// Scene instance of a pending model has finished spawning
#[derive(Component)]
pub struct InstanceReady;

/// Root of the model currently shown in the container
#[derive(Component)]
pub struct LoadedModel;

/// A dropped file after decoding, ready to apply to the scene
#[derive(Debug)]
pub enum PreparedResource {
    Environment {
        name: String,
        kind: ResourceKind,
        cubemap: CubeMap,
    },
    Model {
        name: String,
        kind: ResourceKind,
        format: ModelFormat,
        data: Vec<u8>,
    },
    Unsupported {
        name: String,
    },
}

pub struct LoaderPlugin;

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastLoad>()
            .init_resource::<PendingPreparations>()
            .init_resource::<PendingModels>()
            .add_systems(
                Update,
                (
                    start_preparations,
                    apply_prepared_resources,
                    poll_model_loads,
                    mark_ready_scenes,
                    place_loaded_models,
                )
                    .chain()
                    .after(DropIntake),
            );
    }
}

/// Classify, decode and validate a dropped file
pub fn prepare(file: DroppedFile, loader: &LoaderConfig) -> Result<PreparedResource, ResourceError> {
    let name = file.name.clone();
    let Some(kind) = ResourceKind::classify(&name) else {
        return Ok(PreparedResource::Unsupported { name });
    };

    let descriptor = file.into_descriptor()?;
    match kind {
        ResourceKind::Environment(format) => {
            let map = EquirectMap::decode(format, &descriptor.data)?;
            let face_size = map.face_size(loader.min_face_size, loader.max_face_size);
            tracing::debug!(name = %name, face_size, "Projecting environment map");
            Ok(PreparedResource::Environment {
                name,
                kind,
                cubemap: map.to_cubemap(face_size),
            })
        }
        ResourceKind::Model(format) => {
            let summary = gltf_inspect::inspect(format, &descriptor.data)?;
            summary.ensure_loadable(&loader.draco_decoder_path)?;
            tracing::debug!(
                name = %name,
                container = ?summary.container,
                generator = ?summary.generator,
                "Model accepted"
            );
            Ok(PreparedResource::Model {
                name,
                kind,
                format,
                data: descriptor.data,
            })
        }
    }
}

/// Hand each newly dropped file to the async compute pool
fn start_preparations(
    drops: Res<PendingDrops>,
    settings: Res<DemoSettings>,
    mut preparations: ResMut<PendingPreparations>,
) {
    for file in drops.drain() {
        tracing::info!(name = %file.name, "Resource dropped");
        preparations.0.push(spawn_preparation(file, &settings.loader));
    }
}

fn spawn_preparation(file: DroppedFile, loader: &LoaderConfig) -> Preparation {
    let name = file.name.clone();
    let loader = loader.clone();
    let task = AsyncComputeTaskPool::get().spawn(async move { prepare(file, &loader) });
    Preparation { name, task }
}

/// Results of the oldest preparations that have finished, stopping at the
/// first one still running so later drops never overtake earlier ones
fn take_finished(
    preparations: &mut Vec<Preparation>,
) -> Vec<(String, Result<PreparedResource, ResourceError>)> {
    let mut finished = Vec::new();
    while let Some(first) = preparations.first_mut() {
        let Some(result) = check_ready(&mut first.task) else {
            break;
        };
        let preparation = preparations.remove(0);
        finished.push((preparation.name, result));
    }
    finished
}

fn apply_prepared_resources(
    mut commands: Commands,
    mut preparations: ResMut<PendingPreparations>,
    mut images: ResMut<Assets<Image>>,
    mut ambient: ResMut<AmbientLight>,
    cameras: Query<Entity, With<MainCamera>>,
    mut pending: ResMut<PendingModels>,
    dropped_assets: Res<DroppedAssets>,
    asset_server: Res<AssetServer>,
    mut last_load: ResMut<LastLoad>,
) {
    for (name, result) in take_finished(&mut preparations.0) {
        match result {
            Ok(PreparedResource::Unsupported { name }) => {
                last_load.record(LoadOutcome::Unsupported { name });
            }
            Ok(PreparedResource::Environment {
                name,
                kind,
                cubemap,
            }) => {
                install_environment(&mut commands, &mut images, &mut ambient, &cameras, &cubemap);
                last_load.record(LoadOutcome::Loaded { name, kind });
            }
            Ok(PreparedResource::Model {
                name,
                kind,
                format,
                data,
            }) => {
                pending.next_id += 1;
                let extension = match format {
                    ModelFormat::Glb => "glb",
                    ModelFormat::Gltf => "gltf",
                };
                // Unique path per drop so the asset server never hands back a stale model
                let path = format!("model-{}.{}", pending.next_id, extension);
                dropped_assets.0.insert_asset(Path::new(&path), data);

                let handle: Handle<Gltf> = asset_server.load(format!("{}://{}", DROPPED_SOURCE, path));
                tracing::info!(name = %name, path = %path, "Loading model");
                pending.loads.push(PendingModel {
                    name,
                    kind,
                    path,
                    handle,
                });
            }
            Err(e) => last_load.record(LoadOutcome::failed(name, &e)),
        }
    }
}

/// Use the cubemap as background and image-based light; ambient goes dark
fn install_environment(
    commands: &mut Commands,
    images: &mut Assets<Image>,
    ambient: &mut AmbientLight,
    cameras: &Query<Entity, With<MainCamera>>,
    cubemap: &CubeMap,
) {
    let handle = images.add(cubemap_image(cubemap));

    for camera in cameras {
        commands.entity(camera).insert((
            Skybox {
                image: handle.clone(),
                brightness: SKYBOX_BRIGHTNESS,
                rotation: Quat::IDENTITY,
            },
            // Prefiltered into diffuse and specular maps on the GPU
            GeneratedEnvironmentMapLight {
                environment_map: handle.clone(),
                intensity: ENVIRONMENT_INTENSITY,
                ..default()
            },
        ));
    }

    ambient.brightness = 0.0;
}

/// Six-layer `Rgba16Float` cube texture
fn cubemap_image(cubemap: &CubeMap) -> Image {
    let data: Vec<u8> = cubemap
        .texels
        .iter()
        .flatten()
        .flat_map(|channel| f16::from_f32(*channel).to_le_bytes())
        .collect();

    let mut image = Image::new(
        Extent3d {
            width: cubemap.face_size,
            height: cubemap.face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba16Float,
        RenderAssetUsages::default(),
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    image
}

/// Swap finished glTF loads into the model container
fn poll_model_loads(
    mut commands: Commands,
    mut pending: ResMut<PendingModels>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    containers: Query<Entity, With<ModelContainer>>,
    dropped_assets: Res<DroppedAssets>,
    mut last_load: ResMut<LastLoad>,
) {
    pending.loads.retain(|load| {
        let state = asset_server.get_load_state(load.handle.id());
        if matches!(state, Some(LoadState::Loaded | LoadState::Failed(_))) {
            dropped_assets.0.remove_asset(Path::new(&load.path));
        }
        match state {
            Some(LoadState::Loaded) => {
                let scene = gltfs
                    .get(&load.handle)
                    .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));
                let Some(scene) = scene else {
                    let error = ResourceError::InvalidGltf("document has no scenes".to_string());
                    last_load.record(LoadOutcome::failed(load.name.clone(), &error));
                    return false;
                };
                let Ok(container) = containers.single() else {
                    tracing::error!("Model container missing, dropping {}", load.name);
                    return false;
                };

                // The container keeps its identity; only its content is replaced
                commands.entity(container).despawn_related::<Children>();
                let root = commands
                    .spawn((
                        Name::new(load.name.clone()),
                        SceneRoot(scene),
                        Transform::default(),
                        Visibility::default(),
                        PendingPlacement {
                            name: load.name.clone(),
                            kind: load.kind,
                        },
                    ))
                    .id();
                commands.entity(container).add_child(root);
                false
            }
            Some(LoadState::Failed(err)) => {
                let error = ResourceError::LoadFailed(err.to_string());
                last_load.record(LoadOutcome::failed(load.name.clone(), &error));
                false
            }
            _ => true,
        }
    });
}

fn mark_ready_scenes(
    mut commands: Commands,
    spawner: Res<SceneSpawner>,
    roots: Query<(Entity, &SceneInstance), (With<PendingPlacement>, Without<InstanceReady>)>,
) {
    for (root, instance) in &roots {
        if spawner.instance_is_ready(**instance) {
            commands.entity(root).insert(InstanceReady);
        }
    }
}

/// Once a model's scene is instantiated: shadows, material refresh, grounding
fn place_loaded_models(
    mut commands: Commands,
    mut roots: Query<
        (Entity, &PendingPlacement, &GlobalTransform, &mut Transform),
        With<InstanceReady>,
    >,
    children: Query<&Children>,
    parts: Query<(
        &GlobalTransform,
        &Mesh3d,
        Option<&MeshMaterial3d<StandardMaterial>>,
    )>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut last_load: ResMut<LastLoad>,
) {
    for (root, placement, root_global, mut transform) in &mut roots {
        // Bounds are gathered in the model root's own space
        let to_model = root_global.affine().inverse();
        let mut bounds = Bounds::EMPTY;
        let mut mesh_count = 0usize;
        let mut shadowed = 0usize;

        for part in children.iter_descendants(root) {
            let Ok((global, mesh, material)) = parts.get(part) else {
                continue;
            };
            mesh_count += 1;

            if let Some(positions) = meshes
                .get(&mesh.0)
                .and_then(|mesh| mesh.attribute(Mesh::ATTRIBUTE_POSITION))
                .and_then(|positions| positions.as_float3())
            {
                bounds.include_mesh(&(to_model * global.affine()), positions);
            }

            // Mutable access marks the material changed so it picks up the new environment
            let opaque = material
                .and_then(|material| materials.get_mut(&material.0))
                .is_some_and(|material| is_opaque(material.alpha_mode));
            if opaque {
                commands
                    .entity(part)
                    .remove::<(NotShadowCaster, NotShadowReceiver)>();
                shadowed += 1;
            } else {
                commands
                    .entity(part)
                    .insert((NotShadowCaster, NotShadowReceiver));
            }
        }

        transform.translation.y = bounds.ground_offset();

        tracing::debug!(
            name = %placement.name,
            meshes = mesh_count,
            shadowed,
            min = ?bounds.min,
            max = ?bounds.max,
            "Model placed"
        );

        last_load.record(LoadOutcome::Loaded {
            name: placement.name.clone(),
            kind: placement.kind,
        });
        commands
            .entity(root)
            .remove::<(PendingPlacement, InstanceReady)>()
            .insert(LoadedModel);
    }
}

/// Alpha-masked materials still write depth and count as opaque
fn is_opaque(alpha_mode: AlphaMode) -> bool {
    matches!(alpha_mode, AlphaMode::Opaque | AlphaMode::Mask(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drop_target::DropPayload;
    use bevy::asset::io::memory::MemoryAssetReader;
    use bevy::asset::io::AssetSource;
    use bevy::tasks::TaskPool;
    use hellocube_core::EnvironmentFormat;
    use std::time::Duration;

    fn file(name: &str, data: &[u8]) -> DroppedFile {
        DroppedFile {
            name: name.to_string(),
            payload: DropPayload::Bytes(data.to_vec()),
        }
    }

    #[test]
    fn test_unknown_suffix_is_unsupported() {
        let loader = LoaderConfig::default();
        for name in ["notes.txt", "model.obj", "sky.png", "glb", "archive.gltf.zip"] {
            let prepared = prepare(file(name, b"data"), &loader).unwrap();
            assert!(matches!(prepared, PreparedResource::Unsupported { .. }), "{name}");
        }
    }

    #[test]
    fn test_model_suffix_is_case_insensitive() {
        let loader = LoaderConfig::default();
        let json = br#"{"asset":{"version":"2.0"},"scenes":[{}]}"#;
        let prepared = prepare(file("Robot.GLTF", json), &loader).unwrap();
        let PreparedResource::Model { name, kind, format, data } = prepared else {
            panic!("expected the model branch");
        };
        assert_eq!(name, "Robot.GLTF");
        assert_eq!(kind, ResourceKind::Model(ModelFormat::Gltf));
        assert_eq!(format, ModelFormat::Gltf);
        assert_eq!(data, json.to_vec());
    }

    #[test]
    fn test_draco_model_rejected() {
        let loader = LoaderConfig::default();
        let json = br#"{
            "asset": {"version": "2.0"},
            "extensionsUsed": ["KHR_draco_mesh_compression"],
            "extensionsRequired": ["KHR_draco_mesh_compression"]
        }"#;
        let err = prepare(file("squashed.gltf", json), &loader).unwrap_err();
        assert!(matches!(err, ResourceError::UnsupportedExtension { .. }));
    }

    #[test]
    fn test_gltf_with_external_buffer_fails() {
        let loader = LoaderConfig::default();
        let json = br#"{"asset":{"version":"2.0"},"buffers":[{"uri":"scene.bin","byteLength":4}]}"#;
        let err = prepare(file("scene.gltf", json), &loader).unwrap_err();
        assert!(matches!(err, ResourceError::ExternalReference(uri) if uri == "scene.bin"));
    }

    #[test]
    fn test_corrupt_environment_reports_decode_error() {
        let loader = LoaderConfig::default();
        let err = prepare(file("sky.HDR", b"not an hdr file"), &loader).unwrap_err();
        assert!(matches!(err, ResourceError::ImageDecode(_)));
        assert_eq!(
            ResourceKind::classify("sky.HDR"),
            Some(ResourceKind::Environment(EnvironmentFormat::Hdr))
        );
    }

    #[test]
    fn test_empty_file_fails() {
        let loader = LoaderConfig::default();
        let err = prepare(file("empty.glb", b""), &loader).unwrap_err();
        assert!(matches!(err, ResourceError::EmptyPayload(_)));
    }

    #[test]
    fn test_cubemap_image_layout() {
        let map = EquirectMap::from_texels(4, 2, vec![[0.5, 1.0, 2.0, 1.0]; 8]);
        let image = cubemap_image(&map.to_cubemap(16));

        assert_eq!(image.texture_descriptor.size.depth_or_array_layers, 6);
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba16Float);
        assert_eq!(
            image.texture_view_descriptor.as_ref().and_then(|view| view.dimension),
            Some(TextureViewDimension::Cube)
        );
        let data = image.data.as_ref().unwrap();
        assert_eq!(data.len(), 16 * 16 * 6 * 4 * 2);
        assert_eq!(
            f16::from_le_bytes([data[2], data[3]]).to_f32(),
            1.0
        );
    }

    #[test]
    fn test_environment_replaces_ambient() {
        let mut app = App::new();
        app.init_resource::<Assets<Image>>().insert_resource(AmbientLight {
            brightness: 250.0,
            ..default()
        });
        let camera = app.world_mut().spawn(MainCamera).id();

        let cubemap = EquirectMap::from_texels(4, 2, vec![[1.0; 4]; 8]).to_cubemap(16);
        app.add_systems(
            Update,
            move |mut commands: Commands,
                  mut images: ResMut<Assets<Image>>,
                  mut ambient: ResMut<AmbientLight>,
                  cameras: Query<Entity, With<MainCamera>>| {
                install_environment(&mut commands, &mut images, &mut ambient, &cameras, &cubemap);
            },
        );
        app.update();

        let world = app.world();
        assert_eq!(world.resource::<AmbientLight>().brightness, 0.0);
        let skybox = world.get::<Skybox>(camera).unwrap();
        let environment = world.get::<GeneratedEnvironmentMapLight>(camera).unwrap();
        assert_eq!(skybox.image, environment.environment_map);
        assert_eq!(environment.intensity, ENVIRONMENT_INTENSITY);
        assert!(world.resource::<Assets<Image>>().get(&skybox.image).is_some());
    }

    #[test]
    fn test_opaque_modes() {
        assert!(is_opaque(AlphaMode::Opaque));
        assert!(is_opaque(AlphaMode::Mask(0.5)));
        assert!(!is_opaque(AlphaMode::Blend));
        assert!(!is_opaque(AlphaMode::Premultiplied));
    }

    #[test]
    fn test_last_load_keeps_latest() {
        let mut last_load = LastLoad::default();
        last_load.record(LoadOutcome::Unsupported {
            name: "a.txt".to_string(),
        });
        last_load.record(LoadOutcome::failed(
            "b.glb",
            &ResourceError::LoadFailed("broken buffer".to_string()),
        ));
        let outcome = last_load.0.unwrap();
        assert_eq!(outcome.name(), "b.glb");
        assert!(matches!(outcome, LoadOutcome::Failed { .. }));
    }

    #[test]
    fn test_preparations_finish_in_drop_order() {
        AsyncComputeTaskPool::get_or_init(TaskPool::default);
        let loader = LoaderConfig::default();
        let json = br#"{"asset":{"version":"2.0"},"scenes":[{}]}"#;
        let mut preparations = vec![
            spawn_preparation(file("sky.hdr", b"not an hdr file"), &loader),
            spawn_preparation(file("duck.gltf", json), &loader),
            spawn_preparation(file("notes.txt", b"hello"), &loader),
        ];

        let mut finished = Vec::new();
        for _ in 0..1000 {
            finished.extend(take_finished(&mut preparations));
            if preparations.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        let names: Vec<&str> = finished.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["sky.hdr", "duck.gltf", "notes.txt"]);
        assert!(matches!(finished[0].1, Err(ResourceError::ImageDecode(_))));
        assert!(matches!(finished[1].1, Ok(PreparedResource::Model { .. })));
        assert!(matches!(finished[2].1, Ok(PreparedResource::Unsupported { .. })));
    }

    fn placement_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_resource::<LastLoad>()
            .add_systems(Update, place_loaded_models);
        app
    }

    #[derive(Resource, Default)]
    struct ModifiedMaterials(Vec<AssetId<StandardMaterial>>);

    fn collect_modified(
        mut events: MessageReader<AssetEvent<StandardMaterial>>,
        mut modified: ResMut<ModifiedMaterials>,
    ) {
        for event in events.read() {
            if let AssetEvent::Modified { id } = event {
                modified.0.push(*id);
            }
        }
    }

    #[test]
    fn test_model_placement_shadows_and_grounding() {
        let mut app = placement_app();
        app.init_resource::<ModifiedMaterials>()
            .add_systems(Update, collect_modified.after(place_loaded_models));

        let cube = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::new(1.0, 1.0, 1.0));
        let (opaque, glass) = {
            let mut materials = app.world_mut().resource_mut::<Assets<StandardMaterial>>();
            (
                materials.add(StandardMaterial::default()),
                materials.add(StandardMaterial {
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                }),
            )
        };

        let world = app.world_mut();
        let root = world
            .spawn((
                PendingPlacement {
                    name: "crate.glb".to_string(),
                    kind: ResourceKind::Model(ModelFormat::Glb),
                },
                InstanceReady,
                Transform::default(),
                GlobalTransform::IDENTITY,
            ))
            .id();
        // Lowest point sits at y = -2.5
        let lowered = GlobalTransform::from_xyz(0.0, -2.0, 0.0);
        let solid = world
            .spawn((ChildOf(root), Mesh3d(cube.clone()), MeshMaterial3d(opaque.clone()), lowered))
            .id();
        let window = world
            .spawn((ChildOf(root), Mesh3d(cube.clone()), MeshMaterial3d(glass), lowered))
            .id();
        let bare = world
            .spawn((ChildOf(root), Mesh3d(cube), lowered, NotShadowCaster))
            .id();

        app.update();
        app.update();

        let world = app.world();
        assert!((world.get::<Transform>(root).unwrap().translation.y - 2.5).abs() < 1e-5);
        assert!(world.get::<LoadedModel>(root).is_some());
        assert!(world.get::<PendingPlacement>(root).is_none());

        assert!(world.get::<NotShadowCaster>(solid).is_none());
        assert!(world.get::<NotShadowReceiver>(solid).is_none());
        for part in [window, bare] {
            assert!(world.get::<NotShadowCaster>(part).is_some());
            assert!(world.get::<NotShadowReceiver>(part).is_some());
        }

        assert!(world.resource::<ModifiedMaterials>().0.contains(&opaque.id()));
        assert!(matches!(
            &world.resource::<LastLoad>().0,
            Some(LoadOutcome::Loaded { name, .. }) if name == "crate.glb"
        ));
    }

    #[test]
    fn test_waits_for_scene_instance() {
        let mut app = placement_app();
        let root = app
            .world_mut()
            .spawn((
                PendingPlacement {
                    name: "slow.glb".to_string(),
                    kind: ResourceKind::Model(ModelFormat::Glb),
                },
                Transform::default(),
                GlobalTransform::IDENTITY,
            ))
            .id();

        app.update();

        assert!(app.world().get::<PendingPlacement>(root).is_some());
        assert!(app.world().resource::<LastLoad>().0.is_none());
    }

    #[test]
    fn test_failed_model_releases_dropped_bytes() {
        let dropped = DroppedAssets::default();
        let reader_root = dropped.0.clone();

        let mut app = App::new();
        app.register_asset_source(
            DROPPED_SOURCE,
            AssetSource::build().with_reader(move || {
                Box::new(MemoryAssetReader {
                    root: reader_root.clone(),
                })
            }),
        )
        .add_plugins((MinimalPlugins, AssetPlugin::default()))
        .init_asset::<Gltf>()
        .init_resource::<LastLoad>()
        .init_resource::<PendingModels>()
        .insert_resource(dropped.clone())
        .add_systems(Update, poll_model_loads);

        // No glTF loader is registered, so the load settles as failed
        let path = "model-1.glb";
        dropped.0.insert_asset(Path::new(path), b"glTF".to_vec());
        let handle: Handle<Gltf> = app
            .world()
            .resource::<AssetServer>()
            .load(format!("{}://{}", DROPPED_SOURCE, path));
        app.world_mut()
            .resource_mut::<PendingModels>()
            .loads
            .push(PendingModel {
                name: "robot.glb".to_string(),
                kind: ResourceKind::Model(ModelFormat::Glb),
                path: path.to_string(),
                handle,
            });

        for _ in 0..1000 {
            app.update();
            if app.world().resource::<PendingModels>().loads.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        assert!(app.world().resource::<PendingModels>().loads.is_empty());
        assert!(dropped.0.get_asset(Path::new(path)).is_none());
        assert!(matches!(
            &app.world().resource::<LastLoad>().0,
            Some(LoadOutcome::Failed { name, .. }) if name == "robot.glb"
        ));
    }
}
