//! Bevy application setup

use bevy::asset::io::memory::{Dir, MemoryAssetReader};
use bevy::asset::io::AssetSource;
use bevy::asset::{AssetApp, AssetMetaCheck};
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use hellocube_core::{DemoConfig, SceneDescription};

use crate::animation::AnimationPlugin;
use crate::camera::CameraPlugin;
use crate::drop_target::DropTargetPlugin;
use crate::gizmo::TransformGizmoPlugin;
use crate::loader::LoaderPlugin;
use crate::resize::ResizePlugin;
use crate::scene::{hex_color, ScenePlugin};
use crate::ui::UiPlugin;

/// Asset source that serves dropped files from memory
pub const DROPPED_SOURCE: &str = "dropped";

/// Configuration the app was started with
#[derive(Resource, Debug, Clone, Deref)]
pub struct DemoSettings(pub DemoConfig);

/// Layout of the running scene variant
#[derive(Resource, Debug, Clone, Copy, Deref)]
pub struct ActiveScene(pub SceneDescription);

/// In-memory directory behind the `dropped://` asset source
#[derive(Resource, Clone, Default)]
pub struct DroppedAssets(pub Dir);

pub fn run(config: DemoConfig) {
    let scene = config.variant.description();
    let dropped = DroppedAssets::default();
    let reader_root = dropped.0.clone();

    let clear_color = scene.background.map(hex_color).unwrap_or(Color::NONE);

    App::new()
        // Asset sources must exist before AssetPlugin is built
        .register_asset_source(
            DROPPED_SOURCE,
            AssetSource::build().with_reader(move || {
                Box::new(MemoryAssetReader {
                    root: reader_root.clone(),
                })
            }),
        )
        .insert_resource(ClearColor(clear_color))
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: format!("hellocube - {}", config.variant),
                        canvas: Some(format!("#{}", config.page.canvas_id)),
                        fit_canvas_to_parent: true,
                        // Keep browser drag-and-drop events flowing to the drop target
                        prevent_default_event_handling: false,
                        transparent: scene.background.is_none(),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: "".to_string(),
                    // Dropped files never come with .meta files
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                }),
        )
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // bevy_picking must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .insert_resource(DemoSettings(config))
        .insert_resource(ActiveScene(scene))
        .insert_resource(dropped)
        .add_plugins(ScenePlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(AnimationPlugin)
        .add_plugins(ResizePlugin)
        .add_plugins(DropTargetPlugin)
        .add_plugins(LoaderPlugin)
        .add_plugins(TransformGizmoPlugin)
        .add_plugins(UiPlugin)
        .run();
}
