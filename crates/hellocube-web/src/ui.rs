//! Settings panel using bevy_egui

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use hellocube_core::{GizmoKind, LoadOutcome};

use crate::app::ActiveScene;
use crate::drop_target::DropHover;
use crate::gizmo::PanelToggles;
use crate::loader::LastLoad;

/// Set while the pointer is over (or captured by) the settings panel
#[derive(Resource, Debug, Default)]
pub struct PointerOverUi(pub bool);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerOverUi>()
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut toggles: ResMut<PanelToggles>,
    mut pointer_over_ui: ResMut<PointerOverUi>,
    status: (Res<LastLoad>, Res<DropHover>, Res<DiagnosticsStore>),
    scene: Res<ActiveScene>,
) {
    let (last_load, hover, diagnostics) = status;
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let mut edited = toggles.0;

    egui::Window::new("Settings")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            for kind in [GizmoKind::Mesh, GizmoKind::Light] {
                let mut visible = edited.is_visible(kind);
                if ui.checkbox(&mut visible, kind.label()).changed() {
                    edited.set(kind, visible);
                }
            }

            ui.separator();

            let fps = diagnostics
                .get(&FrameTimeDiagnosticsPlugin::FPS)
                .and_then(|fps| fps.smoothed());
            ui.label(format!("{}", scene.variant));
            match fps {
                Some(fps) => ui.label(format!("FPS: {:.0}", fps)),
                None => ui.label("FPS: -"),
            };

            ui.separator();

            if hover.get() {
                ui.colored_label(egui::Color32::LIGHT_BLUE, "Release to load");
            } else {
                ui.weak("Drop .glb, .gltf, .hdr or .exr");
            }
            if let Some(outcome) = &last_load.0 {
                let (text, color) = outcome_line(outcome);
                ui.colored_label(color, text);
            }
        });

    // Leaves change detection alone unless a box was actually clicked
    toggles.set_if_neq(PanelToggles(edited));

    pointer_over_ui.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
}

fn outcome_line(outcome: &LoadOutcome) -> (String, egui::Color32) {
    let color = match outcome {
        LoadOutcome::Loaded { .. } => egui::Color32::GREEN,
        LoadOutcome::Unsupported { .. } => egui::Color32::YELLOW,
        LoadOutcome::Failed { .. } => egui::Color32::RED,
    };
    (outcome.to_string(), color)
}
