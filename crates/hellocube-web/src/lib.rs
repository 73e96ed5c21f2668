//! hellocube Web - Bevy front-end for the hello-cube demo
//!
//! Runs in the browser (WebGPU, drop target on a DOM element) and natively
//! (files dropped onto the window). Both builds share the same plugins.

mod animation;
mod app;
mod camera;
mod drop_target;
mod gizmo;
mod loader;
mod resize;
mod scene;
mod ui;

pub use app::run;

#[cfg(target_arch = "wasm32")]
use hellocube_core::{DemoConfig, SceneVariant};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let config = browser_config();

    // Nothing to render into without the canvas
    let has_canvas = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&config.page.canvas_id))
        .is_some();
    if !has_canvas {
        wasm_bindgen::throw_str(&format!("{} not found", config.page.canvas_id));
    }

    app::run(config);
}

/// Defaults with `?variant=` taken from the page URL
#[cfg(target_arch = "wasm32")]
fn browser_config() -> DemoConfig {
    let mut config = DemoConfig::default();

    let variant = web_sys::window()
        .and_then(|window| window.location().href().ok())
        .and_then(|href| web_sys::Url::new(&href).ok())
        .and_then(|url| url.search_params().get("variant"));

    if let Some(variant) = variant {
        match variant.parse::<SceneVariant>() {
            Ok(variant) => config.variant = variant,
            Err(e) => tracing::warn!("Ignoring variant parameter: {}", e),
        }
    }

    config
}
