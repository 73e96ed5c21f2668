//! hellocube Core - Resource dispatch, scene descriptions and viewer math
//!
//! This crate holds everything the demo does that does not need a GPU:
//! - Drop-resource classification and data URI decoding
//! - glTF container probing (GLB header / JSON document)
//! - Equirectangular environment map decoding and cubemap projection
//! - Bounding boxes used to ground dropped models at y = 0
//! - Frame clock, viewport, orbit camera and transform gizmo math
//! - Scene variant descriptions and TOML configuration

pub mod animation;
pub mod bounds;
pub mod config;
pub mod environment;
pub mod gizmo;
pub mod gltf_inspect;
pub mod orbit;
pub mod resource;
pub mod variant;
pub mod viewport;

pub use animation::{FrameClock, SpinRate};
pub use bounds::Bounds;
pub use config::{load_config, ConfigError, DemoConfig};
pub use environment::{CubeMap, EquirectMap};
pub use gizmo::{Axis, AxisHit, GizmoKind, GizmoToggles, PickRay};
pub use gltf_inspect::{GltfContainer, GltfSummary};
pub use orbit::{OrbitSettings, OrbitState};
pub use resource::{
    EnvironmentFormat, LoadOutcome, ModelFormat, ResourceDescriptor, ResourceError, ResourceKind,
};
pub use variant::{SceneDescription, SceneVariant};
pub use viewport::Viewport;
