//! The two demo scene layouts
//!
//! Both entry points share the same wiring (bootstrap, controls, resize,
//! animation, drop loader) and differ only in the data described here.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::animation::SpinRate;

/// Which demo scene to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneVariant {
    /// Red cube in a spinning container, ambient + directional light, gizmos
    #[default]
    HelloCube,
    /// Six-coloured tumbling cube under a hemisphere-style light
    RenderScene,
}

impl SceneVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HelloCube => "hello-cube",
            Self::RenderScene => "render-scene",
        }
    }

    pub fn description(&self) -> SceneDescription {
        match self {
            Self::HelloCube => SceneDescription::hello_cube(),
            Self::RenderScene => SceneDescription::render_scene(),
        }
    }
}

impl fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hello-cube" | "hellocube" => Ok(Self::HelloCube),
            "render-scene" | "renderscene" => Ok(Self::RenderScene),
            other => Err(format!(
                "unknown scene variant '{}' (expected hello-cube or render-scene)",
                other
            )),
        }
    }
}

/// Tone mapping operator applied by the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneMapping {
    None,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDescription {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub tone_mapping: ToneMapping,
}

/// Light intensities are in the unitless 0..1 range used by the scene descriptions and
/// scaled to photometric units by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientDescription {
    pub color: u32,
    /// Secondary colour for hemisphere-style lighting (ground bounce)
    pub ground_color: Option<u32>,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalDescription {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub shadow_map_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CubeColors {
    Solid(u32),
    /// One colour per face in +X, -X, +Y, -Y, +Z, -Z order
    PerFace([u32; 6]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeDescription {
    pub size: f32,
    pub position: Vec3,
    pub colors: CubeColors,
    /// Parent the cube to the model container (replaced by dropped models)
    pub in_container: bool,
}

/// What the animation loop rotates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinTarget {
    Container,
    Cube,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDescription {
    pub variant: SceneVariant,
    pub camera: CameraDescription,
    /// Clear colour; `None` leaves the canvas transparent
    pub background: Option<u32>,
    pub ambient: AmbientDescription,
    pub directional: DirectionalDescription,
    pub ground_size: f32,
    pub ground_color: u32,
    pub cube: CubeDescription,
    pub spin_target: SpinTarget,
    pub spin: SpinRate,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub axes_length: f32,
}

impl SceneDescription {
    pub fn hello_cube() -> Self {
        Self {
            variant: SceneVariant::HelloCube,
            camera: CameraDescription {
                fov_degrees: 75.0,
                near: 0.1,
                far: 100.0,
                position: Vec3::new(0.0, 4.0, 8.0),
                tone_mapping: ToneMapping::None,
            },
            background: Some(0xffffff),
            ambient: AmbientDescription {
                color: 0xffffff,
                ground_color: None,
                intensity: 0.5,
            },
            directional: DirectionalDescription {
                color: 0xffffff,
                intensity: 0.5,
                position: Vec3::new(1.0, 3.0, 1.0),
                shadow_map_size: None,
            },
            ground_size: 10.0,
            ground_color: 0xc0c0c0,
            cube: CubeDescription {
                size: 1.0,
                position: Vec3::new(0.0, 0.5, 0.0),
                colors: CubeColors::Solid(0xe02020),
                in_container: true,
            },
            spin_target: SpinTarget::Container,
            spin: SpinRate::new(0.0, 45f32.to_radians(), 0.0),
            grid_size: 10.0,
            grid_divisions: 10,
            axes_length: 2.0,
        }
    }

    pub fn render_scene() -> Self {
        Self {
            variant: SceneVariant::RenderScene,
            camera: CameraDescription {
                fov_degrees: 75.0,
                near: 0.1,
                far: 50.0,
                position: Vec3::new(0.0, 3.0, 5.0),
                tone_mapping: ToneMapping::Neutral,
            },
            background: None,
            ambient: AmbientDescription {
                color: 0xffffff,
                ground_color: Some(0x080808),
                intensity: 0.5,
            },
            directional: DirectionalDescription {
                color: 0xffffff,
                intensity: 1.0,
                position: Vec3::new(100.0, 150.0, 100.0),
                shadow_map_size: Some(1024),
            },
            ground_size: 10.0,
            ground_color: 0xffffff,
            cube: CubeDescription {
                size: 1.0,
                position: Vec3::new(0.0, 1.5, 0.0),
                colors: CubeColors::PerFace([
                    0xff0000, // red
                    0x00ff00, // green
                    0x0000ff, // blue
                    0xffff00, // yellow
                    0xff8000, // orange
                    0xff00ff, // magenta
                ]),
                in_container: false,
            },
            spin_target: SpinTarget::Cube,
            spin: SpinRate::new(PI, PI / 2.0, 0.0),
            grid_size: 10.0,
            grid_divisions: 10,
            axes_length: 2.0,
        }
    }
}

/// Split `0xRRGGBB` into sRGB components in `0..=1`
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant() {
        assert_eq!("hello-cube".parse::<SceneVariant>(), Ok(SceneVariant::HelloCube));
        assert_eq!(" Render-Scene ".parse::<SceneVariant>(), Ok(SceneVariant::RenderScene));
        assert!("teapot".parse::<SceneVariant>().is_err());
        assert_eq!(SceneVariant::default(), SceneVariant::HelloCube);
    }

    #[test]
    fn test_variant_name_round_trip() {
        for variant in [SceneVariant::HelloCube, SceneVariant::RenderScene] {
            assert_eq!(variant.to_string().parse::<SceneVariant>(), Ok(variant));
            assert_eq!(variant.description().variant, variant);
        }
    }

    #[test]
    fn test_hello_cube_layout() {
        let scene = SceneDescription::hello_cube();
        assert!(scene.cube.in_container);
        assert_eq!(scene.spin_target, SpinTarget::Container);
        // Cube rests on the ground plane
        assert_eq!(scene.cube.position.y - scene.cube.size / 2.0, 0.0);
        assert_eq!(scene.spin.advance(1000.0).y, 45f32.to_radians());
    }

    #[test]
    fn test_render_scene_layout() {
        let scene = SceneDescription::render_scene();
        assert!(!scene.cube.in_container);
        assert_eq!(scene.spin_target, SpinTarget::Cube);
        assert!(matches!(scene.cube.colors, CubeColors::PerFace(c) if c[0] == 0xff0000));
        assert_eq!(scene.directional.shadow_map_size, Some(1024));
        assert_eq!(scene.camera.tone_mapping, ToneMapping::Neutral);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xff8000), [1.0, 128.0 / 255.0, 0.0]);
        assert_eq!(hex_to_rgb(0x000000), [0.0, 0.0, 0.0]);
    }
}
