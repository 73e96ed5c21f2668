//! Configuration loading and validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::orbit::OrbitSettings;
use crate::variant::SceneVariant;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub variant: SceneVariant,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

/// DOM hooks used by the browser build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Canvas the renderer draws into (without `#`)
    #[serde(default = "default_canvas_id")]
    pub canvas_id: String,
    /// Element that accepts dropped files
    #[serde(default = "default_drop_target_id")]
    pub drop_target_id: String,
    /// Class applied to the drop target while a drag hovers over it
    #[serde(default = "default_hover_class")]
    pub hover_class: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            canvas_id: default_canvas_id(),
            drop_target_id: default_drop_target_id(),
            hover_class: default_hover_class(),
        }
    }
}

fn default_canvas_id() -> String {
    "three_canvas".to_string()
}

fn default_drop_target_id() -> String {
    "holder".to_string()
}

fn default_hover_class() -> String {
    "hover".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Where Draco decoder assets would be served from
    #[serde(default = "default_draco_decoder_path")]
    pub draco_decoder_path: String,
    /// Smallest cubemap face generated from an equirectangular map
    #[serde(default = "default_min_face_size")]
    pub min_face_size: u32,
    /// Largest cubemap face generated from an equirectangular map
    #[serde(default = "default_max_face_size")]
    pub max_face_size: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            draco_decoder_path: default_draco_decoder_path(),
            min_face_size: default_min_face_size(),
            max_face_size: default_max_face_size(),
        }
    }
}

fn default_draco_decoder_path() -> String {
    "./draco/".to_string()
}

fn default_min_face_size() -> u32 {
    16
}

fn default_max_face_size() -> u32 {
    1024
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    #[serde(flatten)]
    pub orbit: OrbitSettings,
    /// Max distance (world units) between the pointer ray and a gizmo axis
    #[serde(default = "default_gizmo_pick_radius")]
    pub gizmo_pick_radius: f32,
    /// Length of each gizmo axis handle
    #[serde(default = "default_gizmo_length")]
    pub gizmo_length: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            orbit: OrbitSettings::default(),
            gizmo_pick_radius: default_gizmo_pick_radius(),
            gizmo_length: default_gizmo_length(),
        }
    }
}

fn default_gizmo_pick_radius() -> f32 {
    0.08
}

fn default_gizmo_length() -> f32 {
    1.0
}

impl DemoConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loader.min_face_size == 0 || self.loader.min_face_size > self.loader.max_face_size
        {
            return Err(ConfigError::ValidationError(format!(
                "loader face sizes must satisfy 0 < min ({}) <= max ({})",
                self.loader.min_face_size, self.loader.max_face_size
            )));
        }
        if self.page.canvas_id.is_empty() || self.page.drop_target_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "page element ids must not be empty".to_string(),
            ));
        }
        if self.controls.gizmo_pick_radius <= 0.0 || self.controls.gizmo_length <= 0.0 {
            return Err(ConfigError::ValidationError(
                "gizmo pick radius and length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<DemoConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = DemoConfig::from_toml_str(&content)?;
        info!(path = %path.display(), variant = %config.variant, "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(DemoConfig::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(&DemoConfig::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
