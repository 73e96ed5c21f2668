//! Dropped resource descriptors and suffix-based dispatch
//!
//! A dropped file becomes a [`ResourceDescriptor`]: its file name plus the
//! decoded bytes. The file name alone decides which loader branch handles it;
//! the content is never sniffed for dispatch.

use base64::Engine;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("File is empty: {0}")]
    EmptyPayload(String),
    #[error("Failed to read file: {0}")]
    Read(String),
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Invalid glTF: {0}")]
    InvalidGltf(String),
    #[error("glTF requires unsupported extension {extension} (decoder path: {decoder_path})")]
    UnsupportedExtension {
        extension: String,
        decoder_path: String,
    },
    #[error("glTF references external file '{0}', drop a .glb instead")]
    ExternalReference(String),
    #[error("Load failed: {0}")]
    LoadFailed(String),
}

/// Equirectangular image formats accepted as environment maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentFormat {
    Exr,
    Hdr,
}

/// 3D model container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Glb,
    Gltf,
}

/// Loader branch selected for a dropped file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Environment(EnvironmentFormat),
    Model(ModelFormat),
}

impl ResourceKind {
    /// Classify a file name by its lowercased suffix.
    ///
    /// Returns `None` for anything that is not `.exr`, `.hdr`, `.glb` or `.gltf`.
    pub fn classify(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".exr") {
            Some(Self::Environment(EnvironmentFormat::Exr))
        } else if lower.ends_with(".hdr") {
            Some(Self::Environment(EnvironmentFormat::Hdr))
        } else if lower.ends_with(".glb") {
            Some(Self::Model(ModelFormat::Glb))
        } else if lower.ends_with(".gltf") {
            Some(Self::Model(ModelFormat::Gltf))
        } else {
            None
        }
    }

    /// File extension (without dot) the engine's loaders expect
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Environment(EnvironmentFormat::Exr) => "exr",
            Self::Environment(EnvironmentFormat::Hdr) => "hdr",
            Self::Model(ModelFormat::Glb) => "glb",
            Self::Model(ModelFormat::Gltf) => "gltf",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment(_) => write!(f, "environment map (.{})", self.extension()),
            Self::Model(_) => write!(f, "model (.{})", self.extension()),
        }
    }
}

/// A dropped file: its name and decoded contents
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub name: String,
    pub data: Vec<u8>,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self, ResourceError> {
        let name = name.into();
        if data.is_empty() {
            return Err(ResourceError::EmptyPayload(name));
        }
        Ok(Self { name, data })
    }

    /// Build a descriptor from the `data:` URI produced by `FileReader.readAsDataURL`
    pub fn from_data_uri(name: impl Into<String>, uri: &str) -> Result<Self, ResourceError> {
        let data = decode_data_uri(uri)?;
        Self::new(name, data)
    }

    /// Loader branch for this resource, keyed on the file name only
    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::classify(&self.name)
    }
}

/// Decode a `data:[<mediatype>][;base64],<payload>` URI into bytes
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ResourceError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ResourceError::InvalidDataUri("missing 'data:' scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ResourceError::InvalidDataUri("missing ',' separator".to_string()))?;

    let is_base64 = header
        .rsplit(';')
        .next()
        .is_some_and(|param| param.eq_ignore_ascii_case("base64"));

    if is_base64 {
        // Browsers never wrap, but tolerate whitespace from hand-built URIs
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(payload: &str) -> Result<Vec<u8>, ResourceError> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| {
                    ResourceError::InvalidDataUri(format!("bad percent escape at byte {}", i))
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Result of handling one dropped resource, kept for display
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded { name: String, kind: ResourceKind },
    Unsupported { name: String },
    Failed { name: String, error: String },
}

impl LoadOutcome {
    pub fn failed(name: impl Into<String>, error: &ResourceError) -> Self {
        Self::Failed {
            name: name.into(),
            error: error.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Loaded { name, .. } | Self::Unsupported { name } | Self::Failed { name, .. } => {
                name
            }
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { name, kind } => write!(f, "Loaded {} as {}", name, kind),
            Self::Unsupported { name } => write!(f, "Ignored {}: unsupported file type", name),
            Self::Failed { name, error } => write!(f, "Failed to load {}: {}", name, error),
        }
    }
}
