//! Lightweight glTF container inspection
//!
//! Dropped models are handed to the engine's glTF loader as-is. Before that
//! happens the container is inspected so that files the loader can never resolve
//! (Draco-compressed meshes, `.gltf` documents pointing at sibling files)
//! fail early with a descriptive error instead of an opaque loader failure.

use serde::Deserialize;

use crate::resource::{ModelFormat, ResourceError};

/// `glTF` in little-endian
const GLB_MAGIC: u32 = 0x4654_6C67;
/// `JSON` chunk type
const CHUNK_JSON: u32 = 0x4E4F_534A;
const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Extension name for Draco mesh compression
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// How the glTF document was packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GltfContainer {
    Binary,
    Json,
}

/// Summary of the fields the loader dispatch cares about
#[derive(Debug, Clone)]
pub struct GltfSummary {
    pub container: GltfContainer,
    pub version: String,
    pub generator: Option<String>,
    pub extensions_required: Vec<String>,
    pub extensions_used: Vec<String>,
    pub external_uris: Vec<String>,
}

impl GltfSummary {
    pub fn requires(&self, extension: &str) -> bool {
        self.extensions_required.iter().any(|e| e == extension)
    }

    pub fn uses_draco(&self) -> bool {
        self.requires(DRACO_EXTENSION) || self.extensions_used.iter().any(|e| e == DRACO_EXTENSION)
    }

    /// Reject documents the engine loader cannot resolve from a single dropped file
    pub fn ensure_loadable(&self, decoder_path: &str) -> Result<(), ResourceError> {
        if self.requires(DRACO_EXTENSION) {
            return Err(ResourceError::UnsupportedExtension {
                extension: DRACO_EXTENSION.to_string(),
                decoder_path: decoder_path.to_string(),
            });
        }
        if let Some(uri) = self.external_uris.first() {
            return Err(ResourceError::ExternalReference(uri.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    asset: Asset,
    #[serde(default, rename = "extensionsRequired")]
    extensions_required: Vec<String>,
    #[serde(default, rename = "extensionsUsed")]
    extensions_used: Vec<String>,
    #[serde(default)]
    buffers: Vec<UriRef>,
    #[serde(default)]
    images: Vec<UriRef>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    version: String,
    #[serde(default)]
    generator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UriRef {
    #[serde(default)]
    uri: Option<String>,
}

/// Probe a dropped model's bytes
pub fn inspect(format: ModelFormat, data: &[u8]) -> Result<GltfSummary, ResourceError> {
    // A .gltf may still carry binary content; trust the magic over the suffix
    let (container, json) = if data.len() >= 4 && read_u32(data, 0) == GLB_MAGIC {
        (GltfContainer::Binary, glb_json_chunk(data)?)
    } else if format == ModelFormat::Glb {
        return Err(ResourceError::InvalidGltf("missing GLB magic".to_string()));
    } else {
        (GltfContainer::Json, strip_bom(data))
    };

    let document: Document = serde_json::from_slice(json)
        .map_err(|e| ResourceError::InvalidGltf(format!("JSON error: {}", e)))?;

    if !document.asset.version.starts_with('2') {
        return Err(ResourceError::InvalidGltf(format!(
            "unsupported asset version {}",
            document.asset.version
        )));
    }

    let external_uris = document
        .buffers
        .iter()
        .chain(document.images.iter())
        .filter_map(|r| r.uri.as_deref())
        .filter(|uri| !uri.starts_with("data:"))
        .map(str::to_string)
        .collect();

    Ok(GltfSummary {
        container,
        version: document.asset.version,
        generator: document.asset.generator,
        extensions_required: document.extensions_required,
        extensions_used: document.extensions_used,
        external_uris,
    })
}

fn glb_json_chunk(data: &[u8]) -> Result<&[u8], ResourceError> {
    if data.len() < GLB_HEADER_LEN + CHUNK_HEADER_LEN {
        return Err(ResourceError::InvalidGltf("truncated GLB header".to_string()));
    }

    let version = read_u32(data, 4);
    if version != 2 {
        return Err(ResourceError::InvalidGltf(format!(
            "unsupported GLB version {}",
            version
        )));
    }

    let total = read_u32(data, 8) as usize;
    if total > data.len() {
        return Err(ResourceError::InvalidGltf(format!(
            "GLB declares {} bytes but only {} present",
            total,
            data.len()
        )));
    }

    let chunk_len = read_u32(data, GLB_HEADER_LEN) as usize;
    let chunk_type = read_u32(data, GLB_HEADER_LEN + 4);
    if chunk_type != CHUNK_JSON {
        return Err(ResourceError::InvalidGltf("first chunk is not JSON".to_string()));
    }

    let start = GLB_HEADER_LEN + CHUNK_HEADER_LEN;
    let end = start
        .checked_add(chunk_len)
        .filter(|end| *end <= total)
        .ok_or_else(|| ResourceError::InvalidGltf("JSON chunk overruns file".to_string()))?;

    Ok(&data[start..end])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glb(json: &str) -> Vec<u8> {
        let mut chunk = json.as_bytes().to_vec();
        while chunk.len() % 4 != 0 {
            chunk.push(b' ');
        }
        let total = (GLB_HEADER_LEN + CHUNK_HEADER_LEN + chunk.len()) as u32;

        let mut out = Vec::new();
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&chunk);
        out
    }

    #[test]
    fn test_inspect_glb() {
        let data = glb(r#"{"asset":{"version":"2.0","generator":"test"},"buffers":[{"byteLength":4}]}"#);
        let summary = inspect(ModelFormat::Glb, &data).unwrap();
        assert_eq!(summary.container, GltfContainer::Binary);
        assert_eq!(summary.version, "2.0");
        assert_eq!(summary.generator.as_deref(), Some("test"));
        assert!(summary.external_uris.is_empty());
        assert!(summary.ensure_loadable("./draco/").is_ok());
    }

    #[test]
    fn test_inspect_gltf_json_with_embedded_buffer() {
        let json = r#"{"asset":{"version":"2.0"},"buffers":[{"uri":"data:application/octet-stream;base64,AAAA","byteLength":3}]}"#;
        let summary = inspect(ModelFormat::Gltf, json.as_bytes()).unwrap();
        assert_eq!(summary.container, GltfContainer::Json);
        assert!(summary.ensure_loadable("./draco/").is_ok());
    }

    #[test]
    fn test_gltf_suffix_with_binary_content() {
        let data = glb(r#"{"asset":{"version":"2.0"}}"#);
        let summary = inspect(ModelFormat::Gltf, &data).unwrap();
        assert_eq!(summary.container, GltfContainer::Binary);
    }

    #[test]
    fn test_external_reference_rejected() {
        let json = r#"{"asset":{"version":"2.0"},"buffers":[{"uri":"scene.bin","byteLength":3}]}"#;
        let summary = inspect(ModelFormat::Gltf, json.as_bytes()).unwrap();
        assert!(matches!(
            summary.ensure_loadable("./draco/"),
            Err(ResourceError::ExternalReference(uri)) if uri == "scene.bin"
        ));
    }

    #[test]
    fn test_draco_required_rejected() {
        let data = glb(
            r#"{"asset":{"version":"2.0"},"extensionsUsed":["KHR_draco_mesh_compression"],"extensionsRequired":["KHR_draco_mesh_compression"]}"#,
        );
        let summary = inspect(ModelFormat::Glb, &data).unwrap();
        assert!(summary.uses_draco());
        match summary.ensure_loadable("./draco/") {
            Err(ResourceError::UnsupportedExtension {
                extension,
                decoder_path,
            }) => {
                assert_eq!(extension, DRACO_EXTENSION);
                assert_eq!(decoder_path, "./draco/");
            }
            other => panic!("expected UnsupportedExtension, got {:?}", other),
        }
    }

    #[test]
    fn test_draco_optional_allowed() {
        let data = glb(r#"{"asset":{"version":"2.0"},"extensionsUsed":["KHR_draco_mesh_compression"]}"#);
        let summary = inspect(ModelFormat::Glb, &data).unwrap();
        assert!(summary.uses_draco());
        assert!(summary.ensure_loadable("./draco/").is_ok());
    }

    #[test]
    fn test_invalid_glb() {
        assert!(matches!(
            inspect(ModelFormat::Glb, b"not a model"),
            Err(ResourceError::InvalidGltf(_))
        ));

        let mut truncated = glb(r#"{"asset":{"version":"2.0"}}"#);
        truncated.truncate(16);
        assert!(matches!(
            inspect(ModelFormat::Glb, &truncated),
            Err(ResourceError::InvalidGltf(_))
        ));

        let mut wrong_version = glb(r#"{"asset":{"version":"2.0"}}"#);
        wrong_version[4] = 1;
        assert!(matches!(
            inspect(ModelFormat::Glb, &wrong_version),
            Err(ResourceError::InvalidGltf(msg)) if msg.contains("version")
        ));
    }

    #[test]
    fn test_old_asset_version_rejected() {
        let json = "\u{feff}{\"asset\":{\"version\":\"1.0\"}}";
        assert!(matches!(
            inspect(ModelFormat::Gltf, json.as_bytes()),
            Err(ResourceError::InvalidGltf(msg)) if msg.contains("1.0")
        ));
    }
}
