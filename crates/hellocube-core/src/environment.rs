//! Equirectangular environment maps
//!
//! Dropped `.hdr`/`.exr` files are decoded to linear RGBA and projected onto
//! the six faces of a cubemap, which the engine uses both as the skybox and as
//! the image-based lighting source.

use glam::Vec3;
use image::ImageFormat;
use std::f32::consts::PI;

use crate::resource::{EnvironmentFormat, ResourceError};

/// Linear RGBA texels of a latitude/longitude image, rows top to bottom
#[derive(Debug, Clone)]
pub struct EquirectMap {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<[f32; 4]>,
}

/// Six square faces in +X, -X, +Y, -Y, +Z, -Z layer order
#[derive(Debug, Clone)]
pub struct CubeMap {
    pub face_size: u32,
    pub texels: Vec<[f32; 4]>,
}

impl EquirectMap {
    /// Decode an HDR or EXR file
    pub fn decode(format: EnvironmentFormat, data: &[u8]) -> Result<Self, ResourceError> {
        let image_format = match format {
            EnvironmentFormat::Exr => ImageFormat::OpenExr,
            EnvironmentFormat::Hdr => ImageFormat::Hdr,
        };

        let image = image::load_from_memory_with_format(data, image_format)?.into_rgba32f();
        let (width, height) = image.dimensions();
        let texels = image.pixels().map(|p| p.0).collect();

        tracing::debug!(width, height, ?format, "Decoded equirectangular map");

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    pub fn from_texels(width: u32, height: u32, texels: Vec<[f32; 4]>) -> Self {
        debug_assert_eq!(texels.len(), (width * height) as usize);
        Self {
            width,
            height,
            texels,
        }
    }

    /// Cube face edge for this map: half the source height, rounded up to a
    /// power of two and clamped to `[min, max]`
    pub fn face_size(&self, min: u32, max: u32) -> u32 {
        (self.height / 2).max(1).next_power_of_two().clamp(min, max)
    }

    /// Bilinear lookup in the direction `dir` (need not be normalized)
    pub fn sample(&self, dir: Vec3) -> [f32; 4] {
        let dir = dir.normalize_or_zero();
        // Longitude wraps horizontally, latitude runs top (+Y) to bottom (-Y)
        let u = dir.z.atan2(dir.x) / (2.0 * PI) + 0.5;
        let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;

        let x = u * self.width as f32 - 0.5;
        let y = (v * self.height as f32 - 0.5).clamp(0.0, (self.height - 1) as f32);

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let x0 = x0 as i64;
        let y0 = y0 as u32;
        let y1 = (y0 + 1).min(self.height - 1);

        let a = self.texel(x0, y0);
        let b = self.texel(x0 + 1, y0);
        let c = self.texel(x0, y1);
        let d = self.texel(x0 + 1, y1);

        let mut out = [0.0; 4];
        for i in 0..4 {
            let top = a[i] + (b[i] - a[i]) * fx;
            let bottom = c[i] + (d[i] - c[i]) * fx;
            out[i] = top + (bottom - top) * fy;
        }
        out
    }

    fn texel(&self, x: i64, y: u32) -> [f32; 4] {
        let x = x.rem_euclid(self.width as i64) as u32;
        self.texels[(y * self.width + x) as usize]
    }

    /// Project onto a cubemap with `face_size` texels per edge
    pub fn to_cubemap(&self, face_size: u32) -> CubeMap {
        let face_size = face_size.max(1);
        let mut texels = Vec::with_capacity((face_size * face_size * 6) as usize);

        for face in 0..6 {
            for y in 0..face_size {
                for x in 0..face_size {
                    let u = 2.0 * (x as f32 + 0.5) / face_size as f32 - 1.0;
                    let v = 2.0 * (y as f32 + 0.5) / face_size as f32 - 1.0;
                    texels.push(self.sample(face_direction(face, u, v)));
                }
            }
        }

        CubeMap { face_size, texels }
    }
}

/// Direction through texel coordinates `(u, v)` in `[-1, 1]` of a cube face
/// (wgpu/Vulkan face orientation, `v` growing downwards)
pub fn face_direction(face: u32, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn face(cube: &CubeMap, index: u32) -> &[[f32; 4]] {
        let len = (cube.face_size * cube.face_size) as usize;
        let start = index as usize * len;
        &cube.texels[start..start + len]
    }

    /// 8x4 map whose red channel encodes the row and green the column
    fn gradient_map() -> EquirectMap {
        let (w, h) = (8u32, 4u32);
        let texels = (0..h)
            .flat_map(|y| (0..w).map(move |x| [y as f32, x as f32, 0.0, 1.0]))
            .collect();
        EquirectMap::from_texels(w, h, texels)
    }

    #[test]
    fn test_up_and_down_hit_extreme_rows() {
        let map = gradient_map();
        assert_eq!(map.sample(Vec3::Y)[0], 0.0);
        assert_eq!(map.sample(Vec3::NEG_Y)[0], 3.0);
    }

    #[test]
    fn test_horizon_hits_middle_rows() {
        let map = gradient_map();
        let row = map.sample(Vec3::X)[0];
        assert!((row - 1.5).abs() < 1e-4, "row {row}");
    }

    #[test]
    fn test_longitude_mapping() {
        let map = gradient_map();
        // +X sits at u = 0.5, the seam between columns 3 and 4
        assert!((map.sample(Vec3::X)[1] - 3.5).abs() < 1e-4);
        // +Z is a quarter turn further
        assert!((map.sample(Vec3::Z)[1] - 5.5).abs() < 1e-4);
        // -Z a quarter turn back
        assert!((map.sample(Vec3::NEG_Z)[1] - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_wrap() {
        let map = gradient_map();
        // -X lies on the seam: halfway between the last and first columns
        let column = map.sample(Vec3::NEG_X)[1];
        assert!((column - 3.5).abs() < 1e-4, "column {column}");
    }

    #[test]
    fn test_face_centres() {
        let expected = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for (face, dir) in expected.iter().enumerate() {
            assert_eq!(face_direction(face as u32, 0.0, 0.0), *dir);
        }
    }

    #[test]
    fn test_cubemap_layout() {
        let map = gradient_map();
        let cube = map.to_cubemap(4);
        assert_eq!(cube.face_size, 4);
        assert_eq!(cube.texels.len(), 4 * 4 * 6);

        // +Y face only sees the top row, -Y face only the bottom row
        assert!(face(&cube, 2).iter().all(|t| t[0] < 1.0));
        assert!(face(&cube, 3).iter().all(|t| t[0] > 2.0));
        // Side faces straddle the horizon
        assert!(face(&cube, 0).iter().any(|t| t[0] < 1.5));
        assert!(face(&cube, 0).iter().any(|t| t[0] > 1.5));
    }

    #[test]
    fn test_face_size_selection() {
        let map = EquirectMap::from_texels(2048, 1024, vec![[0.0; 4]; 2048 * 1024]);
        assert_eq!(map.face_size(16, 1024), 512);
        assert_eq!(map.face_size(16, 256), 256);

        let small = EquirectMap::from_texels(6, 3, vec![[0.0; 4]; 18]);
        assert_eq!(small.face_size(16, 1024), 16);

        let odd = EquirectMap::from_texels(1200, 600, vec![[0.0; 4]; 1200 * 600]);
        assert_eq!(odd.face_size(16, 1024), 512);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            EquirectMap::decode(EnvironmentFormat::Hdr, b"definitely not radiance"),
            Err(ResourceError::ImageDecode(_))
        ));
    }
}
