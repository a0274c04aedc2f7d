//! Texture atlas: N square textures packed left-to-right in one image.
//!
//! Walls are textured by pulling single columns out of the atlas. The atlas
//! is decoded once at startup and never changes afterwards.
//!
//! # Layout
//! ```text
//! x: 0 .. S        S .. 2S       ...   (N-1)S .. NS
//!    [texture 0]   [texture 1]   ...   [texture N-1]     height S
//! ```

use std::path::Path;

use raymancer_common::{BufferError, PixelBuffer, pack_color};

/// Errors from atlas construction and access.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("unable to load texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {path} must be a 32-bit image, decoder reported {channels} channels")]
    WrongChannelCount { path: String, channels: u8 },
    #[error("atlas of {width}x{height} is not N square textures packed horizontally")]
    NotSquareMultiple { width: u32, height: u32 },
    #[error("atlas buffer holds {actual} values, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("texture id {id} out of range, atlas holds {count} textures")]
    TextureOutOfRange { id: usize, count: usize },
    #[error("texture coordinate {u} out of range for {size}px textures")]
    CoordinateOutOfRange { u: usize, size: usize },
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Immutable set of equal-size square textures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAtlas {
    size: usize,
    count: usize,
    pixels: Vec<u32>,
}

impl TextureAtlas {
    /// Wrap packed colors laid out as `count` textures of `size x size`.
    pub fn from_packed(size: usize, count: usize, pixels: Vec<u32>) -> Result<Self, AtlasError> {
        if size == 0 || count == 0 {
            return Err(AtlasError::NotSquareMultiple {
                width: (size * count) as u32,
                height: size as u32,
            });
        }
        let expected = size * count * size;
        if pixels.len() != expected {
            return Err(AtlasError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            size,
            count,
            pixels,
        })
    }

    /// Build from raw RGBA8 bytes of a `width x height` image.
    ///
    /// The width must be an exact multiple of the height.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, AtlasError> {
        if height == 0 || width == 0 || width % height != 0 {
            return Err(AtlasError::NotSquareMultiple { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(AtlasError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| pack_color(p[0], p[1], p[2], p[3]))
            .collect();
        Self::from_packed(height as usize, (width / height) as usize, pixels)
    }

    /// Decode an atlas image from disk.
    ///
    /// Any format the decoder understands is accepted as long as it reports
    /// exactly four channels.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| AtlasError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let channels = img.color().channel_count();
        if channels != 4 {
            return Err(AtlasError::WrongChannelCount {
                path: path.display().to_string(),
                channels,
            });
        }

        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        let atlas = Self::from_rgba8(width, height, rgba.as_raw())?;
        tracing::info!(
            path = %path.display(),
            texture_size = atlas.size,
            texture_count = atlas.count,
            "atlas loaded"
        );
        Ok(atlas)
    }

    /// Edge length `S` of every texture.
    pub fn texture_size(&self) -> usize {
        self.size
    }

    /// Number of textures `N`.
    pub fn texture_count(&self) -> usize {
        self.count
    }

    /// Full atlas width, `S * N`.
    pub fn width(&self) -> usize {
        self.size * self.count
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn check(&self, texture_id: usize, u: usize) -> Result<(), AtlasError> {
        if texture_id >= self.count {
            return Err(AtlasError::TextureOutOfRange {
                id: texture_id,
                count: self.count,
            });
        }
        if u >= self.size {
            return Err(AtlasError::CoordinateOutOfRange {
                u,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Vertical strip of `S` colors at column `u` of texture `texture_id`.
    pub fn column(&self, texture_id: usize, u: usize) -> Result<Vec<u32>, AtlasError> {
        self.check(texture_id, u)?;
        let x = texture_id * self.size + u;
        let stride = self.width();
        Ok((0..self.size).map(|v| self.pixels[x + v * stride]).collect())
    }

    /// Top-left pixel of a texture, used as its flat color on the overhead map.
    pub fn swatch(&self, texture_id: usize) -> Result<u32, AtlasError> {
        self.check(texture_id, 0)?;
        Ok(self.pixels[texture_id * self.size])
    }

    /// Copy of one texture as an `S x S` buffer.
    pub fn texture(&self, texture_id: usize) -> Result<PixelBuffer, AtlasError> {
        self.check(texture_id, 0)?;
        let stride = self.width();
        let x0 = texture_id * self.size;
        let pixels = (0..self.size)
            .flat_map(|v| self.pixels[x0 + v * stride..x0 + v * stride + self.size].iter().copied())
            .collect();
        Ok(PixelBuffer::from_pixels(
            self.size as u32,
            self.size as u32,
            pixels,
        )?)
    }
}

pub fn crate_info() -> &'static str {
    "raymancer-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two 2x2 textures, every texel distinct: value = 10 * id + 2 * v + u.
    fn two_by_two() -> TextureAtlas {
        let mut pixels = vec![0u32; 8];
        for id in 0..2usize {
            for v in 0..2usize {
                for u in 0..2usize {
                    pixels[id * 2 + u + v * 4] = (10 * id + 2 * v + u) as u32;
                }
            }
        }
        TextureAtlas::from_packed(2, 2, pixels).unwrap()
    }

    #[test]
    fn column_extraction() {
        let atlas = two_by_two();
        assert_eq!(atlas.column(0, 0).unwrap(), vec![0, 2]);
        assert_eq!(atlas.column(0, 1).unwrap(), vec![1, 3]);
        assert_eq!(atlas.column(1, 1).unwrap(), vec![11, 13]);
    }

    #[test]
    fn column_preconditions_are_errors() {
        let atlas = two_by_two();
        assert!(matches!(
            atlas.column(2, 0),
            Err(AtlasError::TextureOutOfRange { id: 2, count: 2 })
        ));
        assert!(matches!(
            atlas.column(0, 2),
            Err(AtlasError::CoordinateOutOfRange { u: 2, size: 2 })
        ));
    }

    #[test]
    fn swatch_is_first_pixel_of_texture() {
        let atlas = two_by_two();
        assert_eq!(atlas.swatch(0).unwrap(), 0);
        assert_eq!(atlas.swatch(1).unwrap(), 10);
        assert!(atlas.swatch(5).is_err());
    }

    #[test]
    fn texture_copy() {
        let atlas = two_by_two();
        let tex = atlas.texture(1).unwrap();
        assert_eq!(tex.pixels(), &[10, 11, 12, 13]);
    }

    #[test]
    fn packed_length_checked() {
        assert!(matches!(
            TextureAtlas::from_packed(2, 2, vec![0; 7]),
            Err(AtlasError::SizeMismatch {
                expected: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn rgba8_requires_square_multiple() {
        assert!(matches!(
            TextureAtlas::from_rgba8(5, 2, &[0; 40]),
            Err(AtlasError::NotSquareMultiple {
                width: 5,
                height: 2
            })
        ));
        let atlas = TextureAtlas::from_rgba8(4, 2, &[7; 32]).unwrap();
        assert_eq!(atlas.texture_size(), 2);
        assert_eq!(atlas.texture_count(), 2);
    }

    #[test]
    fn rgba8_packs_channels() {
        let atlas = TextureAtlas::from_rgba8(1, 1, &[1, 2, 3, 4]).unwrap();
        assert_eq!(atlas.pixels(), &[pack_color(1, 2, 3, 4)]);
    }

    #[test]
    fn load_png_atlas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walls.png");
        let img = image::RgbaImage::from_fn(6, 2, |x, _| image::Rgba([x as u8 * 10, 0, 0, 255]));
        img.save(&path).unwrap();

        let atlas = TextureAtlas::load(&path).unwrap();
        assert_eq!(atlas.texture_size(), 2);
        assert_eq!(atlas.texture_count(), 3);
        assert_eq!(atlas.swatch(2).unwrap(), pack_color(40, 0, 0, 255));
    }

    #[test]
    fn load_rejects_rgb_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        image::RgbImage::new(4, 2).save(&path).unwrap();

        let err = TextureAtlas::load(&path).unwrap_err();
        assert!(matches!(err, AtlasError::WrongChannelCount { channels: 3, .. }));
    }

    #[test]
    fn load_rejects_non_multiple_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.png");
        image::RgbaImage::new(5, 2).save(&path).unwrap();

        assert!(matches!(
            TextureAtlas::load(&path),
            Err(AtlasError::NotSquareMultiple { .. })
        ));
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = TextureAtlas::load("/no/such/atlas.png").unwrap_err();
        assert!(err.to_string().contains("/no/such/atlas.png"));
    }
}
