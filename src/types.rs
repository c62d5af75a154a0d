//! Core types for background removal operations

use crate::{
    color::Rgb,
    error::{Result, WandError},
};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// Offset of the alpha channel inside a pixel
pub const ALPHA: usize = 3;

/// Pixel position inside a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Coordinate {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle in pixel units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// In-memory RGBA8 image, row-major, 4 bytes per pixel
///
/// Pixel `(x, y)` lives at byte offset `(y * width + x) * 4`. Width and height
/// are always non-zero and `data.len() == width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, validating dimensions against the byte count
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(WandError::dimension_mismatch(format!(
                "{}x{} RGBA buffer needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer filled with a single RGBA value
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = Self::byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Fully transparent buffer
    pub fn transparent(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    fn byte_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(WandError::dimension_mismatch(format!(
                "buffer dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(|| {
                WandError::dimension_mismatch(format!(
                    "{}x{} buffer exceeds addressable memory",
                    width, height
                ))
            })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Whether `coord` lies inside the buffer
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Linear pixel index (not byte offset) of an in-bounds coordinate
    #[inline]
    #[must_use]
    pub(crate) fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// RGBA value at `coord`, `None` when out of bounds
    #[must_use]
    pub fn pixel(&self, coord: Coordinate) -> Option<[u8; 4]> {
        if !self.contains(coord) {
            return None;
        }
        let offset = self.index_of(coord.x, coord.y) * CHANNELS;
        self.data
            .get(offset..offset + CHANNELS)
            .and_then(|px| px.try_into().ok())
    }

    /// RGB of the pixel at linear index `index`
    #[inline]
    #[allow(clippy::indexing_slicing)]
    // Safe: callers only pass indices below width * height
    pub(crate) fn rgb_at(&self, index: usize) -> Rgb {
        let offset = index * CHANNELS;
        Rgb::new(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        )
    }

    /// Alpha of the pixel at linear index `index`
    #[inline]
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn alpha_at(&self, index: usize) -> u8 {
        self.data[index * CHANNELS + ALPHA]
    }

    /// Make the pixel at linear index `index` fully transparent, RGB untouched
    #[inline]
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn clear_alpha_at(&mut self, index: usize) {
        self.data[index * CHANNELS + ALPHA] = 0;
    }

    /// Mutable RGBA pixel chunks in row-major order
    pub(crate) fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(CHANNELS)
    }

    /// Number of pixels with alpha == 0
    #[must_use]
    pub fn transparent_count(&self) -> usize {
        self.data
            .chunks_exact(CHANNELS)
            .filter(|px| px.get(ALPHA) == Some(&0))
            .count()
    }

    /// Convert into an `image` crate RGBA buffer without copying
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.data).ok_or_else(|| {
            WandError::dimension_mismatch(format!(
                "raw data does not fit a {}x{} RGBA image",
                width, height
            ))
        })
    }

    /// Encode as PNG with alpha channel
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let image = self.clone().into_rgba_image()?;
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image.write_to(&mut cursor, image::ImageFormat::Png)?;
        Ok(buffer)
    }

    /// Save as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.clone().into_rgba_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = WandError;

    fn try_from(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_raw(width, height, image.into_raw())
    }
}

impl TryFrom<&DynamicImage> for PixelBuffer {
    type Error = WandError;

    fn try_from(image: &DynamicImage) -> Result<Self> {
        Self::try_from(image.to_rgba8())
    }
}
