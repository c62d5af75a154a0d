//! Aspect-preserving canvas resizing
//!
//! Scales an image uniformly so it fits inside a fixed-size canvas, never
//! cropping, and centers it. Uncovered canvas area stays fully transparent.

use crate::{
    error::{Result, WandError},
    types::PixelBuffer,
};
use image::{imageops, ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed output canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject zero-sized canvases
    pub fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(WandError::dimension_mismatch(format!(
                "canvas dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(self)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(320, 270)
    }
}

/// Geometry of a resize: uniform scale, scaled size and centering offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ResizePlan {
    /// Compute the plan for fitting `source` dimensions into `target`
    ///
    /// Scale is `min(target_w / source_w, target_h / source_h)`. Scaled sizes
    /// are rounded to the nearest pixel (at least 1, at most the target) and
    /// the offset centers the result with integer division.
    pub fn compute(source: (u32, u32), target: CanvasSize) -> Result<Self> {
        let target = target.validate()?;
        let (source_width, source_height) = source;
        if source_width == 0 || source_height == 0 {
            return Err(WandError::dimension_mismatch(format!(
                "source dimensions must be non-zero, got {}x{}",
                source_width, source_height
            )));
        }

        let width_ratio = f64::from(target.width) / f64::from(source_width);
        let height_ratio = f64::from(target.height) / f64::from(source_height);
        let scale = width_ratio.min(height_ratio);

        let fit = |length: u32, limit: u32| -> u32 {
            let scaled = (f64::from(length) * scale).round();
            (scaled as u32).clamp(1, limit)
        };
        let scaled_width = fit(source_width, target.width);
        let scaled_height = fit(source_height, target.height);

        Ok(Self {
            scale,
            scaled_width,
            scaled_height,
            offset_x: (target.width - scaled_width) / 2,
            offset_y: (target.height - scaled_height) / 2,
        })
    }
}

/// 16-bit RGBA with color channels multiplied by alpha
type PremultipliedImage = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Scale color by alpha so fully transparent pixels carry no color
///
/// Channels and alpha share the `0..=255 * 255` range.
fn premultiply(image: &RgbaImage) -> PremultipliedImage {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = u16::from(a);
        Rgba([
            u16::from(r) * alpha,
            u16::from(g) * alpha,
            u16::from(b) * alpha,
            alpha * 255,
        ])
    })
}

fn unpremultiply(image: &PremultipliedImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = (f64::from(a) / 255.0).round() as u8;
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let restore =
            |channel: u16| (f64::from(channel) * 255.0 / f64::from(a)).round().min(255.0) as u8;
        Rgba([restore(r), restore(g), restore(b), alpha])
    })
}

/// Resize `source` onto a new transparent canvas of `target` size
///
/// The source is scaled uniformly (aspect preserved, never cropped) and
/// centered. Resampling uses a triangle (bilinear) filter over premultiplied
/// alpha, so the hidden color of erased pixels never bleeds into visible
/// edges.
pub fn resize_to_canvas(source: &PixelBuffer, target: CanvasSize) -> Result<PixelBuffer> {
    let plan = ResizePlan::compute(source.dimensions(), target)?;
    debug!(
        source_width = source.width(),
        source_height = source.height(),
        target_width = target.width,
        target_height = target.height,
        scale = plan.scale,
        "Resizing onto canvas"
    );

    let source_image = premultiply(&source.clone().into_rgba_image()?);
    let resized = unpremultiply(&imageops::resize(
        &source_image,
        plan.scaled_width,
        plan.scaled_height,
        imageops::FilterType::Triangle,
    ));

    let mut canvas = RgbaImage::new(target.width, target.height);
    imageops::replace(
        &mut canvas,
        &resized,
        i64::from(plan.offset_x),
        i64::from(plan.offset_y),
    );

    PixelBuffer::try_from(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Tolerance, region::RegionGrower, types::Coordinate};

    #[test]
    fn test_plan_wide_source() {
        let plan = ResizePlan::compute((100, 50), CanvasSize::new(320, 270)).unwrap();

        assert!((plan.scale - 3.2).abs() < 1e-12);
        assert_eq!((plan.scaled_width, plan.scaled_height), (320, 160));
        assert_eq!((plan.offset_x, plan.offset_y), (0, 55));
    }

    #[test]
    fn test_plan_tall_source() {
        let plan = ResizePlan::compute((50, 100), CanvasSize::new(320, 270)).unwrap();

        assert!((plan.scale - 2.7).abs() < 1e-12);
        assert_eq!((plan.scaled_width, plan.scaled_height), (135, 270));
        assert_eq!((plan.offset_x, plan.offset_y), (92, 0));
    }

    #[test]
    fn test_plan_downscale() {
        let plan = ResizePlan::compute((1000, 1000), CanvasSize::new(100, 50)).unwrap();

        assert_eq!((plan.scaled_width, plan.scaled_height), (50, 50));
        assert_eq!((plan.offset_x, plan.offset_y), (25, 0));
    }

    #[test]
    fn test_plan_rejects_zero_target() {
        let err = ResizePlan::compute((10, 10), CanvasSize::new(0, 10)).unwrap_err();
        assert!(matches!(err, WandError::DimensionMismatch(_)));
    }

    #[test]
    fn test_resize_centers_with_transparent_padding() {
        let source = PixelBuffer::filled(100, 50, [200, 10, 10, 255]).unwrap();
        let resized = resize_to_canvas(&source, CanvasSize::new(320, 270)).unwrap();

        assert_eq!(resized.dimensions(), (320, 270));
        // Padding above and below the scaled image
        assert_eq!(resized.pixel(Coordinate::new(160, 10)), Some([0, 0, 0, 0]));
        assert_eq!(resized.pixel(Coordinate::new(160, 260)), Some([0, 0, 0, 0]));
        // Inside the scaled image
        assert_eq!(
            resized.pixel(Coordinate::new(160, 135)),
            Some([200, 10, 10, 255])
        );
        assert_eq!(resized.transparent_count(), 320 * 110);
    }

    #[test]
    fn test_erased_color_does_not_bleed_into_edges() {
        let magenta = [255, 0, 255, 255];
        let blue = [0, 0, 255, 255];
        let data = [magenta, magenta, blue, blue].concat();
        let mut strip = PixelBuffer::from_raw(4, 1, data).unwrap();
        RegionGrower::grow(&mut strip, Coordinate::new(0, 0), Tolerance::EXACT).unwrap();

        let resized = resize_to_canvas(&strip, CanvasSize::new(16, 4)).unwrap();

        let mut visible = 0;
        for y in 0..4 {
            for x in 0..16 {
                let [r, g, b, a] = resized.pixel(Coordinate::new(x, y)).unwrap();
                if a == 0 {
                    continue;
                }
                visible += 1;
                assert_eq!((r, g), (0, 0), "magenta fringe at ({x}, {y})");
                assert!(b >= 254, "blue lost at ({x}, {y}): {b}");
            }
        }
        assert!(visible >= 32);
    }
}
