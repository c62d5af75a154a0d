//! Global color keying
//!
//! Removes a color everywhere it appears, regardless of connectivity. Use
//! [`crate::region::RegionGrower`] to remove a single contiguous region instead.

use crate::{
    color::{Rgb, Tolerance},
    error::Result,
    types::{PixelBuffer, ALPHA},
};
use tracing::debug;

/// Make every pixel within `tolerance` of `target` transparent
///
/// Single pass over the buffer using the same distance and inclusive
/// comparison as region growing. RGB channels are never modified.
///
/// # Examples
/// ```rust
/// use wand_bgremove::{apply_color_key, PixelBuffer, Rgb, Tolerance};
///
/// let mut buffer = PixelBuffer::filled(2, 2, [0, 255, 0, 255])?;
/// apply_color_key(&mut buffer, Rgb::new(0, 250, 0), Tolerance::new(5.0)?)?;
/// assert_eq!(buffer.transparent_count(), 4);
/// # Ok::<(), wand_bgremove::WandError>(())
/// ```
pub fn apply_color_key(
    buffer: &mut PixelBuffer,
    target: Rgb,
    tolerance: Tolerance,
) -> Result<&mut PixelBuffer> {
    apply_color_key_counted(buffer, target, tolerance)?;
    Ok(buffer)
}

/// Like [`apply_color_key`], returning the number of matching pixels
pub fn apply_color_key_counted(
    buffer: &mut PixelBuffer,
    target: Rgb,
    tolerance: Tolerance,
) -> Result<usize> {
    let mut matched = 0;

    for pixel in buffer.pixels_mut() {
        #[allow(clippy::indexing_slicing)]
        // Safe: chunks_exact yields exactly 4 bytes per pixel
        let rgb = Rgb::new(pixel[0], pixel[1], pixel[2]);
        if tolerance.accepts(target, rgb) {
            if let Some(alpha) = pixel.get_mut(ALPHA) {
                *alpha = 0;
            }
            matched += 1;
        }
    }

    debug!(
        target = %target,
        tolerance = %tolerance,
        matched = matched,
        "Color key applied"
    );

    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;

    #[test]
    fn test_removes_disconnected_occurrences() {
        // Magenta in two opposite corners of a white 3x3
        let mut data = Vec::new();
        for i in 0..9 {
            let rgba = if i == 0 || i == 8 {
                [255, 0, 255, 255]
            } else {
                [255, 255, 255, 255]
            };
            data.extend_from_slice(&rgba);
        }
        let mut buffer = PixelBuffer::from_raw(3, 3, data).unwrap();

        let matched = apply_color_key_counted(
            &mut buffer,
            Rgb::new(255, 0, 255),
            Tolerance::new(0.0).unwrap(),
        )
        .unwrap();

        assert_eq!(matched, 2);
        assert_eq!(buffer.pixel(Coordinate::new(0, 0)), Some([255, 0, 255, 0]));
        assert_eq!(buffer.pixel(Coordinate::new(2, 2)), Some([255, 0, 255, 0]));
        assert_eq!(buffer.pixel(Coordinate::new(1, 1)), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_no_match_leaves_buffer_untouched() {
        let mut buffer = PixelBuffer::filled(4, 4, [10, 10, 10, 200]).unwrap();
        let before = buffer.clone();

        apply_color_key(&mut buffer, Rgb::WHITE, Tolerance::new(100.0).unwrap()).unwrap();
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_inclusive_boundary() {
        let mut buffer = PixelBuffer::filled(1, 1, [3, 4, 0, 255]).unwrap();
        apply_color_key(&mut buffer, Rgb::BLACK, Tolerance::new(5.0).unwrap()).unwrap();
        assert_eq!(buffer.as_raw(), &[3, 4, 0, 0]);
    }
}
