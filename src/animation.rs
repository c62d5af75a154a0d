//! Animated PNG encoding
//!
//! Encodes an ordered sequence of equally sized RGBA frames into a single
//! APNG byte stream. The first frame doubles as the default image shown by
//! decoders without APNG support.

use crate::{
    error::{Result, WandError},
    types::PixelBuffer,
};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

/// Timing options for an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationOptions {
    /// Display time of every frame, in milliseconds
    pub delay_ms: u16,
    /// Number of times the animation plays (0 = loop forever)
    pub loop_count: u32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            loop_count: 0,
        }
    }
}

/// Encode `frames` as an animated PNG
///
/// Returns `Ok(None)` for an empty frame sequence.
///
/// # Errors
/// - `DimensionMismatch` if any frame differs in size from the first
/// - `Encoding` if the PNG encoder fails
///
/// # Examples
/// ```rust
/// use wand_bgremove::{encode_apng, AnimationOptions, PixelBuffer};
///
/// let frames = vec![
///     PixelBuffer::filled(8, 8, [255, 0, 0, 255])?,
///     PixelBuffer::filled(8, 8, [0, 0, 255, 255])?,
/// ];
/// let bytes = encode_apng(&frames, &AnimationOptions::default())?.expect("non-empty");
/// assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
///
/// assert!(encode_apng(&[], &AnimationOptions::default())?.is_none());
/// # Ok::<(), wand_bgremove::WandError>(())
/// ```
pub fn encode_apng(frames: &[PixelBuffer], options: &AnimationOptions) -> Result<Option<Vec<u8>>> {
    let Some(first) = frames.first() else {
        debug!("No frames to encode");
        return Ok(None);
    };

    let (width, height) = first.dimensions();
    for (index, frame) in frames.iter().enumerate() {
        if frame.dimensions() != (width, height) {
            return Err(WandError::dimension_mismatch(format!(
                "frame {} is {}x{}, expected {}x{}",
                index,
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }
    }

    let frame_count = u32::try_from(frames.len()).map_err(|_| {
        WandError::invalid_config(format!("too many frames: {}", frames.len()))
    })?;

    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(Cursor::new(&mut output), width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_animated(frame_count, options.loop_count)?;
        encoder.set_frame_delay(options.delay_ms, 1000)?;

        let mut writer = encoder.write_header()?;
        for frame in frames {
            writer.write_image_data(frame.as_raw())?;
        }
        writer.finish()?;
    }

    debug!(
        frames = frame_count,
        width = width,
        height = height,
        delay_ms = options.delay_ms,
        loop_count = options.loop_count,
        bytes = output.len(),
        "Encoded APNG"
    );

    Ok(Some(output))
}
