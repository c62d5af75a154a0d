//! Output format handling service

use crate::{config::OutputFormat, error::Result, types::PixelBuffer};

/// Service for encoding results in the configured output format
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Encode `buffer` as `format`
    ///
    /// PNG keeps the alpha channel; `Rgba8` is the raw row-major pixel data.
    ///
    /// # Examples
    /// ```rust
    /// use wand_bgremove::{services::OutputFormatHandler, OutputFormat, PixelBuffer};
    ///
    /// let buffer = PixelBuffer::filled(2, 1, [1, 2, 3, 4])?;
    /// let raw = OutputFormatHandler::encode(&buffer, OutputFormat::Rgba8)?;
    /// assert_eq!(raw, vec![1, 2, 3, 4, 1, 2, 3, 4]);
    /// # Ok::<(), wand_bgremove::WandError>(())
    /// ```
    pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => buffer.to_png_bytes(),
            OutputFormat::Rgba8 => Ok(buffer.as_raw().to_vec()),
        }
    }

    /// File extension (without the dot) for `format`
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Rgba8 => "rgba",
        }
    }
}
