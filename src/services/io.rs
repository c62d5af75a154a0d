//! Image I/O operations service
//!
//! Keeps file access out of the removal algorithms so they stay pure
//! functions over in-memory buffers.

use crate::{
    config::OutputFormat,
    error::{Result, WandError},
    services::OutputFormatHandler,
    types::PixelBuffer,
};
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Tries extension-based format detection first and falls back to
    /// sniffing the file content.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use wand_bgremove::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_image("sprite.png")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(WandError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                debug!(
                    path = %path_ref.display(),
                    error = %e,
                    "Extension-based loading failed, trying content detection"
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    WandError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    WandError::processing_stage_error(
                        "image loading",
                        &format!(
                            "extension error: {}. content error: {}",
                            e, content_err
                        ),
                        Some(&format!(
                            "path: {}, size: {} bytes",
                            path_ref.display(),
                            data.len()
                        )),
                    )
                })
            },
        }
    }

    /// Load an image file straight into an RGBA pixel buffer
    pub fn load_buffer<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
        let image = Self::load_image(path)?;
        PixelBuffer::try_from(&image)
    }

    /// Decode an image from bytes, sniffing the format from content
    pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| {
            WandError::processing_stage_error(
                "image decoding",
                &e.to_string(),
                Some(&format!("{} bytes", bytes.len())),
            )
        })
    }

    /// Save a pixel buffer in `format`, creating parent directories as needed
    pub fn save_buffer<P: AsRef<Path>>(
        buffer: &PixelBuffer,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let bytes = OutputFormatHandler::encode(buffer, format)?;
        Self::write_bytes(path, &bytes)
    }

    /// Write encoded output, creating parent directories as needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    WandError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        std::fs::write(path_ref, bytes)
            .map_err(|e| WandError::file_io_error("write output file", path_ref, &e))?;
        debug!(path = %path_ref.display(), bytes = bytes.len(), "Wrote output");
        Ok(())
    }

    /// Check if a file path has a supported image extension
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                matches!(
                    ext.to_lowercase().as_str(),
                    "png" | "jpg" | "jpeg" | "tif" | "tiff"
                )
            })
    }
}
