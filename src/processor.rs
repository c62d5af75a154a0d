//! Background removal processor
//!
//! `BackgroundRemovalProcessor` ties the building blocks together: it applies
//! the configured removal mode, optionally fits the result onto a canvas and
//! combines frame sequences into an APNG. Both the CLI and library callers go
//! through it so they behave identically.

use crate::{
    animation::encode_apng,
    color_key::apply_color_key_counted,
    config::{OutputFormat, RemovalConfig, RemovalMode},
    error::{Result, WandError},
    region::RegionGrower,
    resize::resize_to_canvas,
    services::{ImageIOService, OutputFormatHandler},
    types::{PixelBuffer, Rect},
};
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Wall-clock timings of one processing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingTimings {
    /// Flood fill or color key
    pub removal_ms: u64,
    /// Canvas resize (0 when disabled)
    pub resize_ms: u64,
    pub total_ms: u64,
}

/// Output of a single removal
#[derive(Debug, Clone)]
pub struct RemovalResult {
    /// Processed RGBA pixels
    pub image: PixelBuffer,
    /// Number of pixels made transparent by the removal step
    pub cleared: usize,
    /// Bounding box of the cleared region (contiguous mode only)
    pub bounds: Option<Rect>,
    /// Dimensions before any canvas resize
    pub original_dimensions: (u32, u32),
    pub timings: ProcessingTimings,
}

impl RemovalResult {
    /// Encode the result in `format`
    pub fn to_bytes(&self, format: OutputFormat) -> Result<Vec<u8>> {
        OutputFormatHandler::encode(&self.image, format)
    }

    /// Save the result to `path` in `format`
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        ImageIOService::save_buffer(&self.image, path, format)
    }

    /// Save as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save(path, OutputFormat::Png)
    }

    /// Fraction of output pixels that are fully transparent
    #[must_use]
    pub fn transparency_ratio(&self) -> f64 {
        self.image.transparent_count() as f64 / self.image.pixel_count() as f64
    }
}

/// Applies a [`RemovalConfig`] to images, files and frame sequences
#[derive(Debug, Clone)]
pub struct BackgroundRemovalProcessor {
    config: RemovalConfig,
}

impl BackgroundRemovalProcessor {
    /// Create a processor, validating the configuration
    ///
    /// # Errors
    /// - Invalid configuration values
    pub fn new(config: RemovalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Process an owned pixel buffer
    ///
    /// # Errors
    /// - `InvalidSeed` if the contiguous seed lies outside the image
    /// - Resize failures
    #[instrument(
        skip(self, buffer),
        fields(
            mode = %self.config.mode,
            tolerance = %self.config.tolerance,
            dimensions = %format!("{}x{}", buffer.width(), buffer.height())
        )
    )]
    pub fn process_buffer(&self, mut buffer: PixelBuffer) -> Result<RemovalResult> {
        let total_start = Instant::now();
        let original_dimensions = buffer.dimensions();
        let mut timings = ProcessingTimings::default();

        let removal_start = Instant::now();
        let (cleared, bounds) = match self.config.mode {
            RemovalMode::Contiguous { seed } => {
                let outcome =
                    RegionGrower::grow_detailed(&mut buffer, seed, self.config.tolerance)?;
                (outcome.cleared, outcome.bounds)
            },
            RemovalMode::ColorKey { color } => {
                let matched = apply_color_key_counted(&mut buffer, color, self.config.tolerance)?;
                (matched, None)
            },
        };
        timings.removal_ms = removal_start.elapsed().as_millis() as u64;

        let image = match self.config.canvas {
            Some(canvas) => {
                let resize_start = Instant::now();
                let resized = resize_to_canvas(&buffer, canvas)?;
                timings.resize_ms = resize_start.elapsed().as_millis() as u64;
                resized
            },
            None => buffer,
        };
        timings.total_ms = total_start.elapsed().as_millis() as u64;

        info!(
            cleared = cleared,
            output_width = image.width(),
            output_height = image.height(),
            total_ms = timings.total_ms,
            "Background removal completed"
        );

        Ok(RemovalResult {
            image,
            cleared,
            bounds,
            original_dimensions,
            timings,
        })
    }

    /// Process a decoded image of any color type
    pub fn process_image(&self, image: &DynamicImage) -> Result<RemovalResult> {
        self.process_buffer(PixelBuffer::try_from(image)?)
    }

    /// Decode encoded image bytes and process them
    ///
    /// # Errors
    /// - Image decoding failures
    /// - Removal errors
    pub fn process_bytes(&self, image_bytes: &[u8]) -> Result<RemovalResult> {
        let image = ImageIOService::load_from_bytes(image_bytes)?;
        self.process_image(&image)
    }

    /// Load an image file and process it
    pub async fn process_file<P: AsRef<Path>>(&self, input_path: P) -> Result<RemovalResult> {
        let input_path = input_path.as_ref();
        let data = tokio::fs::read(input_path)
            .await
            .map_err(|e| WandError::file_io_error("read image file", input_path, &e))?;
        debug!(path = %input_path.display(), bytes = data.len(), "Loaded input file");
        self.process_bytes(&data)
    }

    /// Read an entire async stream and process it as an encoded image
    ///
    /// # Examples
    /// ```rust,no_run
    /// use wand_bgremove::{BackgroundRemovalProcessor, RemovalConfig};
    /// use tokio::fs::File;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let processor = BackgroundRemovalProcessor::new(RemovalConfig::default())?;
    /// let file = File::open("sprite.png").await?;
    /// let result = processor.process_reader(file).await?;
    /// result.save_png("sprite_clean.png")?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn process_reader<R: tokio::io::AsyncRead + Unpin>(
        &self,
        mut reader: R,
    ) -> Result<RemovalResult> {
        use tokio::io::AsyncReadExt;

        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| WandError::processing(format!("Failed to read from stream: {}", e)))?;

        self.process_bytes(&buffer)
    }

    /// Process every frame and encode the results as one APNG
    ///
    /// Returns `Ok(None)` for an empty sequence. Frames must share their
    /// dimensions after processing; configuring a canvas guarantees that.
    pub fn process_frames(&self, frames: Vec<PixelBuffer>) -> Result<Option<Vec<u8>>> {
        let processed = frames
            .into_iter()
            .map(|frame| self.process_buffer(frame).map(|result| result.image))
            .collect::<Result<Vec<_>>>()?;

        encode_apng(&processed, &self.config.animation)
    }
}
