#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

//! # Magic Wand Background Removal
//!
//! Color-based background removal for sprites and simple graphics, without
//! any segmentation model.
//!
//! ## Features
//!
//! - **Region growing**: flood-fill from a seed pixel, clearing every
//!   4-connected pixel within a color tolerance
//! - **Color keying**: clear a color everywhere it appears
//! - **Canvas resize**: aspect-preserving, centered fit onto a fixed canvas
//! - **APNG encoding**: combine equally sized frames into an animated PNG
//! - **CLI Integration**: optional command-line interface (`cli` feature)
//! - **Async and Sync APIs**
//!
//! ## Quick Start
//!
//! ```rust
//! use wand_bgremove::{Coordinate, PixelBuffer, RegionGrower, Tolerance};
//!
//! let mut sprite = PixelBuffer::filled(16, 16, [255, 255, 255, 255])?;
//! RegionGrower::grow(&mut sprite, Coordinate::new(0, 0), Tolerance::new(30.0)?)?;
//! assert_eq!(sprite.transparent_count(), 256);
//! # Ok::<(), wand_bgremove::WandError>(())
//! ```
//!
//! Files and encoded bytes go through [`BackgroundRemovalProcessor`]:
//!
//! ```rust,no_run
//! use wand_bgremove::{BackgroundRemovalProcessor, CanvasSize, Coordinate, RemovalConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RemovalConfig::builder()
//!     .seed(Coordinate::new(0, 0))
//!     .tolerance(24.0)
//!     .canvas(CanvasSize::default())
//!     .build()?;
//! let processor = BackgroundRemovalProcessor::new(config)?;
//! let result = processor.process_file("walk_01.png").await?;
//! result.save_png("walk_01_clean.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line interface and tracing subscriber setup
//! - `tracing-json`: JSON log output for the CLI

pub mod animation;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod color_key;
pub mod config;
pub mod error;
pub mod processor;
pub mod region;
pub mod resize;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

use tokio::io::AsyncRead;

pub use animation::{encode_apng, AnimationOptions};
pub use color::{color_distance, Rgb, Tolerance, MAX_COLOR_DISTANCE};
pub use color_key::{apply_color_key, apply_color_key_counted};
pub use config::{OutputFormat, RemovalConfig, RemovalConfigBuilder, RemovalMode};
pub use error::{Result, WandError};
pub use processor::{BackgroundRemovalProcessor, ProcessingTimings, RemovalResult};
pub use region::{GrowOutcome, RegionGrower, Selection};
pub use resize::{resize_to_canvas, CanvasSize, ResizePlan};
pub use services::{ImageIOService, OutputFormatHandler};
pub use types::{Coordinate, PixelBuffer, Rect};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, spans, TracingConfig, TracingFormat};

/// Remove the background from encoded image bytes
///
/// # Examples
/// ```rust
/// use wand_bgremove::{erase_from_bytes, PixelBuffer, RemovalConfig};
///
/// let png = PixelBuffer::filled(4, 4, [0, 0, 0, 255])?.to_png_bytes()?;
/// let result = erase_from_bytes(&png, &RemovalConfig::default())?;
/// assert_eq!(result.cleared, 16);
/// # Ok::<(), wand_bgremove::WandError>(())
/// ```
pub fn erase_from_bytes(image_bytes: &[u8], config: &RemovalConfig) -> Result<RemovalResult> {
    BackgroundRemovalProcessor::new(config.clone())?.process_bytes(image_bytes)
}

/// Remove the background from a decoded `DynamicImage`
pub fn erase_from_image(
    image: &image::DynamicImage,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    BackgroundRemovalProcessor::new(config.clone())?.process_image(image)
}

/// Remove the background from an async reader stream
///
/// The stream is read to the end before decoding.
///
/// # Examples
/// ```rust,no_run
/// use wand_bgremove::{erase_from_reader, RemovalConfig, Rgb};
/// use tokio::fs::File;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = RemovalConfig::builder()
///     .color_key(Rgb::new(255, 0, 255))
///     .build()?;
/// let file = File::open("sheet.png").await?;
/// let result = erase_from_reader(file, &config).await?;
/// result.save_png("sheet_clean.png")?;
/// # Ok(())
/// # }
/// ```
pub async fn erase_from_reader<R: AsyncRead + Unpin>(
    reader: R,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    BackgroundRemovalProcessor::new(config.clone())?
        .process_reader(reader)
        .await
}
