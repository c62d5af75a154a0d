//! Configuration types for background removal operations

use crate::{
    animation::AnimationOptions,
    color::{Rgb, Tolerance},
    error::{Result, WandError},
    resize::CanvasSize,
    types::Coordinate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How background pixels are chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RemovalMode {
    /// Contiguous region around a seed pixel (magic wand)
    Contiguous { seed: Coordinate },
    /// Every pixel close to a fixed color, anywhere in the image
    ColorKey { color: Rgb },
}

impl Default for RemovalMode {
    fn default() -> Self {
        Self::Contiguous {
            seed: Coordinate::new(0, 0),
        }
    }
}

impl std::fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contiguous { seed } => write!(f, "contiguous from {}", seed),
            Self::ColorKey { color } => write!(f, "color key {}", color),
        }
    }
}

/// Output encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// Raw RGBA8 pixel data (4 bytes per pixel)
    Rgba8,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

/// Configuration for background removal operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Pixel selection strategy
    pub mode: RemovalMode,

    /// Maximum Euclidean RGB distance counted as background
    pub tolerance: Tolerance,

    /// Resize the result onto a fixed canvas after removal
    #[serde(default)]
    pub canvas: Option<CanvasSize>,

    /// Output format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Frame timing used when several results are combined into an APNG
    #[serde(default)]
    pub animation: AnimationOptions,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            mode: RemovalMode::default(),
            tolerance: Tolerance::DEFAULT,
            canvas: None,
            output_format: OutputFormat::default(),
            animation: AnimationOptions::default(),
        }
    }
}

impl RemovalConfig {
    /// Create a new configuration builder for fluent API construction
    ///
    /// # Examples
    /// ```rust
    /// use wand_bgremove::{CanvasSize, RemovalConfig, Rgb};
    ///
    /// let config = RemovalConfig::builder()
    ///     .color_key(Rgb::new(0, 255, 0))
    ///     .tolerance(40.0)
    ///     .canvas(CanvasSize::new(320, 270))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.tolerance.value(), 40.0);
    /// ```
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::default()
    }

    /// Validate all configuration parameters
    ///
    /// # Errors
    /// - Zero-sized canvas
    pub fn validate(&self) -> Result<()> {
        if let Some(canvas) = self.canvas {
            canvas.validate()?;
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WandError::file_io_error("read config file", path, &e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            WandError::invalid_config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for `RemovalConfig`
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
    tolerance: Option<f64>,
}

impl RemovalConfigBuilder {
    /// Use contiguous region growing from `seed`
    #[must_use]
    pub fn seed(mut self, seed: Coordinate) -> Self {
        self.config.mode = RemovalMode::Contiguous { seed };
        self
    }

    /// Use global color keying against `color`
    #[must_use]
    pub fn color_key(mut self, color: Rgb) -> Self {
        self.config.mode = RemovalMode::ColorKey { color };
        self
    }

    /// Set the match tolerance (validated at build time)
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Resize results onto a fixed-size canvas
    #[must_use]
    pub fn canvas(mut self, canvas: CanvasSize) -> Self {
        self.config.canvas = Some(canvas);
        self
    }

    /// Set output format
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set animation frame delay in milliseconds
    #[must_use]
    pub fn frame_delay_ms(mut self, delay_ms: u16) -> Self {
        self.config.animation.delay_ms = delay_ms;
        self
    }

    /// Set animation loop count (0 = infinite)
    #[must_use]
    pub fn loop_count(mut self, loop_count: u32) -> Self {
        self.config.animation.loop_count = loop_count;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// - Negative or non-finite tolerance
    /// - Zero-sized canvas
    pub fn build(self) -> Result<RemovalConfig> {
        let mut config = self.config;
        if let Some(tolerance) = self.tolerance {
            config.tolerance = Tolerance::new(tolerance)?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RemovalConfig::default();
        assert_eq!(config.tolerance, Tolerance::DEFAULT);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.canvas, None);
        assert_eq!(config.animation, AnimationOptions::default());
        assert!(matches!(config.mode, RemovalMode::Contiguous { .. }));
    }

    #[test]
    fn test_config_builder() {
        let config = RemovalConfig::builder()
            .seed(Coordinate::new(4, 7))
            .tolerance(12.5)
            .output_format(OutputFormat::Rgba8)
            .frame_delay_ms(40)
            .loop_count(2)
            .build()
            .unwrap();

        assert_eq!(
            config.mode,
            RemovalMode::Contiguous {
                seed: Coordinate::new(4, 7)
            }
        );
        assert_eq!(config.tolerance.value(), 12.5);
        assert_eq!(config.output_format, OutputFormat::Rgba8);
        assert_eq!(config.animation.delay_ms, 40);
        assert_eq!(config.animation.loop_count, 2);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        let result = RemovalConfig::builder().tolerance(-1.0).build();
        assert!(matches!(result, Err(WandError::InvalidConfig(_))));

        let result = RemovalConfig::builder()
            .canvas(CanvasSize::new(320, 0))
            .build();
        assert!(matches!(result, Err(WandError::DimensionMismatch(_))));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = RemovalConfig::builder()
            .color_key(Rgb::new(0, 255, 0))
            .tolerance(50.0)
            .canvas(CanvasSize::default())
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"mode\":\"color_key\""));

        let back: RemovalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_serde_defaults_for_optional_fields() {
        let json = r#"{"mode":{"mode":"contiguous","seed":{"x":1,"y":2}},"tolerance":10.0}"#;
        let config: RemovalConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.canvas, None);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.animation.delay_ms, 100);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"mode":{"mode":"color_key","color":{"r":255,"g":0,"b":255}},"tolerance":5.0,"canvas":{"width":64,"height":48}}"#,
        )
        .unwrap();

        let config = RemovalConfig::from_json_file(&path).unwrap();
        assert_eq!(
            config.mode,
            RemovalMode::ColorKey {
                color: Rgb::new(255, 0, 255)
            }
        );
        assert_eq!(config.canvas, Some(CanvasSize::new(64, 48)));

        assert!(RemovalConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_mode_display() {
        let mode = RemovalMode::ColorKey {
            color: Rgb::new(255, 0, 0),
        };
        assert_eq!(mode.to_string(), "color key #ff0000");
    }
}
