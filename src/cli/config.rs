//! Conversion of CLI arguments into library configuration

use crate::cli::main_impl::{AnimateArgs, CliOutputFormat, EraseArgs, KeyArgs};
use crate::{
    animation::AnimationOptions,
    color::Rgb,
    config::{OutputFormat, RemovalConfig, RemovalMode},
    resize::CanvasSize,
    types::Coordinate,
};
use anyhow::{Context, Result};

pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Contiguous removal config; flags override values from `--config`
    pub(crate) fn from_erase(args: &EraseArgs) -> Result<RemovalConfig> {
        let mut config = Self::base_config(args.config.as_deref())?;

        let seed = match (args.seed, config.mode) {
            (Some(seed), _) => seed,
            (None, RemovalMode::Contiguous { seed }) => seed,
            (None, RemovalMode::ColorKey { .. }) => Coordinate::new(0, 0),
        };
        config.mode = RemovalMode::Contiguous { seed };

        Self::apply_common(
            config,
            args.tolerance,
            args.output.canvas,
            args.output.format,
        )
    }

    /// Global color key config; flags override values from `--config`
    pub(crate) fn from_key(args: &KeyArgs) -> Result<RemovalConfig> {
        let mut config = Self::base_config(args.config.as_deref())?;

        let color = match (args.color, config.mode) {
            (Some(color), _) => color,
            (None, RemovalMode::ColorKey { color }) => color,
            (None, RemovalMode::Contiguous { .. }) => {
                anyhow::bail!("--color is required unless the config file sets a color key")
            },
        };
        config.mode = RemovalMode::ColorKey { color };

        Self::apply_common(
            config,
            args.tolerance,
            args.output.canvas,
            args.output.format,
        )
    }

    pub(crate) fn animation_options(args: &AnimateArgs) -> AnimationOptions {
        AnimationOptions {
            delay_ms: args.delay,
            loop_count: args.loops,
        }
    }

    fn base_config(path: Option<&std::path::Path>) -> Result<RemovalConfig> {
        match path {
            Some(path) => RemovalConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display())),
            None => Ok(RemovalConfig::default()),
        }
    }

    fn apply_common(
        config: RemovalConfig,
        tolerance: Option<f64>,
        canvas: Option<CanvasSize>,
        format: CliOutputFormat,
    ) -> Result<RemovalConfig> {
        let mut builder = RemovalConfig::builder();
        builder = match config.mode {
            RemovalMode::Contiguous { seed } => builder.seed(seed),
            RemovalMode::ColorKey { color } => builder.color_key(color),
        };
        builder = builder
            .tolerance(tolerance.unwrap_or_else(|| config.tolerance.value()))
            .output_format(format.into())
            .frame_delay_ms(config.animation.delay_ms)
            .loop_count(config.animation.loop_count);
        if let Some(canvas) = canvas.or(config.canvas) {
            builder = builder.canvas(canvas);
        }

        builder.build().context("Invalid configuration")
    }
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Png => Self::Png,
            CliOutputFormat::Rgba8 => Self::Rgba8,
        }
    }
}

/// Parse `X,Y` into a coordinate
pub(crate) fn parse_seed(value: &str) -> std::result::Result<Coordinate, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", value))?;
    let x = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid x in '{}': {}", value, e))?;
    let y = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid y in '{}': {}", value, e))?;
    Ok(Coordinate::new(x, y))
}

/// Parse `WIDTHxHEIGHT` into a non-zero canvas size
pub(crate) fn parse_canvas(value: &str) -> std::result::Result<CanvasSize, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT but got '{}'", value))?;
    let width = width
        .parse()
        .map_err(|e| format!("invalid width in '{}': {}", value, e))?;
    let height = height
        .parse()
        .map_err(|e| format!("invalid height in '{}': {}", value, e))?;
    CanvasSize::new(width, height)
        .validate()
        .map_err(|e| e.to_string())
}

/// Parse `#rrggbb` or `rrggbb`
pub(crate) fn parse_color(value: &str) -> std::result::Result<Rgb, String> {
    value.parse::<Rgb>().map_err(|e| e.to_string())
}
