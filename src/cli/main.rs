//! Magic wand background removal CLI
//!
//! Subcommands map onto the library operations: `erase` (contiguous region
//! from a seed), `key` (global color key), `resize` (fit onto a canvas) and
//! `animate` (combine frames into an APNG).

use super::config::{parse_canvas, parse_color, parse_seed, CliConfigBuilder};
use crate::{
    animation::encode_apng,
    color::Rgb,
    config::OutputFormat,
    processor::BackgroundRemovalProcessor,
    resize::{resize_to_canvas, CanvasSize},
    services::{ImageIOService, OutputFormatHandler},
    tracing_config::{init_cli_tracing, spans},
    types::{Coordinate, PixelBuffer},
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn, Instrument};

/// Magic wand background removal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "wand-bgremove")]
pub struct Cli {
    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Erase the contiguous region around a seed pixel
    Erase(EraseArgs),
    /// Erase every pixel close to a color
    Key(KeyArgs),
    /// Fit images onto a fixed-size transparent canvas
    Resize(ResizeArgs),
    /// Combine images into an animated PNG
    Animate(AnimateArgs),
}

/// Inputs and output options shared by the per-file commands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input) or directory (several inputs)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// Fit results onto a WIDTHxHEIGHT canvas
    #[arg(long, value_name = "WxH", value_parser = parse_canvas)]
    pub canvas: Option<CanvasSize>,
}

#[derive(Args, Debug, Clone)]
pub struct EraseArgs {
    /// Seed pixel as X,Y [default: 0,0]
    #[arg(short, long, value_name = "X,Y", value_parser = parse_seed)]
    pub seed: Option<Coordinate>,

    /// Maximum RGB distance from the seed color [default: 32]
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// JSON config file; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Color to remove as #rrggbb
    #[arg(short, long, value_name = "HEX", value_parser = parse_color)]
    pub color: Option<Rgb>,

    /// Maximum RGB distance from the key color [default: 32]
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// JSON config file; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ResizeArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AnimateArgs {
    /// Frame images in playback order
    #[arg(value_name = "FRAME", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output APNG file
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Frame delay in milliseconds
    #[arg(long, default_value_t = 100)]
    pub delay: u16,

    /// Number of plays (0 = loop forever)
    #[arg(long, default_value_t = 0)]
    pub loops: u32,

    /// Fit every frame onto a WIDTHxHEIGHT canvas first
    #[arg(long, value_name = "WxH", value_parser = parse_canvas)]
    pub canvas: Option<CanvasSize>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Rgba8,
}

/// Per-file work of a batch command
enum Job {
    Remove(BackgroundRemovalProcessor),
    Resize(CanvasSize),
}

impl Job {
    /// Appended to the input stem when naming outputs
    fn output_suffix(&self) -> &'static str {
        match self {
            Self::Remove(_) => "bg_removed",
            Self::Resize(_) => "resized",
        }
    }

    async fn run(&self, input: &Path) -> Result<PixelBuffer> {
        match self {
            Self::Remove(processor) => {
                let result = processor.process_file(input).await?;
                debug!(cleared = result.cleared, "Removal finished");
                Ok(result.image)
            },
            Self::Resize(canvas) => {
                let buffer = ImageIOService::load_buffer(input)?;
                Ok(resize_to_canvas(&buffer, *canvas)?)
            },
        }
    }
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    match &cli.command {
        Command::Erase(args) => {
            let config = CliConfigBuilder::from_erase(args)?;
            info!(mode = %config.mode, tolerance = %config.tolerance, "Erasing region");
            let processor = BackgroundRemovalProcessor::new(config)
                .context("Failed to create background removal processor")?;
            run_batch("erase", &args.output, &Job::Remove(processor)).await
        },
        Command::Key(args) => {
            let config = CliConfigBuilder::from_key(args)?;
            info!(mode = %config.mode, tolerance = %config.tolerance, "Applying color key");
            let processor = BackgroundRemovalProcessor::new(config)
                .context("Failed to create background removal processor")?;
            run_batch("key", &args.output, &Job::Remove(processor)).await
        },
        Command::Resize(args) => {
            let canvas = args.output.canvas.unwrap_or_default();
            info!(width = canvas.width, height = canvas.height, "Resizing onto canvas");
            run_batch("resize", &args.output, &Job::Resize(canvas)).await
        },
        Command::Animate(args) => animate(args),
    }
}

/// Run `job` over every input, logging and counting failures
async fn run_batch(command: &str, args: &OutputArgs, job: &Job) -> Result<()> {
    let session = spans::session(command, args.inputs.len());
    process_inputs(args, job).instrument(session).await
}

async fn process_inputs(args: &OutputArgs, job: &Job) -> Result<()> {
    let files = collect_inputs(&args.inputs)?;
    if files.is_empty() {
        warn!("No supported image files found in the provided inputs");
        return Ok(());
    }

    let format = OutputFormat::from(args.format);
    let suffix = job.output_suffix();
    let file_count = files.len();

    let output_dir = if file_count > 1 {
        match &args.output {
            Some(dir) if dir.is_file() => anyhow::bail!(
                "Output path exists and is a file, not a directory: {}",
                dir.display()
            ),
            Some(dir) => Some(dir.clone()),
            None => None,
        }
    } else {
        None
    };

    let progress = if file_count > 1 {
        let pb = ProgressBar::new(file_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let batch_start = Instant::now();
    let mut processed_count = 0usize;
    let mut failed_count = 0usize;

    for input in &files {
        if let Some(pb) = &progress {
            pb.set_message(format!("Processing {}", input.display()));
        }

        let output_path = match (&output_dir, &args.output) {
            (Some(dir), _) => generate_output_path_with_dir(input, dir, suffix, format),
            (None, Some(path)) if file_count == 1 => path.clone(),
            _ => generate_output_path(input, suffix, format),
        };

        let outcome = async {
            let buffer = job.run(input).await?;
            ImageIOService::save_buffer(&buffer, &output_path, format)?;
            anyhow::Ok(())
        };

        match outcome.instrument(spans::file_processing(input)).await {
            Ok(()) => {
                processed_count += 1;
                debug!(
                    input = %input.display(),
                    output = %output_path.display(),
                    "Processed file"
                );
            },
            Err(e) => {
                failed_count += 1;
                error!(input = %input.display(), error = %e, "Failed to process file");
            },
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message(format!(
            "Completed! Processed: {processed_count}, Failed: {failed_count}"
        ));
    }

    info!(
        processed = processed_count,
        failed = failed_count,
        elapsed_s = batch_start.elapsed().as_secs_f64(),
        "Batch finished"
    );

    if failed_count > 0 {
        anyhow::bail!("{} of {} file(s) failed to process", failed_count, file_count);
    }
    Ok(())
}

fn animate(args: &AnimateArgs) -> Result<()> {
    let options = CliConfigBuilder::animation_options(args);
    let _span = spans::animation(args.inputs.len(), options.delay_ms).entered();

    let frames = args
        .inputs
        .iter()
        .map(|path| {
            let buffer = ImageIOService::load_buffer(path)
                .with_context(|| format!("Failed to load frame {}", path.display()))?;
            match args.canvas {
                Some(canvas) => Ok(resize_to_canvas(&buffer, canvas)?),
                None => Ok(buffer),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(bytes) = encode_apng(&frames, &options).context("Failed to encode animation")? else {
        warn!("No frames to encode");
        return Ok(());
    };

    ImageIOService::write_bytes(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        frames = frames.len(),
        bytes = bytes.len(),
        output = %args.output.display(),
        "Animation written"
    );
    Ok(())
}

/// Expand directories (non-recursively) and keep supported images, sorted
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in inputs {
        if path.is_file() {
            if ImageIOService::is_supported_format(path) {
                files.push(path.clone());
            } else {
                warn!(path = %path.display(), "Skipping unsupported file");
            }
        } else if path.is_dir() {
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
            {
                let entry_path = entry?.path();
                if entry_path.is_file() && ImageIOService::is_supported_format(&entry_path) {
                    files.push(entry_path);
                }
            }
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                path.display()
            );
        }
    }

    files.sort();
    Ok(files)
}

/// `<dir>/<stem>_<suffix>.<ext>` next to the input
fn generate_output_path(input_path: &Path, suffix: &str, format: OutputFormat) -> PathBuf {
    let dir = input_path.parent().unwrap_or(Path::new("."));
    generate_output_path_with_dir(input_path, dir, suffix, format)
}

fn generate_output_path_with_dir(
    input_path: &Path,
    output_dir: &Path,
    suffix: &str,
    format: OutputFormat,
) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    output_dir.join(format!(
        "{}_{}.{}",
        stem.to_string_lossy(),
        suffix,
        OutputFormatHandler::get_extension(format)
    ))
}
