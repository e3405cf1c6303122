//! Bootpack CLI Tool
//!
//! Command-line interface converting between animated GIFs and Android boot
//! animation bundles.

use anyhow::{bail, ensure, Context, Result};
use bootpack_core::naming::{bundle_name, recovered_name, resized_name};
use bootpack_core::{fit_sequence, BundleMode, Dimensions, InputKind, SequenceCodec};
use bootpack_decoder::{ArchiveSource, BundleReader, ReaderConfig, ZipSource};
use bootpack_encoder::{BundleBuilder, GifCodec};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bootpack")]
#[command(about = "Convert animated GIFs to Android boot animation bundles and back")]
#[command(version)]
struct Cli {
    /// Log per-frame and per-entry detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Letterbox every frame of a GIF onto a new canvas size
    Resize {
        /// Input GIF file path
        input: PathBuf,

        /// Target size as WIDTHxHEIGHT, e.g. 1920x1200
        size: String,

        /// Output GIF path (default: <stem>_<w>x<h>.gif next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pack a GIF into a boot animation zip
    Pack {
        /// Input GIF file path
        input: PathBuf,

        /// Animation mode: loop (1) or fixed (2)
        #[arg(short, long, default_value = "loop")]
        mode: String,

        /// Output zip path (default: <stem>-<mode>.zip next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rebuild a GIF from a boot animation zip
    Unpack {
        /// Input zip file path
        input: PathBuf,

        /// Override the frame rate from desc.txt
        #[arg(long)]
        fps: Option<u32>,

        /// Output GIF path (default: <stem>-fps<rate>.gif next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pick resize, pack or unpack from the input's extension
    Convert {
        /// Input GIF or zip file path
        input: PathBuf,

        /// Animation mode when packing a GIF
        #[arg(short, long, default_value = "loop")]
        mode: String,

        /// Resize a GIF to WIDTHxHEIGHT instead of packing it
        #[arg(long)]
        size: Option<String>,

        /// Override the frame rate when unpacking a zip
        #[arg(long)]
        fps: Option<u32>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show GIF or boot animation information
    Info {
        /// Input GIF or zip file path
        input: PathBuf,

        /// Print the boot animation descriptor as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Resize {
            input,
            size,
            output,
        } => {
            resize_gif(&input, &size, output)?;
        }

        Commands::Pack {
            input,
            mode,
            output,
        } => {
            pack_gif(&input, &mode, output)?;
        }

        Commands::Unpack { input, fps, output } => {
            unpack_zip(&input, fps, output)?;
        }

        Commands::Convert {
            input,
            mode,
            size,
            fps,
            output,
        } => match InputKind::from_path(&input) {
            InputKind::AnimatedImage => match size {
                Some(size) => {
                    resize_gif(&input, &size, output)?;
                }
                None => {
                    pack_gif(&input, &mode, output)?;
                }
            },
            InputKind::Archive => {
                unpack_zip(&input, fps, output)?;
            }
            InputKind::Unknown => {
                bail!(
                    "Invalid file format: {} (expected a .gif or bootanimation .zip)",
                    input.display()
                )
            }
        },

        Commands::Info { input, json } => show_info(&input, json)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    ensure!(input.is_file(), "The file '{}' does not exist", input.display());
    fs::read(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn file_stem(input: &Path) -> Result<&str> {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Invalid input file name")
}

/// Places `name` next to the input unless an explicit output was given
fn output_path(input: &Path, name: String, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| {
        input
            .parent()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(&name))
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn resize_gif(input: &Path, size: &str, output: Option<PathBuf>) -> Result<PathBuf> {
    let target: Dimensions = size.parse()?;
    let codec = GifCodec::default();

    let sequence = codec
        .decode(&read_input(input)?)
        .context("Failed to decode GIF")?;
    tracing::info!(
        frames = sequence.len(),
        from = %format!("{}x{}", sequence.width(), sequence.height()),
        to = %target,
        "resizing"
    );

    let resized = fit_sequence(&sequence, target)?;
    let bytes = codec.encode(&resized, None).context("Failed to encode GIF")?;

    let name = resized_name(
        file_stem(input)?,
        target.width,
        target.height,
        codec.extension(),
    );
    let path = output_path(input, name, output);
    write_output(&path, &bytes)?;

    println!("The resized GIF has been saved as '{}'", path.display());
    Ok(path)
}

fn pack_gif(input: &Path, mode: &str, output: Option<PathBuf>) -> Result<PathBuf> {
    let mode: BundleMode = mode.parse()?;

    let sequence = GifCodec::default()
        .decode(&read_input(input)?)
        .context("Failed to decode GIF")?;
    let bytes = BundleBuilder::default()
        .build(&sequence, mode)
        .context("Failed to build boot animation")?;

    let path = output_path(input, bundle_name(file_stem(input)?, mode), output);
    write_output(&path, &bytes)?;

    println!("The boot animation has been saved as '{}'", path.display());
    Ok(path)
}

fn unpack_zip(input: &Path, fps: Option<u32>, output: Option<PathBuf>) -> Result<PathBuf> {
    let reader = BundleReader::new(ReaderConfig {
        fps_override: fps,
        ..ReaderConfig::default()
    });
    let unpacked = reader
        .read(&read_input(input)?)
        .context("Failed to read boot animation")?;

    let codec = GifCodec::default();
    let bytes = codec
        .encode(&unpacked.sequence, None)
        .context("Failed to encode GIF")?;

    let name = recovered_name(file_stem(input)?, unpacked.rate, codec.extension());
    let path = output_path(input, name, output);
    write_output(&path, &bytes)?;

    println!("The GIF has been recreated as '{}'", path.display());
    Ok(path)
}

fn show_info(input: &Path, json: bool) -> Result<()> {
    let bytes = read_input(input)?;

    match InputKind::from_path(input) {
        InputKind::AnimatedImage => {
            let sequence = GifCodec::default()
                .decode(&bytes)
                .context("Failed to decode GIF")?;

            println!("\n=== GIF Information ===");
            println!("Resolution: {}x{}", sequence.width(), sequence.height());
            println!("Frames: {}", sequence.len());
            println!(
                "Duration: {} ms ({:.2} seconds)",
                sequence.total_duration_ms(),
                sequence.total_duration_ms() as f64 / 1000.0
            );
            if let Some(reference_ms) = sequence.reference_duration_ms() {
                println!("First frame duration: {} ms", reference_ms);
            }
        }

        InputKind::Archive => {
            let mut source = ZipSource::from_bytes(&bytes).context("Failed to open zip")?;
            let bundle = BundleReader::default().collect(source.entries()?);

            if json {
                let descriptor = bundle
                    .descriptor
                    .as_ref()
                    .context("Boot animation has no readable desc.txt")?;
                println!("{}", serde_json::to_string_pretty(descriptor)?);
                return Ok(());
            }

            println!("\n=== Boot Animation Information ===");
            match &bundle.descriptor {
                Some(descriptor) => {
                    println!("Resolution: {}x{}", descriptor.width, descriptor.height);
                    match descriptor.rate {
                        Some(rate) => println!("Frame rate: {} fps", rate),
                        None => println!("Frame rate: unknown"),
                    }
                    println!("\n=== Parts ===");
                    for part in descriptor.parts() {
                        let files = bundle.part(&part.folder_name).map_or(0, |p| p.len());
                        println!(
                            "  {} loops={} pause={} frames={}",
                            part.folder_name, part.loop_count, part.pause, files
                        );
                    }
                }
                None => println!("desc.txt: missing or unreadable"),
            }

            for name in bundle.unreferenced_parts() {
                println!("  {} (not in desc.txt)", name);
            }
            println!("\nFrame files: {}", bundle.frame_count());
        }

        InputKind::Unknown => bail!("Invalid file format: {}", input.display()),
    }

    Ok(())
}
