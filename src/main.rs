use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facecrop::{config, output, FaceCropper};
use log::{error, info, warn};

#[derive(Parser)]
#[command(name = "facecrop")]
#[command(version, about = "Detect faces in an image and crop each one")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DetectArgs {
    /// Input image (JPEG or PNG)
    input: PathBuf,
    /// Pre-trained classifier file (.xml Haar cascade or SeetaFace .bin)
    #[arg(short, long)]
    classifier: Option<PathBuf>,
    /// Padding factor, 1.0 crops the detected box exactly
    #[arg(short, long)]
    factor: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crop every detected face and write it to disk
    Crop {
        #[command(flatten)]
        detect: DetectArgs,
        /// Output file name, numbered when several faces are found
        #[arg(short, long)]
        output: Option<String>,
        /// Output MIME type (image/jpeg or image/png)
        #[arg(short = 't', long = "type")]
        mime_type: Option<String>,
        /// Encoder quality between 0.0 and 1.0
        #[arg(short, long)]
        quality: Option<f32>,
    },
    /// Print detected faces and their padded crop regions as JSON
    Regions {
        #[command(flatten)]
        detect: DetectArgs,
    },
    /// Open config file in editor
    Config,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Library errors already carry an "Error: " prefix, so print the chain as is.
    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Crop {
            detect,
            output,
            mime_type,
            quality,
        } => {
            let mut options = cfg.crop_options();
            options.name = output.unwrap_or(options.name);
            options.mime_type = mime_type.unwrap_or(options.mime_type);
            options.quality = quality.unwrap_or(options.quality);
            options.factor = detect.factor.unwrap_or(options.factor);
            crop(&cfg, &detect, &options)
        }
        Commands::Regions { detect } => regions(&cfg, &detect),
        Commands::Config => open_config(&cfg, cli.config.as_deref()),
    }
}

fn cropper(cfg: &config::Config, detect: &DetectArgs) -> Result<FaceCropper> {
    let classifier = detect.classifier.as_deref().unwrap_or(&cfg.classifier);
    info!("Loading pre-trained classifier: {}", classifier.display());
    FaceCropper::from_classifier(classifier, cfg.detector_settings())
        .context("Failed to initialize face detector")
}

fn crop(
    cfg: &config::Config,
    detect: &DetectArgs,
    options: &facecrop::CropOptions,
) -> Result<()> {
    // Arguments, then the image, then the classifier.
    options.validate()?;

    info!("Cropping faces from: {}", detect.input.display());
    let img = facecrop::open_image(&detect.input)?;
    let mut cropper = cropper(cfg, detect)?;
    let faces = cropper.crop_image(&img, options)?;

    if faces.is_empty() {
        warn!("No face detected in {}", detect.input.display());
        return Ok(());
    }

    let written = output::write_faces(&faces, Path::new("."))?;
    info!("✓ {} face(s) cropped", written.len());
    Ok(())
}

fn regions(cfg: &config::Config, detect: &DetectArgs) -> Result<()> {
    let factor = detect.factor.unwrap_or(cfg.factor);
    facecrop::validate_factor(factor)?;
    let img = facecrop::open_image(&detect.input)?;

    let mut cropper = cropper(cfg, detect)?;
    let regions = cropper.regions(&img, factor)?;

    println!("{}", serde_json::to_string_pretty(&regions)?);
    Ok(())
}

fn open_config(cfg: &config::Config, path: Option<&Path>) -> Result<()> {
    let config_path = path.unwrap_or(&config::CONFIG_PATH);
    if !config_path.exists() {
        config::save_config(cfg, Some(config_path)).context("Failed to write default config")?;
    }
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
