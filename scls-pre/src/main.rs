//! scls-pre - Scoliosis image preprocessing tool
//!
//! **Usage:**
//! ```bash
//! scls-pre preprocess <image> [--size N] [--output FILE]
//! scls-pre segment <input_dir> <output_dir> [--workers N]
//! scls-pre classify <a> <b> <c> [<a> <b> <c> ...] [--threshold T]
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scls_common::config::ConfigResolver;
use scls_common::logging::init_tracing;
use scls_pre::batch::{segment_dir, DEFAULT_WORKERS};
use scls_pre::bridge::{ARG_IMAGE_PATH, METHOD_PREPROCESS};
use scls_pre::curves::angle_triples;
use scls_pre::preprocess::TARGET_SIZE;
use scls_pre::{
    classify_frames, ImagePreprocessor, MethodCall, MethodResult, PassthroughRemover,
    PreprocessBridge, PreprocessOptions,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(name = "scls-pre")]
#[clap(about = "Prepare spine photos for angle prediction")]
struct Args {
    /// Config file (overrides SCLS_CONFIG)
    #[clap(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the preprocessing pipeline and emit the model input as JSON
    Preprocess {
        /// Image file
        image: PathBuf,

        /// Square output edge in pixels
        #[clap(long, default_value_t = TARGET_SIZE)]
        size: u32,

        /// Write the tensor here instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
    },

    /// Background-remove and crop every image in a directory
    Segment {
        input_dir: PathBuf,
        output_dir: PathBuf,

        /// Images processed concurrently
        #[clap(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },

    /// Classify Cobb angles into a curve pattern, averaging repeated frames
    Classify {
        /// Proximal thoracic, main thoracic and lumbar angles, one triple
        /// per frame
        #[clap(required = true, num_args = 3.., allow_negative_numbers = true)]
        angles: Vec<f64>,

        /// Degrees at or below which a region is straight
        #[clap(long, default_value = "8")]
        threshold: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!("Starting scls-pre v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Preprocess {
            image,
            size,
            output,
        } => {
            let options = PreprocessOptions {
                width: size,
                height: size,
                ..PreprocessOptions::default()
            };
            let preprocessor =
                ImagePreprocessor::with_remover(options, Arc::new(PassthroughRemover));
            let bridge = PreprocessBridge::new(Arc::new(preprocessor));

            let call = MethodCall::new(METHOD_PREPROCESS)
                .with_argument(ARG_IMAGE_PATH, image.to_string_lossy().into_owned());
            let tensor = match bridge.handle(&call).await {
                MethodResult::Success { value } => value,
                MethodResult::Error { code, message } => bail!("{}: {}", code, message),
                MethodResult::NotImplemented => bail!("Method not implemented"),
            };

            let json = serde_json::to_string(&tensor)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Tensor written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Segment {
            input_dir,
            output_dir,
            workers,
        } => {
            let preprocessor = Arc::new(ImagePreprocessor::with_remover(
                PreprocessOptions::default(),
                Arc::new(PassthroughRemover),
            ));
            let report = segment_dir(preprocessor, &input_dir, &output_dir, workers).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.failed.is_empty() {
                let total = report.failed.len() + report.processed.len();
                bail!("{} of {} images failed", report.failed.len(), total);
            }
        }
        Command::Classify { angles, threshold } => {
            let Some(frames) = angle_triples(&angles) else {
                bail!("Expected angles in groups of three, got {}", angles.len());
            };
            let result = classify_frames(&frames, threshold);
            info!("Classified mean of {} frames", frames.len());
            println!("Result: {}", result);
        }
    }

    Ok(())
}
