//! scls-lp - Landing page interaction replay tool
//!
//! **Usage:**
//! ```bash
//! scls-lp replay <trace.json> [--config <file>]
//! scls-lp spine [--severity N] [--curve NAME] [--time MS]
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scls_common::config::ConfigResolver;
use scls_common::logging::init_tracing;
use scls_lp::{render, CurveType, SpineParams, Trace};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(name = "scls-lp")]
#[clap(about = "Replay landing page interactions and render spine frames")]
struct Args {
    /// Config file (overrides SCLS_CONFIG)
    #[clap(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON input trace and print emitted events as JSON lines
    Replay {
        /// Trace file
        trace: PathBuf,
    },

    /// Print one spine visualization frame as JSON
    Spine {
        /// Curve severity (0-60)
        #[clap(long)]
        severity: Option<u8>,

        /// healthy, thoracic, lumbar, thoracolumbar or combined
        #[clap(long, default_value = "combined")]
        curve: String,

        /// Animation time in milliseconds
        #[clap(long, default_value = "0")]
        time: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!("Starting scls-lp v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Replay { trace } => {
            let text = std::fs::read_to_string(&trace)
                .with_context(|| format!("Failed to read trace {}", trace.display()))?;
            let trace = Trace::from_json(&text)?;

            let events = trace.run(config)?;
            info!("Replay produced {} events", events.len());
            for event in events {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        Command::Spine {
            severity,
            curve,
            time,
        } => {
            let curve: CurveType = curve.parse()?;
            let severity = severity.unwrap_or(config.spine.default_severity);
            let params = SpineParams::new(severity, curve, config.spine.max_severity);
            let frame = render(&params, time);
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
    }

    Ok(())
}
