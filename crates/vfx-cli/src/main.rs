//! vfx-dpx - DPX inspection CLI
//!
//! Prints header metadata of DPX files and dumps decoded subimages.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "vfx-dpx")]
#[command(author, version, about = "DPX (SMPTE 268M) inspection tool")]
#[command(long_about = "
Reads DPX film-scan files: header metadata, image elements and pixels.

Examples:
  vfx-dpx info scan.0001.dpx              # Subimage summary
  vfx-dpx info scan.0001.dpx --all        # Every header attribute
  vfx-dpx info *.dpx --json               # Machine-readable output
  vfx-dpx extract scan.dpx -o rgb.raw     # Decoded RGB samples of element 0
  vfx-dpx extract scan.dpx -s 1 --raw -o cbycr.raw
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display header and subimage information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Dump the samples of one subimage to a binary file
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input DPX files
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show all metadata attributes
    #[arg(long)]
    all: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Report YCbCr elements in their stored layout
    #[arg(long)]
    raw: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// Input DPX file
    input: PathBuf,

    /// Subimage (image element) index
    #[arg(short, long, default_value = "0")]
    subimage: usize,

    /// Output file for the samples
    #[arg(short, long)]
    output: PathBuf,

    /// Skip YCbCr/ABGR to RGB(A) conversion
    #[arg(long)]
    raw: bool,

    /// Write multi-byte samples big-endian (default little-endian)
    #[arg(long)]
    big_endian: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Extract(args) => commands::extract::run(args, cli.verbose),
    }
}
