//! Subimage extraction.
//!
//! Decodes one image element and writes its samples, interleaved and
//! without any header, to a flat binary file.

use crate::ExtractArgs;
use anyhow::{Context, Result};
use std::fs;
use vfx_dpx::Endian;

pub fn run(args: ExtractArgs, verbose: bool) -> Result<()> {
    let mut reader = super::open_dpx(&args.input, args.raw)?;
    let spec = reader
        .select(args.subimage)
        .with_context(|| format!("{}: subimage {}", args.input.display(), args.subimage))?
        .clone();

    let pixels = reader
        .read_image()
        .with_context(|| format!("Failed to decode: {}", args.input.display()))?;
    let endian = if args.big_endian { Endian::Big } else { Endian::Little };
    let bytes = pixels.to_bytes(endian);

    fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    if verbose {
        println!(
            "{} [{}] -> {}: {}x{} {} x {:?} ({})",
            args.input.display(),
            args.subimage,
            args.output.display(),
            spec.width,
            spec.height,
            spec.channel_names.join(""),
            spec.format,
            super::format_size(bytes.len() as u64)
        );
    }

    Ok(())
}
