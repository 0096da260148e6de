//! CLI command implementations

pub mod extract;
pub mod info;

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use vfx_dpx::{DpxReader, DpxReaderOptions};

/// Open a DPX file with its header parsed and no subimage selected
pub fn open_dpx(path: &Path, raw: bool) -> Result<DpxReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut reader = DpxReader::with_options(DpxReaderOptions::new().with_raw_color(raw));
    reader
        .open(file)
        .with_context(|| format!("Failed to open: {}", path.display()))?;
    Ok(reader)
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Two-element big-endian DPX: element 0 is 7-bit (undecodable), element 1
/// is 4x1 8-bit luma holding `[9, 8, 7, 6]`.
#[cfg(test)]
pub(crate) fn unsupported_then_luma() -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut buf = vec![0u8; 2048];
    buf[..4].copy_from_slice(b"SDPX");
    buf[4..8].copy_from_slice(&2048u32.to_be_bytes());
    buf[770..772].copy_from_slice(&2u16.to_be_bytes());
    buf[772..776].copy_from_slice(&4u32.to_be_bytes());
    buf[776..780].copy_from_slice(&1u32.to_be_bytes());
    for (base, bits, offset) in [(780usize, 7u8, 2048u32), (852, 8, 2052)] {
        buf[base + 20] = 6;
        buf[base + 23] = bits;
        buf[base + 28..base + 32].copy_from_slice(&offset.to_be_bytes());
    }
    buf.extend([1, 2, 3, 4, 9, 8, 7, 6]);

    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&buf).unwrap();
    tmp.flush().unwrap();
    tmp
}
