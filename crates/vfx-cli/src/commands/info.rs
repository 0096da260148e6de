//! DPX info command (like iinfo).
//!
//! Displays per-subimage dimensions, channels and header metadata.

use crate::InfoArgs;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use vfx_dpx::{AttrValue, ByteSource, DpxReader, Endian, ImageSpec};

/// A subimage's spec, or why it couldn't be described.
type Subimage = std::result::Result<ImageSpec, String>;

/// Runs the info command, displaying one block per subimage.
///
/// A subimage that fails to select is reported in place; the remaining
/// subimages and files are still shown.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let mut reader = super::open_dpx(path, args.raw)?;
        let endian = reader.header().map(|h| h.endian()).unwrap_or_default();

        let specs = collect_specs(&mut reader);
        debug!(file = %path.display(), subimages = specs.len(), "inspected");

        if args.json {
            print_json(&args, path, file_size, endian, &specs);
        } else {
            print_text(&args, path, file_size, endian, &specs, verbose);
        }

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}

/// Selects every subimage in turn, keeping failures alongside successes.
fn collect_specs<S: ByteSource>(reader: &mut DpxReader<S>) -> Vec<Subimage> {
    (0..reader.subimage_count())
        .map(|index| match reader.select(index) {
            Ok(spec) => Ok(spec.clone()),
            Err(e) => {
                warn!(subimage = index, error = %e, "subimage skipped");
                Err(e.to_string())
            }
        })
        .collect()
}

/// Prints info in human-readable text format.
fn print_text(
    args: &InfoArgs,
    path: &Path,
    file_size: u64,
    endian: Endian,
    specs: &[Subimage],
    verbose: bool,
) {
    println!("{}", path.display());
    println!("  File size:  {}", super::format_size(file_size));
    println!("  Byte order: {:?}", endian);
    println!("  Subimages:  {}", specs.len());

    for (index, spec) in specs.iter().enumerate() {
        let spec = match spec {
            Ok(spec) => spec,
            Err(e) => {
                println!("  [{}] error: {}", index, e);
                continue;
            }
        };
        println!("  [{}] {}x{} {:?}", index, spec.width, spec.height, spec.format);
        println!("    Channels:   {} ({})", spec.channels, spec.channel_names.join(", "));
        if let Some(alpha) = spec.alpha_channel {
            println!("    Alpha:      {}", alpha);
        }
        if let Some(cs) = spec.attrs.get_str("oiio:ColorSpace") {
            println!("    Colorspace: {}", cs);
        }
        if spec.x != 0 || spec.y != 0 || spec.full_width != spec.width || spec.full_height != spec.height {
            println!(
                "    Window:     origin {},{} full {}x{}",
                spec.x, spec.y, spec.full_width, spec.full_height
            );
        }
        if verbose || args.all {
            println!("    Row bytes:  {}", spec.bytes_per_row());
        }

        if args.all {
            let attrs = spec.attrs.sorted();
            if !attrs.is_empty() {
                println!("    Metadata:");
                for (key, value) in attrs {
                    println!("      {}: {}", key, attr_to_string(value));
                }
            }
        }
    }
}

/// Prints info in JSON format.
fn print_json(args: &InfoArgs, path: &Path, file_size: u64, endian: Endian, specs: &[Subimage]) {
    println!("{{");
    println!("  \"file\": \"{}\",", json_escape(&path.display().to_string()));
    println!("  \"size_bytes\": {},", file_size);
    println!("  \"endian\": \"{:?}\",", endian);
    println!("  \"subimages\": [");
    for (index, spec) in specs.iter().enumerate() {
        let comma = if index + 1 < specs.len() { "," } else { "" };
        let spec = match spec {
            Ok(spec) => spec,
            Err(e) => {
                println!("    {{ \"error\": \"{}\" }}{}", json_escape(e), comma);
                continue;
            }
        };
        let names: Vec<String> = spec
            .channel_names
            .iter()
            .map(|n| format!("\"{}\"", json_escape(n)))
            .collect();
        println!("    {{");
        println!("      \"width\": {},", spec.width);
        println!("      \"height\": {},", spec.height);
        println!("      \"format\": \"{:?}\",", spec.format);
        println!("      \"x\": {},", spec.x);
        println!("      \"y\": {},", spec.y);
        println!("      \"full_width\": {},", spec.full_width);
        println!("      \"full_height\": {},", spec.full_height);
        if args.all {
            println!("      \"channels\": [{}],", names.join(", "));
            println!("      \"attrs\": {{");
            let attrs = spec.attrs.sorted();
            for (idx, (key, value)) in attrs.iter().enumerate() {
                let trailing = if idx + 1 == attrs.len() { "" } else { "," };
                println!(
                    "        \"{}\": \"{}\"{}",
                    json_escape(key),
                    json_escape(&attr_to_string(value)),
                    trailing
                );
            }
            println!("      }}");
        } else {
            println!("      \"channels\": [{}]", names.join(", "));
        }
        println!("    }}{}", comma);
    }
    println!("  ]");
    println!("}}");
}

fn attr_to_string(value: &AttrValue) -> String {
    match value {
        AttrValue::Bytes(v) => format!("{} bytes", v.len()),
        other => other.to_string(),
    }
}

fn json_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_json() {
        assert_eq!(json_escape("a\"b\\c\n"), "a\\\"b\\\\c\\n");
        assert_eq!(json_escape("\u{1}"), "\\u0001");
    }

    #[test]
    fn attr_strings() {
        assert_eq!(attr_to_string(&AttrValue::Bytes(vec![0; 5])), "5 bytes");
        assert_eq!(attr_to_string(&AttrValue::from("rle")), "rle");
        let list = AttrValue::List(vec![AttrValue::UInt(1), AttrValue::UInt(2)]);
        assert_eq!(attr_to_string(&list), "[1, 2]");
    }

    #[test]
    fn unsupported_subimage_does_not_hide_the_rest() {
        let tmp = super::super::unsupported_then_luma();
        let mut reader = super::super::open_dpx(tmp.path(), false).unwrap();

        let specs = collect_specs(&mut reader);
        assert_eq!(specs.len(), 2);
        assert!(specs[0].as_ref().unwrap_err().starts_with("unsupported format"));
        let luma = specs[1].as_ref().unwrap();
        assert_eq!(luma.channel_names, ["Y"]);
        assert_eq!((luma.width, luma.height), (4, 1));
    }

    #[test]
    fn run_reports_and_continues() {
        let tmp = super::super::unsupported_then_luma();
        for json in [false, true] {
            let args = InfoArgs {
                input: vec![tmp.path().to_path_buf()],
                all: true,
                json,
                raw: false,
            };
            run(args, false).unwrap();
        }
    }
}
