//! # vfx-dpx
//!
//! DPX (SMPTE 268M) decoder for VFX pipelines.
//!
//! DPX is the film-scan and digital-intermediate frame format: a fixed
//! 2048-byte header followed by up to eight image elements of packed pixel
//! data. This crate decodes the header, exposes every element as a subimage
//! and reads arbitrary runs of scanlines, converting them to RGB/RGBA on
//! request.
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - [`stream`] - [`ByteSource`], positional reads from files or memory
//! - [`header`] - [`DpxHeader`], the fixed header with sentinel-aware accessors
//! - [`element`] - [`ElementTable`], per-subimage layout and data offsets
//! - [`tables`] / [`metadata`] - code tables and the [`ImageSpec`] builder
//! - [`block`] - [`read_block`], one read per run of scanlines
//! - [`convert`] - unpacking and YCbCr/ABGR to RGB/RGBA conversion
//! - [`reader`] - [`DpxReader`], the open/select/read state machine
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vfx_dpx::DpxReader;
//!
//! let mut reader = DpxReader::open_path("scan.0001.dpx")?;
//! for i in 0..reader.subimage_count() {
//!     let spec = reader.select(i)?;
//!     println!("{}: {}x{} {:?}", i, spec.width, spec.height, spec.channel_names);
//! }
//! let first_lines = reader.read_scanlines(0, 16)?;
//! ```
//!
//! # Supported Data
//!
//! | Bits | Packing | Delivered as |
//! |------|---------|--------------|
//! | 8 | - | u8 / i8 |
//! | 10 | packed, filled A/B | u16 (bit-replicated) |
//! | 12 | packed, filled A/B | u16 (bit-replicated) |
//! | 16 | - | u16 / i16 |
//! | 32 | - | f32 |
//! | 64 | - | f64 |
//!
//! RLE-encoded elements are recognised (`compression = "rle"`) but their
//! pixels can't be read.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

pub mod attrs;
pub mod block;
pub mod convert;
pub mod element;
pub mod header;
pub mod metadata;
pub mod reader;
pub mod stream;
pub mod tables;

pub use attrs::{AttrValue, Attrs};
pub use block::{read_block, RawBlock};
pub use convert::{ColorMode, PixelData};
pub use element::{Descriptor, ElementTable, ImageElement, SampleType};
pub use error::{DpxError, DpxResult, FormatError};
pub use header::{can_read, valid_source, DpxHeader, Endian};
pub use metadata::ImageSpec;
pub use reader::{DpxReader, DpxReaderOptions, ReaderState};
pub use stream::ByteSource;
