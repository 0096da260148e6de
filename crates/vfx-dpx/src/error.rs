//! Error types for DPX decoding.
//!
//! Failures fall into three groups with different blast radius:
//!
//! - [`FormatError`] - the header itself is unusable; the whole file is abandoned.
//! - [`DpxError::UnsupportedFormat`] - one image element cannot be decoded;
//!   other elements of the same file may still work.
//! - [`DpxError::ShortRead`] / [`DpxError::Io`] - a single read failed.

use std::io;
use thiserror::Error;

/// Header-level failure. Fatal to opening the file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Magic cookie is neither `SDPX` nor `XPDS`.
    #[error("bad DPX magic: 0x{0:08X}")]
    BadMagic(u32),

    /// Stream ended before the fixed-size header.
    #[error("truncated header: need {needed} bytes, got {available}")]
    Truncated {
        /// Header size in bytes.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
}

/// DPX decoding error.
#[derive(Debug, Error)]
pub enum DpxError {
    /// Header could not be decoded.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Element uses a data size, descriptor, packing or encoding we can't decode.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Underlying stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stream returned fewer bytes than requested.
    #[error("short read at offset {offset}: requested {requested} bytes, received {received}")]
    ShortRead {
        /// Byte offset of the read.
        offset: u64,
        /// Bytes requested.
        requested: usize,
        /// Bytes actually returned.
        received: usize,
    },

    /// Operation is not valid in the decoder's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Subimage index or scanline range out of bounds.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

/// Result type for DPX operations.
pub type DpxResult<T> = Result<T, DpxError>;
