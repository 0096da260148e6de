//! Raw scanline block reads.
//!
//! A block is a run of full lines `[y_begin, y_end)` of one element. The
//! byte range is computed from the element's data offset and line stride
//! (line bytes + end-of-line padding) and fetched with bounded positional
//! reads, so a corrupt header can't force a huge allocation. Bytes come back exactly as stored; unpacking is done by
//! [`crate::convert`].

use tracing::trace;

use crate::element::{ElementTable, ImageElement};
use crate::error::{DpxError, DpxResult};
use crate::stream::{read_up_to, ByteSource};

/// Packed bytes of consecutive lines, as stored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Stored bytes. The last line has no trailing end-of-line padding.
    pub data: Vec<u8>,
    /// Number of lines.
    pub rows: usize,
    /// Meaningful bytes per line.
    pub row_bytes: usize,
    /// Distance between line starts (`row_bytes` + end-of-line padding).
    pub stride: usize,
}

impl RawBlock {
    /// Iterates over the lines, padding excluded.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.rows).map(move |r| {
            let start = r * self.stride;
            &self.data[start..start + self.row_bytes]
        })
    }
}

/// Byte range of lines `[y_begin, y_end)` of `element`: (offset, length, row bytes, stride).
fn block_range(
    element: &ImageElement,
    width: u32,
    height: u32,
    y_begin: i32,
    y_end: i32,
) -> DpxResult<(u64, usize, usize, usize)> {
    if y_begin < 0 || y_end as i64 > height as i64 || y_begin >= y_end {
        return Err(DpxError::OutOfRange(format!(
            "scanlines [{}, {}) outside element {} height {}",
            y_begin, y_end, element.index, height
        )));
    }
    let base = element.require_offset()?;
    let row_bytes = element.row_bytes(width)?;
    let stride = element.row_stride(width)?;
    let rows = (y_end - y_begin) as u64;
    let too_large = || {
        DpxError::OutOfRange(format!(
            "scanlines [{}, {}) of element {} exceed the addressable range",
            y_begin, y_end, element.index
        ))
    };
    let offset = (y_begin as u64)
        .checked_mul(stride)
        .and_then(|skip| base.checked_add(skip))
        .ok_or_else(too_large)?;
    let len = (rows - 1)
        .checked_mul(stride)
        .and_then(|body| body.checked_add(row_bytes))
        .ok_or_else(too_large)?;
    let to_usize = |v: u64| usize::try_from(v).map_err(|_| too_large());
    Ok((offset, to_usize(len)?, to_usize(row_bytes)?, to_usize(stride)?))
}

/// Reads lines `[y_begin, y_end)` of element `index` as stored.
///
/// # Errors
///
/// - [`DpxError::OutOfRange`] for a bad element index or line range; nothing is read.
/// - [`DpxError::UnsupportedFormat`] if the element layout is unknown.
/// - [`DpxError::ShortRead`] if the stream ends before the block does.
pub fn read_block<S: ByteSource + ?Sized>(
    source: &S,
    table: &ElementTable,
    index: usize,
    y_begin: i32,
    y_end: i32,
) -> DpxResult<RawBlock> {
    let element = table.element(index).ok_or_else(|| {
        DpxError::OutOfRange(format!("element {} of {}", index, table.len()))
    })?;
    let (offset, len, row_bytes, stride) =
        block_range(element, table.width(), table.height(), y_begin, y_end)?;

    trace!(element = index, y_begin, y_end, offset, len, "DPX block read");
    let data = read_up_to(source, offset, len)?;
    if data.len() < len {
        return Err(DpxError::ShortRead { offset, requested: len, received: data.len() });
    }

    Ok(RawBlock {
        data,
        rows: (y_end - y_begin) as usize,
        row_bytes,
        stride,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DpxHeader;
    use std::cell::Cell;
    use std::io;

    /// Source that records whether it was read past the header.
    struct Counting {
        data: Vec<u8>,
        pixel_reads: Cell<usize>,
    }

    impl ByteSource for Counting {
        fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
            if offset >= 2048 {
                self.pixel_reads.set(self.pixel_reads.get() + 1);
            }
            self.data.read_at(buf, offset)
        }
    }

    /// 4x3 8-bit RGB element with 4 bytes of line padding.
    fn file() -> Vec<u8> {
        let mut buf = vec![0u8; 2048];
        buf[..4].copy_from_slice(b"SDPX");
        buf[4..8].copy_from_slice(&2048u32.to_be_bytes());
        buf[770..772].copy_from_slice(&1u16.to_be_bytes());
        buf[772..776].copy_from_slice(&4u32.to_be_bytes());
        buf[776..780].copy_from_slice(&3u32.to_be_bytes());
        buf[800] = 50;
        buf[803] = 8;
        buf[808..812].copy_from_slice(&2048u32.to_be_bytes());
        buf[812..816].copy_from_slice(&4u32.to_be_bytes());
        for y in 0..3u8 {
            buf.extend((0..12).map(|i| y * 16 + i));
            buf.extend([0xEE; 4]);
        }
        buf
    }

    fn table(buf: &[u8]) -> ElementTable {
        ElementTable::from_header(&DpxHeader::parse(buf).unwrap())
    }

    #[test]
    fn reads_lines_with_padding() {
        let buf = file();
        let block = read_block(&buf, &table(&buf), 0, 1, 3).unwrap();
        assert_eq!((block.rows, block.row_bytes, block.stride), (2, 12, 16));
        assert_eq!(block.data.len(), 28);
        let lines: Vec<_> = block.lines().collect();
        assert_eq!(lines[0][0], 16);
        assert_eq!(lines[1][11], 32 + 11);
    }

    #[test]
    fn bad_ranges_read_nothing() {
        let buf = file();
        let t = table(&buf);
        let src = Counting { data: buf, pixel_reads: Cell::new(0) };
        for (y0, y1) in [(-1, 2), (0, 4), (2, 2), (3, 1)] {
            assert!(matches!(read_block(&src, &t, 0, y0, y1), Err(DpxError::OutOfRange(_))));
        }
        assert!(matches!(read_block(&src, &t, 1, 0, 1), Err(DpxError::OutOfRange(_))));
        assert_eq!(src.pixel_reads.get(), 0);
    }

    #[test]
    fn truncated_stream_reports_short_read() {
        let mut buf = file();
        let t = table(&buf);
        buf.truncate(2048 + 20);
        match read_block(&buf, &t, 0, 0, 3) {
            Err(DpxError::ShortRead { requested, received, offset }) => {
                assert_eq!(offset, 2048);
                assert_eq!(requested, 44);
                assert_eq!(received, 20);
            }
            other => panic!("expected ShortRead, got {:?}", other),
        }
    }

    #[test]
    fn huge_geometry_on_short_stream_fails_cleanly() {
        let mut buf = file();
        // width 0xFFFFFFFF, 16-bit RGBA, no pixel data at all
        buf[772..776].copy_from_slice(&u32::MAX.to_be_bytes());
        buf[800] = 51;
        buf[803] = 16;
        buf[812..816].copy_from_slice(&0u32.to_be_bytes());
        buf.truncate(2048);
        let t = table(&buf);
        match read_block(&buf, &t, 0, 0, 1) {
            Err(DpxError::ShortRead { offset, requested, received }) => {
                assert_eq!(offset, 2048);
                assert_eq!(requested as u64, u32::MAX as u64 * 8);
                assert_eq!(received, 0);
            }
            other => panic!("expected ShortRead, got {:?}", other),
        }
    }
}
