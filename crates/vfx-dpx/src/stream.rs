//! Random-access byte sources.
//!
//! The decoder never reads sequentially: every header field, the user data
//! and each scanline block are fetched at an absolute offset. [`ByteSource`]
//! is the only thing the decoder asks of its input.

use std::fs::File;
use std::io;

/// Positional read interface consumed by the decoder.
///
/// Implementations return the number of bytes actually copied into `buf`,
/// which is less than `buf.len()` only at end of data.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes starting at `offset`.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

/// Largest buffer growth step in [`read_up_to`].
const READ_CHUNK: usize = 1 << 20;

/// Reads up to `len` bytes at `offset`, stopping early at end of data.
///
/// The buffer grows one chunk at a time, so a length taken from header
/// fields only costs memory for bytes the source actually holds.
pub(crate) fn read_up_to<S: ByteSource + ?Sized>(
    source: &S,
    offset: u64,
    len: usize,
) -> io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(len.min(READ_CHUNK));
    while data.len() < len {
        let filled = data.len();
        let want = (len - filled).min(READ_CHUNK);
        data.resize(filled + want, 0);
        let n = source.read_at(&mut data[filled..], offset.saturating_add(filled as u64))?;
        data.truncate(filled + n);
        if n < want {
            break;
        }
    }
    Ok(data)
}

impl ByteSource for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let start = match usize::try_from(offset) {
            Ok(s) if s < self.len() => s,
            _ => return Ok(0),
        };
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

impl ByteSource for Vec<u8> {
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.as_slice().read_at(buf, offset)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }
}

impl ByteSource for File {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        // pread may return early; keep going until EOF or the buffer is full.
        let mut filled = 0;
        while filled < buf.len() {
            let n = pread(self, &mut buf[filled..], offset + filled as u64)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}

#[cfg(unix)]
fn pread(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    loop {
        match FileExt::read_at(file, buf, offset) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(windows)]
fn pread(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}
