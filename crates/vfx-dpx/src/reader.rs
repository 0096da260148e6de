//! DPX reader state machine.
//!
//! A [`DpxReader`] moves through three states:
//!
//! ```text
//! Closed --open--> HeaderParsed --select(i)--> SubimageSelected(i)
//!    ^                  |                            |
//!    +------close-------+------------close-----------+
//! ```
//!
//! - `open` parses the header and builds the element table.
//! - `select` builds the [`ImageSpec`] for one element. Selecting the current
//!   element again is a no-op; a failed select leaves the previous selection
//!   in place.
//! - Scanline reads require a selected subimage.
//! - `close` drops the source and is safe to call in any state.
//!
//! User data is per-file: it is read on the first successful select and
//! attached to every subimage's attributes afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use vfx_dpx::{DpxReader, DpxReaderOptions};
//!
//! let mut reader = DpxReader::open_path("scan.0001.dpx")?;
//! let spec = reader.spec().unwrap().clone();
//! let pixels = reader.read_image()?;
//! assert_eq!(pixels.len(), spec.samples_per_row() * spec.height as usize);
//!
//! // raw CbYCrY samples instead of RGB
//! let raw = DpxReader::open_path_with("video.dpx", DpxReaderOptions::new().with_raw_color(true))?;
//! ```

use std::fs::File;
use std::path::Path;

use tracing::{debug, warn};

use crate::attrs::Attrs;
use crate::block::read_block;
use crate::convert::{convert, unpack, ColorMode, PixelData};
use crate::element::{ElementTable, Encoding};
use crate::error::{DpxError, DpxResult};
use crate::header::{DpxHeader, HEADER_SIZE};
use crate::metadata::{build_spec, ImageSpec};
use crate::stream::{read_up_to, ByteSource};

/// Reader configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpxReaderOptions {
    /// Deliver stored components without color conversion.
    pub raw_color: bool,
}

impl DpxReaderOptions {
    /// Default options: convert to RGB/RGBA.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets raw color mode.
    pub fn with_raw_color(mut self, raw: bool) -> Self {
        self.raw_color = raw;
        self
    }

    /// Reads options from configuration attributes.
    ///
    /// Raw color is enabled when any of `dpx:RawColor`, `dpx:RawData`
    /// (older spelling) or `oiio:RawColor` is a non-zero integer or `true`.
    pub fn from_attrs(config: &Attrs) -> Self {
        let raw_color = ["dpx:RawColor", "dpx:RawData", "oiio:RawColor"]
            .iter()
            .any(|key| config.get_bool(key).unwrap_or(false));
        Self { raw_color }
    }
}

/// Where the reader is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No source attached.
    Closed,
    /// Header parsed, nothing selected.
    HeaderParsed,
    /// Subimage `i` selected; scanlines can be read.
    SubimageSelected(usize),
}

#[derive(Debug)]
struct Selection {
    index: usize,
    spec: ImageSpec,
    mode: ColorMode,
}

#[derive(Debug)]
struct OpenFile<S> {
    source: S,
    header: DpxHeader,
    table: ElementTable,
    // None until the first select; Some(None) when there is no usable user data.
    user_data: Option<Option<Vec<u8>>>,
    selection: Option<Selection>,
}

impl<S: ByteSource> OpenFile<S> {
    fn load_user_data(&mut self) {
        if self.user_data.is_none() {
            let data = self.header.user_size().and_then(|size| {
                match read_up_to(&self.source, HEADER_SIZE as u64, size as usize) {
                    Ok(buf) if buf.len() == size as usize => Some(buf),
                    Ok(buf) => {
                        warn!(
                            expected = size,
                            received = buf.len(),
                            "DPX user data truncated, ignored"
                        );
                        None
                    }
                    Err(e) => {
                        warn!(error = %e, "DPX user data unreadable, ignored");
                        None
                    }
                }
            });
            self.user_data = Some(data);
        }
    }
}

/// Stateful DPX decoder over a random-access byte source.
#[derive(Debug)]
pub struct DpxReader<S> {
    options: DpxReaderOptions,
    file: Option<OpenFile<S>>,
}

impl<S> Default for DpxReader<S> {
    fn default() -> Self {
        Self { options: DpxReaderOptions::default(), file: None }
    }
}

impl DpxReader<File> {
    /// Opens a file and selects subimage 0.
    pub fn open_path<P: AsRef<Path>>(path: P) -> DpxResult<Self> {
        Self::open_path_with(path, DpxReaderOptions::default())
    }

    /// Opens a file with options and selects subimage 0.
    pub fn open_path_with<P: AsRef<Path>>(path: P, options: DpxReaderOptions) -> DpxResult<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = Self::with_options(options);
        reader.open(file)?;
        reader.select(0)?;
        Ok(reader)
    }
}

impl<S: ByteSource> DpxReader<S> {
    /// Creates a closed reader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a closed reader with the given options.
    pub fn with_options(options: DpxReaderOptions) -> Self {
        Self { options, file: None }
    }

    /// Reader options.
    pub fn options(&self) -> DpxReaderOptions {
        self.options
    }

    /// Parses the header of `source`. Any previously open source is closed.
    ///
    /// # Errors
    ///
    /// [`DpxError::Format`] for a bad magic cookie or truncated header, in
    /// which case the reader is left closed.
    pub fn open(&mut self, source: S) -> DpxResult<()> {
        self.close();
        let header = DpxHeader::parse(&source)?;
        let table = ElementTable::from_header(&header);
        debug!(
            width = header.width(),
            height = header.height(),
            elements = table.len(),
            endian = ?header.endian(),
            "DPX header parsed"
        );
        self.file = Some(OpenFile {
            source,
            header,
            table,
            user_data: None,
            selection: None,
        });
        Ok(())
    }

    /// Selects subimage `index` and returns its spec.
    ///
    /// # Errors
    ///
    /// - [`DpxError::InvalidState`] when closed.
    /// - [`DpxError::OutOfRange`] when `index >= subimage_count()`.
    /// - [`DpxError::UnsupportedFormat`] for undecodable elements.
    ///
    /// On error the current selection is unchanged.
    pub fn select(&mut self, index: usize) -> DpxResult<&ImageSpec> {
        let raw_color = self.options.raw_color;
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| DpxError::InvalidState("select on a closed reader".into()))?;

        let already = file.selection.as_ref().is_some_and(|s| s.index == index);
        if !already {
            let count = file.table.len();
            let element = file
                .table
                .element(index)
                .ok_or_else(|| DpxError::OutOfRange(format!("subimage {} of {}", index, count)))?
                .clone();

            let mode = if raw_color { ColorMode::Raw } else { ColorMode::Rgb };
            // validate before touching the user data cache
            element.row_bytes(file.table.width())?;
            file.load_user_data();
            let user_data = file.user_data.as_ref().and_then(|d| d.as_deref());
            let spec = build_spec(&file.header, &element, count, mode, user_data)?;

            // single-channel data never needs color conversion
            let mode = if spec.channels == 1 { ColorMode::Raw } else { mode };
            if element.encoding == Encoding::Rle {
                warn!(subimage = index, "DPX element is RLE-encoded; pixel reads will fail");
            }
            debug!(
                subimage = index,
                descriptor = ?element.descriptor,
                bits = element.bit_depth,
                ?mode,
                "DPX subimage selected"
            );
            file.selection = Some(Selection { index, spec, mode });
        }

        file.selection
            .as_ref()
            .map(|s| &s.spec)
            .ok_or_else(|| DpxError::InvalidState("no subimage selected".into()))
    }

    /// Drops the source. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            debug!("DPX reader closed");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReaderState {
        match &self.file {
            None => ReaderState::Closed,
            Some(OpenFile { selection: None, .. }) => ReaderState::HeaderParsed,
            Some(OpenFile { selection: Some(s), .. }) => ReaderState::SubimageSelected(s.index),
        }
    }

    /// Parsed header, when open.
    pub fn header(&self) -> Option<&DpxHeader> {
        self.file.as_ref().map(|f| &f.header)
    }

    /// Element table, when open.
    pub fn elements(&self) -> Option<&ElementTable> {
        self.file.as_ref().map(|f| &f.table)
    }

    /// Number of subimages (0 when closed).
    pub fn subimage_count(&self) -> usize {
        self.file.as_ref().map_or(0, |f| f.table.len())
    }

    /// Index of the selected subimage.
    pub fn current_subimage(&self) -> Option<usize> {
        self.selection().map(|s| s.index)
    }

    /// Spec of the selected subimage.
    pub fn spec(&self) -> Option<&ImageSpec> {
        self.selection().map(|s| &s.spec)
    }

    /// Color mode in effect for the selected subimage.
    pub fn color_mode(&self) -> Option<ColorMode> {
        self.selection().map(|s| s.mode)
    }

    /// Per-file user data, once loaded by a select.
    pub fn user_data(&self) -> Option<&[u8]> {
        self.file
            .as_ref()
            .and_then(|f| f.user_data.as_ref())
            .and_then(|d| d.as_deref())
    }

    fn selection(&self) -> Option<&Selection> {
        self.file.as_ref().and_then(|f| f.selection.as_ref())
    }

    /// Reads scanlines `[y_begin, y_end)` of the selected subimage.
    ///
    /// Lines are numbered from 0 at the first stored line of the element.
    ///
    /// # Errors
    ///
    /// - [`DpxError::InvalidState`] unless a subimage is selected.
    /// - [`DpxError::OutOfRange`] for a bad line range.
    /// - [`DpxError::UnsupportedFormat`] for RLE data.
    /// - [`DpxError::ShortRead`] / [`DpxError::Io`] on read failure.
    pub fn read_scanlines(&self, y_begin: i32, y_end: i32) -> DpxResult<PixelData> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| DpxError::InvalidState("read on a closed reader".into()))?;
        let sel = file
            .selection
            .as_ref()
            .ok_or_else(|| DpxError::InvalidState("read before selecting a subimage".into()))?;
        let element = file
            .table
            .element(sel.index)
            .ok_or_else(|| DpxError::OutOfRange(format!("subimage {}", sel.index)))?;
        let width = file.table.width();

        let block = read_block(&file.source, &file.table, sel.index, y_begin, y_end)?;
        let samples = unpack(element, file.header.endian(), &block, width)?;
        Ok(convert(element, samples, width, sel.mode))
    }

    /// Reads one scanline of the selected subimage.
    pub fn read_scanline(&self, y: i32) -> DpxResult<PixelData> {
        self.read_scanlines(y, y.saturating_add(1))
    }

    /// Reads every scanline of the selected subimage.
    pub fn read_image(&self) -> DpxResult<PixelData> {
        let height = self.spec().map_or(0, |s| s.height);
        let end = i32::try_from(height)
            .map_err(|_| DpxError::OutOfRange(format!("height {}", height)))?;
        self.read_scanlines(0, end)
    }
}
