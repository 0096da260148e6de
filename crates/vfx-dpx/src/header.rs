//! DPX header decoding.
//!
//! The header is a fixed 2048-byte structure (SMPTE 268M): a 768-byte file
//! section, the 640-byte image section with eight image-element slots, the
//! 256-byte image source section, then the industry header (256 bytes film,
//! 128 bytes television).
//!
//! Many fields use a sentinel instead of being optional on the wire:
//!
//! | Field type | Sentinel |
//! |------------|----------|
//! | `u32` | `0xFFFFFFFF` |
//! | `f32` | NaN (any NaN bit pattern) |
//! | `u8` | `0xFF` |
//! | string | first byte `0x00` or `0xFF` |
//!
//! Public accessors return `Option` and map the sentinel to `None`, so the
//! raw sentinel never reaches metadata.
//!
//! The header is parsed once, leniently: width, height and element count are
//! passed through as stored. Range checks happen when a subimage is selected.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{DpxResult, FormatError};
use crate::stream::ByteSource;

/// DPX magic number as read big-endian: "SDPX".
pub const MAGIC_BE: u32 = 0x5344_5058;
/// DPX magic number as read big-endian from a little-endian file: "XPDS".
pub const MAGIC_LE: u32 = 0x5850_4453;
/// Size of the generic + industry header.
pub const HEADER_SIZE: usize = 2048;
/// Maximum number of image elements.
pub const MAX_ELEMENTS: usize = 8;

const ELEMENT_SIZE: usize = 72;

/// Unset marker for 32-bit unsigned fields.
pub const UNSET_U32: u32 = 0xFFFF_FFFF;
/// Unset marker for byte fields.
pub const UNSET_U8: u8 = 0xFF;

/// Byte offsets of header fields.
mod offsets {
    // File information
    pub const MAGIC: usize = 0;
    pub const IMAGE_OFFSET: usize = 4;
    pub const VERSION: usize = 8;
    pub const FILE_SIZE: usize = 16;
    pub const DITTO_KEY: usize = 20;
    pub const GENERIC_SIZE: usize = 24;
    pub const INDUSTRY_SIZE: usize = 28;
    pub const USER_SIZE: usize = 32;
    pub const FILE_NAME: usize = 36;
    pub const CREATION_TIME: usize = 136;
    pub const CREATOR: usize = 160;
    pub const PROJECT: usize = 260;
    pub const COPYRIGHT: usize = 460;
    pub const ENCRYPT_KEY: usize = 660;

    // Image information
    pub const ORIENTATION: usize = 768;
    pub const ELEMENT_COUNT: usize = 770;
    pub const PIXELS_PER_LINE: usize = 772;
    pub const LINES_PER_ELEMENT: usize = 776;
    pub const ELEMENTS: usize = 780;

    // Offsets within one image element
    pub const EL_DATA_SIGN: usize = 0;
    pub const EL_LOW_DATA: usize = 4;
    pub const EL_LOW_QUANTITY: usize = 8;
    pub const EL_HIGH_DATA: usize = 12;
    pub const EL_HIGH_QUANTITY: usize = 16;
    pub const EL_DESCRIPTOR: usize = 20;
    pub const EL_TRANSFER: usize = 21;
    pub const EL_COLORIMETRIC: usize = 22;
    pub const EL_BIT_DEPTH: usize = 23;
    pub const EL_PACKING: usize = 24;
    pub const EL_ENCODING: usize = 26;
    pub const EL_DATA_OFFSET: usize = 28;
    pub const EL_EOL_PADDING: usize = 32;
    pub const EL_EOI_PADDING: usize = 36;
    pub const EL_DESCRIPTION: usize = 40;

    // Image source information
    pub const X_OFFSET: usize = 1408;
    pub const Y_OFFSET: usize = 1412;
    pub const X_CENTER: usize = 1416;
    pub const Y_CENTER: usize = 1420;
    pub const X_ORIGINAL_SIZE: usize = 1424;
    pub const Y_ORIGINAL_SIZE: usize = 1428;
    pub const SOURCE_FILE_NAME: usize = 1432;
    pub const SOURCE_TIME: usize = 1532;
    pub const INPUT_DEVICE: usize = 1556;
    pub const INPUT_SERIAL: usize = 1588;
    pub const BORDER: usize = 1620;
    pub const ASPECT_RATIO: usize = 1628;
    pub const X_SCANNED_SIZE: usize = 1636;
    pub const Y_SCANNED_SIZE: usize = 1640;

    // Film industry information
    pub const FILM_MFG_ID: usize = 1664;
    pub const FILM_TYPE: usize = 1666;
    pub const PERFS_OFFSET: usize = 1668;
    pub const PREFIX: usize = 1670;
    pub const COUNT: usize = 1676;
    pub const FORMAT: usize = 1680;
    pub const FRAME_POSITION: usize = 1712;
    pub const SEQUENCE_LENGTH: usize = 1716;
    pub const HELD_COUNT: usize = 1720;
    pub const FRAME_RATE: usize = 1724;
    pub const SHUTTER_ANGLE: usize = 1728;
    pub const FRAME_ID: usize = 1732;
    pub const SLATE_INFO: usize = 1764;

    // Television industry information
    pub const TIME_CODE: usize = 1920;
    pub const USER_BITS: usize = 1924;
    pub const INTERLACE: usize = 1928;
    pub const FIELD_NUMBER: usize = 1929;
    pub const VIDEO_SIGNAL: usize = 1930;
    pub const HORIZONTAL_SAMPLE_RATE: usize = 1932;
    pub const VERTICAL_SAMPLE_RATE: usize = 1936;
    pub const TEMPORAL_FRAME_RATE: usize = 1940;
    pub const TIME_OFFSET: usize = 1944;
    pub const GAMMA: usize = 1948;
    pub const BLACK_LEVEL: usize = 1952;
    pub const BLACK_GAIN: usize = 1956;
    pub const BREAK_POINT: usize = 1960;
    pub const WHITE_LEVEL: usize = 1964;
    pub const INTEGRATION_TIMES: usize = 1968;
}

/// Byte order of multi-byte fields and samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Big-endian ("SDPX"). Default for DPX.
    #[default]
    Big,
    /// Little-endian ("XPDS").
    Little,
}

impl Endian {
    /// Detects byte order from the first four bytes of a file.
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        match u32::from_be_bytes(magic) {
            MAGIC_BE => Some(Endian::Big),
            MAGIC_LE => Some(Endian::Little),
            _ => None,
        }
    }

    /// Decodes a `u16` in this byte order.
    #[inline]
    pub fn u16(self, b: &[u8]) -> u16 {
        match self {
            Endian::Big => BigEndian::read_u16(b),
            Endian::Little => LittleEndian::read_u16(b),
        }
    }

    /// Decodes a `u32` in this byte order.
    #[inline]
    pub fn u32(self, b: &[u8]) -> u32 {
        match self {
            Endian::Big => BigEndian::read_u32(b),
            Endian::Little => LittleEndian::read_u32(b),
        }
    }

    /// Decodes an `f32` in this byte order.
    #[inline]
    pub fn f32(self, b: &[u8]) -> f32 {
        f32::from_bits(self.u32(b))
    }

    /// Decodes an `f64` in this byte order.
    #[inline]
    pub fn f64(self, b: &[u8]) -> f64 {
        match self {
            Endian::Big => BigEndian::read_f64(b),
            Endian::Little => LittleEndian::read_f64(b),
        }
    }
}

/// Field reader over the raw header bytes. Every multi-byte field goes through here.
struct FieldReader<'a> {
    buf: &'a [u8],
    endian: Endian,
}

impl FieldReader<'_> {
    fn u8(&self, off: usize) -> u8 {
        self.buf[off]
    }

    fn u16(&self, off: usize) -> u16 {
        self.endian.u16(&self.buf[off..off + 2])
    }

    fn u32(&self, off: usize) -> u32 {
        self.endian.u32(&self.buf[off..off + 4])
    }

    fn f32(&self, off: usize) -> f32 {
        self.endian.f32(&self.buf[off..off + 4])
    }

    fn bytes<const N: usize>(&self, off: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[off..off + N]);
        out
    }
}

// === Sentinel helpers ===

/// `None` for the unset `u32` marker.
#[inline]
pub fn opt_u32(v: u32) -> Option<u32> {
    (v != UNSET_U32).then_some(v)
}

/// `None` for NaN.
#[inline]
pub fn opt_f32(v: f32) -> Option<f32> {
    (!v.is_nan()).then_some(v)
}

/// `None` for the unset byte marker.
#[inline]
pub fn opt_u8(v: u8) -> Option<u8> {
    (v != UNSET_U8).then_some(v)
}

/// Decodes a fixed-length, NUL-padded string field.
///
/// Returns `None` when the field is empty or starts with `0xFF` (some writers
/// fill unused strings with `0xFF` instead of NUL).
pub fn opt_str(raw: &[u8]) -> Option<String> {
    match raw.first() {
        None | Some(&0) | Some(&UNSET_U8) => None,
        Some(_) => {
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            Some(String::from_utf8_lossy(&raw[..end]).into_owned())
        }
    }
}

/// Raw header slot for one image element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementHeader {
    /// 0 = unsigned, 1 = signed.
    pub data_sign: u32,
    /// Reference low code value.
    pub low_data: u32,
    /// Quantity represented by `low_data`.
    pub low_quantity: f32,
    /// Reference high code value.
    pub high_data: u32,
    /// Quantity represented by `high_data`.
    pub high_quantity: f32,
    /// Descriptor code (channel semantics).
    pub descriptor: u8,
    /// Transfer characteristic code.
    pub transfer: u8,
    /// Colorimetric characteristic code.
    pub colorimetric: u8,
    /// Bits per component.
    pub bit_depth: u8,
    /// Packing code (0 = packed, 1 = filled A, 2 = filled B).
    pub packing: u16,
    /// Encoding code (0 = none, 1 = RLE).
    pub encoding: u16,
    /// Byte offset of this element's pixel data.
    pub data_offset: u32,
    /// Padding bytes after each line.
    pub eol_padding: u32,
    /// Padding bytes after the element.
    pub eoi_padding: u32,
    /// Free-form description.
    pub description: [u8; 32],
}

impl ElementHeader {
    fn read(r: &FieldReader<'_>, base: usize) -> Self {
        use offsets::*;
        Self {
            data_sign: r.u32(base + EL_DATA_SIGN),
            low_data: r.u32(base + EL_LOW_DATA),
            low_quantity: r.f32(base + EL_LOW_QUANTITY),
            high_data: r.u32(base + EL_HIGH_DATA),
            high_quantity: r.f32(base + EL_HIGH_QUANTITY),
            descriptor: r.u8(base + EL_DESCRIPTOR),
            transfer: r.u8(base + EL_TRANSFER),
            colorimetric: r.u8(base + EL_COLORIMETRIC),
            bit_depth: r.u8(base + EL_BIT_DEPTH),
            packing: r.u16(base + EL_PACKING),
            encoding: r.u16(base + EL_ENCODING),
            data_offset: r.u32(base + EL_DATA_OFFSET),
            eol_padding: r.u32(base + EL_EOL_PADDING),
            eoi_padding: r.u32(base + EL_EOI_PADDING),
            description: r.bytes(base + EL_DESCRIPTION),
        }
    }

    /// True if samples are signed.
    #[inline]
    pub fn is_signed(&self) -> bool {
        self.data_sign == 1
    }

    /// Low code value, if set.
    pub fn low_data(&self) -> Option<u32> {
        opt_u32(self.low_data)
    }

    /// Low quantity, if set.
    pub fn low_quantity(&self) -> Option<f32> {
        opt_f32(self.low_quantity)
    }

    /// High code value, if set.
    pub fn high_data(&self) -> Option<u32> {
        opt_u32(self.high_data)
    }

    /// High quantity, if set.
    pub fn high_quantity(&self) -> Option<f32> {
        opt_f32(self.high_quantity)
    }

    /// End-of-line padding, if set.
    pub fn eol_padding(&self) -> Option<u32> {
        opt_u32(self.eol_padding)
    }

    /// End-of-image padding, if set.
    pub fn eoi_padding(&self) -> Option<u32> {
        opt_u32(self.eoi_padding)
    }

    /// Element data offset; `None` when unset (sentinel or zero).
    pub fn data_offset(&self) -> Option<u32> {
        opt_u32(self.data_offset).filter(|&o| o != 0)
    }

    /// Element description, if set.
    pub fn description(&self) -> Option<String> {
        opt_str(&self.description)
    }
}

/// Parsed DPX header.
///
/// Fields are stored as read (after byte-order correction). Use the accessor
/// methods to get sentinel-filtered values.
#[derive(Debug, Clone)]
pub struct DpxHeader {
    endian: Endian,
    magic: u32,
    image_offset: u32,
    version: [u8; 8],
    file_size: u32,
    ditto_key: u32,
    generic_size: u32,
    industry_size: u32,
    user_size: u32,
    file_name: [u8; 100],
    creation_time: [u8; 24],
    creator: [u8; 100],
    project: [u8; 200],
    copyright: [u8; 200],
    encrypt_key: u32,

    orientation: u16,
    element_count: u16,
    width: u32,
    height: u32,
    elements: [ElementHeader; MAX_ELEMENTS],

    x_offset: u32,
    y_offset: u32,
    x_center: f32,
    y_center: f32,
    x_original_size: u32,
    y_original_size: u32,
    source_file_name: [u8; 100],
    source_time: [u8; 24],
    input_device: [u8; 32],
    input_serial: [u8; 32],
    border: [u16; 4],
    aspect_ratio: [u32; 2],
    x_scanned_size: f32,
    y_scanned_size: f32,

    film_mfg_id: [u8; 2],
    film_type: [u8; 2],
    perfs_offset: [u8; 2],
    prefix: [u8; 6],
    count: [u8; 4],
    format: [u8; 32],
    frame_position: u32,
    sequence_length: u32,
    held_count: u32,
    frame_rate: f32,
    shutter_angle: f32,
    frame_id: [u8; 32],
    slate_info: [u8; 100],

    time_code: u32,
    user_bits: u32,
    interlace: u8,
    field_number: u8,
    video_signal: u8,
    horizontal_sample_rate: f32,
    vertical_sample_rate: f32,
    temporal_frame_rate: f32,
    time_offset: f32,
    gamma: f32,
    black_level: f32,
    black_gain: f32,
    break_point: f32,
    white_level: f32,
    integration_times: f32,
}

impl DpxHeader {
    /// Reads and parses the header from a byte source.
    ///
    /// # Errors
    ///
    /// - [`FormatError::BadMagic`] if the magic cookie is not a DPX one.
    /// - [`FormatError::Truncated`] if fewer than 2048 bytes are available.
    pub fn parse<S: ByteSource + ?Sized>(source: &S) -> DpxResult<Self> {
        let mut buf = vec![0u8; HEADER_SIZE];
        let n = source.read_at(&mut buf, 0)?;
        if n < 4 {
            return Err(FormatError::Truncated { needed: HEADER_SIZE, available: n }.into());
        }
        let magic_bytes = [buf[0], buf[1], buf[2], buf[3]];
        let endian = Endian::from_magic(magic_bytes)
            .ok_or(FormatError::BadMagic(u32::from_be_bytes(magic_bytes)))?;
        if n < HEADER_SIZE {
            return Err(FormatError::Truncated { needed: HEADER_SIZE, available: n }.into());
        }
        Ok(Self::from_bytes(&buf, endian))
    }

    fn from_bytes(buf: &[u8], endian: Endian) -> Self {
        use offsets::*;
        let r = FieldReader { buf, endian };

        let mut elements = [ElementHeader::read(&r, ELEMENTS); MAX_ELEMENTS];
        for (i, el) in elements.iter_mut().enumerate().skip(1) {
            *el = ElementHeader::read(&r, ELEMENTS + i * ELEMENT_SIZE);
        }

        Self {
            endian,
            magic: r.u32(MAGIC),
            image_offset: r.u32(IMAGE_OFFSET),
            version: r.bytes(VERSION),
            file_size: r.u32(FILE_SIZE),
            ditto_key: r.u32(DITTO_KEY),
            generic_size: r.u32(GENERIC_SIZE),
            industry_size: r.u32(INDUSTRY_SIZE),
            user_size: r.u32(USER_SIZE),
            file_name: r.bytes(FILE_NAME),
            creation_time: r.bytes(CREATION_TIME),
            creator: r.bytes(CREATOR),
            project: r.bytes(PROJECT),
            copyright: r.bytes(COPYRIGHT),
            encrypt_key: r.u32(ENCRYPT_KEY),

            orientation: r.u16(ORIENTATION),
            element_count: r.u16(ELEMENT_COUNT),
            width: r.u32(PIXELS_PER_LINE),
            height: r.u32(LINES_PER_ELEMENT),
            elements,

            x_offset: r.u32(X_OFFSET),
            y_offset: r.u32(Y_OFFSET),
            x_center: r.f32(X_CENTER),
            y_center: r.f32(Y_CENTER),
            x_original_size: r.u32(X_ORIGINAL_SIZE),
            y_original_size: r.u32(Y_ORIGINAL_SIZE),
            source_file_name: r.bytes(SOURCE_FILE_NAME),
            source_time: r.bytes(SOURCE_TIME),
            input_device: r.bytes(INPUT_DEVICE),
            input_serial: r.bytes(INPUT_SERIAL),
            border: [
                r.u16(BORDER),
                r.u16(BORDER + 2),
                r.u16(BORDER + 4),
                r.u16(BORDER + 6),
            ],
            aspect_ratio: [r.u32(ASPECT_RATIO), r.u32(ASPECT_RATIO + 4)],
            x_scanned_size: r.f32(X_SCANNED_SIZE),
            y_scanned_size: r.f32(Y_SCANNED_SIZE),

            film_mfg_id: r.bytes(FILM_MFG_ID),
            film_type: r.bytes(FILM_TYPE),
            perfs_offset: r.bytes(PERFS_OFFSET),
            prefix: r.bytes(PREFIX),
            count: r.bytes(COUNT),
            format: r.bytes(FORMAT),
            frame_position: r.u32(FRAME_POSITION),
            sequence_length: r.u32(SEQUENCE_LENGTH),
            held_count: r.u32(HELD_COUNT),
            frame_rate: r.f32(FRAME_RATE),
            shutter_angle: r.f32(SHUTTER_ANGLE),
            frame_id: r.bytes(FRAME_ID),
            slate_info: r.bytes(SLATE_INFO),

            time_code: r.u32(TIME_CODE),
            user_bits: r.u32(USER_BITS),
            interlace: r.u8(INTERLACE),
            field_number: r.u8(FIELD_NUMBER),
            video_signal: r.u8(VIDEO_SIGNAL),
            horizontal_sample_rate: r.f32(HORIZONTAL_SAMPLE_RATE),
            vertical_sample_rate: r.f32(VERTICAL_SAMPLE_RATE),
            temporal_frame_rate: r.f32(TEMPORAL_FRAME_RATE),
            time_offset: r.f32(TIME_OFFSET),
            gamma: r.f32(GAMMA),
            black_level: r.f32(BLACK_LEVEL),
            black_gain: r.f32(BLACK_GAIN),
            break_point: r.f32(BREAK_POINT),
            white_level: r.f32(WHITE_LEVEL),
            integration_times: r.f32(INTEGRATION_TIMES),
        }
    }

    // === Structural fields (always present) ===

    /// Byte order of the file.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Magic cookie as read in file byte order (always [`MAGIC_BE`]).
    #[inline]
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Pixels per line.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Lines per element.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Element count exactly as stored (may be corrupt).
    #[inline]
    pub fn raw_element_count(&self) -> u16 {
        self.element_count
    }

    /// Raw orientation code.
    #[inline]
    pub fn orientation(&self) -> u16 {
        self.orientation
    }

    /// Raw header slot for element `i` (`i < 8`).
    #[inline]
    pub fn element(&self, i: usize) -> Option<&ElementHeader> {
        self.elements.get(i)
    }

    /// Video signal code.
    #[inline]
    pub fn video_signal(&self) -> u8 {
        self.video_signal
    }

    /// Border validity (XL, XR, YT, YB); `None` when every edge is unset.
    pub fn border(&self) -> Option<[u16; 4]> {
        (self.border != [u16::MAX; 4]).then_some(self.border)
    }

    /// Raw film keycode fields: manufacturer, type, perf offset, prefix, count.
    pub fn keycode_fields(&self) -> (&[u8], &[u8], &[u8], &[u8], &[u8]) {
        (
            &self.film_mfg_id,
            &self.film_type,
            &self.perfs_offset,
            &self.prefix,
            &self.count,
        )
    }

    /// Raw film format field.
    #[inline]
    pub fn format_raw(&self) -> &[u8] {
        &self.format
    }

    /// Raw creation time field.
    #[inline]
    pub fn creation_time_raw(&self) -> &[u8] {
        &self.creation_time
    }

    /// Raw source time field.
    #[inline]
    pub fn source_time_raw(&self) -> &[u8] {
        &self.source_time
    }

    // === Sentinel-filtered accessors ===

    /// Offset to the first element's data, if set.
    pub fn image_offset(&self) -> Option<u32> {
        opt_u32(self.image_offset).filter(|&o| o != 0)
    }

    /// Header version string (e.g. "V2.0").
    pub fn version(&self) -> Option<String> {
        opt_str(&self.version)
    }

    /// Total file size, if set.
    pub fn file_size(&self) -> Option<u32> {
        opt_u32(self.file_size)
    }

    /// Ditto key, if set.
    pub fn ditto_key(&self) -> Option<u32> {
        opt_u32(self.ditto_key)
    }

    /// Generic header size, if set.
    pub fn generic_size(&self) -> Option<u32> {
        opt_u32(self.generic_size)
    }

    /// Industry header size, if set.
    pub fn industry_size(&self) -> Option<u32> {
        opt_u32(self.industry_size)
    }

    /// User data size; `None` when unset or zero.
    pub fn user_size(&self) -> Option<u32> {
        opt_u32(self.user_size).filter(|&s| s != 0)
    }

    /// Image file name.
    pub fn file_name(&self) -> Option<String> {
        opt_str(&self.file_name)
    }

    /// Creation date/time as stored (`YYYY:MM:DD:HH:MM:SS:LTZ`).
    pub fn creation_time(&self) -> Option<String> {
        opt_str(&self.creation_time)
    }

    /// Creator (software) name.
    pub fn creator(&self) -> Option<String> {
        opt_str(&self.creator)
    }

    /// Project name.
    pub fn project(&self) -> Option<String> {
        opt_str(&self.project)
    }

    /// Copyright statement.
    pub fn copyright(&self) -> Option<String> {
        opt_str(&self.copyright)
    }

    /// Encryption key, if set.
    pub fn encrypt_key(&self) -> Option<u32> {
        opt_u32(self.encrypt_key)
    }

    /// X offset, if set.
    pub fn x_offset(&self) -> Option<u32> {
        opt_u32(self.x_offset)
    }

    /// Y offset, if set.
    pub fn y_offset(&self) -> Option<u32> {
        opt_u32(self.y_offset)
    }

    /// X center, if set.
    pub fn x_center(&self) -> Option<f32> {
        opt_f32(self.x_center)
    }

    /// Y center, if set.
    pub fn y_center(&self) -> Option<f32> {
        opt_f32(self.y_center)
    }

    /// Original width, if set.
    pub fn x_original_size(&self) -> Option<u32> {
        opt_u32(self.x_original_size)
    }

    /// Original height, if set.
    pub fn y_original_size(&self) -> Option<u32> {
        opt_u32(self.y_original_size)
    }

    /// Source image file name.
    pub fn source_file_name(&self) -> Option<String> {
        opt_str(&self.source_file_name)
    }

    /// Source date/time as stored.
    pub fn source_time(&self) -> Option<String> {
        opt_str(&self.source_time)
    }

    /// Input device name.
    pub fn input_device(&self) -> Option<String> {
        opt_str(&self.input_device)
    }

    /// Input device serial number.
    pub fn input_device_serial(&self) -> Option<String> {
        opt_str(&self.input_serial)
    }

    /// Pixel aspect ratio as (horizontal, vertical), if both are set.
    pub fn aspect_ratio(&self) -> Option<(u32, u32)> {
        Some((opt_u32(self.aspect_ratio[0])?, opt_u32(self.aspect_ratio[1])?))
    }

    /// Horizontal scanned size (mm), if set.
    pub fn x_scanned_size(&self) -> Option<f32> {
        opt_f32(self.x_scanned_size)
    }

    /// Vertical scanned size (mm), if set.
    pub fn y_scanned_size(&self) -> Option<f32> {
        opt_f32(self.y_scanned_size)
    }

    /// Film format name (e.g. "Academy").
    pub fn format(&self) -> Option<String> {
        opt_str(&self.format)
    }

    /// Frame position in sequence, if set.
    pub fn frame_position(&self) -> Option<u32> {
        opt_u32(self.frame_position)
    }

    /// Sequence length, if set.
    pub fn sequence_length(&self) -> Option<u32> {
        opt_u32(self.sequence_length)
    }

    /// Held count, if set.
    pub fn held_count(&self) -> Option<u32> {
        opt_u32(self.held_count)
    }

    /// Frame rate, if set.
    pub fn frame_rate(&self) -> Option<f32> {
        opt_f32(self.frame_rate)
    }

    /// Shutter angle in degrees, if set.
    pub fn shutter_angle(&self) -> Option<f32> {
        opt_f32(self.shutter_angle)
    }

    /// Frame identification (e.g. keyframe).
    pub fn frame_id(&self) -> Option<String> {
        opt_str(&self.frame_id)
    }

    /// Slate information.
    pub fn slate_info(&self) -> Option<String> {
        opt_str(&self.slate_info)
    }

    /// SMPTE time code word, if set.
    pub fn time_code(&self) -> Option<u32> {
        opt_u32(self.time_code)
    }

    /// SMPTE user bits, if set.
    pub fn user_bits(&self) -> Option<u32> {
        opt_u32(self.user_bits)
    }

    /// Interlace flag (0 = noninterlaced, 1 = 2:1), if set.
    pub fn interlace(&self) -> Option<u8> {
        opt_u8(self.interlace)
    }

    /// Field number, if set.
    pub fn field_number(&self) -> Option<u8> {
        opt_u8(self.field_number)
    }

    /// Horizontal sampling rate (Hz), if set.
    pub fn horizontal_sample_rate(&self) -> Option<f32> {
        opt_f32(self.horizontal_sample_rate)
    }

    /// Vertical sampling rate (Hz), if set.
    pub fn vertical_sample_rate(&self) -> Option<f32> {
        opt_f32(self.vertical_sample_rate)
    }

    /// Temporal sampling rate, if set.
    pub fn temporal_frame_rate(&self) -> Option<f32> {
        opt_f32(self.temporal_frame_rate)
    }

    /// Time offset from sync to first pixel, if set.
    pub fn time_offset(&self) -> Option<f32> {
        opt_f32(self.time_offset)
    }

    /// Gamma, if set.
    pub fn gamma(&self) -> Option<f32> {
        opt_f32(self.gamma)
    }

    /// Black level code value, if set.
    pub fn black_level(&self) -> Option<f32> {
        opt_f32(self.black_level)
    }

    /// Black gain, if set.
    pub fn black_gain(&self) -> Option<f32> {
        opt_f32(self.black_gain)
    }

    /// Break point, if set.
    pub fn break_point(&self) -> Option<f32> {
        opt_f32(self.break_point)
    }

    /// Reference white level code value, if set.
    pub fn white_level(&self) -> Option<f32> {
        opt_f32(self.white_level)
    }

    /// Integration time in seconds, if set.
    pub fn integration_times(&self) -> Option<f32> {
        opt_f32(self.integration_times)
    }
}

/// Checks the first four bytes for a DPX magic cookie.
pub fn can_read(header: &[u8]) -> bool {
    header.len() >= 4 && Endian::from_magic([header[0], header[1], header[2], header[3]]).is_some()
}

/// Checks whether a byte source starts with a DPX magic cookie.
pub fn valid_source<S: ByteSource + ?Sized>(source: &S) -> bool {
    let mut magic = [0u8; 4];
    matches!(source.read_at(&mut magic, 0), Ok(4)) && can_read(&magic)
}
