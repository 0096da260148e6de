//! Image element table.
//!
//! A DPX file holds up to eight image elements. All share the header's width
//! and height; each has its own descriptor, bit depth, packing and data
//! offset. The table is derived once from the header and indexed by subimage.
//!
//! Unsupported bit depths or packings do not fail the table: they surface as
//! [`DpxError::UnsupportedFormat`] only when that element is used, so other
//! elements of the same file stay readable.

use tracing::warn;

use crate::error::{DpxError, DpxResult};
use crate::header::{DpxHeader, ElementHeader, HEADER_SIZE, MAX_ELEMENTS, UNSET_U8};

/// Channel semantics of an image element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    /// User-defined single component (0).
    UserDefined,
    /// Red (1).
    Red,
    /// Green (2).
    Green,
    /// Blue (3).
    Blue,
    /// Alpha (4).
    Alpha,
    /// Luma (6).
    Luma,
    /// Color difference (7).
    ColorDifference,
    /// Depth (8).
    Depth,
    /// Composite video (9).
    CompositeVideo,
    /// RGB (50).
    Rgb,
    /// RGBA (51).
    Rgba,
    /// ABGR (52).
    Abgr,
    /// 4:2:2 CbYCrY (100).
    CbYCrY,
    /// 4:2:2:4 CbYACrYA (101).
    CbYACrYA,
    /// 4:4:4 CbYCr (102).
    CbYCr,
    /// 4:4:4:4 CbYCrA (103).
    CbYCrA,
    /// User-defined with 2..=8 components (150..=156).
    UserDefinedN(u8),
    /// Undefined (255).
    Undefined,
    /// Any other code.
    Unknown(u8),
}

impl Descriptor {
    /// Decodes a descriptor code.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::UserDefined,
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Blue,
            4 => Self::Alpha,
            6 => Self::Luma,
            7 => Self::ColorDifference,
            8 => Self::Depth,
            9 => Self::CompositeVideo,
            50 => Self::Rgb,
            51 => Self::Rgba,
            52 => Self::Abgr,
            100 => Self::CbYCrY,
            101 => Self::CbYACrYA,
            102 => Self::CbYCr,
            103 => Self::CbYCrA,
            150..=156 => Self::UserDefinedN(code - 148),
            UNSET_U8 => Self::Undefined,
            other => Self::Unknown(other),
        }
    }

    /// Number of components stored per pixel.
    ///
    /// Subsampled layouts count stored samples: CbYCrY stores two per pixel
    /// (a chroma sample and a luma sample).
    pub fn component_count(self) -> usize {
        match self {
            Self::Rgb | Self::CbYCr | Self::CbYACrYA => 3,
            Self::Rgba | Self::Abgr | Self::CbYCrA => 4,
            Self::CbYCrY => 2,
            Self::UserDefinedN(n) => n as usize,
            _ => 1,
        }
    }

    /// True for luma/chroma layouts that need a YCbCr to RGB conversion.
    pub fn is_ycbcr(self) -> bool {
        matches!(self, Self::CbYCrY | Self::CbYACrYA | Self::CbYCr | Self::CbYCrA)
    }
}

/// How samples are laid out in 32-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
    /// Tightly packed bit stream (0).
    Packed,
    /// Filled to word boundary, padding in the low bits (1).
    FilledA,
    /// Filled to word boundary, padding in the high bits (2).
    FilledB,
    /// Any other code.
    Unknown(u16),
}

impl Packing {
    /// Decodes a packing code.
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Packed,
            1 => Self::FilledA,
            2 => Self::FilledB,
            other => Self::Unknown(other),
        }
    }
}

/// Pixel data encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Uncompressed (0).
    None,
    /// Run-length encoded (1). Detected, not decoded.
    Rle,
    /// Any other code.
    Unknown(u16),
}

impl Encoding {
    /// Decodes an encoding code.
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Rle,
            other => Self::Unknown(other),
        }
    }
}

/// Storage size class of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentDataSize {
    /// 8-bit.
    Byte,
    /// 10, 12 or 16-bit, delivered as 16-bit words.
    Word,
    /// 32-bit IEEE float.
    Float,
    /// 64-bit IEEE double.
    Double,
}

impl ComponentDataSize {
    /// Derives the size class from a bit depth.
    pub fn from_bit_depth(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Byte),
            10 | 12 | 16 => Some(Self::Word),
            32 => Some(Self::Float),
            64 => Some(Self::Double),
            _ => None,
        }
    }
}

/// Sample type delivered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned 8-bit.
    U8,
    /// Signed 8-bit.
    I8,
    /// Unsigned 16-bit.
    U16,
    /// Signed 16-bit.
    I16,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl SampleType {
    /// Bytes per delivered sample.
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// True for floating-point samples.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Derived descriptor of one image element.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    /// Element index (subimage number).
    pub index: usize,
    /// Channel semantics.
    pub descriptor: Descriptor,
    /// Components per pixel as stored.
    pub component_count: usize,
    /// Bits per component.
    pub bit_depth: u8,
    /// Signed samples.
    pub signed: bool,
    /// Size class; `None` for unsupported bit depths.
    pub data_size: Option<ComponentDataSize>,
    /// Word packing.
    pub packing: Packing,
    /// Data encoding.
    pub encoding: Encoding,
    /// Transfer characteristic code.
    pub transfer: u8,
    /// Colorimetric characteristic code.
    pub colorimetric: u8,
    /// Absolute byte offset of the first line; `None` if it can't be derived.
    pub data_offset: Option<u64>,
    /// Padding after each line, in bytes.
    pub eol_padding: u64,
    /// Padding after the element, in bytes.
    pub eoi_padding: u64,
}

impl ImageElement {
    fn from_header(index: usize, raw: &ElementHeader) -> Self {
        let descriptor = Descriptor::from_code(raw.descriptor);
        Self {
            index,
            descriptor,
            component_count: descriptor.component_count(),
            bit_depth: raw.bit_depth,
            signed: raw.is_signed(),
            data_size: ComponentDataSize::from_bit_depth(raw.bit_depth),
            packing: Packing::from_code(raw.packing),
            encoding: Encoding::from_code(raw.encoding),
            transfer: raw.transfer,
            colorimetric: raw.colorimetric,
            data_offset: None,
            eol_padding: raw.eol_padding().unwrap_or(0) as u64,
            eoi_padding: raw.eoi_padding().unwrap_or(0) as u64,
        }
    }

    /// Sample type delivered for this element.
    ///
    /// # Errors
    ///
    /// [`DpxError::UnsupportedFormat`] when the bit depth maps to no known size.
    pub fn sample_type(&self) -> DpxResult<SampleType> {
        let size = self.data_size.ok_or_else(|| {
            DpxError::UnsupportedFormat(format!(
                "element {}: invalid component data size ({} bit)",
                self.index, self.bit_depth
            ))
        })?;
        Ok(match (size, self.signed) {
            (ComponentDataSize::Byte, false) => SampleType::U8,
            (ComponentDataSize::Byte, true) => SampleType::I8,
            (ComponentDataSize::Word, false) => SampleType::U16,
            (ComponentDataSize::Word, true) => SampleType::I16,
            (ComponentDataSize::Float, _) => SampleType::F32,
            (ComponentDataSize::Double, _) => SampleType::F64,
        })
    }

    /// Checks that bit depth and packing are a combination we can unpack.
    pub fn check_layout(&self) -> DpxResult<()> {
        self.sample_type()?;
        if matches!(self.bit_depth, 10 | 12) {
            if let Packing::Unknown(code) = self.packing {
                return Err(DpxError::UnsupportedFormat(format!(
                    "element {}: packing {} for {}-bit data",
                    self.index, code, self.bit_depth
                )));
            }
        }
        Ok(())
    }

    /// Stored bytes of one line, excluding end-of-line padding.
    ///
    /// Lines are rounded up to a 32-bit word boundary.
    pub fn row_bytes(&self, width: u32) -> DpxResult<u64> {
        self.check_layout()?;
        let samples = width as u64 * self.component_count as u64;
        let bits = self.bit_depth as u64;
        let bytes = match (self.bit_depth, self.packing) {
            (10, Packing::FilledA | Packing::FilledB) => samples.div_ceil(3) * 4,
            (10 | 12, Packing::Packed) => (samples * bits).div_ceil(32) * 4,
            (12, _) => samples * 2,
            _ => samples * bits / 8,
        };
        Ok(bytes.div_ceil(4) * 4)
    }

    /// Distance between the starts of consecutive lines.
    pub fn row_stride(&self, width: u32) -> DpxResult<u64> {
        Ok(self.row_bytes(width)? + self.eol_padding)
    }

    /// Total bytes of the element, including line and image padding.
    pub fn image_bytes(&self, width: u32, height: u32) -> DpxResult<u64> {
        self.row_stride(width)?
            .checked_mul(height as u64)
            .and_then(|body| body.checked_add(self.eoi_padding))
            .ok_or_else(|| {
                DpxError::OutOfRange(format!(
                    "element {}: {}x{} image size overflows",
                    self.index, width, height
                ))
            })
    }

    /// Data offset, or an error when it couldn't be derived.
    pub fn require_offset(&self) -> DpxResult<u64> {
        self.data_offset.ok_or_else(|| {
            DpxError::UnsupportedFormat(format!(
                "element {}: data offset unknown (preceding element has an unsupported layout)",
                self.index
            ))
        })
    }
}

/// Per-subimage element descriptors derived from a header.
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    width: u32,
    height: u32,
    elements: Vec<ImageElement>,
}

impl ElementTable {
    /// Builds the table from a parsed header.
    pub fn from_header(header: &DpxHeader) -> Self {
        let count = element_count(header);
        let (width, height) = (header.width(), header.height());
        let mut elements: Vec<ImageElement> = Vec::with_capacity(count);

        for i in 0..count {
            let Some(raw) = header.element(i) else { break };
            let mut el = ImageElement::from_header(i, raw);
            el.data_offset = match raw.data_offset() {
                Some(off) => Some(off as u64),
                None if i == 0 => Some(header.image_offset().map_or_else(
                    || HEADER_SIZE as u64 + header.user_size().unwrap_or(0) as u64,
                    |off| off as u64,
                )),
                None => {
                    let prev = &elements[i - 1];
                    match (prev.data_offset, prev.image_bytes(width, height)) {
                        (Some(off), Ok(size)) => off.checked_add(size),
                        _ => None,
                    }
                }
            };
            elements.push(el);
        }

        Self { width, height, elements }
    }

    /// Number of usable elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the header describes no usable element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element `i`, if in range.
    #[inline]
    pub fn element(&self, i: usize) -> Option<&ImageElement> {
        self.elements.get(i)
    }

    /// Iterates over all elements.
    pub fn iter(&self) -> impl Iterator<Item = &ImageElement> {
        self.elements.iter()
    }

    /// Shared element width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Shared element height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Number of image elements described by the header.
///
/// Uses the stored count when it is in `1..=8`. Otherwise counts the leading
/// slots that have a defined descriptor and a plausible bit depth, which is 0
/// for a zeroed or garbage header.
pub fn element_count(header: &DpxHeader) -> usize {
    let stored = header.raw_element_count() as usize;
    if (1..=MAX_ELEMENTS).contains(&stored) {
        return stored;
    }
    let inferred = (0..MAX_ELEMENTS)
        .map_while(|i| header.element(i))
        .take_while(|el| el.descriptor != UNSET_U8 && ComponentDataSize::from_bit_depth(el.bit_depth).is_some())
        .count();
    warn!(stored, inferred, "DPX element count out of range, inferred from descriptors");
    inferred
}
