//! Sample unpacking and color conversion.
//!
//! Two stages turn a [`RawBlock`] into caller samples:
//!
//! 1. [`unpack`] strips line padding, undoes the word packing and byte order,
//!    and delivers one native sample per stored component. 10 and 12-bit
//!    samples widen to 16 bits by bit replication, so full scale stays full
//!    scale.
//! 2. [`convert`] reshapes components to RGB/RGBA, or leaves them alone in
//!    [`ColorMode::Raw`].
//!
//! # Packing
//!
//! | Bits | Packing | Layout |
//! |------|---------|--------|
//! | 10 | filled A | 3 samples per u32 at bits 31-22, 21-12, 11-2 |
//! | 10 | filled B | 3 samples per u32 at bits 29-20, 19-10, 9-0 |
//! | 12 | filled A | 1 sample per u16, high 12 bits |
//! | 12 | filled B | 1 sample per u16, low 12 bits |
//! | 10/12 | packed | LSB-first bit stream over u32 words |
//!
//! # YCbCr
//!
//! Chroma is centred on half scale for unsigned integers (128, 32768), on 0
//! for signed integers and on 0.5 for floats. Elements tagged SMPTE 274M or
//! ITU-R 709 use Rec.709 coefficients, everything else Rec.601. 4:2:2 chroma
//! is upsampled per line: even pixels take their own chroma pair, odd pixels
//! the mean of the two neighbouring pairs (or the last pair at the line end).

use crate::block::RawBlock;
use crate::element::{Descriptor, Encoding, ImageElement, Packing, SampleType};
use crate::error::{DpxError, DpxResult};
use crate::header::Endian;
use crate::tables::{CHAR_ITU_R709, CHAR_SMPTE_274M};

/// Decoded samples, interleaved by pixel, lines top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// Unsigned 8-bit.
    U8(Vec<u8>),
    /// Signed 8-bit.
    I8(Vec<i8>),
    /// Unsigned 16-bit (also 10 and 12-bit data).
    U16(Vec<u16>),
    /// Signed 16-bit.
    I16(Vec<i16>),
    /// 32-bit float.
    F32(Vec<f32>),
    /// 64-bit float.
    F64(Vec<f64>),
}

impl PixelData {
    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(v) => v.len(),
            PixelData::I8(v) => v.len(),
            PixelData::U16(v) => v.len(),
            PixelData::I16(v) => v.len(),
            PixelData::F32(v) => v.len(),
            PixelData::F64(v) => v.len(),
        }
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample type of the buffer.
    pub fn sample_type(&self) -> SampleType {
        match self {
            PixelData::U8(_) => SampleType::U8,
            PixelData::I8(_) => SampleType::I8,
            PixelData::U16(_) => SampleType::U16,
            PixelData::I16(_) => SampleType::I16,
            PixelData::F32(_) => SampleType::F32,
            PixelData::F64(_) => SampleType::F64,
        }
    }

    /// Samples as `u8`, if that is the buffer type.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            PixelData::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Samples as `u16`, if that is the buffer type.
    pub fn as_u16(&self) -> Option<&[u16]> {
        match self {
            PixelData::U16(v) => Some(v),
            _ => None,
        }
    }

    /// Samples as `i16`, if that is the buffer type.
    pub fn as_i16(&self) -> Option<&[i16]> {
        match self {
            PixelData::I16(v) => Some(v),
            _ => None,
        }
    }

    /// Samples as `f32`, if that is the buffer type.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            PixelData::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Serializes the samples in the given byte order.
    pub fn to_bytes(&self, endian: Endian) -> Vec<u8> {
        fn flat<T: Copy, const N: usize>(v: &[T], f: impl Fn(T) -> [u8; N]) -> Vec<u8> {
            v.iter().flat_map(|&s| f(s)).collect()
        }
        let big = endian == Endian::Big;
        match self {
            PixelData::U8(v) => v.clone(),
            PixelData::I8(v) => v.iter().map(|&s| s as u8).collect(),
            PixelData::U16(v) => flat(v, |s| if big { s.to_be_bytes() } else { s.to_le_bytes() }),
            PixelData::I16(v) => flat(v, |s| if big { s.to_be_bytes() } else { s.to_le_bytes() }),
            PixelData::F32(v) => flat(v, |s| if big { s.to_be_bytes() } else { s.to_le_bytes() }),
            PixelData::F64(v) => flat(v, |s| if big { s.to_be_bytes() } else { s.to_le_bytes() }),
        }
    }
}

/// Whether samples are reshaped to RGB/RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Stored components as-is (no upsampling, reordering or matrix).
    Raw,
    /// Canonical RGB or RGBA.
    #[default]
    Rgb,
}

/// Channels delivered per pixel for `element` in `mode`.
pub fn output_channels(element: &ImageElement, mode: ColorMode) -> usize {
    if mode == ColorMode::Raw {
        return element.component_count;
    }
    match element.descriptor {
        Descriptor::CbYCrY | Descriptor::CbYCr => 3,
        Descriptor::CbYACrYA | Descriptor::CbYCrA => 4,
        _ => element.component_count,
    }
}

// === Unpacking ===

#[inline]
fn widen10(v: u32) -> u16 {
    let v = v as u16 & 0x3FF;
    (v << 6) | (v >> 4)
}

#[inline]
fn widen12(v: u32) -> u16 {
    let v = v as u16 & 0xFFF;
    (v << 4) | (v >> 8)
}

/// Reads `count` samples of `bits` width from an LSB-first stream of words.
fn unpack_bitstream(line: &[u8], endian: Endian, bits: u32, count: usize, out: &mut Vec<u16>) {
    let widen = if bits == 10 { widen10 } else { widen12 };
    let mask = (1u64 << bits) - 1;
    let mut words = line.chunks_exact(4).map(|w| endian.u32(w));
    let mut acc = 0u64;
    let mut have = 0u32;
    for _ in 0..count {
        if have < bits {
            if let Some(w) = words.next() {
                acc |= (w as u64) << have;
                have += 32;
            }
        }
        out.push(widen((acc & mask) as u32));
        acc >>= bits;
        have = have.saturating_sub(bits);
    }
}

/// One line of 10, 12 or 16-bit samples as 16-bit words.
fn unpack_words(element: &ImageElement, endian: Endian, line: &[u8], count: usize, out: &mut Vec<u16>) {
    match (element.bit_depth, element.packing) {
        (10, Packing::Packed) | (12, Packing::Packed) => {
            unpack_bitstream(line, endian, element.bit_depth as u32, count, out)
        }
        (10, packing) => {
            let base = if packing == Packing::FilledB { 20 } else { 22 };
            let samples = line.chunks_exact(4).flat_map(|w| {
                let word = endian.u32(w);
                [0, 1, 2].map(|i| widen10(word >> (base - 10 * i)))
            });
            out.extend(samples.take(count));
        }
        (12, packing) => {
            let samples = line.chunks_exact(2).map(|b| {
                let v = endian.u16(b) as u32;
                if packing == Packing::FilledB { widen12(v) } else { widen12(v >> 4) }
            });
            out.extend(samples.take(count));
        }
        _ => out.extend(line.chunks_exact(2).take(count).map(|b| endian.u16(b))),
    }
}

/// Unpacks a block of stored lines into native samples.
///
/// # Errors
///
/// - [`DpxError::UnsupportedFormat`] for RLE or unknown encodings, bit depths
///   and packings.
/// - [`DpxError::OutOfRange`] if the block's line size doesn't match the element.
pub fn unpack(element: &ImageElement, endian: Endian, block: &RawBlock, width: u32) -> DpxResult<PixelData> {
    match element.encoding {
        Encoding::None => {}
        Encoding::Rle => {
            return Err(DpxError::UnsupportedFormat(format!(
                "element {}: RLE-encoded pixel data",
                element.index
            )));
        }
        Encoding::Unknown(code) => {
            return Err(DpxError::UnsupportedFormat(format!(
                "element {}: encoding {}",
                element.index, code
            )));
        }
    }
    let sample_type = element.sample_type()?;
    let expected = element.row_bytes(width)?;
    if block.row_bytes as u64 != expected {
        return Err(DpxError::OutOfRange(format!(
            "block lines are {} bytes, element {} needs {}",
            block.row_bytes, element.index, expected
        )));
    }

    let per_line = width as usize * element.component_count;
    let total = per_line * block.rows;

    let data = match sample_type {
        SampleType::U8 | SampleType::I8 => {
            let mut out = Vec::with_capacity(total);
            for line in block.lines() {
                out.extend_from_slice(&line[..per_line]);
            }
            if sample_type == SampleType::I8 {
                PixelData::I8(out.into_iter().map(|v| v as i8).collect())
            } else {
                PixelData::U8(out)
            }
        }
        SampleType::U16 | SampleType::I16 => {
            let mut out = Vec::with_capacity(total);
            for line in block.lines() {
                unpack_words(element, endian, line, per_line, &mut out);
            }
            if sample_type == SampleType::I16 {
                PixelData::I16(out.into_iter().map(|v| v as i16).collect())
            } else {
                PixelData::U16(out)
            }
        }
        SampleType::F32 => {
            let mut out = Vec::with_capacity(total);
            for line in block.lines() {
                out.extend(line.chunks_exact(4).take(per_line).map(|b| endian.f32(b)));
            }
            PixelData::F32(out)
        }
        SampleType::F64 => {
            let mut out = Vec::with_capacity(total);
            for line in block.lines() {
                out.extend(line.chunks_exact(8).take(per_line).map(|b| endian.f64(b)));
            }
            PixelData::F64(out)
        }
    };
    Ok(data)
}

// === Conversion ===

/// Numeric sample with a neutral chroma value.
trait Sample: Copy {
    const CHROMA_ZERO: f64;
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

macro_rules! int_sample {
    ($t:ty, $zero:expr) => {
        impl Sample for $t {
            const CHROMA_ZERO: f64 = $zero;
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                v.round().clamp(<$t>::MIN as f64, <$t>::MAX as f64) as $t
            }
        }
    };
}

int_sample!(u8, 128.0);
int_sample!(i8, 0.0);
int_sample!(u16, 32768.0);
int_sample!(i16, 0.0);

impl Sample for f32 {
    const CHROMA_ZERO: f64 = 0.5;
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Sample for f64 {
    const CHROMA_ZERO: f64 = 0.5;
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// YCbCr to RGB coefficients (full range).
#[derive(Debug, Clone, Copy)]
struct YccMatrix {
    cr_r: f64,
    cb_g: f64,
    cr_g: f64,
    cb_b: f64,
}

const REC601: YccMatrix = YccMatrix { cr_r: 1.402, cb_g: 0.344136, cr_g: 0.714136, cb_b: 1.772 };
const REC709: YccMatrix = YccMatrix { cr_r: 1.5748, cb_g: 0.187324, cr_g: 0.468124, cb_b: 1.8556 };

impl YccMatrix {
    fn for_colorimetric(code: u8) -> Self {
        if code == CHAR_SMPTE_274M || code == CHAR_ITU_R709 { REC709 } else { REC601 }
    }

    #[inline]
    fn apply(&self, y: f64, cb: f64, cr: f64) -> [f64; 3] {
        [
            y + self.cr_r * cr,
            y - self.cb_g * cb - self.cr_g * cr,
            y + self.cb_b * cb,
        ]
    }
}

/// Stored YCbCr layout.
#[derive(Debug, Clone, Copy)]
struct YccLayout {
    /// Components per stored pixel.
    stride: usize,
    /// 4:2:2: chroma alternates Cb/Cr in component 0.
    subsampled: bool,
    /// Alpha in the last component.
    alpha: bool,
}

fn ycc_to_rgb<T: Sample>(src: &[T], width: usize, layout: YccLayout, m: YccMatrix) -> Vec<T> {
    let out_channels = if layout.alpha { 4 } else { 3 };
    let line_len = width * layout.stride;
    if line_len == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(src.len() / layout.stride * out_channels);
    let chroma = |v: T| v.to_f64() - T::CHROMA_ZERO;

    for line in src.chunks_exact(line_len) {
        let px = |x: usize| &line[x * layout.stride..(x + 1) * layout.stride];
        let pairs: Vec<(f64, f64)> = if layout.subsampled {
            (0..width.div_ceil(2))
                .map(|k| {
                    let cb = chroma(px(2 * k)[0]);
                    let cr = if 2 * k + 1 < width { chroma(px(2 * k + 1)[0]) } else { 0.0 };
                    (cb, cr)
                })
                .collect()
        } else {
            Vec::new()
        };

        for x in 0..width {
            let p = px(x);
            let (cb, cr) = if layout.subsampled {
                let k = x / 2;
                if x % 2 == 1 && k + 1 < pairs.len() {
                    let (a, b) = (pairs[k], pairs[k + 1]);
                    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
                } else {
                    pairs[k]
                }
            } else {
                (chroma(p[0]), chroma(p[2]))
            };
            out.extend(m.apply(p[1].to_f64(), cb, cr).map(T::from_f64));
            if layout.alpha {
                out.push(p[layout.stride - 1]);
            }
        }
    }
    out
}

fn abgr_to_rgba<T>(mut v: Vec<T>) -> Vec<T> {
    v.chunks_exact_mut(4).for_each(|px| px.reverse());
    v
}

/// Reshapes unpacked samples of `element` for `mode`.
///
/// Raw mode and single-channel elements pass through untouched. Otherwise
/// ABGR is reordered to RGBA and the YCbCr layouts become RGB or RGBA; every
/// other descriptor passes through.
pub fn convert(element: &ImageElement, data: PixelData, width: u32, mode: ColorMode) -> PixelData {
    if mode == ColorMode::Raw || element.component_count == 1 {
        return data;
    }
    let layout = match element.descriptor {
        Descriptor::Abgr => {
            return match data {
                PixelData::U8(v) => PixelData::U8(abgr_to_rgba(v)),
                PixelData::I8(v) => PixelData::I8(abgr_to_rgba(v)),
                PixelData::U16(v) => PixelData::U16(abgr_to_rgba(v)),
                PixelData::I16(v) => PixelData::I16(abgr_to_rgba(v)),
                PixelData::F32(v) => PixelData::F32(abgr_to_rgba(v)),
                PixelData::F64(v) => PixelData::F64(abgr_to_rgba(v)),
            };
        }
        Descriptor::CbYCrY => YccLayout { stride: 2, subsampled: true, alpha: false },
        Descriptor::CbYACrYA => YccLayout { stride: 3, subsampled: true, alpha: true },
        Descriptor::CbYCr => YccLayout { stride: 3, subsampled: false, alpha: false },
        Descriptor::CbYCrA => YccLayout { stride: 4, subsampled: false, alpha: true },
        _ => return data,
    };

    let m = YccMatrix::for_colorimetric(element.colorimetric);
    let w = width as usize;
    match data {
        PixelData::U8(v) => PixelData::U8(ycc_to_rgb(&v, w, layout, m)),
        PixelData::I8(v) => PixelData::I8(ycc_to_rgb(&v, w, layout, m)),
        PixelData::U16(v) => PixelData::U16(ycc_to_rgb(&v, w, layout, m)),
        PixelData::I16(v) => PixelData::I16(ycc_to_rgb(&v, w, layout, m)),
        PixelData::F32(v) => PixelData::F32(ycc_to_rgb(&v, w, layout, m)),
        PixelData::F64(v) => PixelData::F64(ycc_to_rgb(&v, w, layout, m)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ComponentDataSize;
    use approx::assert_relative_eq;

    fn element(descriptor: Descriptor, bits: u8, packing: Packing) -> ImageElement {
        ImageElement {
            index: 0,
            descriptor,
            component_count: descriptor.component_count(),
            bit_depth: bits,
            signed: false,
            data_size: ComponentDataSize::from_bit_depth(bits),
            packing,
            encoding: Encoding::None,
            transfer: 2,
            colorimetric: 2,
            data_offset: Some(2048),
            eol_padding: 0,
            eoi_padding: 0,
        }
    }

    fn block(data: Vec<u8>, rows: usize) -> RawBlock {
        let row_bytes = data.len() / rows;
        RawBlock { data, rows, row_bytes, stride: row_bytes }
    }

    #[test]
    fn widening_keeps_full_scale() {
        assert_eq!(widen10(0x3FF), 0xFFFF);
        assert_eq!(widen10(0), 0);
        assert_eq!(widen10(0x200), 0x8020);
        assert_eq!(widen12(0xFFF), 0xFFFF);
    }

    #[test]
    fn ten_bit_filled_methods() {
        let el = element(Descriptor::Rgb, 10, Packing::FilledA);
        let word: u32 = (1023 << 22) | (512 << 12) | (1 << 2);
        let out = unpack(&el, Endian::Big, &block(word.to_be_bytes().to_vec(), 1), 1).unwrap();
        assert_eq!(out.as_u16().unwrap(), &[0xFFFF, widen10(512), widen10(1)]);

        let el = element(Descriptor::Rgb, 10, Packing::FilledB);
        let word: u32 = (1023 << 20) | (512 << 10) | 1;
        let out = unpack(&el, Endian::Little, &block(word.to_le_bytes().to_vec(), 1), 1).unwrap();
        assert_eq!(out.as_u16().unwrap(), &[0xFFFF, widen10(512), widen10(1)]);
    }

    #[test]
    fn ten_bit_packed_spans_words() {
        // 4 luma samples = 40 bits: the fourth sample straddles the first word
        let samples = [1u64, 2, 3, 1023];
        let bits = samples.iter().enumerate().fold(0u64, |acc, (i, &s)| acc | (s << (10 * i)));
        let mut data = (bits as u32).to_be_bytes().to_vec();
        data.extend(((bits >> 32) as u32).to_be_bytes());
        let el = element(Descriptor::Luma, 10, Packing::Packed);
        let out = unpack(&el, Endian::Big, &block(data, 1), 4).unwrap();
        assert_eq!(out.as_u16().unwrap(), &[widen10(1), widen10(2), widen10(3), 0xFFFF]);
    }

    #[test]
    fn twelve_bit_filled_methods() {
        let el = element(Descriptor::Luma, 12, Packing::FilledA);
        let data = [(0xABCu16 << 4).to_be_bytes(), (0xFFFu16 << 4).to_be_bytes()].concat();
        let out = unpack(&el, Endian::Big, &block(data, 1), 2).unwrap();
        assert_eq!(out.as_u16().unwrap(), &[widen12(0xABC), 0xFFFF]);

        let el = element(Descriptor::Luma, 12, Packing::FilledB);
        let data = [0xABCu16.to_le_bytes(), 0x001u16.to_le_bytes()].concat();
        let out = unpack(&el, Endian::Little, &block(data, 1), 2).unwrap();
        assert_eq!(out.as_u16().unwrap(), &[widen12(0xABC), widen12(1)]);
    }

    #[test]
    fn line_padding_is_skipped() {
        let el = element(Descriptor::Luma, 8, Packing::Packed);
        // width 3, row padded to 4 bytes, plus 4 bytes EOL padding
        let data = vec![1, 2, 3, 0, 9, 9, 9, 9, 4, 5, 6, 0];
        let raw = RawBlock { data, rows: 2, row_bytes: 4, stride: 8 };
        let out = unpack(&el, Endian::Big, &raw, 3).unwrap();
        assert_eq!(out.as_u8().unwrap(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rle_is_rejected() {
        let mut el = element(Descriptor::Luma, 8, Packing::Packed);
        el.encoding = Encoding::Rle;
        let raw = block(vec![0; 4], 1);
        assert!(matches!(unpack(&el, Endian::Big, &raw, 4), Err(DpxError::UnsupportedFormat(_))));
    }

    #[test]
    fn mismatched_block_is_rejected() {
        let el = element(Descriptor::Rgb, 8, Packing::Packed);
        let raw = block(vec![0; 4], 1);
        assert!(matches!(unpack(&el, Endian::Big, &raw, 4), Err(DpxError::OutOfRange(_))));
    }

    #[test]
    fn signed_and_float_samples() {
        let mut el = element(Descriptor::Luma, 16, Packing::Packed);
        el.signed = true;
        let data = [(-2i16).to_be_bytes(), 300i16.to_be_bytes()].concat();
        let out = unpack(&el, Endian::Big, &block(data, 1), 2).unwrap();
        assert_eq!(out.as_i16().unwrap(), &[-2, 300]);

        let el = element(Descriptor::Luma, 32, Packing::Packed);
        let out = unpack(&el, Endian::Little, &block(0.25f32.to_le_bytes().to_vec(), 1), 1).unwrap();
        assert_eq!(out.as_f32().unwrap(), &[0.25]);
    }

    #[test]
    fn abgr_reordered() {
        let el = element(Descriptor::Abgr, 8, Packing::Packed);
        let data = PixelData::U8(vec![4, 3, 2, 1, 40, 30, 20, 10]);
        let out = convert(&el, data.clone(), 2, ColorMode::Rgb);
        assert_eq!(out.as_u8().unwrap(), &[1, 2, 3, 4, 10, 20, 30, 40]);
        assert_eq!(convert(&el, data.clone(), 2, ColorMode::Raw), data);
    }

    #[test]
    fn channel_counts() {
        let el = element(Descriptor::CbYCrY, 8, Packing::Packed);
        assert_eq!(output_channels(&el, ColorMode::Raw), 2);
        assert_eq!(output_channels(&el, ColorMode::Rgb), 3);
        let el = element(Descriptor::CbYACrYA, 8, Packing::Packed);
        assert_eq!(output_channels(&el, ColorMode::Raw), 3);
        assert_eq!(output_channels(&el, ColorMode::Rgb), 4);
        let el = element(Descriptor::Luma, 16, Packing::Packed);
        assert_eq!(output_channels(&el, ColorMode::Rgb), 1);
    }

    #[test]
    fn cbycry_upsampling() {
        let el = element(Descriptor::CbYCrY, 8, Packing::Packed);
        // Cb Y Cr Y | Cb Y Cr Y, first pair carries Cr = +50
        let raw = vec![128, 100, 178, 100, 128, 100, 128, 100];
        let out = convert(&el, PixelData::U8(raw.clone()), 4, ColorMode::Rgb);
        let rgb = out.as_u8().unwrap();
        assert_eq!(rgb.len(), 12);
        // pixel 0: own pair, Rec.601
        assert_eq!(&rgb[0..3], &[170, 64, 100]);
        // pixel 1: mean of pairs 0 and 1 (Cr = +25)
        assert_eq!(&rgb[3..6], &[135, 82, 100]);
        // pixels 2 and 3: neutral pair
        assert_eq!(&rgb[6..12], &[100; 6]);

        let passthrough = convert(&el, PixelData::U8(raw.clone()), 4, ColorMode::Raw);
        assert_eq!(passthrough.as_u8().unwrap(), raw.as_slice());
    }

    #[test]
    fn rec709_selected_by_colorimetric() {
        let mut el = element(Descriptor::CbYCr, 32, Packing::Packed);
        el.colorimetric = CHAR_ITU_R709;
        let out = convert(&el, PixelData::F32(vec![0.5, 0.5, 0.6]), 1, ColorMode::Rgb);
        let rgb = out.as_f32().unwrap();
        assert_relative_eq!(rgb[0], 0.5 + 1.5748 * 0.1, epsilon = 1e-5);
        assert_relative_eq!(rgb[1], 0.5 - 0.468124 * 0.1, epsilon = 1e-5);
        assert_relative_eq!(rgb[2], 0.5, epsilon = 1e-5);
    }

    #[test]
    fn cbycra_keeps_alpha() {
        let el = element(Descriptor::CbYCrA, 16, Packing::Packed);
        let out = convert(&el, PixelData::U16(vec![32768, 1000, 32768, 7]), 1, ColorMode::Rgb);
        assert_eq!(out.as_u16().unwrap(), &[1000, 1000, 1000, 7]);
    }

    #[test]
    fn integer_results_clamp() {
        let el = element(Descriptor::CbYCr, 8, Packing::Packed);
        let out = convert(&el, PixelData::U8(vec![128, 250, 255]), 1, ColorMode::Rgb);
        assert_eq!(out.as_u8().unwrap()[0], 255);
    }

    #[test]
    fn serializes_in_byte_order() {
        let data = PixelData::U16(vec![0x0102]);
        assert_eq!(data.to_bytes(Endian::Big), vec![1, 2]);
        assert_eq!(data.to_bytes(Endian::Little), vec![2, 1]);
        assert_eq!(data.sample_type(), SampleType::U16);
    }
}
