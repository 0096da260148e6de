//! Per-subimage image spec and metadata.
//!
//! [`build_spec`] turns the header plus one [`ImageElement`] into an
//! [`ImageSpec`]: dimensions, windows, delivered sample type, channel layout
//! and an [`Attrs`] map with the OIIO-style attribute names used across VFX
//! tools (`Orientation`, `oiio:ColorSpace`, `dpx:*`, `smpte:*`).
//!
//! Header fields holding their "unset" sentinel produce no attribute at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use vfx_dpx::DpxReader;
//!
//! let reader = DpxReader::open_path("frame.0001.dpx")?;
//! let spec = reader.spec().unwrap();
//! println!("{}x{} {:?}", spec.width, spec.height, spec.channel_names);
//! if let Some(tc) = spec.attrs.get_str("dpx:TimeCode") {
//!     println!("timecode {}", tc);
//! }
//! ```

use crate::attrs::{AttrValue, Attrs};
use crate::convert::{output_channels, ColorMode};
use crate::element::{Descriptor, Encoding, ImageElement, SampleType};
use crate::error::DpxResult;
use crate::header::{DpxHeader, UNSET_U32, UNSET_U8};
use crate::tables::{
    self, KeyCode, TimeCode, CHAR_ITU_R709, CHAR_LINEAR, CHAR_LOGARITHMIC, CHAR_USER_DEFINED,
};

/// Description of one subimage as delivered to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per delivered pixel.
    pub channels: usize,
    /// Delivered sample type.
    pub format: SampleType,
    /// Channel names, one per channel.
    pub channel_names: Vec<String>,
    /// Index of the alpha channel, if any.
    pub alpha_channel: Option<usize>,
    /// Index of the depth channel, if any.
    pub z_channel: Option<usize>,
    /// Data window origin x.
    pub x: i32,
    /// Data window origin y.
    pub y: i32,
    /// Display window width.
    pub full_width: u32,
    /// Display window height.
    pub full_height: u32,
    /// Metadata attributes.
    pub attrs: Attrs,
}

impl ImageSpec {
    /// Bytes per delivered pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels * self.format.bytes()
    }

    /// Bytes per delivered scanline.
    #[inline]
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Samples per delivered scanline.
    #[inline]
    pub fn samples_per_row(&self) -> usize {
        self.width as usize * self.channels
    }
}

/// Default names: R, G, B, A, then `channel<i>`.
fn default_channel_names(n: usize) -> Vec<String> {
    const RGBA: [&str; 4] = ["R", "G", "B", "A"];
    (0..n)
        .map(|i| RGBA.get(i).map_or_else(|| format!("channel{}", i), |s| s.to_string()))
        .collect()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Channel names plus alpha and z indices for a descriptor.
fn channel_layout(
    element: &ImageElement,
    channels: usize,
    mode: ColorMode,
) -> (Vec<String>, Option<usize>, Option<usize>) {
    let raw = mode == ColorMode::Raw;
    let rgb = |n: usize| -> (Vec<String>, Option<usize>, Option<usize>) {
        (default_channel_names(n), (n >= 4).then_some(3), None)
    };
    match element.descriptor {
        Descriptor::Red => (names(&["R"]), None, None),
        Descriptor::Green => (names(&["G"]), None, None),
        Descriptor::Blue => (names(&["B"]), None, None),
        Descriptor::Alpha => (names(&["A"]), Some(0), None),
        Descriptor::Luma => (names(&["Y"]), None, None),
        Descriptor::Depth => (names(&["Z"]), None, Some(0)),
        Descriptor::Rgb | Descriptor::Rgba | Descriptor::Abgr => rgb(channels),
        Descriptor::CbYCrY if raw => (names(&["CbCr", "Y"]), None, None),
        Descriptor::CbYACrYA if raw => (names(&["CbCr", "Y", "A"]), Some(2), None),
        Descriptor::CbYCr if raw => (names(&["Cb", "Y", "Cr"]), None, None),
        Descriptor::CbYCrA if raw => (names(&["Cb", "Y", "Cr", "A"]), Some(3), None),
        Descriptor::CbYCrY | Descriptor::CbYACrYA | Descriptor::CbYCr | Descriptor::CbYCrA => {
            rgb(channels)
        }
        _ => ((0..channels).map(|i| format!("channel{}", i)).collect(), None, None),
    }
}

/// Color space tag from the transfer characteristic.
fn colorspace(transfer: u8, gamma: Option<f32>) -> Option<String> {
    match transfer {
        CHAR_LINEAR => Some("Linear".into()),
        CHAR_LOGARITHMIC => Some("KodakLog".into()),
        CHAR_ITU_R709 => Some("Rec709".into()),
        CHAR_USER_DEFINED => gamma.filter(|&g| g != 0.0).map(|g| format!("Gamma{}Rec709", g)),
        _ => None,
    }
}

/// Builds the spec and attribute set for one element.
///
/// `mode` selects raw or converted channel names; `user_data` is the per-file
/// user data blob, attached to every subimage.
///
/// # Errors
///
/// [`crate::DpxError::UnsupportedFormat`] when the element's bit depth or
/// packing can't be decoded.
pub fn build_spec(
    header: &DpxHeader,
    element: &ImageElement,
    subimage_count: usize,
    mode: ColorMode,
    user_data: Option<&[u8]>,
) -> DpxResult<ImageSpec> {
    let format = element.sample_type()?;
    element.check_layout()?;

    let (width, height) = (header.width(), header.height());
    let channels = output_channels(element, mode);
    let (channel_names, alpha_channel, z_channel) = channel_layout(element, channels, mode);

    let origin = |v: Option<u32>| v.and_then(|v| i32::try_from(v).ok()).unwrap_or(0);
    let full = |v: Option<u32>, fallback: u32| v.filter(|&s| (s as i32) > 0).unwrap_or(fallback);

    let mut spec = ImageSpec {
        width,
        height,
        channels,
        format,
        channel_names,
        alpha_channel,
        z_channel,
        x: origin(header.x_offset()),
        y: origin(header.y_offset()),
        full_width: full(header.x_original_size(), width),
        full_height: full(header.y_original_size(), height),
        attrs: Attrs::new(),
    };

    fill_attrs(&mut spec.attrs, header, element, subimage_count, user_data);
    Ok(spec)
}

fn fill_attrs(
    a: &mut Attrs,
    h: &DpxHeader,
    el: &ImageElement,
    subimage_count: usize,
    user_data: Option<&[u8]>,
) {
    a.set("oiio:BitsPerSample", el.bit_depth as i32);
    a.set("Orientation", tables::orientation(h.orientation()));
    a.set("oiio:subimages", subimage_count as i32);

    if let Some(cs) = colorspace(el.transfer, h.gamma()) {
        if el.transfer == CHAR_USER_DEFINED {
            a.set_opt("oiio:Gamma", h.gamma());
        }
        a.set("oiio:ColorSpace", cs);
    }
    a.set("dpx:Transfer", tables::characteristic_name(el.transfer));
    a.set("dpx:Colorimetric", tables::characteristic_name(el.colorimetric));

    // General
    a.set_opt("Copyright", h.copyright());
    a.set_opt("Software", h.creator());
    a.set_opt("DocumentName", h.project());
    a.set_opt("DateTime", h.creation_time().map(|t| tables::format_datetime(&t)));
    if el.encoding == Encoding::Rle {
        a.set("compression", "rle");
    }
    let raw = h.element(el.index);
    a.set_opt("ImageDescription", raw.and_then(|r| r.description()));
    let aspect = match h.aspect_ratio() {
        Some((num, den)) if den != 0 => num as f32 / den as f32,
        _ => 1.0,
    };
    a.set("PixelAspectRatio", aspect);

    // DPX specific
    let code = raw.map_or(UNSET_U8, |r| r.descriptor);
    a.set("dpx:ImageDescriptor", tables::descriptor_name(code));
    a.set_opt("dpx:EncryptKey", h.encrypt_key());
    a.set_opt("dpx:DittoKey", h.ditto_key());
    a.set_opt("dpx:ImageFileName", h.file_name());
    a.set_opt("dpx:FileSize", h.file_size());
    a.set_opt("dpx:GenericHeaderSize", h.generic_size());
    a.set_opt("dpx:IndustryHeaderSize", h.industry_size());
    if let Some(r) = raw {
        a.set_opt("dpx:LowData", r.low_data());
        a.set_opt("dpx:LowQuantity", r.low_quantity());
        a.set_opt("dpx:HighData", r.high_data());
        a.set_opt("dpx:HighQuantity", r.high_quantity());
        a.set_opt("dpx:EndOfLinePadding", r.eol_padding());
        a.set_opt("dpx:EndOfImagePadding", r.eoi_padding());
    }
    a.set_opt("dpx:XCenter", h.x_center());
    a.set_opt("dpx:YCenter", h.y_center());
    if let Some(border) = h.border() {
        let edges: Vec<AttrValue> = border.iter().map(|&e| AttrValue::UInt(e as u32)).collect();
        a.set("dpx:Border", edges);
    }
    a.set_opt("dpx:XScannedSize", h.x_scanned_size());
    a.set_opt("dpx:YScannedSize", h.y_scanned_size());
    a.set_opt("dpx:FramePosition", h.frame_position());
    a.set_opt("dpx:SequenceLength", h.sequence_length());
    a.set_opt("dpx:HeldCount", h.held_count());
    a.set_opt("dpx:FrameRate", h.frame_rate());
    a.set_opt("dpx:ShutterAngle", h.shutter_angle());
    a.set_opt("dpx:Version", h.version());
    a.set_opt("dpx:Format", h.format());
    a.set_opt("dpx:FrameId", h.frame_id());
    a.set_opt("dpx:SlateInfo", h.slate_info());
    a.set_opt("dpx:SourceImageFileName", h.source_file_name());
    a.set_opt("dpx:InputDevice", h.input_device());
    a.set_opt("dpx:InputDeviceSerialNumber", h.input_device_serial());
    a.set_opt("dpx:Interlace", h.interlace().map(i32::from));
    a.set_opt("dpx:FieldNumber", h.field_number().map(i32::from));
    a.set_opt("dpx:HorizontalSampleRate", h.horizontal_sample_rate());
    a.set_opt("dpx:VerticalSampleRate", h.vertical_sample_rate());
    a.set_opt("dpx:TemporalFrameRate", h.temporal_frame_rate());
    a.set_opt("dpx:TimeOffset", h.time_offset());
    a.set_opt("dpx:BlackLevel", h.black_level());
    a.set_opt("dpx:BlackGain", h.black_gain());
    a.set_opt("dpx:BreakPoint", h.break_point());
    a.set_opt("dpx:WhiteLevel", h.white_level());
    a.set_opt("dpx:IntegrationTimes", h.integration_times());
    if let Some(r) = raw {
        a.set_opt("dpx:Packing", tables::packing_name(r.packing));
    }

    // Film
    let (mfg, film_type, perfs, prefix, count) = h.keycode_fields();
    if !matches!(mfg.first(), None | Some(&0) | Some(&0xFF)) {
        let format = h.format().unwrap_or_default();
        let kc = KeyCode::from_fields(mfg, film_type, perfs, prefix, count, &format);
        let list: Vec<AttrValue> = kc.to_array().into_iter().map(AttrValue::Int).collect();
        a.set("smpte:KeyCode", list);
    }
    a.set_opt("dpx:FilmEdgeCode", tables::film_edge_code([mfg, film_type, perfs, prefix, count]));

    // Television
    if let Some(tc) = h.time_code() {
        let user_bits = h.user_bits().unwrap_or(UNSET_U32);
        a.set("smpte:TimeCode", vec![AttrValue::UInt(tc), AttrValue::UInt(user_bits)]);
        a.set("dpx:TimeCode", TimeCode::from_bcd(tc).to_string());
    }
    a.set_opt("dpx:UserBits", h.user_bits());
    a.set_opt("dpx:SourceDateTime", h.source_time().map(|t| tables::format_datetime(&t)));
    a.set_opt("dpx:Signal", tables::video_signal_name(h.video_signal()));

    if let Some(data) = user_data.filter(|d| !d.is_empty()) {
        a.set("dpx:UserData", data.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementTable;

    /// Blank big-endian header with one element, sentinels in the usual places.
    fn header_bytes(descriptor: u8, bits: u8) -> Vec<u8> {
        let mut buf = vec![0u8; 2048];
        buf[..4].copy_from_slice(b"SDPX");
        buf[770..772].copy_from_slice(&1u16.to_be_bytes());
        buf[772..776].copy_from_slice(&8u32.to_be_bytes());
        buf[776..780].copy_from_slice(&4u32.to_be_bytes());
        buf[800] = descriptor;
        buf[801] = 2;
        buf[802] = 2;
        buf[803] = bits;
        for off in [1408, 1412, 1424, 1428, 1712, 1716, 1720, 1920, 1924] {
            buf[off..off + 4].copy_from_slice(&UNSET_U32.to_be_bytes());
        }
        for off in [1724, 1728, 1948] {
            buf[off..off + 4].copy_from_slice(&f32::NAN.to_be_bytes());
        }
        buf[1928] = 0xFF;
        buf[1929] = 0xFF;
        buf[1930] = 0xFF;
        buf
    }

    fn spec_for(buf: &[u8], mode: ColorMode) -> ImageSpec {
        let header = DpxHeader::parse(buf).unwrap();
        let table = ElementTable::from_header(&header);
        build_spec(&header, table.element(0).unwrap(), table.len(), mode, None).unwrap()
    }

    #[test]
    fn rgb_spec() {
        let spec = spec_for(&header_bytes(51, 16), ColorMode::Rgb);
        assert_eq!((spec.width, spec.height, spec.channels), (8, 4, 4));
        assert_eq!(spec.format, SampleType::U16);
        assert_eq!(spec.channel_names, ["R", "G", "B", "A"]);
        assert_eq!(spec.alpha_channel, Some(3));
        assert_eq!(spec.bytes_per_row(), 8 * 4 * 2);
        assert_eq!((spec.x, spec.y, spec.full_width, spec.full_height), (0, 0, 8, 4));
        assert_eq!(spec.attrs.get_i32("oiio:BitsPerSample"), Some(16));
        assert_eq!(spec.attrs.get_str("oiio:ColorSpace"), Some("Linear"));
        assert_eq!(spec.attrs.get_str("dpx:ImageDescriptor"), Some("RGBA"));
        assert_eq!(spec.attrs.get_str("dpx:Packing"), Some("Packed"));
    }

    #[test]
    fn ycbcr_names_depend_on_mode() {
        let buf = header_bytes(101, 10);
        let raw = spec_for(&buf, ColorMode::Raw);
        assert_eq!(raw.channel_names, ["CbCr", "Y", "A"]);
        assert_eq!(raw.alpha_channel, Some(2));
        let rgb = spec_for(&buf, ColorMode::Rgb);
        assert_eq!(rgb.channel_names, ["R", "G", "B", "A"]);
        assert_eq!(rgb.channels, 4);
    }

    #[test]
    fn single_channel_names() {
        let depth = spec_for(&header_bytes(8, 32), ColorMode::Raw);
        assert_eq!(depth.channel_names, ["Z"]);
        assert_eq!(depth.z_channel, Some(0));
        let user = spec_for(&header_bytes(152, 8), ColorMode::Rgb);
        assert_eq!(user.channel_names, ["channel0", "channel1", "channel2", "channel3"]);
    }

    #[test]
    fn sentinels_produce_no_attributes() {
        let spec = spec_for(&header_bytes(50, 10), ColorMode::Rgb);
        for key in [
            "dpx:FrameRate",
            "dpx:ShutterAngle",
            "dpx:FramePosition",
            "dpx:Interlace",
            "dpx:FieldNumber",
            "smpte:TimeCode",
            "dpx:UserBits",
            "dpx:Signal",
            "smpte:KeyCode",
            "Copyright",
            "DateTime",
            "dpx:UserData",
        ] {
            assert!(!spec.attrs.contains(key), "{} should be absent", key);
        }
        assert_eq!(spec.attrs.get_f32("PixelAspectRatio"), Some(1.0));
    }

    #[test]
    fn window_from_offsets_and_original_size() {
        let mut buf = header_bytes(50, 8);
        buf[1408..1412].copy_from_slice(&10u32.to_be_bytes());
        buf[1412..1416].copy_from_slice(&0x8000_0000u32.to_be_bytes());
        buf[1424..1428].copy_from_slice(&2048u32.to_be_bytes());
        let spec = spec_for(&buf, ColorMode::Rgb);
        assert_eq!((spec.x, spec.y), (10, 0));
        assert_eq!((spec.full_width, spec.full_height), (2048, 4));
    }

    #[test]
    fn user_defined_gamma_colorspace() {
        assert_eq!(colorspace(0, Some(2.2)).as_deref(), Some("Gamma2.2Rec709"));
        assert_eq!(colorspace(0, Some(0.0)), None);
        assert_eq!(colorspace(0, None), None);
        assert_eq!(colorspace(3, None).as_deref(), Some("KodakLog"));
        assert_eq!(colorspace(1, Some(2.2)), None);
    }
}
