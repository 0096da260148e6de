//! Code-to-name tables for DPX header enumerations.
//!
//! Every table is a static ordered list of `(code, value)` pairs searched by
//! [`lookup`]; the first match wins, otherwise the default is returned.

/// Returns the value paired with `key`, or `default` when absent.
pub fn lookup<K: PartialEq, V: Copy>(key: K, table: &[(K, V)], default: V) -> V {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(default, |(_, v)| *v)
}

// === Orientation ===

/// DPX orientation code -> EXIF-style orientation (1..8).
pub const ORIENTATION: &[(u16, i32)] = &[
    (0, 1), // left to right, top to bottom
    (1, 2), // right to left, top to bottom
    (2, 4), // left to right, bottom to top
    (3, 3), // right to left, bottom to top
    (4, 5), // top to bottom, left to right
    (5, 6), // top to bottom, right to left
    (6, 8), // bottom to top, left to right
    (7, 7), // bottom to top, right to left
];

/// EXIF orientation for a DPX orientation code (1 when unknown).
pub fn orientation(code: u16) -> i32 {
    lookup(code, ORIENTATION, 1)
}

// === Transfer / colorimetric characteristic ===

/// User defined characteristic.
pub const CHAR_USER_DEFINED: u8 = 0;
/// Linear.
pub const CHAR_LINEAR: u8 = 2;
/// Logarithmic.
pub const CHAR_LOGARITHMIC: u8 = 3;
/// SMPTE 274M.
pub const CHAR_SMPTE_274M: u8 = 5;
/// ITU-R 709-4.
pub const CHAR_ITU_R709: u8 = 6;

/// Characteristic code -> name.
pub const CHARACTERISTIC: &[(u8, &str)] = &[
    (0, "User defined"),
    (1, "Printing density"),
    (2, "Linear"),
    (3, "Logarithmic"),
    (4, "Unspecified video"),
    (5, "SMPTE 274M"),
    (6, "ITU-R 709-4"),
    (7, "ITU-R 601-5 system B or G"),
    (8, "ITU-R 601-5 system M"),
    (9, "NTSC composite video"),
    (10, "PAL composite video"),
    (11, "Z depth linear"),
    (12, "Z depth homogeneous"),
    (13, "ADX"),
    (255, "Undefined"),
];

/// Human-readable transfer/colorimetric characteristic.
pub fn characteristic_name(code: u8) -> &'static str {
    lookup(code, CHARACTERISTIC, "Undefined")
}

// === Descriptor ===

/// Descriptor code -> name.
pub const DESCRIPTOR: &[(u8, &str)] = &[
    (0, "User defined"),
    (150, "User defined"),
    (151, "User defined"),
    (152, "User defined"),
    (153, "User defined"),
    (154, "User defined"),
    (155, "User defined"),
    (156, "User defined"),
    (1, "Red"),
    (2, "Green"),
    (3, "Blue"),
    (4, "Alpha"),
    (6, "Luma"),
    (7, "Color difference"),
    (8, "Depth"),
    (9, "Composite video"),
    (50, "RGB"),
    (51, "RGBA"),
    (52, "ABGR"),
    (100, "CbYCrY"),
    (101, "CbYACrYA"),
    (102, "CbYCr"),
    (103, "CbYCrA"),
];

/// Human-readable descriptor name.
pub fn descriptor_name(code: u8) -> &'static str {
    lookup(code, DESCRIPTOR, "Undefined")
}

// === Video signal ===

/// Video signal code -> name. `None` means the attribute is not emitted.
pub const VIDEO_SIGNAL: &[(u8, Option<&str>)] = &[
    (0, Some("Undefined")),
    (1, Some("NTSC")),
    (2, Some("PAL")),
    (3, Some("PAL-M")),
    (4, Some("SECAM")),
    (50, Some("YCbCr ITU-R 601-5 525i, 4:3")),
    (51, Some("YCbCr ITU-R 601-5 625i, 4:3")),
    (100, Some("YCbCr ITU-R 601-5 525i, 16:9")),
    (101, Some("YCbCr ITU-R 601-5 625i, 16:9")),
    (150, Some("YCbCr 1050i, 16:9")),
    (151, Some("YCbCr 1125i, 16:9 (SMPTE 274M)")),
    (152, Some("YCbCr 1250i, 16:9")),
    (153, Some("YCbCr 1125i, 16:9 (SMPTE 240M)")),
    (200, Some("YCbCr 525p, 16:9")),
    (201, Some("YCbCr 625p, 16:9")),
    (202, Some("YCbCr 750p, 16:9 (SMPTE 296M)")),
    (203, Some("YCbCr 1125p, 16:9 (SMPTE 274M)")),
    (255, None),
];

/// Video signal name, or `None` when the attribute should be suppressed.
pub fn video_signal_name(code: u8) -> Option<&'static str> {
    lookup(code, VIDEO_SIGNAL, Some("Undefined"))
}

// === Packing ===

/// Packing code -> name. Unknown codes produce no attribute.
pub const PACKING: &[(u16, Option<&str>)] = &[
    (0, Some("Packed")),
    (1, Some("Filled, method A")),
    (2, Some("Filled, method B")),
];

/// Packing name, if the code is known.
pub fn packing_name(code: u16) -> Option<&'static str> {
    lookup(code, PACKING, None)
}

// === Keycode ===

/// Film keycode decomposed into its numeric parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCode {
    /// Film manufacturer code.
    pub manufacturer: i32,
    /// Film type.
    pub film_type: i32,
    /// Prefix.
    pub prefix: i32,
    /// Count.
    pub count: i32,
    /// Perforation offset.
    pub perf_offset: i32,
    /// Perforations per frame.
    pub perfs_per_frame: i32,
    /// Perforations per count.
    pub perfs_per_count: i32,
}

impl KeyCode {
    /// Decomposes the five fixed-width keycode fields plus the format name.
    pub fn from_fields(
        manufacturer: &[u8],
        film_type: &[u8],
        perf_offset: &[u8],
        prefix: &[u8],
        count: &[u8],
        format: &str,
    ) -> Self {
        let (perfs_per_frame, perfs_per_count) = perfs_for_format(format);
        Self {
            manufacturer: parse_int(manufacturer),
            film_type: parse_int(film_type),
            prefix: parse_int(prefix),
            count: parse_int(count),
            perf_offset: parse_int(perf_offset),
            perfs_per_frame,
            perfs_per_count,
        }
    }

    /// The seven values in SMPTE keycode attribute order.
    pub fn to_array(&self) -> [i32; 7] {
        [
            self.manufacturer,
            self.film_type,
            self.prefix,
            self.count,
            self.perf_offset,
            self.perfs_per_frame,
            self.perfs_per_count,
        ]
    }
}

/// Perforations per frame and per count for a film format name.
///
/// Defaults to 4 perfs/frame and 64 perfs/count.
pub fn perfs_for_format(format: &str) -> (i32, i32) {
    if format == "8kimax" {
        return (15, 120);
    }
    let starts = |a: &str, b: &str| format.starts_with(a) || format.starts_with(b);
    let per_frame = if starts("2kvv", "4kvv") || format == "VistaVision" {
        8
    } else if starts("2k3perf", "4k3perf") || format == "3perf" {
        3
    } else {
        // 2k35*, 4k35*, "Full Aperture", "Academy" and anything unknown
        4
    };
    (per_frame, 64)
}

/// Parses a leading decimal integer from a fixed-width ASCII field.
///
/// Leading whitespace and a sign are accepted; parsing stops at the first
/// non-digit. Returns 0 when there are no digits.
pub fn parse_int(field: &[u8]) -> i32 {
    let mut iter = field.iter().copied().skip_while(|b| b.is_ascii_whitespace()).peekable();
    let negative = match iter.peek() {
        Some(&b'-') => {
            iter.next();
            true
        }
        Some(&b'+') => {
            iter.next();
            false
        }
        _ => false,
    };
    let mut value: i32 = 0;
    for b in iter.take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i32);
    }
    if negative { -value } else { value }
}

/// Film edge code: the five keycode fields concatenated at their full
/// widths (2 + 2 + 2 + 6 + 4 = 16 bytes), read as a NUL-terminated string.
///
/// Fields are not trimmed individually, so a NUL inside any field ends the
/// code there. `None` when the first byte is NUL or the `0xFF` sentinel.
pub fn film_edge_code(fields: [&[u8]; 5]) -> Option<String> {
    let raw: Vec<u8> = fields.iter().flat_map(|f| f.iter().copied()).collect();
    if matches!(raw.first(), None | Some(&0) | Some(&0xFF)) {
        return None;
    }
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Some(String::from_utf8_lossy(&raw[..end]).into_owned())
}

// === Timecode ===

/// SMPTE 12M time code, unpacked from its BCD word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCode {
    /// Hours.
    pub hours: u8,
    /// Minutes.
    pub minutes: u8,
    /// Seconds.
    pub seconds: u8,
    /// Frame.
    pub frame: u8,
    /// Drop-frame flag.
    pub drop_frame: bool,
}

impl TimeCode {
    /// Unpacks the BCD time code word (TV60 packing).
    pub fn from_bcd(word: u32) -> Self {
        let bcd = |v: u32, mask: u32| -> u8 {
            let v = v & mask;
            ((v >> 4) * 10 + (v & 0xF)) as u8
        };
        Self {
            frame: bcd(word, 0x3F),
            drop_frame: word & (1 << 6) != 0,
            seconds: bcd(word >> 8, 0x7F),
            minutes: bcd(word >> 16, 0x7F),
            hours: bcd(word >> 24, 0x3F),
        }
    }
}

impl std::fmt::Display for TimeCode {
    /// `HH:MM:SS:FF`, or `HH:MM:SS;FF` for drop-frame.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours,
            self.minutes,
            self.seconds,
            if self.drop_frame { ';' } else { ':' },
            self.frame
        )
    }
}

/// Formats a DPX date/time (`YYYY:MM:DD:HH:MM:SS...`) as `YYYY:MM:DD HH:MM:SS`.
pub fn format_datetime(raw: &str) -> String {
    let mut out: String = raw.chars().take(19).collect();
    if out.len() > 10 && out.is_char_boundary(10) && out.is_char_boundary(11) {
        out.replace_range(10..11, " ");
    }
    out
}
