//! Attribute value types for DPX metadata.
//!
//! [`AttrValue`] represents any metadata value the decoder emits: strings
//! for names and dates, integers for codes and counts, floats for header
//! measurements, byte blobs for user data and lists for composite values
//! such as the SMPTE keycode and timecode.
//!
//! # Example
//!
//! ```rust
//! use vfx_dpx::attrs::AttrValue;
//!
//! let rate = AttrValue::Float(24.0);
//! let keycode = AttrValue::List(vec![AttrValue::Int(12), AttrValue::Int(4)]);
//!
//! assert_eq!(rate.as_f64(), Some(24.0));
//! assert_eq!(keycode.to_string(), "[12, 4]");
//! ```

use std::fmt;

/// Typed metadata value.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum AttrValue {
    /// Boolean value.
    Bool(bool),

    /// UTF-8 string value.
    ///
    /// Used for: Software, Copyright, dpx:Transfer, dpx:TimeCode, etc.
    Str(String),

    /// Signed 32-bit integer.
    ///
    /// Used for: Orientation, dpx:Interlace, keycode components.
    Int(i32),

    /// Unsigned 32-bit integer.
    ///
    /// Used for: dpx:LowData, dpx:FramePosition, dpx:UserBits.
    UInt(u32),

    /// 32-bit floating point.
    ///
    /// Used for: dpx:FrameRate, PixelAspectRatio, dpx:BlackLevel.
    Float(f32),

    /// 64-bit floating point.
    Double(f64),

    /// Binary data.
    ///
    /// Used for: dpx:UserData.
    Bytes(Vec<u8>),

    /// Ordered list of values.
    ///
    /// Used for: smpte:KeyCode (7 ints), smpte:TimeCode (2 uints).
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Returns the type name as a static string.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Str(_) => "string",
            AttrValue::Int(_) => "int",
            AttrValue::UInt(_) => "uint",
            AttrValue::Float(_) => "float",
            AttrValue::Double(_) => "double",
            AttrValue::Bytes(_) => "bytes",
            AttrValue::List(_) => "list",
        }
    }

    /// Tries to get as string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Tries to get as i32.
    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as u32.
    #[inline]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AttrValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as f32.
    #[inline]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as f64, converting from any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v as f64),
            AttrValue::Double(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Tries to get as bool.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            AttrValue::Int(v) => Some(*v != 0),
            AttrValue::UInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Tries to get as byte slice.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttrValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Tries to get as list slice.
    #[inline]
    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{}", v),
            AttrValue::Str(v) => write!(f, "{}", v),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::UInt(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Double(v) => write!(f, "{}", v),
            AttrValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            AttrValue::List(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// === From implementations for convenience ===

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::UInt(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<Vec<u8>> for AttrValue {
    fn from(v: Vec<u8>) -> Self {
        AttrValue::Bytes(v)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(v: Vec<AttrValue>) -> Self {
        AttrValue::List(v)
    }
}
