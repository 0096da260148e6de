//! Typed attribute storage for DPX metadata.
//!
//! The decoder fills an [`Attrs`] map per subimage. The same type carries
//! reader configuration (see [`DpxReaderOptions::from_attrs`]).
//!
//! # Example
//!
//! ```rust
//! use vfx_dpx::attrs::{Attrs, AttrValue};
//!
//! let mut attrs = Attrs::new();
//! attrs.set("dpx:FrameRate", AttrValue::Float(24.0));
//! attrs.set("Software", "vfx-dpx");
//!
//! assert_eq!(attrs.get_f32("dpx:FrameRate"), Some(24.0));
//! assert_eq!(attrs.get_str("Software"), Some("vfx-dpx"));
//! ```
//!
//! [`DpxReaderOptions::from_attrs`]: crate::DpxReaderOptions::from_attrs

mod value;

pub use value::AttrValue;

use std::collections::HashMap;

/// Attribute container: string key -> typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    map: HashMap<String, AttrValue>,
}

impl Attrs {
    /// Creates an empty attribute container.
    #[inline]
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Sets an attribute value, replacing any previous one.
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.map.insert(key.into(), value.into());
    }

    /// Sets an attribute only when `value` is `Some`.
    ///
    /// Used for header fields whose unset sentinel maps to `None`.
    #[inline]
    pub fn set_opt<V: Into<AttrValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.set(key, v);
        }
    }

    /// Gets an attribute value by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.map.get(key)
    }

    /// Removes an attribute by key.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.map.remove(key)
    }

    /// Checks if an attribute exists.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no attributes are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over all (key, value) pairs. Order is not guaranteed.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.map.iter()
    }

    /// Returns all pairs sorted by key.
    pub fn sorted(&self) -> Vec<(&String, &AttrValue)> {
        let mut items: Vec<_> = self.map.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
    }

    // === Typed getters ===

    /// Gets a string attribute.
    #[inline]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i32 attribute.
    #[inline]
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.as_i32())
    }

    /// Gets a u32 attribute.
    #[inline]
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.as_u32())
    }

    /// Gets an f32 attribute.
    #[inline]
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.as_f32())
    }

    /// Gets a bool attribute (non-zero integers count as true).
    #[inline]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// Gets a byte blob attribute.
    #[inline]
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        self.get(key).and_then(|v| v.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut attrs = Attrs::new();
        attrs.set("Software", AttrValue::Str("vfx-dpx".to_string()));
        attrs.set("dpx:HeldCount", 2u32);

        assert_eq!(attrs.get_str("Software"), Some("vfx-dpx"));
        assert_eq!(attrs.get_u32("dpx:HeldCount"), Some(2));
        assert_eq!(attrs.len(), 2);
        assert!(attrs.remove("Software").is_some());
        assert!(!attrs.contains("Software"));
    }

    #[test]
    fn test_set_opt_skips_none() {
        let mut attrs = Attrs::new();
        attrs.set_opt("dpx:FrameRate", Some(24.0f32));
        attrs.set_opt::<f32>("dpx:ShutterAngle", None);
        assert!(attrs.contains("dpx:FrameRate"));
        assert!(!attrs.contains("dpx:ShutterAngle"));
    }

    #[test]
    fn test_sorted_and_bool() {
        let mut attrs = Attrs::new();
        attrs.set("b", 1i32);
        attrs.set("a", true);
        let keys: Vec<_> = attrs.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(attrs.get_bool("b"), Some(true));
    }
}
