//! Synthetic DPX files for integration tests.
//!
//! The header starts out filled with the "unset" sentinels (all bytes 0xFF),
//! like a writer that only fills in what it knows.

#![allow(dead_code)]

use vfx_dpx::Endian;

pub const HEADER: usize = 2048;

/// One image element to be written.
#[derive(Clone)]
pub struct Element {
    pub descriptor: u8,
    pub bits: u8,
    pub packing: u16,
    pub encoding: u16,
    pub signed: bool,
    pub transfer: u8,
    pub colorimetric: u8,
    /// Explicit data offset; `None` writes the "unset" sentinel.
    pub offset: Option<u32>,
    pub eol_padding: u32,
    pub eoi_padding: u32,
    /// Stored pixel bytes, padding included.
    pub data: Vec<u8>,
}

impl Element {
    pub fn new(descriptor: u8, bits: u8, data: Vec<u8>) -> Self {
        Self {
            descriptor,
            bits,
            packing: 0,
            encoding: 0,
            signed: false,
            transfer: 2,
            colorimetric: 2,
            offset: None,
            eol_padding: 0,
            eoi_padding: 0,
            data,
        }
    }

    pub fn packing(mut self, packing: u16) -> Self {
        self.packing = packing;
        self
    }

    pub fn encoding(mut self, encoding: u16) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn colorimetric(mut self, code: u8) -> Self {
        self.colorimetric = code;
        self
    }

    pub fn transfer(mut self, code: u8) -> Self {
        self.transfer = code;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn padding(mut self, eol: u32, eoi: u32) -> Self {
        self.eol_padding = eol;
        self.eoi_padding = eoi;
        self
    }
}

/// Builder for a complete DPX file in memory.
pub struct DpxBuilder {
    endian: Endian,
    width: u32,
    height: u32,
    header: Vec<u8>,
    user_data: Vec<u8>,
    elements: Vec<Element>,
}

impl DpxBuilder {
    pub fn new(endian: Endian, width: u32, height: u32) -> Self {
        Self {
            endian,
            width,
            height,
            header: vec![0xFF; HEADER],
            user_data: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn user_data(mut self, data: &[u8]) -> Self {
        self.user_data = data.to_vec();
        self
    }

    pub fn u32_at(mut self, offset: usize, v: u32) -> Self {
        let b = self.u32_bytes(v);
        self.header[offset..offset + 4].copy_from_slice(&b);
        self
    }

    pub fn f32_at(self, offset: usize, v: f32) -> Self {
        self.u32_at(offset, v.to_bits())
    }

    pub fn u8_at(mut self, offset: usize, v: u8) -> Self {
        self.header[offset] = v;
        self
    }

    /// Writes a fixed-width string field, NUL-filling the rest.
    pub fn str_at(mut self, offset: usize, width: usize, s: &str) -> Self {
        let field = &mut self.header[offset..offset + width];
        field.fill(0);
        field[..s.len()].copy_from_slice(s.as_bytes());
        self
    }

    fn u16_bytes(&self, v: u16) -> [u8; 2] {
        match self.endian {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        }
    }

    fn u32_bytes(&self, v: u32) -> [u8; 4] {
        match self.endian {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        }
    }

    pub fn build(self) -> Vec<u8> {
        let mut h = self.header.clone();
        let put32 = |h: &mut Vec<u8>, off: usize, v: u32| {
            h[off..off + 4].copy_from_slice(&self.u32_bytes(v))
        };
        let put16 = |h: &mut Vec<u8>, off: usize, v: u16| {
            h[off..off + 2].copy_from_slice(&self.u16_bytes(v))
        };

        let image_offset = (HEADER + self.user_data.len()) as u32;
        put32(&mut h, 0, 0x5344_5058);
        put32(&mut h, 4, image_offset);
        h[8..16].copy_from_slice(b"V2.0\0\0\0\0");
        put32(&mut h, 32, self.user_data.len() as u32);
        put16(&mut h, 768, 0);
        put16(&mut h, 770, self.elements.len() as u16);
        put32(&mut h, 772, self.width);
        put32(&mut h, 776, self.height);

        for (i, el) in self.elements.iter().enumerate() {
            let base = 780 + i * 72;
            put32(&mut h, base, el.signed as u32);
            h[base + 20] = el.descriptor;
            h[base + 21] = el.transfer;
            h[base + 22] = el.colorimetric;
            h[base + 23] = el.bits;
            put16(&mut h, base + 24, el.packing);
            put16(&mut h, base + 26, el.encoding);
            put32(&mut h, base + 28, el.offset.unwrap_or(u32::MAX));
            put32(&mut h, base + 32, el.eol_padding);
            put32(&mut h, base + 36, el.eoi_padding);
            h[base + 40..base + 72].fill(0);
        }

        let mut file = h;
        file.extend_from_slice(&self.user_data);
        for el in &self.elements {
            if let Some(off) = el.offset {
                file.resize((off as usize).max(file.len()), 0);
            }
            file.extend_from_slice(&el.data);
        }
        file
    }
}

/// Samples as stored 16-bit words in `endian`.
pub fn words(endian: Endian, samples: &[u16]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&v| match endian {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        })
        .collect()
}

/// Samples as stored 32-bit words in `endian`.
pub fn dwords(endian: Endian, samples: &[u32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&v| match endian {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        })
        .collect()
}
