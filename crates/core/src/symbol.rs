//! Alphabet units the Huffman engine operates on.
//!
//! Bytes cover binary data and raw audio frames; `char` covers text, so a
//! text stream is tallied per character rather than per UTF-8 byte.

use crate::error::{Error, Result};
use std::fmt::Debug;
use std::hash::Hash;

/// One unit of a bounded alphabet with a fixed-width serialized form.
pub trait Symbol: Copy + Ord + Hash + Debug {
    /// Serialized width in bytes.
    const WIDTH: usize;

    /// Append the serialized form to `out`.
    fn write_to(&self, out: &mut Vec<u8>);

    /// Parse from exactly `WIDTH` bytes.
    fn read_from(bytes: &[u8]) -> Result<Self>;
}

impl Symbol for u8 {
    const WIDTH: usize = 1;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }

    fn read_from(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [b] => Ok(*b),
            _ => Err(Error::invalid(format!("byte symbol needs 1 byte, got {}", bytes.len()))),
        }
    }
}

impl Symbol for char {
    const WIDTH: usize = 4;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::from(*self).to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 4] = bytes
            .try_into()
            .map_err(|_| Error::invalid(format!("char symbol needs 4 bytes, got {}", bytes.len())))?;
        let scalar = u32::from_le_bytes(raw);
        char::from_u32(scalar)
            .ok_or_else(|| Error::invalid(format!("{scalar:#x} is not a unicode scalar value")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_rejects_surrogate() {
        let bytes = 0xD800u32.to_le_bytes();
        assert!(matches!(char::read_from(&bytes), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_char_wire_form() {
        let mut out = Vec::new();
        'ñ'.write_to(&mut out);
        assert_eq!(out, vec![0xF1, 0, 0, 0]);
        assert_eq!(char::read_from(&out).unwrap(), 'ñ');
    }

    #[test]
    fn test_wrong_width() {
        assert!(u8::read_from(&[1, 2]).is_err());
        assert!(char::read_from(&[1]).is_err());
    }
}
