//! Bit packing of codeword streams into byte-aligned payloads.
//!
//! `BitWriter` and `BitReader` move bits MSB-first in and out of a byte
//! buffer. `pack` and `unpack` build on them to produce a `PackedPayload`:
//!
//! ```text
//! +-----------+-----------------------------------+
//! | pad (1)   | codeword bits, MSB-first, 8/byte  |
//! +-----------+-----------------------------------+
//! ```
//!
//! `pad` (0-7) counts the zero bits appended after the last codeword to
//! reach a byte boundary. An empty stream packs to the single byte `0x00`.
//!
//! # Example
//! ```
//! use huffpress_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! let (bytes, pad) = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//! assert_eq!(pad, 3);
//!
//! let mut reader = BitReader::new(&bytes, 5);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! ```

use crate::codebook::{CodeTable, Codeword};
use crate::error::{BitIoError, Error, HuffmanError, Result};
use crate::symbol::Symbol;

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start writing after `prefix`, which is kept verbatim.
    pub fn with_prefix(prefix: Vec<u8>) -> Self {
        Self {
            bytes: prefix,
            ..Self::default()
        }
    }

    /// Write the low `count` bits of `value`, highest first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            let free = 8 - self.bit_count as usize;
            let take = remaining.min(free);
            let shift = remaining - take;
            let bits = ((value >> shift) & ((1 << take) - 1)) as u8;

            self.bit_buffer |= bits << (free - take);
            self.bit_count += take as u8;
            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }
            remaining = shift;
        }

        Ok(())
    }

    pub fn write_codeword(&mut self, code: Codeword) -> Result<()> {
        self.write_bits(code.bits(), code.len() as usize)
    }

    /// Flush the partial byte, zero-padded, and return the buffer together
    /// with the number of padding bits added (0-7).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let pad = (8 - self.bit_count) % 8;
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        (self.bytes, pad)
    }

    /// Total number of bits written, excluding any prefix.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

/// Reads the first `bit_len` bits of a byte buffer MSB-first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_len: usize,
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// `bit_len` is clamped to the bits actually present in `data`.
    pub fn new(data: &'a [u8], bit_len: usize) -> Self {
        Self {
            data,
            bit_len: bit_len.min(data.len() * 8),
            bit_position: 0,
        }
    }

    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if fewer than `count` bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        for _ in 0..count {
            result = (result << 1) | self.next_bit() as u64;
        }
        Ok(result)
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.is_empty() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        Ok(self.next_bit())
    }

    fn next_bit(&mut self) -> bool {
        let byte = self.data[self.bit_position / 8];
        let bit = (byte >> (7 - self.bit_position % 8)) & 1 == 1;
        self.bit_position += 1;
        bit
    }

    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    pub fn position(&self) -> usize {
        self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

/// A pad-length header byte followed by packed codeword bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPayload {
    bytes: Vec<u8>,
}

impl PackedPayload {
    /// Wrap raw bytes read from an artifact; validated by `unpack`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total length including the header byte.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The header value, if present.
    pub fn pad_bits(&self) -> Option<u8> {
        self.bytes.first().copied()
    }
}

/// Concatenate each symbol's codeword and pack behind a pad header.
///
/// # Errors
/// `HuffmanError::UnknownSymbol` if a symbol has no codeword.
pub fn pack<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<PackedPayload> {
    let mut writer = BitWriter::with_prefix(vec![0]);
    for symbol in symbols {
        let code = table.codeword(symbol).ok_or_else(|| HuffmanError::UnknownSymbol {
            symbol: format!("{symbol:?}"),
        })?;
        writer.write_codeword(code)?;
    }

    let (mut bytes, pad) = writer.finish();
    bytes[0] = pad;
    log::debug!("packed {} symbols into {} bytes (pad {})", symbols.len(), bytes.len(), pad);
    Ok(PackedPayload { bytes })
}

/// Strip the pad header and decode codewords back into symbols.
///
/// # Errors
/// `Error::CorruptStream` if the header is missing or out of range, or the
/// bits end on an incomplete codeword.
pub fn unpack<S: Symbol>(payload: &PackedPayload, table: &CodeTable<S>) -> Result<Vec<S>> {
    let (&pad, body) = payload
        .bytes
        .split_first()
        .ok_or_else(|| Error::corrupt("payload is missing its pad header"))?;
    if pad > 7 {
        return Err(Error::corrupt(format!("pad length {pad} out of range 0-7")));
    }
    let total_bits = body.len() * 8;
    if (pad as usize) > total_bits {
        return Err(Error::corrupt(format!("pad length {pad} exceeds {total_bits} payload bits")));
    }

    let max_len = table.max_len();
    let mut reader = BitReader::new(body, total_bits - pad as usize);
    let mut symbols = Vec::new();
    let mut current = Codeword::EMPTY;

    while !reader.is_empty() {
        current = current.push(reader.read_bit()?)?;
        if let Some(symbol) = table.symbol(&current) {
            symbols.push(symbol);
            current = Codeword::EMPTY;
        } else if current.len() >= max_len {
            return Err(Error::corrupt(format!(
                "no codeword matches {current} at bit {}",
                reader.position()
            )));
        }
    }

    if !current.is_empty() {
        return Err(Error::corrupt(format!(
            "stream ends inside a codeword ({} dangling bits)",
            current.len()
        )));
    }

    Ok(symbols)
}
