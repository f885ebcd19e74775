//! The persisted Huffman artifact and its binary schema.
//!
//! A container packages everything the decoder needs: the code table as
//! stored (never re-derived), the packed payload, and modality metadata.
//!
//! # Format (version 1, little-endian)
//!
//! ```text
//! +--------------------+
//! | Magic (4 bytes)    |  "HPAK"
//! +--------------------+
//! | version (1)        |  1
//! | kind (1)           |  0 = bytes, 1 = text, 2 = audio
//! | symbol_width (1)   |  serialized symbol size (1 = byte, 4 = char)
//! | symbol_count (8)   |  u64 number of encoded symbols
//! +--------------------+
//! | audio format (12)  |  only when kind = audio
//! +--------------------+
//! | entry_count (4)    |  u32
//! | entries            |  symbol, code_len (u8), ceil(code_len/8) code bytes
//! +--------------------+
//! | payload_len (4)    |  u32
//! | payload            |  pad header + packed codeword bits
//! +--------------------+
//! | crc32 (4)          |  over every byte between magic and crc
//! +--------------------+
//! ```

use crate::audio::{AudioFormat, FORMAT_SIZE};
use crate::bitio::{BitReader, BitWriter, PackedPayload};
use crate::codebook::{CodeTable, Codeword};
use crate::error::{ContainerError, Error, Result};
use crate::symbol::Symbol;

/// Magic number for Huffman containers: "HPAK"
const MAGIC: [u8; 4] = *b"HPAK";

/// Current schema version
pub const VERSION: u8 = 1;

/// Smallest possible artifact: fixed fields, no entries, empty payload
const MIN_SIZE: usize = 4 + 1 + 1 + 1 + 8 + 4 + 4 + 4;

/// What a container's symbols represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Bytes,
    Text,
    Audio,
}

impl ContainerKind {
    fn tag(self) -> u8 {
        match self {
            ContainerKind::Bytes => 0,
            ContainerKind::Text => 1,
            ContainerKind::Audio => 2,
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(ContainerKind::Bytes),
            1 => Ok(ContainerKind::Text),
            2 => Ok(ContainerKind::Audio),
            other => Err(Error::invalid(format!("unknown container kind {other}"))),
        }
    }
}

/// A complete compressed artifact: code table, payload and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<S: Symbol> {
    kind: ContainerKind,
    symbol_count: u64,
    audio: Option<AudioFormat>,
    code_table: CodeTable<S>,
    payload: PackedPayload,
}

impl<S: Symbol> Container<S> {
    pub(crate) fn new(
        kind: ContainerKind,
        symbol_count: u64,
        audio: Option<AudioFormat>,
        code_table: CodeTable<S>,
        payload: PackedPayload,
    ) -> Self {
        Self {
            kind,
            symbol_count,
            audio,
            code_table,
            payload,
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Number of symbols the payload decodes to.
    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }

    pub fn audio_format(&self) -> Option<&AudioFormat> {
        self.audio.as_ref()
    }

    pub fn code_table(&self) -> &CodeTable<S> {
        &self.code_table
    }

    pub fn payload(&self) -> &PackedPayload {
        &self.payload
    }

    /// Serialize into the versioned binary schema.
    ///
    /// # Errors
    /// `Error::InvalidInput` if the table or payload exceed the u32 length
    /// fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let entries = self.code_table.entries();
        let entry_count = u32::try_from(entries.len())
            .map_err(|_| Error::invalid("code table too large to serialize"))?;
        let payload_len = u32::try_from(self.payload.len())
            .map_err(|_| Error::invalid("payload too large to serialize"))?;

        let mut out = Vec::with_capacity(MIN_SIZE + FORMAT_SIZE + entries.len() * (S::WIDTH + 2) + self.payload.len());
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.push(self.kind.tag());
        out.push(S::WIDTH as u8);
        out.extend_from_slice(&self.symbol_count.to_le_bytes());
        if let Some(format) = &self.audio {
            format.write_to(&mut out);
        }

        out.extend_from_slice(&entry_count.to_le_bytes());
        for (symbol, code) in entries {
            symbol.write_to(&mut out);
            out.push(code.len());
            let mut writer = BitWriter::new();
            writer.write_codeword(code)?;
            out.extend_from_slice(&writer.finish().0);
        }

        out.extend_from_slice(&payload_len.to_le_bytes());
        out.extend_from_slice(self.payload.as_bytes());

        let crc32 = crc32fast::hash(&out[MAGIC.len()..]);
        out.extend_from_slice(&crc32.to_le_bytes());
        Ok(out)
    }

    /// Parse an artifact produced by `to_bytes`.
    ///
    /// # Errors
    /// - `Error::EmptyInput` for zero bytes
    /// - `ContainerError` for bad magic, version, or truncation
    /// - `Error::Crc` if the checksum does not match
    /// - `Error::InvalidInput` for a symbol width or kind this type cannot hold
    /// - `HuffmanError` if the stored table is ambiguous
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let body = check_frame(bytes, MAGIC, MIN_SIZE)?;
        let mut reader = ByteReader::new(body);

        let version = reader.u8()?;
        if version != VERSION {
            return Err(ContainerError::UnsupportedVersion(version).into());
        }
        let kind = ContainerKind::from_tag(reader.u8()?)?;
        let width = reader.u8()? as usize;
        if width != S::WIDTH {
            return Err(Error::invalid(format!(
                "artifact holds {width}-byte symbols, expected {}",
                S::WIDTH
            )));
        }
        let symbol_count = reader.u64()?;

        let audio = match kind {
            ContainerKind::Audio => Some(AudioFormat::read_from(reader.array::<FORMAT_SIZE>()?)),
            _ => None,
        };

        let entry_count = reader.u32()? as usize;
        let mut entries = Vec::with_capacity(entry_count.min(body.len()));
        for _ in 0..entry_count {
            let symbol = S::read_from(reader.take(S::WIDTH)?)?;
            let len = reader.u8()?;
            let code_bytes = reader.take((len as usize).div_ceil(8))?;
            let bits = BitReader::new(code_bytes, len as usize).read_bits(len as usize)?;
            entries.push((symbol, Codeword::new(bits, len)?));
        }
        let code_table = CodeTable::from_entries(entries)?;

        let payload_len = reader.u32()? as usize;
        let payload = PackedPayload::from_bytes(reader.take(payload_len)?.to_vec());
        reader.finish()?;

        Ok(Self {
            kind,
            symbol_count,
            audio,
            code_table,
            payload,
        })
    }
}

/// Validate magic, minimum size and trailing CRC, returning the bytes
/// between magic and CRC.
pub(crate) fn check_frame(bytes: &[u8], magic: [u8; 4], min_size: usize) -> Result<&[u8]> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if bytes.len() < min_size {
        return Err(ContainerError::Truncated {
            required: min_size,
            actual: bytes.len(),
        }
        .into());
    }

    let actual: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if actual != magic {
        return Err(ContainerError::InvalidMagic {
            expected: magic,
            actual,
        }
        .into());
    }

    let (framed, crc_bytes) = bytes.split_at(bytes.len() - 4);
    let expected = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    let body = &framed[4..];
    let actual = crc32fast::hash(body);
    if actual != expected {
        return Err(Error::Crc { expected, actual });
    }

    Ok(body)
}

/// Little-endian field reader over a checked frame body.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len()).ok_or(
            ContainerError::Truncated {
                required: self.pos.saturating_add(n),
                actual: self.data.len(),
            },
        )?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<&'a [u8; N]> {
        let slice = self.take(N)?;
        slice
            .try_into()
            .map_err(|_| Error::corrupt("fixed-size field length mismatch"))
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(*self.array::<4>()?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(*self.array::<8>()?))
    }

    /// Fail if any bytes were left unread.
    pub(crate) fn finish(self) -> Result<()> {
        match self.data.len() - self.pos {
            0 => Ok(()),
            extra => Err(ContainerError::TrailingBytes(extra).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    #[test]
    fn test_serialize_parse_round_trip() {
        let container = engine::compress(b"hello world! this is a test.").unwrap();
        let bytes = container.to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"HPAK");

        let parsed = Container::<u8>::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, container);
        assert_eq!(engine::decompress(&parsed).unwrap(), b"hello world! this is a test.");
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = engine::compress(b"abc").unwrap().to_bytes().unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            Container::<u8>::from_bytes(&bytes),
            Err(Error::Container(ContainerError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(Container::<u8>::from_bytes(&[]), Err(Error::EmptyInput)));
        assert!(matches!(
            Container::<u8>::from_bytes(b"HPAK\x01"),
            Err(Error::Container(ContainerError::Truncated { .. }))
        ));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = engine::compress(b"test data").unwrap().to_bytes().unwrap();
        let len = bytes.len();
        bytes[len - 5] ^= 0x01;
        assert!(matches!(Container::<u8>::from_bytes(&bytes), Err(Error::Crc { .. })));
    }

    #[test]
    fn test_symbol_width_mismatch() {
        let bytes = engine::compress_text("héllo").unwrap().to_bytes().unwrap();
        assert!(matches!(Container::<u8>::from_bytes(&bytes), Err(Error::InvalidInput(_))));
        assert!(Container::<char>::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = engine::compress(b"abc").unwrap().to_bytes().unwrap();
        bytes[4] = 9;
        let len = bytes.len();
        let crc = crc32fast::hash(&bytes[4..len - 4]);
        bytes[len - 4..].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(
            Container::<u8>::from_bytes(&bytes),
            Err(Error::Container(ContainerError::UnsupportedVersion(9)))
        ));
    }

    #[test]
    fn test_empty_container_layout() {
        let bytes = engine::compress(b"").unwrap().to_bytes().unwrap();
        // fixed fields + one pad header byte
        assert_eq!(bytes.len(), MIN_SIZE + 1);
        let parsed = Container::<u8>::from_bytes(&bytes).unwrap();
        assert!(parsed.code_table().is_empty());
        assert_eq!(parsed.payload().as_bytes(), &[0]);
    }

    #[test]
    fn test_audio_metadata_survives() {
        let format = AudioFormat {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 8,
            frame_count: 4,
        };
        let container = engine::compress_audio(&[1, 1, 2, 3], format).unwrap();
        let parsed = Container::<u8>::from_bytes(&container.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed.kind(), ContainerKind::Audio);
        assert_eq!(parsed.audio_format(), Some(&format));
    }
}
