//! Error types for the huffpress engine.
//!
//! Every operation returns a structured error instead of panicking, so a
//! caller either receives one complete artifact or nothing at all.

use thiserror::Error;

/// Top-level error type for all engine operations.
///
/// The first four variants are the failure kinds callers are expected to
/// branch on; the rest wrap lower-level failures:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: tree or code table construction
/// - Container: artifact framing (magic, version, declared lengths)
#[derive(Debug, Error)]
pub enum Error {
    /// Source cannot be parsed as the declared format (e.g. a WAV header)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Zero-length input where at least a header is required
    #[error("empty input")]
    EmptyInput,

    /// Packed bits ran out before completing a codeword
    #[error("corrupt stream: {reason}")]
    CorruptStream { reason: String },

    /// Reconstructed pixel count disagrees with width x height
    #[error("dimension mismatch: expected {expected} pixels, got {actual}")]
    DimensionMismatch { expected: u64, actual: u64 },

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman tree or code table error
    #[error("huffman error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Artifact framing error (e.g., invalid magic, truncated record)
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// CRC validation failed, indicating a damaged artifact
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Error::CorruptStream {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidInput(reason.into())
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (e.g., more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman construction errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Codeword deeper than the 64-bit codeword representation
    #[error("code length {length} exceeds maximum 64")]
    CodeLengthTooLong { length: usize },

    /// Code table entry with a zero-length codeword
    #[error("empty codeword for symbol {symbol}")]
    EmptyCodeword { symbol: String },

    /// Two entries share the same symbol or one codeword prefixes another
    #[error("code table is ambiguous: {0}")]
    AmbiguousTable(String),

    /// Symbol to encode has no codeword in the table
    #[error("symbol {symbol} not in code table")]
    UnknownSymbol { symbol: String },
}

/// Artifact framing errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Schema version this build does not understand
    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),

    /// Record ended before a declared field
    #[error("artifact truncated: need at least {required} bytes, got {actual}")]
    Truncated { required: usize, actual: usize },

    /// Bytes left over after the trailing checksum
    #[error("{0} trailing bytes after artifact")]
    TrailingBytes(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
