//! huffpress-core: lossless compression engine for bytes, text, audio and images
//!
//! Two independent algorithms:
//! - Huffman prefix coding for arbitrary symbol streams (bytes, characters,
//!   raw PCM frames)
//! - Run-length coding for raster pixels
//!
//! # Architecture
//!
//! - `frequency`: symbol tallying
//! - `huffman`: tree construction with deterministic tie-breaking
//! - `codebook`: symbol <-> codeword tables
//! - `bitio`: bit packing behind a pad-length header
//! - `container`: the persisted Huffman artifact
//! - `rle` / `image`: run-length codec, image artifact, netpbm files
//! - `audio`: audio format metadata and WAV files
//! - `engine`: the compress/decompress entry points
//! - `metrics`: per-run statistics
//!
//! All work is whole-buffer and call-scoped: no table or tree outlives the
//! call that built it.
//!
//! # Example
//! ```
//! use huffpress_core::engine;
//!
//! let container = engine::compress(b"aaaabbbcc")?;
//! let bytes = container.to_bytes()?;
//! let parsed = huffpress_core::Container::<u8>::from_bytes(&bytes)?;
//! assert_eq!(engine::decompress(&parsed)?, b"aaaabbbcc");
//! # Ok::<(), huffpress_core::Error>(())
//! ```

pub mod audio;
pub mod bitio;
pub mod codebook;
pub mod container;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod image;
pub mod metrics;
pub mod rle;
pub mod symbol;

// Re-export commonly used types
pub use audio::AudioFormat;
pub use container::{Container, ContainerKind};
pub use engine::{
    compress, compress_audio, compress_image, compress_text, decompress, decompress_audio, decompress_image,
    decompress_text,
};
pub use error::{Error, Result};
pub use image::ImageContainer;
