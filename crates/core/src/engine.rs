//! The compression operations exposed to callers.
//!
//! Huffman path (bytes, text, audio frames):
//!
//! ```text
//! symbols -> tally -> build tree -> derive codes -> encode + pack -> Container
//! Container -> unpack (strip pad) -> table-walk decode -> symbols
//! ```
//!
//! Image path: `pixels -> RLE -> ImageContainer` and back.
//!
//! Every call builds its own tree and code table; nothing is shared
//! between calls, so independent requests may run concurrently.

use crate::audio::AudioFormat;
use crate::bitio::{pack, unpack};
use crate::codebook::CodeTable;
use crate::container::{Container, ContainerKind};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::huffman::HuffmanTree;
use crate::image::ImageContainer;
use crate::rle::{self, Pixel};
use crate::symbol::Symbol;

/// Compress an arbitrary byte stream.
pub fn compress(bytes: &[u8]) -> Result<Container<u8>> {
    compress_symbols(bytes, ContainerKind::Bytes, None)
}

/// Recover the bytes of a container built by `compress` or `compress_audio`.
pub fn decompress(container: &Container<u8>) -> Result<Vec<u8>> {
    decompress_symbols(container)
}

/// Compress text per character.
pub fn compress_text(text: &str) -> Result<Container<char>> {
    let chars: Vec<char> = text.chars().collect();
    compress_symbols(&chars, ContainerKind::Text, None)
}

pub fn decompress_text(container: &Container<char>) -> Result<String> {
    Ok(decompress_symbols(container)?.into_iter().collect())
}

/// Compress raw audio frames, carrying the format in the container.
///
/// # Errors
/// `Error::InvalidInput` if `frames` disagrees with `format`.
pub fn compress_audio(frames: &[u8], format: AudioFormat) -> Result<Container<u8>> {
    format.validate(frames)?;
    compress_symbols(frames, ContainerKind::Audio, Some(format))
}

/// # Errors
/// `Error::InvalidInput` if the container holds no audio format.
pub fn decompress_audio(container: &Container<u8>) -> Result<(Vec<u8>, AudioFormat)> {
    let format = *container
        .audio_format()
        .ok_or_else(|| Error::invalid("container carries no audio format"))?;
    let frames = decompress_symbols(container)?;
    format.validate(&frames)?;
    Ok((frames, format))
}

/// Run-length code an image given in row-major order.
///
/// # Errors
/// `Error::DimensionMismatch` if `pixels.len() != width * height`.
pub fn compress_image<P: Pixel>(pixels: &[P], width: u32, height: u32) -> Result<ImageContainer<P>> {
    let expected = width as u64 * height as u64;
    if pixels.len() as u64 != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: pixels.len() as u64,
        });
    }

    let runs = rle::encode(pixels);
    log::debug!("rle: {} pixels ({}x{}) -> {} runs", pixels.len(), width, height, runs.len());
    Ok(ImageContainer { width, height, runs })
}

/// # Errors
/// `Error::DimensionMismatch` if the runs do not cover `width * height`.
pub fn decompress_image<P: Pixel>(image: &ImageContainer<P>) -> Result<(Vec<P>, u32, u32)> {
    let pixels = rle::decode(&image.runs, image.width, image.height)?;
    Ok((pixels, image.width, image.height))
}

fn compress_symbols<S: Symbol>(
    symbols: &[S],
    kind: ContainerKind,
    audio: Option<AudioFormat>,
) -> Result<Container<S>> {
    let symbol_count = symbols.len() as u64;

    if symbols.is_empty() {
        log::debug!("compress {:?}: empty input", kind);
        let payload = pack(symbols, &CodeTable::empty())?;
        return Ok(Container::new(kind, 0, audio, CodeTable::empty(), payload));
    }

    let frequencies = FrequencyTable::tally(symbols.iter().copied());
    log::trace!("frequencies: {:?}", frequencies);

    let tree = HuffmanTree::build(&frequencies)?;
    let code_table = CodeTable::from_tree(&tree)?;
    drop(tree);

    let payload = pack(symbols, &code_table)?;
    log::debug!(
        "compress {:?}: {} symbols, alphabet {}, longest code {} bits, payload {} bytes",
        kind,
        symbol_count,
        code_table.len(),
        code_table.max_len(),
        payload.len()
    );

    Ok(Container::new(kind, symbol_count, audio, code_table, payload))
}

fn decompress_symbols<S: Symbol>(container: &Container<S>) -> Result<Vec<S>> {
    let symbols = unpack(container.payload(), container.code_table())?;
    if symbols.len() as u64 != container.symbol_count() {
        return Err(Error::corrupt(format!(
            "decoded {} symbols, container declares {}",
            symbols.len(),
            container.symbol_count()
        )));
    }
    log::debug!("decompress {:?}: {} symbols", container.kind(), symbols.len());
    Ok(symbols)
}

/// Payload size bound: ceil(total codeword bits / 8) plus the header byte.
pub fn payload_bound<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> usize {
    let bits: usize = symbols
        .iter()
        .filter_map(|s| table.codeword(s))
        .map(|code| code.len() as usize)
        .sum();
    bits.div_ceil(8) + 1
}
