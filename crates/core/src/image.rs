//! Run-length image artifacts and netpbm raster files.
//!
//! Images bypass the Huffman pipeline entirely: pixels are run-length
//! coded and stored with their dimensions.
//!
//! # Format (version 1, little-endian)
//!
//! ```text
//! +--------------------+
//! | Magic (4 bytes)    |  "HRLE"
//! +--------------------+
//! | version (1)        |  1
//! | channels (1)       |  bytes per pixel: 1, 3 or 4
//! | width (4)          |  u32
//! | height (4)         |  u32
//! | run_count (4)      |  u32
//! +--------------------+
//! | runs               |  length (u32), pixel (channels bytes)
//! +--------------------+
//! | crc32 (4)          |  over every byte between magic and crc
//! +--------------------+
//! ```

use crate::container::{check_frame, ByteReader};
use crate::error::{ContainerError, Error, Result};
use crate::rle::{self, Pixel, Run, RunList};

/// Magic number for image containers: "HRLE"
const MAGIC: [u8; 4] = *b"HRLE";

/// Current schema version
pub const VERSION: u8 = 1;

const MIN_SIZE: usize = 4 + 1 + 1 + 4 + 4 + 4 + 4;

/// Run-length coded image with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContainer<P> {
    pub width: u32,
    pub height: u32,
    pub runs: RunList<P>,
}

impl<P: Pixel> ImageContainer<P> {
    /// Serialize into the versioned binary schema.
    ///
    /// # Errors
    /// `Error::InvalidInput` if there are more runs than a u32 can count.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let run_count = u32::try_from(self.runs.len())
            .map_err(|_| Error::invalid("too many runs to serialize"))?;

        let mut out = Vec::with_capacity(MIN_SIZE + self.runs.len() * (4 + P::CHANNELS as usize));
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.push(P::CHANNELS);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&run_count.to_le_bytes());
        for run in &self.runs {
            out.extend_from_slice(&run.length.to_le_bytes());
            run.value.write_to(&mut out);
        }

        let crc32 = crc32fast::hash(&out[MAGIC.len()..]);
        out.extend_from_slice(&crc32.to_le_bytes());
        Ok(out)
    }

    /// Parse an artifact produced by `to_bytes`.
    ///
    /// Run totals are not checked here; `decompress_image` does that.
    ///
    /// # Errors
    /// - `Error::EmptyInput` for zero bytes
    /// - `ContainerError` for bad magic, version, or truncation
    /// - `Error::Crc` if the checksum does not match
    /// - `Error::InvalidInput` for a channel count other than `P::CHANNELS`
    ///   or a zero-length run
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let body = check_frame(bytes, MAGIC, MIN_SIZE)?;
        let mut reader = ByteReader::new(body);

        let version = reader.u8()?;
        if version != VERSION {
            return Err(ContainerError::UnsupportedVersion(version).into());
        }
        let channels = reader.u8()?;
        if channels != P::CHANNELS {
            return Err(Error::invalid(format!(
                "image has {channels} channels, expected {}",
                P::CHANNELS
            )));
        }
        let width = reader.u32()?;
        let height = reader.u32()?;
        let run_count = reader.u32()? as usize;

        let mut runs = Vec::with_capacity(run_count.min(body.len()));
        for _ in 0..run_count {
            let length = reader.u32()?;
            if length == 0 {
                return Err(Error::invalid("zero-length run"));
            }
            let value = P::read_from(reader.take(P::CHANNELS as usize)?)
                .ok_or_else(|| Error::invalid("pixel field has wrong width"))?;
            runs.push(Run { length, value });
        }
        reader.finish()?;

        Ok(Self { width, height, runs })
    }

    /// Total pixels covered by the runs.
    pub fn pixel_count(&self) -> u64 {
        rle::pixel_count(&self.runs)
    }
}

/// Channel count of a serialized image artifact, after checking its frame.
pub fn artifact_channels(bytes: &[u8]) -> Result<u8> {
    let body = check_frame(bytes, MAGIC, MIN_SIZE)?;
    let mut reader = ByteReader::new(body);
    let version = reader.u8()?;
    if version != VERSION {
        return Err(ContainerError::UnsupportedVersion(version).into());
    }
    reader.u8()
}

/// Decoded pixels of a netpbm file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raster {
    /// `P5` graymap
    Gray(Vec<u8>),
    /// `P6` pixmap
    Rgb(Vec<[u8; 3]>),
}

/// A raster image with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Raster,
}

/// Parse a binary PGM (`P5`) or PPM (`P6`) file with maxval 255.
///
/// # Errors
/// - `Error::EmptyInput` for a zero-length file
/// - `Error::InvalidInput` for other formats, malformed headers, or
///   truncated pixel data
pub fn read_netpbm(bytes: &[u8]) -> Result<RasterImage> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut header = HeaderTokens { bytes, pos: 0 };
    let magic = header.next_token()?;
    let channels = match magic {
        b"P5" => 1,
        b"P6" => 3,
        other => {
            return Err(Error::invalid(format!(
                "unsupported netpbm magic {:?}",
                String::from_utf8_lossy(other)
            )))
        }
    };
    let width = header.next_number()?;
    let height = header.next_number()?;
    let maxval = header.next_number()?;
    if maxval != 255 {
        return Err(Error::invalid(format!("unsupported maxval {maxval}, expected 255")));
    }
    // Exactly one whitespace byte separates the header from the raster
    let data = bytes
        .get(header.pos + 1..)
        .ok_or_else(|| Error::invalid("netpbm header has no raster"))?;

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| Error::invalid("raster dimensions overflow"))?;
    if data.len() < expected {
        return Err(Error::invalid(format!(
            "raster truncated: need {expected} bytes, got {}",
            data.len()
        )));
    }
    let data = &data[..expected];

    let pixels = match channels {
        1 => Raster::Gray(data.to_vec()),
        _ => Raster::Rgb(data.chunks_exact(3).map(|px| [px[0], px[1], px[2]]).collect()),
    };
    Ok(RasterImage { width, height, pixels })
}

/// Write a raster as binary PGM or PPM.
///
/// # Errors
/// `Error::DimensionMismatch` if the pixel count is not `width x height`.
pub fn write_netpbm(image: &RasterImage) -> Result<Vec<u8>> {
    let (magic, count) = match &image.pixels {
        Raster::Gray(px) => ("P5", px.len()),
        Raster::Rgb(px) => ("P6", px.len()),
    };
    let expected = image.width as u64 * image.height as u64;
    if count as u64 != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: count as u64,
        });
    }

    let mut out = format!("{magic}\n{} {}\n255\n", image.width, image.height).into_bytes();
    match &image.pixels {
        Raster::Gray(px) => out.extend_from_slice(px),
        Raster::Rgb(px) => out.extend(px.iter().flatten()),
    }
    Ok(out)
}

/// Whitespace-separated header tokens, skipping `#` comments.
struct HeaderTokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderTokens<'a> {
    fn next_token(&mut self) -> Result<&'a [u8]> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b'#') => {
                    while self.bytes.get(self.pos).is_some_and(|&b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(_) => break,
                None => return Err(Error::invalid("netpbm header ends early")),
            }
        }
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn next_number(&mut self) -> Result<u32> {
        let token = self.next_token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                Error::invalid(format!(
                    "bad netpbm header field {:?}",
                    String::from_utf8_lossy(token)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_round_trip() {
        let image = ImageContainer {
            width: 3,
            height: 1,
            runs: vec![
                Run { length: 2, value: [1u8, 2, 3] },
                Run { length: 1, value: [4u8, 5, 6] },
            ],
        };
        let bytes = image.to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"HRLE");
        assert_eq!(bytes.len(), MIN_SIZE + 2 * 7);
        assert_eq!(ImageContainer::from_bytes(&bytes).unwrap(), image);
    }

    #[test]
    fn test_channel_mismatch() {
        let image = ImageContainer {
            width: 1,
            height: 1,
            runs: vec![Run { length: 1, value: 9u8 }],
        };
        let bytes = image.to_bytes().unwrap();
        assert!(matches!(
            ImageContainer::<[u8; 3]>::from_bytes(&bytes),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(artifact_channels(&bytes).unwrap(), 1);
    }

    #[test]
    fn test_corrupted_image() {
        let image = ImageContainer {
            width: 2,
            height: 2,
            runs: vec![Run { length: 4, value: 0u8 }],
        };
        let mut bytes = image.to_bytes().unwrap();
        bytes[10] ^= 0xFF;
        assert!(matches!(ImageContainer::<u8>::from_bytes(&bytes), Err(Error::Crc { .. })));
    }

    #[test]
    fn test_ppm_round_trip() {
        let image = RasterImage {
            width: 2,
            height: 1,
            pixels: Raster::Rgb(vec![[255, 0, 0], [0, 255, 0]]),
        };
        let bytes = write_netpbm(&image).unwrap();
        assert!(bytes.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(read_netpbm(&bytes).unwrap(), image);
    }

    #[test]
    fn test_pgm_with_comment() {
        let mut bytes = b"P5\n# made by hand\n3 1\n255\n".to_vec();
        bytes.extend_from_slice(&[10, 20, 30]);
        let image = read_netpbm(&bytes).unwrap();
        assert_eq!(image.width, 3);
        assert_eq!(image.pixels, Raster::Gray(vec![10, 20, 30]));
    }

    #[test]
    fn test_netpbm_rejects_bad_input() {
        assert!(matches!(read_netpbm(b""), Err(Error::EmptyInput)));
        assert!(matches!(read_netpbm(b"P3\n1 1\n255\n0 0 0"), Err(Error::InvalidInput(_))));
        assert!(matches!(read_netpbm(b"P5\n2 2\n255\n\x01"), Err(Error::InvalidInput(_))));
        assert!(matches!(read_netpbm(b"P5\n1 1\n65535\n\x00\x00"), Err(Error::InvalidInput(_))));
        assert!(matches!(read_netpbm(b"P6\nwide 1\n255\n"), Err(Error::InvalidInput(_))));
        assert!(matches!(
            read_netpbm(b"P6\n4294967295 4294967295\n255\n\x00\x00\x00"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_write_dimension_mismatch() {
        let image = RasterImage {
            width: 2,
            height: 2,
            pixels: Raster::Gray(vec![0; 3]),
        };
        assert!(matches!(write_netpbm(&image), Err(Error::DimensionMismatch { .. })));
    }
}
