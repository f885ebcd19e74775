//! Audio format metadata and PCM WAV file handling.
//!
//! Audio is compressed by running the Huffman pipeline over the raw frame
//! bytes; the container additionally carries the `AudioFormat` so the file
//! can be rebuilt exactly.
//!
//! # WAV Layout Read/Written
//!
//! ```text
//! "RIFF" size "WAVE"
//!   "fmt " 16+  format_tag=1 (PCM), channels, sample_rate, byte_rate,
//!               block_align, bits_per_sample
//!   ...        unknown chunks are skipped (odd sizes carry a pad byte)
//!   "data" n   interleaved frames
//! ```

use crate::error::{Error, Result};

/// Size of the serialized `AudioFormat` inside a container.
pub const FORMAT_SIZE: usize = 12;

/// Size of the canonical header written by `write_wav`.
pub const WAV_HEADER_SIZE: usize = 44;

const PCM_FORMAT_TAG: u16 = 1;

/// Parameters needed to rebuild an audio file from its raw frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Number of frames (one sample per channel each)
    pub frame_count: u32,
}

impl AudioFormat {
    /// Bytes per frame: one sample per channel, rounded up to whole bytes.
    pub fn block_align(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize).div_ceil(8)
    }

    /// Expected length of the raw frame buffer.
    pub fn data_len(&self) -> usize {
        self.block_align() * self.frame_count as usize
    }

    /// Check the format is usable and agrees with a frame buffer.
    ///
    /// # Errors
    /// `Error::InvalidInput` on zero channels, zero or >32 bit depth, a
    /// block align or byte rate that a WAV header cannot hold, or a frame
    /// buffer of the wrong length.
    pub fn validate(&self, frames: &[u8]) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::invalid("audio must have at least one channel"));
        }
        if self.bits_per_sample == 0 || self.bits_per_sample > 32 {
            return Err(Error::invalid(format!(
                "unsupported bit depth {}",
                self.bits_per_sample
            )));
        }
        self.wav_rates()?;
        if frames.len() != self.data_len() {
            return Err(Error::invalid(format!(
                "{} frames of {} bytes need {} bytes, got {}",
                self.frame_count,
                self.block_align(),
                self.data_len(),
                frames.len()
            )));
        }
        Ok(())
    }

    /// Block align and byte rate as stored in a WAV `fmt ` chunk.
    fn wav_rates(&self) -> Result<(u16, u32)> {
        let block_align = u16::try_from(self.block_align()).map_err(|_| {
            Error::invalid(format!(
                "block align {} exceeds the WAV limit of {}",
                self.block_align(),
                u16::MAX
            ))
        })?;
        let byte_rate = self.sample_rate.checked_mul(block_align as u32).ok_or_else(|| {
            Error::invalid(format!(
                "byte rate of {} Hz x {} bytes exceeds the WAV limit",
                self.sample_rate, block_align
            ))
        })?;
        Ok((block_align, byte_rate))
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        out.extend_from_slice(&self.frame_count.to_le_bytes());
    }

    pub(crate) fn read_from(bytes: &[u8; FORMAT_SIZE]) -> Self {
        Self {
            channels: u16::from_le_bytes([bytes[0], bytes[1]]),
            sample_rate: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            bits_per_sample: u16::from_le_bytes([bytes[6], bytes[7]]),
            frame_count: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        }
    }
}

/// Parse a PCM WAV file into its format and raw frame bytes.
///
/// # Errors
/// - `Error::EmptyInput` for a zero-length file
/// - `Error::InvalidInput` if the RIFF/WAVE structure is unreadable, the
///   encoding is not PCM, or the `fmt `/`data` chunks are missing
pub fn read_wav(bytes: &[u8]) -> Result<(AudioFormat, Vec<u8>)> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(Error::invalid("not a RIFF/WAVE file"));
    }

    let mut fmt: Option<(u16, u32, u16, u16)> = None;
    let mut pos = 12;

    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes([bytes[pos + 4], bytes[pos + 5], bytes[pos + 6], bytes[pos + 7]]) as usize;
        let body_start = pos + 8;
        let body_end = body_start
            .checked_add(size)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| Error::invalid(format!("chunk {:?} overruns file", String::from_utf8_lossy(id))))?;
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(Error::invalid("fmt chunk too short"));
                }
                let tag = u16::from_le_bytes([body[0], body[1]]);
                if tag != PCM_FORMAT_TAG {
                    return Err(Error::invalid(format!("unsupported WAV encoding tag {tag}")));
                }
                let channels = u16::from_le_bytes([body[2], body[3]]);
                let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                let block_align = u16::from_le_bytes([body[12], body[13]]);
                let bits = u16::from_le_bytes([body[14], body[15]]);
                fmt = Some((channels, sample_rate, block_align, bits));
            }
            b"data" => {
                let (channels, sample_rate, block_align, bits_per_sample) =
                    fmt.ok_or_else(|| Error::invalid("data chunk precedes fmt chunk"))?;
                let mut format = AudioFormat {
                    channels,
                    sample_rate,
                    bits_per_sample,
                    frame_count: 0,
                };
                if block_align as usize != format.block_align() || block_align == 0 {
                    return Err(Error::invalid(format!(
                        "block align {block_align} disagrees with {channels} channels of {bits_per_sample} bits"
                    )));
                }
                let frame_count = body.len() / block_align as usize;
                format.frame_count = u32::try_from(frame_count)
                    .map_err(|_| Error::invalid("too many frames"))?;
                // A trailing partial frame is not audio
                let frames = body[..format.data_len()].to_vec();
                format.validate(&frames)?;
                log::debug!("read wav: {:?}", format);
                return Ok((format, frames));
            }
            _ => log::trace!("skipping wav chunk {:?}", String::from_utf8_lossy(id)),
        }

        pos = body_end + (size & 1);
    }

    Err(Error::invalid("WAV file has no data chunk"))
}

/// Write frames as a canonical PCM WAV file.
///
/// # Errors
/// `Error::InvalidInput` if `frames` disagrees with `format`.
pub fn write_wav(format: &AudioFormat, frames: &[u8]) -> Result<Vec<u8>> {
    format.validate(frames)?;
    let (block_align, byte_rate) = format.wav_rates()?;
    let riff_len = u32::try_from(36 + frames.len() + (frames.len() & 1))
        .map_err(|_| Error::invalid("audio too large for WAV"))?;
    let data_len = frames.len() as u32;

    let mut out = Vec::with_capacity(WAV_HEADER_SIZE + frames.len() + 1);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    out.extend_from_slice(&format.channels.to_le_bytes());
    out.extend_from_slice(&format.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&format.bits_per_sample.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(frames);
    if data_len & 1 == 1 {
        out.push(0);
    }

    Ok(out)
}
