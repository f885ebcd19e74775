//! Sample input generation.
//!
//! When no input file is given, compress commands run on a generated sample
//! with visible compression characteristics. Every generator is seeded so a
//! printed seed reproduces the exact input.

use huffpress_core::AudioFormat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate sample bytes with mixed compressibility.
///
/// Chunks alternate between long runs of one byte, a text-like alphabet,
/// short repeating patterns and uniform noise.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let chunk_size = (size_bytes - data.len()).min(4096);

        match rng.gen_range(0..10u8) {
            // 30% runs of a single byte
            0..=2 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(chunk_size));
            }

            // 30% limited alphabet
            3..=5 => {
                let alphabet = b"abcdefghijklmnopqrstuvwxyz .!,\n";
                data.extend((0..chunk_size).map(|_| alphabet[rng.gen_range(0..alphabet.len())]));
            }

            // 20% repeating patterns
            6..=7 => {
                let pattern = generate_pattern(&mut rng);
                data.extend(pattern.iter().cycle().take(chunk_size));
            }

            // 20% noise
            _ => data.extend((0..chunk_size).map(|_| rng.gen::<u8>())),
        }
    }

    data
}

fn generate_pattern(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let pattern_len = rng.gen_range(4..=32);
    (0..pattern_len).map(|_| rng.gen()).collect()
}

/// Generate prose-like text of roughly `size_bytes` bytes.
///
/// Words are drawn with a skewed distribution and a few non-ASCII words
/// are mixed in so the per-character alphabet is not just ASCII.
pub fn generate_sample_text(seed: u64, size_bytes: usize) -> String {
    const WORDS: &[&str] = &[
        "the", "of", "and", "a", "to", "in", "is", "was", "that", "for", "it", "with", "as", "on", "signal", "tree",
        "frequency", "symbol", "prefix", "code", "stream", "café", "naïve", "größe", "→",
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(size_bytes + 16);
    let mut words_in_sentence = 0;

    while text.len() < size_bytes {
        // Squaring the draw favours the common words at the front
        let pick: f64 = rng.gen();
        let word = WORDS[((pick * pick) * WORDS.len() as f64) as usize % WORDS.len()];

        if words_in_sentence == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                text.extend(first.to_uppercase());
                text.push_str(chars.as_str());
            }
        } else {
            text.push(' ');
            text.push_str(word);
        }
        words_in_sentence += 1;

        if words_in_sentence >= rng.gen_range(6..14) {
            text.push_str(if rng.gen_bool(0.2) { ".\n" } else { ". " });
            words_in_sentence = 0;
        }
    }

    text
}

/// Generate an RGB image made of flat horizontal bands and a few boxes.
///
/// Returns `(pixels, width, height)` with roughly `size_bytes` bytes of
/// raw pixel data.
pub fn generate_sample_image(seed: u64, size_bytes: usize) -> (Vec<[u8; 3]>, u32, u32) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let pixel_count = (size_bytes / 3).max(1);
    let width = (pixel_count as f64).sqrt().ceil().max(1.0) as u32;
    let height = (pixel_count as u32).div_ceil(width).max(1);

    let palette: Vec<[u8; 3]> = (0..6).map(|_| rng.gen()).collect();
    let mut pixels = Vec::with_capacity((width * height) as usize);
    let band_height = rng.gen_range(2..=8u32);
    for y in 0..height {
        let color = palette[(y / band_height) as usize % palette.len()];
        pixels.extend(std::iter::repeat(color).take(width as usize));
    }

    for _ in 0..rng.gen_range(1..=4) {
        let color = palette[rng.gen_range(0..palette.len())];
        let x0 = rng.gen_range(0..width);
        let y0 = rng.gen_range(0..height);
        let x1 = (x0 + rng.gen_range(1..=width)).min(width);
        let y1 = (y0 + rng.gen_range(1..=height)).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                pixels[(y * width + x) as usize] = color;
            }
        }
    }

    (pixels, width, height)
}

/// Generate mono 16-bit PCM: a stepped square wave with a little noise.
///
/// Returns the format and raw little-endian frames.
pub fn generate_sample_audio(seed: u64, size_bytes: usize) -> (AudioFormat, Vec<u8>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let format = AudioFormat {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        frame_count: (size_bytes / 2).max(1) as u32,
    };

    let period = rng.gen_range(16..=80u32);
    let amplitude: i16 = rng.gen_range(1000..=12000);
    let frames = (0..format.frame_count)
        .flat_map(|i| {
            let level = if (i / period) % 2 == 0 { amplitude } else { -amplitude };
            let noise: i16 = rng.gen_range(-2..=2);
            level.saturating_add(noise).to_le_bytes()
        })
        .collect();

    (format, frames)
}
