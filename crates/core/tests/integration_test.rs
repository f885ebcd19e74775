//! End-to-end tests: input -> compress -> serialize -> parse -> decompress,
//! with verification that output matches input.

use huffpress_core::{
    audio::{read_wav, write_wav, AudioFormat},
    codebook::CodeTable,
    container::Container,
    engine,
    error::Error,
    frequency::FrequencyTable,
    huffman::HuffmanTree,
    image::{read_netpbm, write_netpbm, ImageContainer, Raster, RasterImage},
    rle::Run,
};

/// Frequencies a:4, b:3, c:2 give code lengths len(a) <= len(b) <= len(c).
#[test]
fn test_scenario_a_code_lengths() {
    let table = FrequencyTable::tally("aaaabbbcc".chars());
    let tree = HuffmanTree::build(&table).unwrap();
    assert_eq!(tree.leaf_count(), 3);

    let codes = CodeTable::from_tree(&tree).unwrap();
    let len = |c: char| codes.codeword(&c).unwrap().len();
    assert!(len('a') <= len('b'));
    assert!(len('b') <= len('c'));

    let container = engine::compress_text("aaaabbbcc").unwrap();
    assert_eq!(engine::decompress_text(&container).unwrap(), "aaaabbbcc");
}

/// A uniform 2x2 red image is a single run and round-trips exactly.
#[test]
fn test_scenario_b_uniform_image() {
    let red = [255u8, 0, 0];
    let image = engine::compress_image(&[red; 4], 2, 2).unwrap();
    assert_eq!(image.runs, vec![Run { length: 4, value: red }]);

    let bytes = image.to_bytes().unwrap();
    let parsed = ImageContainer::<[u8; 3]>::from_bytes(&bytes).unwrap();
    assert_eq!(engine::decompress_image(&parsed).unwrap(), (vec![red; 4], 2, 2));
}

/// A single-symbol alphabet still round-trips through a stored artifact.
#[test]
fn test_scenario_c_single_symbol() {
    let container = engine::compress_text("zzzz").unwrap();
    let bytes = container.to_bytes().unwrap();
    let parsed = Container::<char>::from_bytes(&bytes).unwrap();
    assert_eq!(engine::decompress_text(&parsed).unwrap(), "zzzz");
}

#[test]
fn test_artifact_round_trip_edge_inputs() {
    let full_alphabet: Vec<u8> = (0..=255u8).collect();
    let inputs: Vec<Vec<u8>> = vec![vec![], vec![42], vec![7; 1000], full_alphabet];

    for input in inputs {
        let bytes = engine::compress(&input).unwrap().to_bytes().unwrap();
        let parsed = Container::<u8>::from_bytes(&bytes).unwrap();
        assert_eq!(engine::decompress(&parsed).unwrap(), input);
    }
}

#[test]
fn test_text_compresses() {
    let text = "It was the best of times, it was the worst of times. ".repeat(50);
    let bytes = engine::compress_text(&text).unwrap().to_bytes().unwrap();
    assert!(bytes.len() < text.len());
}

#[test]
fn test_wav_file_round_trip() {
    let format = AudioFormat {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        frame_count: 400,
    };
    let frames: Vec<u8> = (0..400u32)
        .flat_map(|i| {
            let sample: i16 = if (i / 20) % 2 == 0 { 1000 } else { -1000 };
            sample.to_le_bytes()
        })
        .collect();
    let wav = write_wav(&format, &frames).unwrap();

    let (read_format, read_frames) = read_wav(&wav).unwrap();
    let artifact = engine::compress_audio(&read_frames, read_format).unwrap().to_bytes().unwrap();
    assert!(artifact.len() < wav.len());

    let parsed = Container::<u8>::from_bytes(&artifact).unwrap();
    let (out_frames, out_format) = engine::decompress_audio(&parsed).unwrap();
    assert_eq!(write_wav(&out_format, &out_frames).unwrap(), wav);
}

#[test]
fn test_netpbm_through_rle() {
    let width = 16;
    let height = 8;
    let pixels: Vec<[u8; 3]> = (0..width * height)
        .map(|i| if (i % width) < width / 2 { [10, 20, 30] } else { [200, 100, 0] })
        .collect();
    let ppm = write_netpbm(&RasterImage {
        width,
        height,
        pixels: Raster::Rgb(pixels.clone()),
    })
    .unwrap();

    let raster = read_netpbm(&ppm).unwrap();
    let Raster::Rgb(read_pixels) = raster.pixels else {
        panic!("expected an RGB raster");
    };
    let image = engine::compress_image(&read_pixels, raster.width, raster.height).unwrap();
    assert_eq!(image.runs.len(), 2 * height as usize);

    let (decoded, w, h) = engine::decompress_image(&image).unwrap();
    assert_eq!((w, h), (width, height));
    assert_eq!(decoded, pixels);
}

#[test]
fn test_image_with_wrong_dimensions_rejected() {
    let image = ImageContainer {
        width: 3,
        height: 3,
        runs: vec![Run { length: 4, value: 0u8 }],
    };
    let parsed = ImageContainer::<u8>::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert!(matches!(
        engine::decompress_image(&parsed),
        Err(Error::DimensionMismatch { expected: 9, actual: 4 })
    ));
}

#[test]
fn test_damaged_artifact_rejected() {
    let mut bytes = engine::compress(b"hello hello hello").unwrap().to_bytes().unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x40;
    assert!(Container::<u8>::from_bytes(&bytes).is_err());
}

#[test]
fn test_truncated_payload_is_corrupt_stream() {
    let container = engine::compress(b"abcdefghabcdefgh").unwrap();
    let mut bytes = container.to_bytes().unwrap();

    // Drop the final payload byte, then fix the length field and CRC so
    // only the bitstream itself is damaged.
    let len = bytes.len();
    let payload_len = container.payload().len();
    let len_field = len - 4 - payload_len - 4;
    bytes.remove(len - 5);
    bytes[len_field..len_field + 4].copy_from_slice(&(payload_len as u32 - 1).to_le_bytes());
    let crc_at = bytes.len() - 4;
    let crc = crc32fast::hash(&bytes[4..crc_at]);
    bytes[crc_at..].copy_from_slice(&crc.to_le_bytes());

    let parsed = Container::<u8>::from_bytes(&bytes).unwrap();
    assert!(matches!(engine::decompress(&parsed), Err(Error::CorruptStream { .. })));
}

/// Concurrent calls build independent tables.
#[test]
fn test_concurrent_compression() {
    let handles: Vec<_> = (0..8u8)
        .map(|seed| {
            std::thread::spawn(move || {
                let data: Vec<u8> = (0..5000u32).map(|i| ((i * (seed as u32 + 3)) % 17) as u8).collect();
                let container = engine::compress(&data).unwrap();
                assert_eq!(engine::decompress(&container).unwrap(), data);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

/// A format whose WAV header fields would overflow never becomes an artifact.
#[test]
fn test_unwritable_audio_format_rejected() {
    let format = AudioFormat {
        channels: 2,
        sample_rate: 3_000_000_000,
        bits_per_sample: 16,
        frame_count: 2,
    };
    assert!(matches!(engine::compress_audio(&[0; 8], format), Err(Error::InvalidInput(_))));
}
