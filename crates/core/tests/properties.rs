//! Property tests for the Huffman and run-length codecs.

use huffpress_core::{
    codebook::CodeTable,
    container::Container,
    engine,
    frequency::FrequencyTable,
    huffman::HuffmanTree,
    image::ImageContainer,
    rle,
};
use proptest::prelude::*;

/// Pixels drawn from a small palette so runs actually form.
fn image_strategy() -> impl Strategy<Value = (Vec<[u8; 3]>, u32, u32)> {
    (1u32..24, 1u32..24).prop_flat_map(|(width, height)| {
        let palette = prop::sample::select(vec![[0u8, 0, 0], [255, 0, 0], [0, 255, 0], [9, 9, 9]]);
        prop::collection::vec(palette, (width * height) as usize).prop_map(move |pixels| (pixels, width, height))
    })
}

proptest! {
    /// Decompressing a parsed artifact reproduces the input exactly.
    #[test]
    fn prop_roundtrip(input: Vec<u8>) {
        let bytes = engine::compress(&input).unwrap().to_bytes().unwrap();
        let parsed = Container::<u8>::from_bytes(&bytes).unwrap();
        prop_assert_eq!(engine::decompress(&parsed).unwrap(), input);
    }

    #[test]
    fn prop_text_roundtrip(text in "\\PC*") {
        let container = engine::compress_text(&text).unwrap();
        prop_assert_eq!(engine::decompress_text(&container).unwrap(), text);
    }

    /// No codeword is a prefix of another.
    #[test]
    fn prop_prefix_free(input in prop::collection::vec(any::<u8>(), 1..2000)) {
        let tree = HuffmanTree::build(&FrequencyTable::tally(input.iter().copied())).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();

        let entries = table.entries();
        for (i, (_, a)) in entries.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for (j, (_, b)) in entries.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b), "{} prefixes {}", a, b);
                }
            }
        }
    }

    /// Payload length never exceeds ceil(codeword bits / 8) + 1.
    #[test]
    fn prop_compactness(input: Vec<u8>) {
        let container = engine::compress(&input).unwrap();
        let bound = engine::payload_bound(&input, container.code_table());
        prop_assert!(container.payload().len() <= bound);
    }

    /// Higher frequency never gets a longer codeword.
    #[test]
    fn prop_code_lengths_monotone(input in prop::collection::vec(0u8..16, 2..500)) {
        let frequencies = FrequencyTable::tally(input.iter().copied());
        let tree = HuffmanTree::build(&frequencies).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();

        for (a, fa) in frequencies.iter() {
            for (b, fb) in frequencies.iter() {
                if fa > fb {
                    prop_assert!(table.codeword(&a).unwrap().len() <= table.codeword(&b).unwrap().len());
                }
            }
        }
    }

    #[test]
    fn prop_image_roundtrip((pixels, width, height) in image_strategy()) {
        let image = engine::compress_image(&pixels, width, height).unwrap();
        let parsed = ImageContainer::<[u8; 3]>::from_bytes(&image.to_bytes().unwrap()).unwrap();
        let (decoded, w, h) = engine::decompress_image(&parsed).unwrap();
        prop_assert_eq!((w, h), (width, height));
        prop_assert_eq!(decoded, pixels);
    }

    /// Run count <= pixel count, with equality iff no two neighbours match.
    #[test]
    fn prop_run_count_bound(pixels in prop::collection::vec(0u8..4, 0..300)) {
        let runs = rle::encode(&pixels);
        prop_assert!(runs.len() <= pixels.len());
        prop_assert_eq!(rle::pixel_count(&runs), pixels.len() as u64);
        prop_assert!(runs.iter().all(|run| run.length >= 1));

        let no_equal_neighbours = pixels.windows(2).all(|w| w[0] != w[1]);
        prop_assert_eq!(runs.len() == pixels.len(), no_equal_neighbours);
    }
}
