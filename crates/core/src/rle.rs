//! Run-length coding of pixel sequences.
//!
//! Pixels are walked in row-major order; each maximal run of equal values
//! becomes one `(length, value)` pair. Runs longer than `u32::MAX` are split.

use crate::error::{Error, Result};
use std::fmt::Debug;

/// A fixed-size pixel value with a byte serialization.
pub trait Pixel: Copy + PartialEq + Debug {
    /// Bytes per pixel (1 = gray, 3 = RGB, 4 = RGBA).
    const CHANNELS: u8;

    fn write_to(&self, out: &mut Vec<u8>);

    /// Parse from exactly `CHANNELS` bytes.
    fn read_from(bytes: &[u8]) -> Option<Self>;
}

impl Pixel for u8 {
    const CHANNELS: u8 = 1;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [v] => Some(*v),
            _ => None,
        }
    }
}

macro_rules! impl_pixel_array {
    ($($n:literal),*) => {$(
        impl Pixel for [u8; $n] {
            const CHANNELS: u8 = $n;

            fn write_to(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(self);
            }

            fn read_from(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok()
            }
        }
    )*};
}

// RGB and RGBA
impl_pixel_array!(3, 4);

/// `length` consecutive copies of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<P> {
    pub length: u32,
    pub value: P,
}

/// Ordered runs covering an image in row-major order.
pub type RunList<P> = Vec<Run<P>>;

/// Collapse `pixels` into runs. Every run has `length >= 1`.
pub fn encode<P: Pixel>(pixels: &[P]) -> RunList<P> {
    let mut runs = Vec::new();
    let Some((&first, rest)) = pixels.split_first() else {
        return runs;
    };

    let mut current = Run { length: 1, value: first };
    for &pixel in rest {
        if pixel == current.value && current.length < u32::MAX {
            current.length += 1;
        } else {
            runs.push(current);
            current = Run { length: 1, value: pixel };
        }
    }
    runs.push(current);

    runs
}

/// Sum of run lengths.
pub fn pixel_count<P>(runs: &[Run<P>]) -> u64 {
    runs.iter().map(|run| run.length as u64).sum()
}

/// Expand runs back into pixels, checking the total against `width x height`.
///
/// # Errors
/// `Error::DimensionMismatch` if the runs cover a different pixel count.
pub fn decode<P: Pixel>(runs: &[Run<P>], width: u32, height: u32) -> Result<Vec<P>> {
    let expected = width as u64 * height as u64;
    let actual = pixel_count(runs);
    if actual != expected {
        return Err(Error::DimensionMismatch { expected, actual });
    }

    let mut pixels = Vec::with_capacity(expected as usize);
    for run in runs {
        pixels.extend(std::iter::repeat(run.value).take(run.length as usize));
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    #[test]
    fn test_uniform_image_is_one_run() {
        let runs = encode(&[RED; 4]);
        assert_eq!(runs, vec![Run { length: 4, value: RED }]);
        assert_eq!(decode(&runs, 2, 2).unwrap(), vec![RED; 4]);
    }

    #[test]
    fn test_runs_break_on_change() {
        let pixels = [RED, RED, BLUE, RED, RED, RED];
        let runs = encode(&pixels);
        assert_eq!(
            runs,
            vec![
                Run { length: 2, value: RED },
                Run { length: 1, value: BLUE },
                Run { length: 3, value: RED },
            ]
        );
        assert_eq!(decode(&runs, 3, 2).unwrap(), pixels);
    }

    #[test]
    fn test_alternating_pixels_one_run_each() {
        let pixels: Vec<u8> = (0..10).map(|i| (i % 2) as u8).collect();
        assert_eq!(encode(&pixels).len(), pixels.len());
    }

    #[test]
    fn test_empty() {
        let runs = encode::<u8>(&[]);
        assert!(runs.is_empty());
        assert!(decode(&runs, 0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let runs = encode(&[7u8; 5]);
        assert!(matches!(
            decode(&runs, 2, 2),
            Err(Error::DimensionMismatch { expected: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_pixel_serialization() {
        let mut out = Vec::new();
        [1u8, 2, 3, 4].write_to(&mut out);
        9u8.write_to(&mut out);
        assert_eq!(out, vec![1, 2, 3, 4, 9]);
        assert_eq!(<[u8; 4]>::read_from(&out[..4]), Some([1, 2, 3, 4]));
        assert_eq!(<[u8; 3]>::read_from(&out[..4]), None);
        assert_eq!(<[u8; 3] as Pixel>::CHANNELS, 3);
        assert_eq!(<[u8; 4] as Pixel>::CHANNELS, 4);
        assert_eq!(<u8 as Pixel>::CHANNELS, 1);
    }
}
