//! Compression statistics for one run.
//!
//! Collected by the caller around engine calls; reports the original vs.
//! artifact size comparison plus code quality figures.

use std::time::{Duration, Instant};

/// Counters for a single compress or decompress run.
#[derive(Debug, Clone)]
pub struct CompressionStats {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Bytes of the uncompressed side (file or frames)
    pub original_bytes: u64,

    /// Bytes of the serialized artifact
    pub artifact_bytes: u64,

    // === Huffman ===
    /// Symbols encoded (0 for image runs)
    pub symbols: u64,

    /// Distinct symbols in the code table
    pub alphabet_size: u64,

    /// Codeword bits emitted, excluding padding
    pub encoded_bits: u64,

    /// Longest codeword length
    pub max_code_len: u8,

    // === RLE ===
    /// Pixels covered
    pub pixels: u64,

    /// Runs emitted
    pub runs: u64,
}

impl CompressionStats {
    /// Create stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            original_bytes: 0,
            artifact_bytes: 0,
            symbols: 0,
            alphabet_size: 0,
            encoded_bits: 0,
            max_code_len: 0,
            pixels: 0,
            runs: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Artifact size over original size; 0.0 when nothing was read.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.artifact_bytes as f64 / self.original_bytes as f64
        }
    }

    /// Average codeword length in bits per symbol.
    pub fn mean_code_len(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.encoded_bits as f64 / self.symbols as f64
        }
    }

    /// Average pixels per run.
    pub fn mean_run_len(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.pixels as f64 / self.runs as f64
        }
    }

    /// Original bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.original_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Original: {} bytes ({:.2} KiB)", self.original_bytes, self.original_bytes as f64 / 1024.0);
        println!("Artifact: {} bytes ({:.2} KiB)", self.artifact_bytes, self.artifact_bytes as f64 / 1024.0);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);

        if self.symbols > 0 {
            println!();
            println!("=== Huffman ===");
            println!("Symbols: {}", self.symbols);
            println!("Alphabet: {}", self.alphabet_size);
            println!("Mean code length: {:.3} bits", self.mean_code_len());
            println!("Longest code: {} bits", self.max_code_len);
        }

        if self.runs > 0 {
            println!();
            println!("=== Run-length ===");
            println!("Pixels: {}", self.pixels);
            println!("Runs: {}", self.runs);
            println!("Mean run length: {:.2}", self.mean_run_len());
        }

        println!();
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export stats as `key=value` lines.
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             original_bytes={}\n\
             artifact_bytes={}\n\
             compression_ratio={:.4}\n\
             symbols={}\n\
             alphabet_size={}\n\
             mean_code_len={:.4}\n\
             pixels={}\n\
             runs={}\n",
            self.duration().as_millis(),
            self.original_bytes,
            self.artifact_bytes,
            self.compression_ratio(),
            self.symbols,
            self.alphabet_size,
            self.mean_code_len(),
            self.pixels,
            self.runs,
        )
    }
}

impl Default for CompressionStats {
    fn default() -> Self {
        Self::new()
    }
}
