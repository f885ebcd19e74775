//! Configuration for the huffpress command line.
//!
//! Handles parsing command-line arguments and filling in defaults. Compress
//! commands work without an input file: a sample is generated from a seed,
//! and the seed is printed so the run can be repeated.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// What to do with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Compress,
    Decompress,
    CompressText,
    DecompressText,
    CompressImage,
    DecompressImage,
    CompressAudio,
    DecompressAudio,
    /// Compress and decompress bytes in memory, verifying the result
    Roundtrip,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "compress" => Command::Compress,
            "decompress" => Command::Decompress,
            "compress-text" => Command::CompressText,
            "decompress-text" => Command::DecompressText,
            "compress-image" => Command::CompressImage,
            "decompress-image" => Command::DecompressImage,
            "compress-audio" => Command::CompressAudio,
            "decompress-audio" => Command::DecompressAudio,
            "roundtrip" => Command::Roundtrip,
            _ => return None,
        })
    }

    /// Decompress commands need an existing artifact to read.
    pub fn requires_input(&self) -> bool {
        matches!(
            self,
            Command::Decompress | Command::DecompressText | Command::DecompressImage | Command::DecompressAudio
        )
    }

    /// Default output path for an input stem, or None if nothing is written.
    fn default_output(&self, stem: &str) -> Option<PathBuf> {
        let name = match self {
            Command::Compress => format!("{stem}.hpak"),
            Command::Decompress => format!("decompressed_{stem}.bin"),
            Command::CompressText => format!("{stem}.huff"),
            Command::DecompressText => format!("decompressed_{stem}.txt"),
            Command::CompressImage => format!("{stem}.rle"),
            Command::DecompressImage => format!("decompressed_{stem}.pnm"),
            Command::CompressAudio => format!("{stem}.huffaudio"),
            Command::DecompressAudio => format!("decompressed_{stem}.wav"),
            Command::Roundtrip => return None,
        };
        Some(PathBuf::from(name))
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input file path (None = generate sample)
    pub input_file: Option<PathBuf>,

    /// Output file path (None = nothing written)
    pub output_file: Option<PathBuf>,

    /// Whether `output_file` was derived rather than given with --out
    pub output_defaulted: bool,

    // === Samples ===
    /// Seed for sample generation
    pub seed: u64,

    /// Approximate size of a generated sample in bytes
    pub sample_bytes: usize,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the statistics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (without argv[0]).
    ///
    /// If --seed is not given, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut command: Option<Command> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--in" => {
                    let value = args.next().ok_or("--in requires a path")?;
                    input_file = Some(PathBuf::from(value));
                }
                "--out" => {
                    let value = args.next().ok_or("--out requires a path")?;
                    output_file = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = args.next().ok_or("--seed requires a number")?;
                    seed = Some(value.parse().map_err(|_| "invalid seed")?);
                }
                "--sample-bytes" => {
                    let value = args.next().ok_or("--sample-bytes requires a number")?;
                    sample_bytes = Some(value.parse().map_err(|_| "invalid sample-bytes")?);
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other if command.is_none() && !other.starts_with('-') => {
                    command = Some(Command::parse(other).ok_or_else(|| format!("unknown command: {other}"))?);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }

        let command = command.ok_or("missing command")?;
        if command.requires_input() && input_file.is_none() {
            return Err("this command requires --in <PATH>".to_string());
        }

        let seed = seed.unwrap_or_else(time_seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let stem = input_file
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());
        let output_defaulted = output_file.is_none();
        let output_file = output_file.or_else(|| command.default_output(&stem));

        Ok(Config {
            command,
            input_file,
            output_file,
            output_defaulted,
            seed,
            sample_bytes: sample_bytes.unwrap_or_else(|| rng.gen_range(4096..=65536)),
            print_config,
            print_metrics,
        })
    }

    /// Output path for a restored raster.
    ///
    /// A derived name gets `.pgm` for graymaps and `.ppm` for pixmaps; an
    /// explicit --out path is kept as given.
    pub fn raster_output(&self, gray: bool) -> Option<PathBuf> {
        let path = self.output_file.as_ref()?;
        if !self.output_defaulted {
            return Some(path.clone());
        }
        Some(path.with_extension(if gray { "pgm" } else { "ppm" }))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let show = |p: &Option<PathBuf>, none: &str| {
            p.as_ref()
                .map_or_else(|| none.to_string(), |p| p.display().to_string())
        };
        println!("=== Configuration ===");
        println!("Command:     {:?}", self.command);
        println!("Input file:  {}", show(&self.input_file, "(generate sample)"));
        println!("Output file: {}", show(&self.output_file, "(none)"));
        println!("Seed:        {}", self.seed);
        println!("Sample size: {} bytes", self.sample_bytes);
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn print_help() {
    println!("huffpress: lossless Huffman / run-length compression");
    println!();
    println!("USAGE:");
    println!("    huffpress <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    compress            Huffman-compress any file (.hpak)");
    println!("    decompress          Restore a .hpak artifact");
    println!("    compress-text       Huffman-compress UTF-8 text per character (.huff)");
    println!("    decompress-text     Restore a .huff artifact");
    println!("    compress-image      Run-length compress a PGM/PPM image (.rle)");
    println!("    decompress-image    Restore a .rle artifact as PGM/PPM");
    println!("    compress-audio      Huffman-compress PCM WAV frames (.huffaudio)");
    println!("    decompress-audio    Restore a .huffaudio artifact as WAV");
    println!("    roundtrip           Compress and decompress in memory, verifying output");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>          Input file (compress default: generate sample)");
    println!("    --out <PATH>         Output file (default: derived from input name)");
    println!("    --seed <N>           Random seed for sample generation");
    println!("    --sample-bytes <N>   Generated sample size (default: random 4-64 KiB)");
    println!("    --print-config       Print resolved configuration");
    println!("    --no-metrics         Don't print the statistics summary");
    println!("    --help, -h           Print this help");
    println!();
    println!("Set RUST_LOG=debug for pipeline logging.");
    println!();
    println!("EXAMPLES:");
    println!("    huffpress compress-text --in notes.txt          # writes notes.huff");
    println!("    huffpress decompress-text --in notes.huff       # writes decompressed_notes.txt");
    println!("    huffpress compress-image --seed 42              # sample image -> sample.rle");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_output_names() {
        let config = Config::from_args(&args(&["compress-text", "--in", "docs/notes.txt"])).unwrap();
        assert_eq!(config.command, Command::CompressText);
        assert_eq!(config.output_file, Some(PathBuf::from("notes.huff")));

        let config = Config::from_args(&args(&["decompress-audio", "--in", "song.huffaudio"])).unwrap();
        assert_eq!(config.output_file, Some(PathBuf::from("decompressed_song.wav")));

        let config = Config::from_args(&args(&["compress-image", "--seed", "1"])).unwrap();
        assert_eq!(config.output_file, Some(PathBuf::from("sample.rle")));
    }

    #[test]
    fn test_raster_output_extension() {
        let config = Config::from_args(&args(&["decompress-image", "--in", "scan.rle"])).unwrap();
        assert_eq!(config.raster_output(true), Some(PathBuf::from("decompressed_scan.pgm")));
        assert_eq!(config.raster_output(false), Some(PathBuf::from("decompressed_scan.ppm")));

        let config =
            Config::from_args(&args(&["decompress-image", "--in", "scan.rle", "--out", "restored.img"])).unwrap();
        assert_eq!(config.raster_output(true), Some(PathBuf::from("restored.img")));
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_args(&args(&[
            "roundtrip",
            "--seed",
            "42",
            "--sample-bytes",
            "100",
            "--no-metrics",
        ]))
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.sample_bytes, 100);
        assert!(!config.print_metrics);
        assert_eq!(config.output_file, None);
    }

    #[test]
    fn test_seeded_defaults_are_reproducible() {
        let a = Config::from_args(&args(&["compress", "--seed", "7"])).unwrap();
        let b = Config::from_args(&args(&["compress", "--seed", "7"])).unwrap();
        assert_eq!(a.sample_bytes, b.sample_bytes);
        assert!((4096..=65536).contains(&a.sample_bytes));
    }

    #[test]
    fn test_errors() {
        assert!(Config::from_args(&args(&[])).is_err());
        assert!(Config::from_args(&args(&["squash"])).is_err());
        assert!(Config::from_args(&args(&["decompress"])).is_err());
        assert!(Config::from_args(&args(&["compress", "--seed"])).is_err());
        assert!(Config::from_args(&args(&["compress", "--seed", "x"])).is_err());
        assert!(Config::from_args(&args(&["compress", "--bogus"])).is_err());
    }
}
