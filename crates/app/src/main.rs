//! huffpress command line.
//!
//! Reads a file (or generates a seeded sample), runs one engine operation,
//! writes the artifact or restored file, and prints a statistics summary.

mod config;
mod input_gen;

use config::{Command, Config};
use huffpress_core::{
    audio::{read_wav, write_wav},
    engine,
    error::{Error, Result},
    image::{artifact_channels, read_netpbm, write_netpbm, Raster, RasterImage},
    metrics::CompressionStats,
    rle::Pixel,
    symbol::Symbol,
    Container, ImageContainer,
};
use log::{debug, error, info};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run `huffpress --help` for usage");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(stats) => {
            if config.print_metrics {
                stats.print_summary();
            }
        }
        Err(e) => {
            error!("{:?} failed: {e}", config.command);
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(config: &Config) -> Result<CompressionStats> {
    let mut stats = CompressionStats::new();

    match config.command {
        Command::Compress => {
            let input = read_input(config, input_gen::generate_sample_data)?;
            let container = engine::compress(&input)?;
            record_huffman(&mut stats, &container);
            finish(config, &mut stats, input.len(), container.to_bytes()?)?;
        }
        Command::Decompress => {
            let artifact = read_artifact(config)?;
            let bytes = engine::decompress(&Container::<u8>::from_bytes(&artifact)?)?;
            finish(config, &mut stats, bytes.len(), artifact)?;
            write_output(config, &bytes)?;
        }
        Command::CompressText => {
            let text = match &config.input_file {
                Some(path) => String::from_utf8(std::fs::read(path)?)
                    .map_err(|e| Error::InvalidInput(format!("{}: not UTF-8 ({e})", path.display())))?,
                None => {
                    announce_sample(config);
                    input_gen::generate_sample_text(config.seed, config.sample_bytes)
                }
            };
            let container = engine::compress_text(&text)?;
            record_huffman(&mut stats, &container);
            finish(config, &mut stats, text.len(), container.to_bytes()?)?;
        }
        Command::DecompressText => {
            let artifact = read_artifact(config)?;
            let text = engine::decompress_text(&Container::<char>::from_bytes(&artifact)?)?;
            finish(config, &mut stats, text.len(), artifact)?;
            write_output(config, text.as_bytes())?;
        }
        Command::CompressAudio => {
            let (format, frames) = match &config.input_file {
                Some(path) => read_wav(&std::fs::read(path)?)?,
                None => {
                    announce_sample(config);
                    input_gen::generate_sample_audio(config.seed, config.sample_bytes)
                }
            };
            info!(
                "audio: {} ch, {} Hz, {} bit, {} frames",
                format.channels, format.sample_rate, format.bits_per_sample, format.frame_count
            );
            let container = engine::compress_audio(&frames, format)?;
            record_huffman(&mut stats, &container);
            finish(config, &mut stats, frames.len(), container.to_bytes()?)?;
        }
        Command::DecompressAudio => {
            let artifact = read_artifact(config)?;
            let (frames, format) = engine::decompress_audio(&Container::<u8>::from_bytes(&artifact)?)?;
            let wav = write_wav(&format, &frames)?;
            finish(config, &mut stats, wav.len(), artifact)?;
            write_output(config, &wav)?;
        }
        Command::CompressImage => {
            let raster = match &config.input_file {
                Some(path) => read_netpbm(&std::fs::read(path)?)?,
                None => {
                    announce_sample(config);
                    let (pixels, width, height) = input_gen::generate_sample_image(config.seed, config.sample_bytes);
                    RasterImage {
                        width,
                        height,
                        pixels: Raster::Rgb(pixels),
                    }
                }
            };
            let artifact = match &raster.pixels {
                Raster::Gray(pixels) => compress_raster(&mut stats, pixels, raster.width, raster.height)?,
                Raster::Rgb(pixels) => compress_raster(&mut stats, pixels, raster.width, raster.height)?,
            };
            let raw_len = stats.pixels as usize * channels_of(&raster.pixels);
            finish(config, &mut stats, raw_len, artifact)?;
        }
        Command::DecompressImage => {
            let artifact = read_artifact(config)?;
            let raster = match artifact_channels(&artifact)? {
                1 => {
                    let (pixels, width, height) = decompress_raster::<u8>(&mut stats, &artifact)?;
                    RasterImage {
                        width,
                        height,
                        pixels: Raster::Gray(pixels),
                    }
                }
                3 => {
                    let (pixels, width, height) = decompress_raster::<[u8; 3]>(&mut stats, &artifact)?;
                    RasterImage {
                        width,
                        height,
                        pixels: Raster::Rgb(pixels),
                    }
                }
                other => {
                    return Err(Error::InvalidInput(format!(
                        "{other}-channel images cannot be written as netpbm"
                    )))
                }
            };
            let raw_len = stats.pixels as usize * channels_of(&raster.pixels);
            finish(config, &mut stats, raw_len, artifact)?;
            let gray = matches!(raster.pixels, Raster::Gray(_));
            if let Some(path) = config.raster_output(gray) {
                let bytes = write_netpbm(&raster)?;
                write_file(&path, &bytes)?;
                println!("Wrote {} bytes to {}", bytes.len(), path.display());
            }
        }
        Command::Roundtrip => {
            let input = read_input(config, input_gen::generate_sample_data)?;
            let container = engine::compress(&input)?;
            record_huffman(&mut stats, &container);
            let artifact = container.to_bytes()?;
            let restored = engine::decompress(&Container::<u8>::from_bytes(&artifact)?)?;
            if restored != input {
                return Err(Error::CorruptStream {
                    reason: format!(
                        "round trip produced {} bytes that differ from the {} input bytes",
                        restored.len(),
                        input.len()
                    ),
                });
            }
            println!("Round trip OK: {} bytes -> {} bytes -> {} bytes", input.len(), artifact.len(), restored.len());
            finish(config, &mut stats, input.len(), artifact)?;
        }
    }

    Ok(stats)
}

/// Read the input file, or generate a sample when none was given.
fn read_input(config: &Config, generate: fn(u64, usize) -> Vec<u8>) -> Result<Vec<u8>> {
    match &config.input_file {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            announce_sample(config);
            Ok(generate(config.seed, config.sample_bytes))
        }
    }
}

fn read_artifact(config: &Config) -> Result<Vec<u8>> {
    let path = config
        .input_file
        .as_deref()
        .ok_or_else(|| Error::Config("no artifact to read".to_string()))?;
    debug!("reading artifact {}", path.display());
    Ok(std::fs::read(path)?)
}

fn announce_sample(config: &Config) {
    println!("Generating {} byte sample (seed {})", config.sample_bytes, config.seed);
}

/// Close out the stats and, for compress commands, write the artifact.
fn finish(config: &Config, stats: &mut CompressionStats, original_len: usize, artifact: Vec<u8>) -> Result<()> {
    stats.original_bytes = original_len as u64;
    stats.artifact_bytes = artifact.len() as u64;
    stats.complete();

    let compressing = matches!(
        config.command,
        Command::Compress | Command::CompressText | Command::CompressAudio | Command::CompressImage
    );
    if compressing {
        write_output(config, &artifact)?;
    }
    Ok(())
}

fn write_output(config: &Config, bytes: &[u8]) -> Result<()> {
    if let Some(path) = &config.output_file {
        write_file(path, bytes)?;
        println!("Wrote {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    debug!("wrote {}", path.display());
    Ok(())
}

fn record_huffman<S: Symbol>(stats: &mut CompressionStats, container: &Container<S>) {
    let table = container.code_table();
    let payload = container.payload();
    let data_bytes = payload.len().saturating_sub(1) as u64;
    let pad = payload.pad_bits().unwrap_or(0) as u64;

    stats.symbols = container.symbol_count();
    stats.alphabet_size = table.len() as u64;
    stats.encoded_bits = (data_bytes * 8).saturating_sub(pad);
    stats.max_code_len = table.max_len();
}

fn compress_raster<P: Pixel>(stats: &mut CompressionStats, pixels: &[P], width: u32, height: u32) -> Result<Vec<u8>> {
    let image = engine::compress_image(pixels, width, height)?;
    stats.pixels = pixels.len() as u64;
    stats.runs = image.runs.len() as u64;
    image.to_bytes()
}

fn decompress_raster<P: Pixel>(stats: &mut CompressionStats, artifact: &[u8]) -> Result<(Vec<P>, u32, u32)> {
    let image = ImageContainer::<P>::from_bytes(artifact)?;
    stats.runs = image.runs.len() as u64;
    let decoded = engine::decompress_image(&image)?;
    stats.pixels = decoded.0.len() as u64;
    Ok(decoded)
}

fn channels_of(raster: &Raster) -> usize {
    match raster {
        Raster::Gray(_) => 1,
        Raster::Rgb(_) => 3,
    }
}
