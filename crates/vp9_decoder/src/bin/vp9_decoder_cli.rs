//! Simple CLI wrapper for the library.
//!
//! Usage:
//!   vp9-decoder <input.ivf> [output_dir] [--yuv] [--png]

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vp9_decoder::{ColorSpace, DecodedFrame, IvfReader, Vp9Decoder};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let mut input_path: Option<String> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut dump_yuv = false;
    let mut dump_png = false;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--yuv" => dump_yuv = true,
            "--png" => dump_png = true,
            _ => {
                if input_path.is_none() {
                    input_path = Some(arg.clone());
                } else if output_dir.is_none() {
                    output_dir = Some(PathBuf::from(arg));
                } else {
                    eprintln!("Unexpected argument: {arg}");
                    eprintln!("Usage: {} <input.ivf> [output_dir] [--yuv] [--png]", args[0]);
                    std::process::exit(1);
                }
            }
        }
    }

    let Some(input_path) = input_path else {
        eprintln!("Usage: {} <input.ivf> [output_dir] [--yuv] [--png]", args[0]);
        std::process::exit(1);
    };

    if output_dir.is_some() && !dump_yuv && !dump_png {
        dump_yuv = true;
    }

    if let Err(e) = run(&input_path, output_dir.as_deref(), dump_yuv, dump_png) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(input_path: &str, output_dir: Option<&Path>, dump_yuv: bool, dump_png: bool) -> Result<()> {
    let file = File::open(input_path).with_context(|| format!("opening {input_path}"))?;
    let mut ivf = IvfReader::new(BufReader::new(file))?;
    let mut dec = Vp9Decoder::new();

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut chunks: u64 = 0;
    let mut idx: u64 = 0;
    while let Some(chunk) = ivf.next_frame()? {
        chunks += 1;
        let frames = dec
            .decode_chunk(&chunk.data)
            .with_context(|| format!("decoding chunk {chunks} (pts {})", chunk.timestamp))?;

        for frame in frames {
            idx += 1;
            log::info!("frame {idx}: {}x{} key={}", frame.width, frame.height, frame.key_frame);

            if let Some(dir) = output_dir {
                if dump_yuv {
                    let fname = dir.join(format!("frame_{:06}.yuv", idx));
                    write_yuv_frame(&fname, &frame)?;
                }
                if dump_png {
                    let fname = dir.join(format!("frame_{:06}.png", idx));
                    write_png_frame(&fname, &frame)?;
                }
            }
        }
    }

    println!("{chunks} chunks, {idx} frames");
    Ok(())
}

/// Planar Y, U, V at the visible size: one byte per sample at 8 bits,
/// 16-bit little-endian otherwise.
fn write_yuv_frame(path: &Path, frame: &DecodedFrame) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    for plane in 0..3 {
        let samples = frame.cropped_plane(plane);
        if frame.color.bit_depth == 8 {
            let bytes: Vec<u8> = samples.iter().map(|&v| v as u8).collect();
            w.write_all(&bytes)?;
        } else {
            let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
            w.write_all(&bytes)?;
        }
    }
    w.flush()?;
    Ok(())
}

fn write_png_frame(path: &Path, frame: &DecodedFrame) -> Result<()> {
    let w = frame.width as usize;
    let h = frame.height as usize;
    let shift = frame.color.bit_depth - 8;
    let ssx = frame.color.subsampling_x as usize;
    let ssy = frame.color.subsampling_y as usize;
    let planes = &frame.planes;
    let sample = |p: usize, x: usize, y: usize| (planes[p].get(x, y) >> shift) as i32;

    let mut rgb = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let yy = sample(0, x, y);
            let cb = sample(1, x >> ssx, y >> ssy);
            let cr = sample(2, x >> ssx, y >> ssy);

            let (r, g, b) = if frame.color.color_space == ColorSpace::Rgb {
                // planes hold G, B, R
                (cr, yy, cb)
            } else {
                // BT.601 studio range integer conversion
                let c = yy - 16;
                let d = cb - 128;
                let e = cr - 128;
                (
                    (298 * c + 409 * e + 128) >> 8,
                    (298 * c - 100 * d - 208 * e + 128) >> 8,
                    (298 * c + 516 * d + 128) >> 8,
                )
            };

            let o = (y * w + x) * 3;
            rgb[o] = r.clamp(0, 255) as u8;
            rgb[o + 1] = g.clamp(0, 255) as u8;
            rgb[o + 2] = b.clamp(0, 255) as u8;
        }
    }

    let file = BufWriter::new(File::create(path)?);
    let mut enc = png::Encoder::new(file, frame.width, frame.height);
    enc.set_color(png::ColorType::Rgb);
    enc.set_depth(png::BitDepth::Eight);
    let mut writer = enc.write_header().context("PNG header error")?;
    writer.write_image_data(&rgb).context("PNG write error")?;
    Ok(())
}
