//! Image buffer and file output.
//!
//! The renderer accumulates linear radiance into an [`Image`]; output
//! gamma-encodes each channel and writes either plain PPM (NetPBM P3) or
//! PNG. PPM files can also be read back with strict validation.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use glam::DVec3;
use log::info;

/// RGB color as linear magnitudes.
pub type Color = DVec3;

/// Encoding gamma applied when quantizing output channels.
const GAMMA: f64 = 2.0;

/// Returns the gamma-encoded value of the linear magnitude `d`.
fn linear_to_gamma(d: f64) -> f64 {
    d.max(0.0).powf(1.0 / GAMMA)
}

/// Quantizes one linear channel to an integer in [0, max_magnitude].
///
/// The + 0.999999 before truncation lets a linear value of exactly 1 reach
/// `max_magnitude` itself; emissive values above 1 are clamped there.
fn quantize(linear: f64, max_magnitude: u32) -> u32 {
    let scaled = (max_magnitude as f64 + 0.999999) * linear_to_gamma(linear);
    (scaled as i64).clamp(0, max_magnitude as i64) as u32
}

/// Row-major 2D array of linear RGB radiance values.
#[derive(Debug, Clone)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Image {
    /// Creates a black image with the given dimensions.
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width * height],
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at (row, col).
    pub fn pixel(&self, row: usize, col: usize) -> Color {
        self.pixels[row * self.width + col]
    }

    /// Mutable access to the pixel at (row, col).
    pub fn pixel_mut(&mut self, row: usize, col: usize) -> &mut Color {
        &mut self.pixels[row * self.width + col]
    }

    /// The backing pixel array, row by row; rayon splits it into disjoint
    /// row chunks during rendering.
    pub fn rows_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Writes this image in plain PPM (P3) format, gamma-encoded.
    pub fn write_as_ppm(&self, mut out: impl Write) -> io::Result<()> {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        for pixel in &self.pixels {
            writeln!(
                out,
                "{} {} {}",
                quantize(pixel.x, 255),
                quantize(pixel.y, 255),
                quantize(pixel.z, 255)
            )?;
        }
        Ok(())
    }

    /// Saves this image as a PPM file.
    pub fn save_as_ppm(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_as_ppm(&mut out)?;
        out.flush()?;
        info!("Image saved as {}", path.display());
        Ok(())
    }

    /// Saves this image as an 8-bit PNG, gamma-encoded like the PPM path.
    pub fn save_as_png(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let buffer = image::ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let pixel = self.pixel(y as usize, x as usize);
            image::Rgb([
                quantize(pixel.x, 255) as u8,
                quantize(pixel.y, 255) as u8,
                quantize(pixel.z, 255) as u8,
            ])
        });
        buffer
            .save(path)
            .map_err(|e| io::Error::other(format!("failed to encode {}: {e}", path.display())))?;
        info!("Image saved as {}", path.display());
        Ok(())
    }

    /// Reads a plain PPM (P3) file.
    ///
    /// Validation is strict: the magic token must be `P3`, followed by
    /// width, height, the maximum channel magnitude, and exactly
    /// width * height RGB triplets of non-negative integers no larger than
    /// that magnitude. Channels are scaled back to [0, 1] magnitudes.
    pub fn from_ppm_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let mut tokens = contents.split_ascii_whitespace();

        let magic = next_token(&mut tokens, path, "magic number")?;
        if magic != "P3" {
            return Err(invalid_ppm(path, format!("expected \"P3\", found \"{magic}\"")));
        }

        let width: usize = parse_field(path, next_token(&mut tokens, path, "image width")?, "image width")?;
        let height: usize =
            parse_field(path, next_token(&mut tokens, path, "image height")?, "image height")?;
        let max_magnitude: u32 =
            parse_field(path, next_token(&mut tokens, path, "max magnitude")?, "max magnitude")?;
        if max_magnitude == 0 {
            return Err(invalid_ppm(path, "max magnitude must be positive".to_string()));
        }

        let mut image = Image::with_dimensions(width, height);
        for index in 0..width * height {
            let mut channels = [0.0f64; 3];
            for channel in &mut channels {
                let what = format!("channel of pixel #{}", index + 1);
                let value: u32 = parse_field(path, next_token(&mut tokens, path, &what)?, &what)?;
                if value > max_magnitude {
                    return Err(invalid_ppm(
                        path,
                        format!("channel value {value} exceeds max magnitude {max_magnitude}"),
                    ));
                }
                *channel = value as f64 / max_magnitude as f64;
            }
            image.pixels[index] = Color::new(channels[0], channels[1], channels[2]);
        }

        if tokens.next().is_some() {
            return Err(invalid_ppm(path, "trailing data after pixel raster".to_string()));
        }

        Ok(image)
    }
}

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
    what: &str,
) -> io::Result<&'a str> {
    tokens
        .next()
        .ok_or_else(|| invalid_ppm(path, format!("missing {what}")))
}

fn invalid_ppm(path: &Path, message: String) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed PPM file {}: {message}", path.display()),
    )
}

/// Parses one whitespace-separated PPM field as an unsigned integer.
///
/// Signed parses are rejected wholesale, so negative channel values fail
/// here rather than producing wrapped magnitudes.
fn parse_field<T: std::str::FromStr>(path: &Path, token: &str, what: &str) -> io::Result<T> {
    token
        .parse()
        .map_err(|_| invalid_ppm(path, format!("could not parse {what} from \"{token}\"")))
}
