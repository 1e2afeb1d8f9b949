// Glimmer
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::color;
use crate::matrix::Matrix;
use crate::vec3::Color;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type SinkResult<T> = Result<T, SinkError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Ppm,
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Case-insensitive parse; `None` for encoders we do not have.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ppm" => Some(OutputFormat::Ppm),
            "png" => Some(OutputFormat::Png),
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Ppm => "ppm",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }
}

/// Writes the accumulated picture with the selected encoder. Averaging,
/// gamma correction and quantization all happen here; the driver hands over
/// raw color sums.
pub fn write_image(
    path: &Path,
    format: OutputFormat,
    picture: &Matrix<Color>,
    samples_per_pixel: u32,
) -> SinkResult<()> {
    debug!(
        path = %path.display(),
        format = format.as_str(),
        width = picture.cols(),
        height = picture.rows(),
        "writing image"
    );
    match format {
        OutputFormat::Ppm => write_ppm(path, picture, samples_per_pixel),
        OutputFormat::Png => write_png(path, picture, samples_per_pixel),
        OutputFormat::Jpeg => write_jpeg(path, picture, samples_per_pixel),
    }
}

/// Plain-text P3, one triple per line. Scanlines go out in storage order,
/// bottom row first.
fn write_ppm(path: &Path, picture: &Matrix<Color>, samples_per_pixel: u32) -> SinkResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P3\n{} {}\n255\n", picture.cols(), picture.rows())?;
    for row in 0..picture.rows() {
        for col in 0..picture.cols() {
            let [r, g, b] = color::to_rgb8(picture[(row, col)], samples_per_pixel);
            writeln!(out, "{r} {g} {b}")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_png(path: &Path, picture: &Matrix<Color>, samples_per_pixel: u32) -> SinkResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    rgb_buffer(picture, samples_per_pixel).write_to(&mut out, image::ImageFormat::Png)?;
    Ok(())
}

fn write_jpeg(path: &Path, picture: &Matrix<Color>, samples_per_pixel: u32) -> SinkResult<()> {
    let out = BufWriter::new(File::create(path)?);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(out, 100);
    rgb_buffer(picture, samples_per_pixel).write_with_encoder(encoder)?;
    Ok(())
}

/// Raster encoders want the top row first; the picture stores the bottom row
/// first, so flip while quantizing.
fn rgb_buffer(picture: &Matrix<Color>, samples_per_pixel: u32) -> image::RgbImage {
    image::RgbImage::from_fn(
        picture.cols() as u32,
        picture.rows() as u32,
        |x, y| {
            let row = picture.rows() - 1 - y as usize;
            image::Rgb(color::to_rgb8(picture[(row, x as usize)], samples_per_pixel))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient_about_case_and_jpg() {
        assert_eq!(OutputFormat::parse("ppm"), Some(OutputFormat::Ppm));
        assert_eq!(OutputFormat::parse("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("webp"), None);
        assert_eq!(OutputFormat::parse(""), None);
    }

    #[test]
    fn test_rgb_buffer_flips_rows() {
        let mut picture: Matrix<Color> = Matrix::new(2, 1);
        picture[(0, 0)] = Color::new(1.0, 0.0, 0.0); // bottom row, red
        picture[(1, 0)] = Color::new(0.0, 1.0, 0.0); // top row, green
        let buffer = rgb_buffer(&picture, 1);
        // Buffer row 0 is the top of the image.
        assert_eq!(buffer.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(buffer.get_pixel(0, 1).0, [255, 0, 0]);
    }
}
