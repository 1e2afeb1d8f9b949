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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use glimmer_pool::ThreadPool;
use glimmer_render::{
    Camera, OutputFormat, Point3, RenderOptions, Vec3, random_scene, render, with_rng, write_image,
};

/// Path-traced sphere-field renderer
#[derive(Parser, Debug)]
#[command(name = "glimmer", about = "Path-traced sphere-field renderer")]
struct Cli {
    /// Output file path
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// Output encoder: ppm, png or jpeg (unknown values fall back to ppm)
    #[arg(short, long, default_value = "ppm")]
    format: String,

    /// Width/height ratio
    #[arg(short, long, default_value_t = 16.0 / 9.0)]
    aspect_ratio: f64,

    /// Image width in pixels
    #[arg(short, long, default_value_t = 1200)]
    width: usize,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 500)]
    samples_per_pixel: u32,

    /// Maximum ray bounce depth
    #[arg(short = 'd', long, default_value_t = 50)]
    max_depth: u32,

    /// Vertical field of view in degrees
    #[arg(short, long, default_value_t = 20.0)]
    vertical_field_of_view: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.format).unwrap_or_else(|| {
        eprintln!("Unknown format '{}', falling back to ppm", cli.format);
        OutputFormat::Ppm
    });
    let options = RenderOptions {
        width: cli.width,
        height: ((cli.width as f64 / cli.aspect_ratio) as usize).max(1),
        samples_per_pixel: cli.samples_per_pixel,
        max_depth: cli.max_depth,
    };

    let world = Arc::new(with_rng(|rng| random_scene(rng)));
    let camera = Camera::new(
        Point3::new(13.0, 2.0, 3.0),
        Point3::ZERO,
        Vec3::new(0.0, 1.0, 0.0),
        cli.vertical_field_of_view,
        cli.aspect_ratio,
        0.1,
        10.0,
    );

    let pool = ThreadPool::new().context("failed to start the worker pool")?;
    let start = Instant::now();
    let picture = render(&pool, &world, camera, &options).context("render failed")?;
    info!(elapsed = ?start.elapsed(), "render complete");

    write_image(&cli.output, format, &picture, options.samples_per_pixel)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(path = %cli.output.display(), format = format.as_str(), "image written");
    Ok(())
}
