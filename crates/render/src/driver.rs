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

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use glimmer_pool::{PollState, TaskError, ThreadPool};

use crate::camera::Camera;
use crate::hittable::World;
use crate::matrix::Matrix;
use crate::ray::Ray;
use crate::rng;
use crate::vec3::Color;

#[derive(Error, Debug)]
pub enum RenderError {
    /// A pixel task failed; one bad pixel aborts the render.
    #[error("Pixel task failed: {0}")]
    Task(#[from] TaskError),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: usize,
    pub height: usize,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}

/// Radiance arriving along `ray`: recursive scatter off the closest hit, sky
/// gradient on a miss, black once the bounce budget is spent.
pub fn ray_color(ray: &Ray, world: &World, depth: u32, rng: &mut impl Rng) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }
    // t_min 0.001 keeps re-scattered rays from immediately re-hitting their
    // own surface (shadow acne).
    if let Some(record) = world.hit(ray, 0.001, f64::INFINITY) {
        return match record.material.scatter(ray, &record, rng) {
            Some((attenuation, scattered)) => {
                attenuation * ray_color(&scattered, world, depth - 1, rng)
            }
            None => Color::ZERO,
        };
    }
    let unit_direction = ray.direction.unit();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
}

/// Renders the scene by fanning one task per pixel out over the pool, then
/// draining the handles in row-major order while helping with pending work.
///
/// The returned matrix holds raw color sums (row 0 = bottom scanline);
/// averaging and gamma are the image sink's job. Progress is reported on
/// stderr per completed scanline. Any pixel failure aborts the render.
pub fn render(
    pool: &ThreadPool,
    world: &Arc<World>,
    camera: Camera,
    options: &RenderOptions,
) -> RenderResult<Matrix<Color>> {
    let RenderOptions {
        width,
        height,
        samples_per_pixel,
        max_depth,
    } = *options;
    debug!(width, height, samples_per_pixel, max_depth, "render started");

    let mut handles = Vec::with_capacity(height * width);
    for row in 0..height {
        for col in 0..width {
            let world = Arc::clone(world);
            handles.push(pool.submit(move || {
                rng::with_rng(|rng| {
                    let mut accumulated = Color::ZERO;
                    for _ in 0..samples_per_pixel {
                        let u = (col as f64 + rng.gen_range(0.0..1.0)) / (width - 1) as f64;
                        let v = (row as f64 + rng.gen_range(0.0..1.0)) / (height - 1) as f64;
                        let ray = camera.ray(u, v, rng);
                        accumulated += ray_color(&ray, &world, max_depth, rng);
                    }
                    accumulated
                })
            }));
        }
    }

    let mut picture = Matrix::new(height, width);
    for row in 0..height {
        for col in 0..width {
            let handle = &handles[row * width + col];
            // Help-while-waiting: between polls, run someone else's pixel
            // instead of blocking.
            while handle.wait_for(Duration::ZERO) == PollState::TimedOut {
                pool.run_pending_task();
            }
            picture[(row, col)] = handle.get()?;
        }
        eprintln!("Scanlines completed: {}/{}", row + 1, height);
    }

    debug!("render finished");
    Ok(picture)
}
