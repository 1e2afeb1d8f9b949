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

//! Monte-Carlo path tracer over a static sphere scene.
//!
//! The sampling driver fans one task per pixel out over a
//! [`glimmer_pool::ThreadPool`] and drains the results while helping with
//! pending work. Everything else here is the maths the tasks run: camera ray
//! generation, sphere intersection, material scattering, and the image sinks
//! that turn accumulated color sums into files.

mod camera;
mod color;
mod driver;
mod hittable;
mod material;
mod matrix;
mod ray;
mod rng;
mod scene;
mod sink;
mod sphere;
mod vec3;

pub use camera::*;
pub use color::*;
pub use driver::*;
pub use hittable::*;
pub use material::*;
pub use matrix::*;
pub use ray::*;
pub use rng::*;
pub use scene::*;
pub use sink::*;
pub use sphere::*;
pub use vec3::*;
