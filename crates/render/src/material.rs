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

use rand::Rng;

use crate::hittable::HitRecord;
use crate::ray::Ray;
use crate::vec3::{Color, Vec3};

/// Surface behavior at a hit point.
#[derive(Clone, Copy, Debug)]
pub enum Material {
    /// Diffuse surface; `albedo` is the fraction of light it reflects.
    Lambertian { albedo: Color },
    /// Mirror reflection, perturbed by `fuzz` (0 = polished).
    Metal { albedo: Color, fuzz: f64 },
    /// Clear glass-like surface described by its refraction index.
    Dielectric { refraction_index: f64 },
}

impl Material {
    /// Scatters an incoming ray. Returns the attenuation and the scattered
    /// ray, or `None` when the surface absorbs the ray.
    pub fn scatter(
        &self,
        ray: &Ray,
        record: &HitRecord,
        rng: &mut impl Rng,
    ) -> Option<(Color, Ray)> {
        match *self {
            Material::Lambertian { albedo } => {
                let mut direction = record.normal + Vec3::random_unit_vector(rng);
                // A sample that cancels the normal would make a degenerate ray.
                if direction.near_zero() {
                    direction = record.normal;
                }
                Some((albedo, Ray::new(record.point, direction)))
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = ray.direction.unit().reflect(record.normal);
                let scattered = Ray::new(
                    record.point,
                    reflected + fuzz * Vec3::random_in_unit_sphere(rng),
                );
                // Fuzzed rays that end up under the surface are absorbed.
                (scattered.direction.dot(record.normal) > 0.0).then_some((albedo, scattered))
            }
            Material::Dielectric { refraction_index } => {
                let refraction_ratio = if record.front_face {
                    1.0 / refraction_index
                } else {
                    refraction_index
                };
                let unit_direction = ray.direction.unit();
                let cos_theta = (-unit_direction).dot(record.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = refraction_ratio * sin_theta > 1.0;
                let direction = if cannot_refract
                    || reflectance(cos_theta, refraction_ratio) > rng.gen_range(0.0..1.0)
                {
                        unit_direction.reflect(record.normal)
                    } else {
                        unit_direction.refract(record.normal, refraction_ratio)
                    };
                Some((Color::new(1.0, 1.0, 1.0), Ray::new(record.point, direction)))
            }
        }
    }
}

/// Schlick's approximation for reflectance at an interface.
fn reflectance(cos_theta: f64, refraction_ratio: f64) -> f64 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}
