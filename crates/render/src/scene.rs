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

use crate::hittable::World;
use crate::material::Material;
use crate::sphere::Sphere;
use crate::vec3::{Color, Point3, Vec3};

/// The demo scene: a gray ground sphere, a 22×22 field of small randomly
/// materialized spheres, and three large feature spheres.
pub fn random_scene(rng: &mut impl Rng) -> World {
    let mut world = World::new();

    world.add(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::Lambertian {
            albedo: Color::new(0.5, 0.5, 0.5),
        },
    ));

    for a in -11..11 {
        for b in -11..11 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen_range(0.0..1.0),
                0.2,
                b as f64 + 0.9 * rng.gen_range(0.0..1.0),
            );
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choice: f64 = rng.gen_range(0.0..1.0);
            let material = if choice < 0.8 {
                Material::Lambertian {
                    albedo: Vec3::random(rng) * Vec3::random(rng),
                }
            } else if choice < 0.95 {
                Material::Metal {
                    albedo: Vec3::random_range(rng, 0.5, 1.0),
                    fuzz: rng.gen_range(0.0..0.5),
                }
            } else {
                Material::Dielectric {
                    refraction_index: 1.5,
                }
            };
            world.add(Sphere::new(center, 0.2, material));
        }
    }

    world.add(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Material::Dielectric {
            refraction_index: 1.5,
        },
    ));
    world.add(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        },
    ));
    world.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Material::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    ));

    world
}
