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

use crate::hittable::HitRecord;
use crate::material::Material;
use crate::ray::Ray;
use crate::vec3::Point3;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f64,
    pub material: Material,
}

impl Sphere {
    pub const fn new(center: Point3, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_discriminant = discriminant.sqrt();

        // Nearest root in range, falling back to the far root for rays that
        // start inside the sphere.
        let mut root = (-half_b - sqrt_discriminant) / a;
        if root < t_min || t_max < root {
            root = (-half_b + sqrt_discriminant) / a;
            if root < t_min || t_max < root {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, outward_normal, root, self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::{Color, Vec3};

    fn unit_sphere_at(z: f64) -> Sphere {
        Sphere::new(
            Point3::new(0.0, 0.0, z),
            1.0,
            Material::Lambertian {
                albedo: Color::new(0.5, 0.5, 0.5),
            },
        )
    }

    #[test]
    fn test_head_on_hit_takes_near_root() {
        let sphere = unit_sphere_at(-3.0);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let record = sphere.hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((record.t - 2.0).abs() < 1e-12);
        assert!(record.front_face);
        assert_eq!(record.normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_ray_starting_inside_takes_far_root() {
        let sphere = unit_sphere_at(0.0);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let record = sphere.hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((record.t - 1.0).abs() < 1e-12);
        assert!(!record.front_face);
    }

    #[test]
    fn test_miss_returns_none() {
        let sphere = unit_sphere_at(-3.0);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn test_hit_behind_t_max_is_rejected() {
        let sphere = unit_sphere_at(-3.0);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.hit(&ray, 0.001, 1.5).is_none());
    }

    #[test]
    fn test_tangent_ray_grazes() {
        let sphere = unit_sphere_at(-3.0);
        let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let record = sphere.hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((record.t - 3.0).abs() < 1e-9);
    }
}
