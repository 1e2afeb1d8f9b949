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

use crate::ray::Ray;
use crate::vec3::{Point3, Vec3};

/// Positionable thin-lens camera. Cheap to copy, safe to read concurrently.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// `vertical_fov` is in degrees. `aperture` of zero gives a pinhole
    /// camera with everything in focus.
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        view_up: Vec3,
        vertical_fov: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_distance: f64,
    ) -> Self {
        let half_height = (vertical_fov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * half_height;
        let viewport_width = aspect_ratio * viewport_height;

        let w = (look_from - look_at).unit();
        let u = view_up.cross(w).unit();
        let v = w.cross(u);

        let horizontal = focus_distance * viewport_width * u;
        let vertical = focus_distance * viewport_height * v;
        let lower_left_corner =
            look_from - horizontal / 2.0 - vertical / 2.0 - focus_distance * w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: aperture / 2.0,
        }
    }

    /// Ray through viewport coordinates `(s, t)` in [0, 1]², with the origin
    /// jittered inside the lens disk for depth of field.
    pub fn ray(&self, s: f64, t: f64, rng: &mut impl Rng) -> Ray {
        let lens_point = self.lens_radius * Vec3::random_in_unit_disk(rng);
        let offset = self.u * lens_point.x + self.v * lens_point.y;
        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn pinhole_facing_negative_z() -> Camera {
        Camera::new(
            Point3::ZERO,
            Point3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            1.0,
        )
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = pinhole_facing_negative_z();
        let mut rng = SmallRng::seed_from_u64(1);
        let ray = camera.ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin, Point3::ZERO);
        assert!((ray.direction.unit() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_corner_rays_span_the_fov() {
        let camera = pinhole_facing_negative_z();
        let mut rng = SmallRng::seed_from_u64(2);
        // 90 degrees vertical FOV at focus distance 1: the viewport spans
        // [-1, 1] in both axes.
        let bottom_left = camera.ray(0.0, 0.0, &mut rng);
        assert!((bottom_left.direction - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-12);
        let top_right = camera.ray(1.0, 1.0, &mut rng);
        assert!((top_right.direction - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_aperture_jitters_the_origin() {
        let camera = Camera::new(
            Point3::ZERO,
            Point3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            2.0,
            1.0,
        );
        let mut rng = SmallRng::seed_from_u64(3);
        let jittered = (0..100)
            .map(|_| camera.ray(0.5, 0.5, &mut rng))
            .any(|ray| ray.origin != Point3::ZERO);
        assert!(jittered);
    }
}
