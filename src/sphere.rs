//! Spheres, intersected by solving the reduced ("h-form") quadratic.

use glam::DVec3;

use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::MaterialKind;
use crate::ray::Ray;

/// A sphere with its bounding box precomputed at construction, since the
/// BVH builder asks for bounds far more often than the sphere changes
/// (never).
#[derive(Debug, Clone)]
pub struct Sphere {
    /// World-space center.
    pub center: DVec3,

    /// Non-negative radius; see [`Sphere::new`].
    pub radius: f64,

    /// How the surface responds to light.
    pub material: MaterialKind,

    aabb: Aabb,
}

impl Sphere {
    /// Builds a sphere, forcing a negative `radius` up to zero rather than
    /// letting it produce an inside-out surface.
    pub fn new(center: DVec3, radius: f64, material: MaterialKind) -> Self {
        let radius = radius.max(0.0);
        let extent = DVec3::splat(radius);
        Self {
            center,
            radius,
            material,
            aabb: Aabb::from_points(&[center - extent, center + extent]),
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = self.center - r.origin;

        // Reduced quadratic coefficients: a t^2 - 2 h t + c = 0
        let a = r.direction.length_squared();
        let h = r.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the closer root; fall back to the far one when the near
        // root is outside the query range (origin inside the sphere).
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = r.at(root);
        let outward_normal = (point - self.center) / self.radius;
        Some(HitRecord::new(root, point, outward_normal, r, self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn unit_half_sphere() -> Sphere {
        Sphere::new(
            DVec3::new(0.0, 0.0, -1.0),
            0.5,
            MaterialKind::Lambertian {
                albedo: Color::splat(0.5),
            },
        )
    }

    #[test]
    fn test_hit_from_outside() {
        let sphere = unit_half_sphere();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&ray, Interval::with_min(0.001)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
        assert!((rec.unit_normal - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_hit_from_inside_flips_normal() {
        let sphere = unit_half_sphere();
        let ray = Ray::new(DVec3::new(0.0, 0.0, -1.0), DVec3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&ray, Interval::with_min(0.001)).unwrap();
        assert!(!rec.front_face);
        // Normal must still oppose the ray.
        assert!(ray.direction.dot(rec.unit_normal) < 0.0);
    }

    #[test]
    fn test_miss() {
        let sphere = unit_half_sphere();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::with_min(0.001)).is_none());
    }

    #[test]
    fn test_range_is_exclusive() {
        let sphere = unit_half_sphere();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        // Both roots (0.5 and 1.5) sit outside (or on the edge of) the range.
        assert!(sphere.hit(&ray, Interval::new(0.5, 1.5)).is_none());
        // Second root is found when the first is excluded.
        let rec = sphere.hit(&ray, Interval::new(0.5, 2.0)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_spans_radius() {
        let sphere = Sphere::new(
            DVec3::new(1.0, 2.0, 3.0),
            2.0,
            MaterialKind::Lambertian {
                albedo: Color::ONE,
            },
        );
        let aabb = sphere.bounding_box();
        assert_eq!(aabb.x.min, -1.0);
        assert_eq!(aabb.x.max, 3.0);
        assert_eq!(aabb.y.min, 0.0);
        assert_eq!(aabb.z.max, 5.0);
    }

    #[test]
    fn test_negative_radius_clamped() {
        let sphere = Sphere::new(
            DVec3::ZERO,
            -1.0,
            MaterialKind::Lambertian {
                albedo: Color::ONE,
            },
        );
        assert_eq!(sphere.radius, 0.0);
    }
}
