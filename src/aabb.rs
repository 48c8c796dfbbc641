//! Axis-aligned bounding boxes tested with the slab method.
//!
//! A 3D AABB is the intersection of three axis intervals ("slabs"). Rays are
//! tested against it by intersecting the per-axis parameter ranges.

use glam::DVec3;

use crate::interval::Interval;
use crate::ray::Ray;

/// Axis-aligned bounding box stored as one interval per coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Extent along the x axis.
    pub x: Interval,
    /// Extent along the y axis.
    pub y: Interval,
    /// Extent along the z axis.
    pub z: Interval,
}

impl Aabb {
    /// The empty box: all three slabs are the empty interval.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Builds a box from its three axis intervals.
    pub fn from_axis_intervals(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// The minimum box containing every point in `points`.
    pub fn from_points(points: &[DVec3]) -> Self {
        let mut aabb = Aabb::EMPTY;
        for p in points {
            aabb.merge_point(*p);
        }
        aabb
    }

    /// Returns the axis interval for `axis` (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, axis: usize) -> &Interval {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    /// Componentwise midpoint of the box.
    pub fn centroid(&self) -> DVec3 {
        DVec3::new(self.x.midpoint(), self.y.midpoint(), self.z.midpoint())
    }

    /// Total surface area, 2(xy + xz + yz).
    ///
    /// The empty box reports a non-finite area; SAH costs computed from it
    /// are never selected because a real split always costs less.
    pub fn surface_area(&self) -> f64 {
        let (dx, dy, dz) = (self.x.size(), self.y.size(), self.z.size());
        2.0 * (dx * dy + dx * dz + dy * dz)
    }

    /// Expands this box in place so it also bounds `other`.
    pub fn merge_with(&mut self, other: &Aabb) {
        self.x.merge_with(&other.x);
        self.y.merge_with(&other.y);
        self.z.merge_with(&other.z);
    }

    /// Expands this box in place so it also contains the point `p`.
    pub fn merge_point(&mut self, p: DVec3) {
        self.x.merge_point(p.x);
        self.y.merge_point(p.y);
        self.z.merge_point(p.z);
    }

    /// The smallest box containing both `a` and `b`.
    pub fn merge(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb {
            x: Interval::merge(&a.x, &b.x),
            y: Interval::merge(&a.y, &b.y),
            z: Interval::merge(&a.z, &b.z),
        }
    }

    /// Pads every axis thinner than `min_axis_length` out to that length.
    ///
    /// Flat primitives (parallelograms parallel to a coordinate plane) would
    /// otherwise produce zero-thickness slabs.
    pub fn ensure_min_axis_length(mut self, min_axis_length: f64) -> Self {
        if self.x.size() < min_axis_length {
            self.x.pad_with((min_axis_length - self.x.size()) / 2.0);
        }
        if self.y.size() < min_axis_length {
            self.y.pad_with((min_axis_length - self.y.size()) / 2.0);
        }
        if self.z.size() < min_axis_length {
            self.z.pad_with((min_axis_length - self.z.size()) / 2.0);
        }
        self
    }

    /// Returns true if `ray` passes through this box at some parameter inside
    /// `ray_t`.
    ///
    /// Per axis, the entry/exit parameters are `(bound - origin) / dir`;
    /// division by a zero component yields IEEE infinities that propagate to
    /// the correct disjointness result, so no special casing is needed. The
    /// loop is unrolled over x, y, z.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        // x slab
        let inv_dir = 1.0 / ray.direction.x;
        let mut t0 = (self.x.min - ray.origin.x) * inv_dir;
        let mut t1 = (self.x.max - ray.origin.x) * inv_dir;
        if inv_dir < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        ray_t.min = ray_t.min.max(t0);
        ray_t.max = ray_t.max.min(t1);
        if ray_t.max <= ray_t.min {
            return false;
        }

        // y slab
        let inv_dir = 1.0 / ray.direction.y;
        let mut t0 = (self.y.min - ray.origin.y) * inv_dir;
        let mut t1 = (self.y.max - ray.origin.y) * inv_dir;
        if inv_dir < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        ray_t.min = ray_t.min.max(t0);
        ray_t.max = ray_t.max.min(t1);
        if ray_t.max <= ray_t.min {
            return false;
        }

        // z slab
        let inv_dir = 1.0 / ray.direction.z;
        let mut t0 = (self.z.min - ray.origin.z) * inv_dir;
        let mut t1 = (self.z.max - ray.origin.z) * inv_dir;
        if inv_dir < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        ray_t.min = ray_t.min.max(t0);
        ray_t.max = ray_t.max.min(t1);
        ray_t.max > ray_t.min
    }

    /// Slab test with per-ray precomputed values.
    ///
    /// `inv_dir` is the componentwise reciprocal of the ray direction and
    /// `dir_neg[i]` records whether component i is negative. Knowing the sign
    /// selects the near/far slab plane directly instead of swapping, which
    /// pays off when one ray is tested against many boxes during BVH
    /// traversal.
    pub fn hit_optimized(
        &self,
        ray: &Ray,
        ray_t: &Interval,
        inv_dir: DVec3,
        dir_neg: [bool; 3],
    ) -> bool {
        let mut t_min = (self.x.bound(dir_neg[0] as usize) - ray.origin.x) * inv_dir.x;
        let mut t_max = (self.x.bound(!dir_neg[0] as usize) - ray.origin.x) * inv_dir.x;

        let y_tmin = (self.y.bound(dir_neg[1] as usize) - ray.origin.y) * inv_dir.y;
        let y_tmax = (self.y.bound(!dir_neg[1] as usize) - ray.origin.y) * inv_dir.y;
        if t_min > y_tmax || y_tmin > t_max {
            return false;
        }
        t_min = t_min.max(y_tmin);
        t_max = t_max.min(y_tmax);

        let z_tmin = (self.z.bound(dir_neg[2] as usize) - ray.origin.z) * inv_dir.z;
        let z_tmax = (self.z.bound(!dir_neg[2] as usize) - ray.origin.z) * inv_dir.z;
        if t_min > z_tmax || z_tmin > t_max {
            return false;
        }
        t_min = t_min.max(z_tmin);
        t_max = t_max.min(z_tmax);

        t_min < ray_t.max && t_max > ray_t.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random;

    fn unit_cube() -> Aabb {
        Aabb::from_points(&[DVec3::splat(-0.5), DVec3::splat(0.5)])
    }

    #[test]
    fn test_merge_idempotent_and_identity() {
        let a = unit_cube();
        assert_eq!(Aabb::merge(&a, &a), a);
        assert_eq!(Aabb::merge(&a, &Aabb::EMPTY), a);
        assert_eq!(Aabb::merge(&Aabb::EMPTY, &a), a);
    }

    #[test]
    fn test_merge_contains_both_inputs() {
        let a = Aabb::from_points(&[DVec3::new(-1.0, 0.0, 2.0), DVec3::new(1.0, 1.0, 3.0)]);
        let b = Aabb::from_points(&[DVec3::new(4.0, -2.0, 0.0), DVec3::new(5.0, 0.5, 1.0)]);
        let merged = Aabb::merge(&a, &b);
        for aabb in [&a, &b] {
            for axis in 0..3 {
                assert!(merged.axis(axis).min <= aabb.axis(axis).min);
                assert!(merged.axis(axis).max >= aabb.axis(axis).max);
            }
        }
    }

    #[test]
    fn test_centroid_and_surface_area() {
        let aabb = Aabb::from_points(&[DVec3::new(0.0, 0.0, 0.0), DVec3::new(2.0, 4.0, 6.0)]);
        assert_eq!(aabb.centroid(), DVec3::new(1.0, 2.0, 3.0));
        // 2 * (2*4 + 2*6 + 4*6)
        assert_eq!(aabb.surface_area(), 88.0);
    }

    #[test]
    fn test_ensure_min_axis_length() {
        let flat = Aabb::from_points(&[DVec3::new(0.0, 1.0, 0.0), DVec3::new(2.0, 1.0, 2.0)])
            .ensure_min_axis_length(1e-4);
        assert!(flat.y.size() >= 1e-4);
        assert_eq!(flat.x.size(), 2.0);
    }

    #[test]
    fn test_hit_axis_aligned_rays() {
        let aabb = unit_cube();
        let hit = Ray::new(DVec3::new(0.0, 0.0, 2.0), DVec3::new(0.0, 0.0, -1.0));
        let miss = Ray::new(DVec3::new(0.0, 2.0, 2.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(aabb.hit(&hit, Interval::with_min(0.001)));
        assert!(!aabb.hit(&miss, Interval::with_min(0.001)));
        // Box behind the ray.
        let behind = Ray::new(DVec3::new(0.0, 0.0, 2.0), DVec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&behind, Interval::with_min(0.001)));
    }

    #[test]
    fn test_hit_with_zero_direction_component() {
        let aabb = unit_cube();
        // Ray in the z=0 plane with dir.y == 0, passing through the box.
        let inside_slab = Ray::new(DVec3::new(-2.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
        assert!(aabb.hit(&inside_slab, Interval::with_min(0.001)));
        // Same direction but outside the y slab; 0 * inf never occurs since
        // the bounds are finite.
        let outside_slab = Ray::new(DVec3::new(-2.0, 0.7, 0.0), DVec3::new(1.0, 0.0, 0.0));
        assert!(!aabb.hit(&outside_slab, Interval::with_min(0.001)));
    }

    #[test]
    fn test_slab_variants_agree() {
        random::set_seed(181);
        for _ in 0..2000 {
            let aabb = Aabb::from_points(&[
                DVec3::new(
                    random::random_f64_range(-2.0, 2.0),
                    random::random_f64_range(-2.0, 2.0),
                    random::random_f64_range(-2.0, 2.0),
                ),
                DVec3::new(
                    random::random_f64_range(-2.0, 2.0),
                    random::random_f64_range(-2.0, 2.0),
                    random::random_f64_range(-2.0, 2.0),
                ),
            ]);
            let ray = Ray::new(
                DVec3::new(
                    random::random_f64_range(-4.0, 4.0),
                    random::random_f64_range(-4.0, 4.0),
                    random::random_f64_range(-4.0, 4.0),
                ),
                random::random_unit_vector(),
            );
            let ray_t = Interval::new(0.001, f64::INFINITY);
            let inv_dir = DVec3::new(
                1.0 / ray.direction.x,
                1.0 / ray.direction.y,
                1.0 / ray.direction.z,
            );
            let dir_neg = [
                ray.direction.x < 0.0,
                ray.direction.y < 0.0,
                ray.direction.z < 0.0,
            ];
            assert_eq!(
                aabb.hit(&ray, ray_t),
                aabb.hit_optimized(&ray, &ray_t, inv_dir, dir_neg),
            );
        }
    }
}
