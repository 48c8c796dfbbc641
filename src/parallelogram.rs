//! Parallelogram ("quad") primitive.
//!
//! A 2D parallelogram in 3D space, given by a corner vertex and two edge
//! vectors. Intersection finds the hit time on the containing plane, then
//! checks the planar basis coordinates of the hit point against [0, 1].

use glam::DVec3;

use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::MaterialKind;
use crate::ray::Ray;

/// Rays closer to parallel with the plane than this are treated as misses.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Parallelogram defined by a corner `q` and edge vectors `u`, `v`.
///
/// The corner opposite `q` is `q + u + v`. The side of the surface that
/// `cross(u, v)` points toward is declared the outward face.
#[derive(Debug, Clone)]
pub struct Parallelogram {
    /// The given corner vertex.
    pub q: DVec3,
    /// First edge vector, starting at `q`.
    pub u: DVec3,
    /// Second edge vector, starting at `q`.
    pub v: DVec3,
    /// Material properties determining light interaction.
    pub material: MaterialKind,

    /// Unit normal of the containing plane, `cross(u, v)` normalized.
    unit_normal: DVec3,
    /// `n / |n|^2` where `n = cross(u, v)`; extracts the planar basis
    /// coordinates of a hit point in a single dot product each.
    w: DVec3,
    aabb: Aabb,
}

impl Parallelogram {
    /// Create a parallelogram from a corner, two edge vectors, and a material.
    ///
    /// `u` and `v` must not be parallel or zero-length.
    pub fn new(q: DVec3, u: DVec3, v: DVec3, material: MaterialKind) -> Self {
        let n = u.cross(v);
        // The AABB of a flat quad can be zero-thick along an axis; pad it so
        // slab tests stay well conditioned.
        let aabb = Aabb::from_points(&[q, q + u, q + v, q + u + v]).ensure_min_axis_length(1e-4);
        Self {
            q,
            u,
            v,
            material,
            unit_normal: n.normalize(),
            w: n / n.length_squared(),
            aabb,
        }
    }
}

impl Hittable for Parallelogram {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // The plane's points P satisfy dot(n, P) = dot(n, q); substituting
        // the ray equation gives t. The unit normal is used on both sides so
        // the parallel test below is scale independent.
        let denominator = self.unit_normal.dot(ray.direction);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = self.unit_normal.dot(self.q - ray.origin) / denominator;
        if !ray_t.surrounds(t) {
            return None;
        }

        // Planar basis coordinates of the hit point relative to q: the hit
        // is inside iff 0 <= alpha, beta <= 1.
        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let unit_range = Interval::new(0.0, 1.0);
        if !unit_range.contains(alpha) || !unit_range.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            t,
            ray.at(t),
            self.unit_normal,
            ray,
            self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.aabb
    }
}
