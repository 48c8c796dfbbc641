//! Rectangular box primitive built from six parallelogram faces.

use glam::DVec3;

use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable, Primitive, Scene};
use crate::interval::Interval;
use crate::material::MaterialKind;
use crate::parallelogram::Parallelogram;
use crate::ray::Ray;

/// A 3D box (rectangular prism), represented as a small internal [`Scene`]
/// of six faces.
///
/// As a compound primitive it decomposes into its faces, so a BVH built over
/// a scene containing boxes accelerates per face rather than treating each
/// box as one opaque unit.
#[derive(Debug, Clone)]
pub struct Box3 {
    faces: Scene,
}

impl Box3 {
    /// Constructs a box from two opposite corner points.
    ///
    /// The corners may be given in any order; each coordinate pair is sorted
    /// into min/max form.
    pub fn new(corner: DVec3, opposite_corner: DVec3, material: MaterialKind) -> Self {
        let min = corner.min(opposite_corner);
        let max = corner.max(opposite_corner);

        let side_x = DVec3::new(max.x - min.x, 0.0, 0.0);
        let side_y = DVec3::new(0.0, max.y - min.y, 0.0);
        let side_z = DVec3::new(0.0, 0.0, max.z - min.z);

        // Three faces meet at each of the two extreme corners; edge vectors
        // at the max corner are negated so every outward normal points away
        // from the box interior.
        let mut faces = Scene::new();
        faces.add(Parallelogram::new(min, side_x, side_y, material));
        faces.add(Parallelogram::new(min, side_x, side_z, material));
        faces.add(Parallelogram::new(min, side_y, side_z, material));
        faces.add(Parallelogram::new(max, -side_x, -side_y, material));
        faces.add(Parallelogram::new(max, -side_x, -side_z, material));
        faces.add(Parallelogram::new(max, -side_y, -side_z, material));

        Self { faces }
    }
}

impl Hittable for Box3 {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.faces.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.faces.bounding_box()
    }

    fn decompose(&self) -> Option<Vec<Primitive>> {
        self.faces.decompose()
    }
}
