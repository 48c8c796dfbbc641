//! The geometry seam: what a ray can hit, and what a hit reports.
//!
//! Defines the `Hittable` trait, `HitRecord`, the closed `Primitive` enum
//! the BVH is built over, and `Scene`, the brute-force container of
//! primitives.

use glam::DVec3;

use crate::aabb::Aabb;
use crate::box3::Box3;
use crate::interval::Interval;
use crate::material::MaterialKind;
use crate::parallelogram::Parallelogram;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Everything shading needs to know about one ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Ray parameter at the intersection point.
    pub t: f64,
    /// Point where the ray intersects the object.
    pub point: DVec3,
    /// Unit surface normal at the intersection, always pointing against the
    /// incident ray.
    pub unit_normal: DVec3,
    /// True if the ray hit the outward-facing side of the surface.
    pub front_face: bool,
    /// Material of the object at the hit point.
    pub material: MaterialKind,
}

impl HitRecord {
    /// Builds a hit record from the geometric intersection data.
    ///
    /// `outward_unit_normal` must be a unit vector pointing out of the
    /// surface; the constructor resolves whether the front or back face was
    /// hit and flips the stored normal so it opposes the ray.
    pub fn new(
        t: f64,
        point: DVec3,
        outward_unit_normal: DVec3,
        ray: &Ray,
        material: MaterialKind,
    ) -> Self {
        let front_face = ray.direction.dot(outward_unit_normal) < 0.0;
        let unit_normal = if front_face {
            outward_unit_normal
        } else {
            -outward_unit_normal
        };
        Self {
            t,
            point,
            unit_normal,
            front_face,
            material,
        }
    }
}

/// Anything a ray can be tested against.
///
/// The `Sync + Send` bounds let the renderer share geometry freely across
/// worker threads.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection within the given parameter range.
    ///
    /// Returns the earliest hit strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Returns the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Returns the indivisible primitives making up this object, or `None`
    /// if the object itself is indivisible.
    ///
    /// Compound objects (scenes, boxes) report their leaves so acceleration
    /// structures can be built over the parts rather than over the whole.
    fn decompose(&self) -> Option<Vec<Primitive>> {
        None
    }
}

/// The closed set of geometric primitives.
///
/// Intersection in the BVH leaf loop dispatches with a `match`, so the
/// hottest path has no indirect calls.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// A sphere.
    Sphere(Sphere),
    /// A parallelogram ("quad").
    Quad(Parallelogram),
    /// A six-faced box; decomposes into its faces.
    Box3(Box3),
}

impl Hittable for Primitive {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, ray_t),
            Primitive::Quad(q) => q.hit(ray, ray_t),
            Primitive::Box3(b) => b.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(),
            Primitive::Quad(q) => q.bounding_box(),
            Primitive::Box3(b) => b.bounding_box(),
        }
    }

    fn decompose(&self) -> Option<Vec<Primitive>> {
        match self {
            Primitive::Sphere(_) | Primitive::Quad(_) => None,
            Primitive::Box3(b) => b.decompose(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Parallelogram> for Primitive {
    fn from(q: Parallelogram) -> Self {
        Primitive::Quad(q)
    }
}

impl From<Box3> for Primitive {
    fn from(b: Box3) -> Self {
        Primitive::Box3(b)
    }
}

/// An unordered bag of primitives.
///
/// Keeps a running bounding box updated on insertion and intersects by
/// linear search, shrinking the search interval as closer hits are found.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<Primitive>,
    bounds: Aabb,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene with empty bounds.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bounds: Aabb::EMPTY,
        }
    }

    /// Inserts an object, widening the scene bounds to cover it.
    pub fn add(&mut self, object: impl Into<Primitive>) {
        let object = object.into();
        self.bounds.merge_with(&object.bounding_box());
        self.objects.push(object);
    }

    /// Adds every object of `other` to this scene.
    pub fn extend(&mut self, other: Scene) {
        self.bounds.merge_with(&other.bounds);
        self.objects.extend(other.objects);
    }

    /// Number of objects in the scene (compounds count as one).
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The objects in this scene.
    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    /// Flattens the scene into its indivisible primitives.
    ///
    /// Objects that decompose are replaced by their components, recursively;
    /// indivisible objects are cloned through as leaves.
    pub fn primitive_components(&self) -> Vec<Primitive> {
        let mut components = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            match object.decompose() {
                Some(children) => components.extend(children),
                None => components.push(object.clone()),
            }
        }
        components
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest_so_far = ray_t.max;
        let mut result = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                result = Some(rec);
            }
        }

        result
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn decompose(&self) -> Option<Vec<Primitive>> {
        Some(self.primitive_components())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn gray() -> MaterialKind {
        MaterialKind::Lambertian {
            albedo: Color::splat(0.5),
        }
    }

    #[test]
    fn test_scene_returns_closest_hit() {
        let mut scene = Scene::new();
        scene.add(Sphere::new(DVec3::new(0.0, 0.0, -3.0), 0.5, gray()));
        scene.add(Sphere::new(DVec3::new(0.0, 0.0, -1.0), 0.5, gray()));

        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let rec = scene.hit(&ray, Interval::with_min(0.001)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert_eq!(rec.point.z, -0.5);
    }

    #[test]
    fn test_scene_bounds_grow_on_insert() {
        let mut scene = Scene::new();
        assert_eq!(scene.bounding_box(), Aabb::EMPTY);

        scene.add(Sphere::new(DVec3::ZERO, 1.0, gray()));
        let bounds = scene.bounding_box();
        assert_eq!(bounds.x.min, -1.0);
        assert_eq!(bounds.x.max, 1.0);

        scene.add(Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0, gray()));
        assert_eq!(scene.bounding_box().x.max, 6.0);
    }

    #[test]
    fn test_primitive_components_flatten_boxes() {
        let mut scene = Scene::new();
        scene.add(Sphere::new(DVec3::ZERO, 1.0, gray()));
        scene.add(Box3::new(
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(3.0, 1.0, 1.0),
            gray(),
        ));

        let components = scene.primitive_components();
        assert_eq!(components.len(), 7);
        assert_eq!(
            components
                .iter()
                .filter(|p| matches!(p, Primitive::Quad(_)))
                .count(),
            6
        );
        assert!(components
            .iter()
            .all(|p| !matches!(p, Primitive::Box3(_))));
    }

    #[test]
    fn test_front_face_resolution() {
        let outward = DVec3::new(0.0, 0.0, 1.0);
        let from_outside = Ray::new(DVec3::new(0.0, 0.0, 2.0), DVec3::new(0.0, 0.0, -1.0));
        let rec = HitRecord::new(1.0, DVec3::ZERO, outward, &from_outside, gray());
        assert!(rec.front_face);
        assert_eq!(rec.unit_normal, outward);

        let from_inside = Ray::new(DVec3::new(0.0, 0.0, -2.0), DVec3::new(0.0, 0.0, 1.0));
        let rec = HitRecord::new(1.0, DVec3::ZERO, outward, &from_inside, gray());
        assert!(!rec.front_face);
        assert_eq!(rec.unit_normal, -outward);
    }
}
