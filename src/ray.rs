//! Rays, the unit of work of the whole tracer.

use glam::DVec3;

/// A half-line `r(t) = origin + t * direction`, `t >= 0`.
///
/// Primary rays start at the camera; scattered rays start at the surface
/// point they bounced off. The direction carries whatever magnitude its
/// producer gave it — intersection code works in ray parameters, so nothing
/// here requires unit length.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Where the ray starts.
    pub origin: DVec3,
    /// Where it is headed; not necessarily normalized.
    pub direction: DVec3,
}

impl Ray {
    /// A ray from `origin` toward `direction`.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// The point reached after advancing the parameter to `t`.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }
}
