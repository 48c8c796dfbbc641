//! Surface behavior at ray hits: diffuse and specular reflection,
//! refraction, and emission.
//!
//! Dispatch is a match over a closed enum, keeping the per-bounce shading
//! free of indirect calls.

use glam::DVec3;

use crate::hittable::HitRecord;
use crate::random;
use crate::ray::Ray;

/// RGB color as linear magnitudes; emissive colors may exceed 1.
pub type Color = DVec3;

/// A scattered ray together with the color attenuation picked up at the
/// bounce. `None` from [`MaterialKind::scatter`] means the ray was absorbed.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// The outgoing ray, originating at the hit point.
    pub ray: Ray,
    /// Componentwise factor applied to the scattered ray's radiance.
    pub attenuation: Color,
}

/// The closed set of surface materials.
///
/// Small value type; primitives store their material inline and hit records
/// carry a copy.
#[derive(Debug, Clone, Copy)]
pub enum MaterialKind {
    /// Matte surface scattering by the Lambertian cosine law.
    Lambertian {
        /// Fraction of each channel surviving a bounce.
        albedo: Color,
    },

    /// Mirror-like reflector with an optional rough perturbation.
    Metal {
        /// Tint applied to reflected light.
        albedo: Color,
        /// Roughness of the reflection, from 0 (perfect mirror) up to 1.
        fuzz: f64,
    },

    /// Clear refractive material such as glass or water.
    Dielectric {
        /// Refractive index relative to the surrounding air.
        refraction_index: f64,
    },

    /// Diffuse area light emitting uniformly in all directions.
    DiffuseLight {
        /// Emitted color before scaling.
        color: Color,
        /// Linear intensity multiplier; emitted radiance is `intensity * color`.
        intensity: f64,
    },
}

impl MaterialKind {
    /// A metal material with the fuzz factor clamped to its valid maximum of 1.
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        MaterialKind::Metal {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }

    /// How this material responds to an incident ray.
    ///
    /// Returns the outgoing ray and its attenuation, or `None` when the
    /// surface swallowed the ray.
    pub fn scatter(&self, r_in: &Ray, rec: &HitRecord) -> Option<Scatter> {
        match *self {
            MaterialKind::Lambertian { albedo } => scatter_lambertian(albedo, rec),
            MaterialKind::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, r_in, rec),
            MaterialKind::Dielectric { refraction_index } => {
                scatter_dielectric(refraction_index, r_in, rec)
            }
            MaterialKind::DiffuseLight { .. } => None,
        }
    }

    /// Radiance emitted by this material; zero for non-emitters.
    pub fn emit(&self) -> Color {
        match *self {
            MaterialKind::DiffuseLight { color, intensity } => intensity * color,
            _ => Color::ZERO,
        }
    }
}

/// Cosine-weighted diffuse bounce: unit normal plus a random unit vector.
fn scatter_lambertian(albedo: Color, rec: &HitRecord) -> Option<Scatter> {
    let mut scatter_direction = rec.unit_normal + random::random_unit_vector();

    // The random vector can all but cancel the normal, leaving a direction
    // too short to normalize safely.
    if near_zero(scatter_direction) {
        scatter_direction = rec.unit_normal;
    }

    Some(Scatter {
        ray: Ray::new(rec.point, scatter_direction),
        attenuation: albedo,
    })
}

/// Specular reflection, jittered by `fuzz` times a random unit vector.
fn scatter_metal(albedo: Color, fuzz: f64, r_in: &Ray, rec: &HitRecord) -> Option<Scatter> {
    let reflected = reflect(r_in.direction.normalize(), rec.unit_normal);
    let scattered_dir = reflected + fuzz * random::random_unit_vector();

    // A fuzzed direction below the surface horizon is absorbed.
    if scattered_dir.dot(rec.unit_normal) <= 0.0 {
        return None;
    }

    Some(Scatter {
        ray: Ray::new(rec.point, scattered_dir),
        attenuation: albedo,
    })
}

/// Dielectric scattering: refract when Snell's law allows it, otherwise
/// reflect; even a refractable interface reflects with probability equal to
/// its Schlick reflectance.
fn scatter_dielectric(refraction_index: f64, r_in: &Ray, rec: &HitRecord) -> Option<Scatter> {
    let refraction_ratio = if rec.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };

    let unit_direction = r_in.direction.normalize();
    let cos_theta = (-unit_direction).dot(rec.unit_normal).min(1.0);

    let direction = match refract(unit_direction, rec.unit_normal, refraction_ratio) {
        // Total internal reflection.
        None => reflect(unit_direction, rec.unit_normal),
        Some(refracted) => {
            if random::random_f64() < reflectance(cos_theta, refraction_ratio) {
                reflect(unit_direction, rec.unit_normal)
            } else {
                refracted
            }
        }
    };

    Some(Scatter {
        ray: Ray::new(rec.point, direction),
        // A clear dielectric passes all wavelengths equally.
        attenuation: Color::ONE,
    })
}

/// Mirror `v` about the surface with unit normal `n`.
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Bend the unit direction `uv` through an interface per Snell's law.
///
/// `etai_over_etat` is the ratio of refractive indices (initial over final
/// medium). Returns `None` under total internal reflection.
pub fn refract(uv: DVec3, n: DVec3, etai_over_etat: f64) -> Option<DVec3> {
    let cos_theta = (-uv).dot(n).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    if etai_over_etat * sin_theta > 1.0 {
        return None;
    }

    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    Some(r_out_perp + r_out_parallel)
}

/// Schlick's polynomial approximation of the Fresnel reflectance.
fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// True when every component of `v` is below 1e-8 in magnitude.
pub fn near_zero(v: DVec3) -> bool {
    v.abs().max_element() < 1e-8
}
