//! Camera for ray generation and scene rendering.
//!
//! A thin-lens camera configured through a fluent builder. Rendering builds
//! a BVH over the scene, traces `samples_per_pixel` stratified rays per
//! pixel in parallel across image rows, and averages the returned radiance.

use glam::DVec3;
use log::info;
use rayon::prelude::*;

use crate::bvh::Bvh;
use crate::hittable::{Hittable, Scene};
use crate::image::Image;
use crate::interval::Interval;
use crate::progress::RenderProgress;
use crate::random;
use crate::ray::Ray;

/// RGB color as linear magnitudes.
type Color = DVec3;
/// A position in 3D space.
type Point3 = DVec3;

/// Lower ray-parameter bound for scatter queries; keeps bounced rays from
/// re-hitting the surface they left ("shadow acne").
const SCATTER_EPSILON: f64 = 1e-5;

/// Field of view, constrained to exactly one axis at a time.
#[derive(Debug, Clone, Copy)]
enum FieldOfView {
    Vertical(f64),
    Horizontal(f64),
}

/// Camera for ray generation and scene rendering.
///
/// Configure with the fluent setters, then call [`Camera::render`]:
///
/// ```no_run
/// use glam::DVec3;
/// use lumenpath::camera::Camera;
/// use lumenpath::hittable::Scene;
///
/// let world = Scene::new();
/// let image = Camera::new()
///     .image_by_width_and_aspect_ratio(400, 16.0 / 9.0)
///     .center(DVec3::new(13.0, 2.0, 3.0))
///     .look_at(DVec3::ZERO)
///     .vertical_fov_deg(20.0)
///     .samples_per_pixel(100)
///     .render(&world);
/// ```
#[derive(Debug, Clone)]
pub struct Camera {
    image_width: usize,
    image_height: usize,
    samples_per_pixel: u32,
    max_depth: u32,
    fov: FieldOfView,
    eye: Point3,
    direction: DVec3,
    look_at: Option<Point3>,
    up: DVec3,
    defocus_angle_deg: f64,
    focus_distance: Option<f64>,
    /// Miss color; `None` selects the sky gradient.
    background: Option<Color>,

    // Derived at initialization.
    pixel00_loc: Point3,
    pixel_delta_x: DVec3,
    pixel_delta_y: DVec3,
    defocus_disk_x: DVec3,
    defocus_disk_y: DVec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Creates a camera with default settings: 1280x720 image, 90 degree
    /// vertical field of view, pinhole lens, eye at the origin looking down
    /// the negative z axis, sky-gradient background.
    pub fn new() -> Self {
        Self {
            image_width: 1280,
            image_height: 720,
            samples_per_pixel: 100,
            max_depth: 10,
            fov: FieldOfView::Vertical(90.0),
            eye: Point3::ZERO,
            direction: DVec3::new(0.0, 0.0, -1.0),
            look_at: None,
            up: DVec3::new(0.0, 1.0, 0.0),
            defocus_angle_deg: 0.0,
            focus_distance: None,
            background: None,
            pixel00_loc: Point3::ZERO,
            pixel_delta_x: DVec3::ZERO,
            pixel_delta_y: DVec3::ZERO,
            defocus_disk_x: DVec3::ZERO,
            defocus_disk_y: DVec3::ZERO,
        }
    }

    /// Sets the rendered image width in pixels.
    pub fn image_width(mut self, width: usize) -> Self {
        self.image_width = width;
        self
    }

    /// Sets the rendered image height in pixels.
    pub fn image_height(mut self, height: usize) -> Self {
        self.image_height = height;
        self
    }

    /// Sets the image width and derives the height from `aspect_ratio`
    /// (clamped to at least one pixel).
    pub fn image_by_width_and_aspect_ratio(mut self, width: usize, aspect_ratio: f64) -> Self {
        let height = (width as f64 / aspect_ratio).round() as usize;
        self.image_width = width;
        self.image_height = height.max(1);
        self
    }

    /// Sets the image height and derives the width from `aspect_ratio`
    /// (clamped to at least one pixel).
    pub fn image_by_height_and_aspect_ratio(mut self, height: usize, aspect_ratio: f64) -> Self {
        let width = (height as f64 * aspect_ratio).round() as usize;
        self.image_width = width.max(1);
        self.image_height = height;
        self
    }

    /// Sets the eye position.
    pub fn center(mut self, eye: Point3) -> Self {
        self.eye = eye;
        self
    }

    /// Sets the look direction as a vector.
    ///
    /// Its magnitude becomes the default focus distance.
    pub fn direction(mut self, direction: DVec3) -> Self {
        self.direction = direction;
        self.look_at = None;
        self
    }

    /// Sets the look direction once, toward `p` from the current eye point.
    ///
    /// Unlike [`Camera::look_at`], a later change of eye position will not
    /// re-aim the camera.
    pub fn direction_towards(mut self, p: Point3) -> Self {
        self.direction = p - self.eye;
        self.look_at = None;
        self
    }

    /// Aims the camera at `p`; the direction is recomputed from the final
    /// eye position when rendering starts, so it always yields perfect
    /// focus at `p` under the default focus distance.
    pub fn look_at(mut self, p: Point3) -> Self {
        self.look_at = Some(p);
        self
    }

    /// Sets the view-up hint (default (0, 1, 0)).
    pub fn up(mut self, up: DVec3) -> Self {
        self.up = up;
        self
    }

    /// Sets the distance to the plane of perfect focus, overriding the
    /// default of the look direction's magnitude.
    pub fn focus_distance(mut self, distance: f64) -> Self {
        self.focus_distance = Some(distance);
        self
    }

    /// Sets the defocus (aperture) cone angle in degrees; 0 is a pinhole.
    pub fn defocus_angle_deg(mut self, angle: f64) -> Self {
        self.defocus_angle_deg = angle;
        self
    }

    /// Disables defocus blur; equivalent to a defocus angle of 0.
    pub fn turn_blur_off(mut self) -> Self {
        self.defocus_angle_deg = 0.0;
        self
    }

    /// Sets the vertical field of view in degrees, replacing any horizontal
    /// field of view set earlier.
    pub fn vertical_fov_deg(mut self, fov: f64) -> Self {
        self.fov = FieldOfView::Vertical(fov);
        self
    }

    /// Sets the horizontal field of view in degrees, replacing any vertical
    /// field of view set earlier.
    pub fn horizontal_fov_deg(mut self, fov: f64) -> Self {
        self.fov = FieldOfView::Horizontal(fov);
        self
    }

    /// Sets the number of rays sampled per pixel.
    pub fn samples_per_pixel(mut self, samples: u32) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    /// Sets the maximum number of ray bounces.
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets a solid background color for rays that miss the scene, replacing
    /// the default sky gradient. Emissive-only scenes want black here.
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Validates the configuration and derives the viewport geometry.
    fn initialize(&mut self) {
        if self.image_width == 0 || self.image_height == 0 {
            fatal(&format!(
                "invalid image dimensions {}x{}; both must be at least 1 pixel",
                self.image_width, self.image_height
            ));
        }
        if self.samples_per_pixel == 0 {
            fatal("samples_per_pixel must be at least 1");
        }

        if let Some(target) = self.look_at {
            self.direction = target - self.eye;
        }
        if self.direction.length_squared() == 0.0 {
            fatal("camera direction is the zero vector; use direction() or look_at()");
        }

        // An explicit look-at target lands exactly on the focus plane unless
        // the focus distance was overridden.
        let focal_length = self.focus_distance.unwrap_or_else(|| self.direction.length());
        if focal_length <= 0.0 {
            fatal("focus distance must be positive");
        }

        let aspect_ratio = self.image_width as f64 / self.image_height as f64;
        let (viewport_w, viewport_h) = match self.fov {
            FieldOfView::Vertical(fov) => {
                check_fov(fov, "vertical");
                let h = 2.0 * focal_length * (fov.to_radians() / 2.0).tan();
                (h * aspect_ratio, h)
            }
            FieldOfView::Horizontal(fov) => {
                check_fov(fov, "horizontal");
                let w = 2.0 * focal_length * (fov.to_radians() / 2.0).tan();
                (w, w / aspect_ratio)
            }
        };

        // Right-handed orthonormal basis: e_z points opposite the view
        // direction, e_x to camera right, e_y up.
        let e_z = -self.direction.normalize();
        let e_x_raw = self.up.cross(e_z);
        if e_x_raw.length_squared() == 0.0 {
            fatal("up vector is parallel to the view direction");
        }
        let e_x = e_x_raw.normalize();
        let e_y = e_z.cross(e_x);

        // Viewport edge vectors; image rows run downward, hence -e_y.
        let x_vec = viewport_w * e_x;
        let y_vec = viewport_h * -e_y;
        self.pixel_delta_x = x_vec / self.image_width as f64;
        self.pixel_delta_y = y_vec / self.image_height as f64;

        let upper_left_corner = self.eye - focal_length * e_z - x_vec / 2.0 - y_vec / 2.0;
        self.pixel00_loc = upper_left_corner + (self.pixel_delta_x + self.pixel_delta_y) / 2.0;

        // The defocus cone has its apex at the image-plane center and its
        // base (the lens disk) at the eye.
        let defocus_radius = focal_length * (self.defocus_angle_deg.to_radians() / 2.0).tan();
        self.defocus_disk_x = defocus_radius * e_x;
        self.defocus_disk_y = defocus_radius * e_y;
    }

    /// Renders `world`, consuming the camera configuration.
    ///
    /// A BVH is constructed over the scene's decomposed primitives, then
    /// pixel rows are traced in parallel and each pixel averages
    /// `samples_per_pixel` traced samples.
    pub fn render(mut self, world: &Scene) -> Image {
        self.initialize();

        let bvh = Bvh::new(world);

        let width = self.image_width;
        let height = self.image_height;
        let mut image = Image::with_dimensions(width, height);
        let sample_scale = 1.0 / self.samples_per_pixel as f64;

        info!(
            "Rendering {}x{} at {} samples/pixel on {} threads...",
            width,
            height,
            self.samples_per_pixel,
            rayon::current_num_threads()
        );
        let render_start = std::time::Instant::now();
        let progress = RenderProgress::new(height as u64, "Rendering");

        // Rows are disjoint chunks of the pixel buffer, so threads never
        // contend on output.
        let rows_per_chunk = (height / 1024).max(1);
        image
            .rows_mut()
            .par_chunks_mut(width)
            .with_min_len(rows_per_chunk)
            .enumerate()
            .for_each(|(row, pixels)| {
                for (col, pixel) in pixels.iter_mut().enumerate() {
                    let mut color = Color::ZERO;
                    for _sample in 0..self.samples_per_pixel {
                        let ray = self.get_ray(row, col);
                        color += self.ray_color(&ray, &bvh, self.max_depth);
                    }
                    *pixel = color * sample_scale;
                }
                progress.complete_iteration();
            });

        progress.finish();
        info!("Image rendered in {:.2?}", render_start.elapsed());

        image
    }

    /// One sample ray for the pixel at (row, col).
    ///
    /// The target is uniform over the pixel's square footprint; the origin
    /// is the eye, or a uniform point on the defocus disk when the aperture
    /// is open.
    fn get_ray(&self, row: usize, col: usize) -> Ray {
        let pixel_sample = self.pixel00_loc
            + (col as f64 + random::random_f64_range(-0.5, 0.5)) * self.pixel_delta_x
            + (row as f64 + random::random_f64_range(-0.5, 0.5)) * self.pixel_delta_y;

        let ray_origin = if self.defocus_angle_deg <= 0.0 {
            self.eye
        } else {
            self.defocus_disk_sample()
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// A uniform point on the lens disk around the eye.
    fn defocus_disk_sample(&self) -> Point3 {
        let p = random::random_in_unit_disk();
        self.eye + p.x * self.defocus_disk_x + p.y * self.defocus_disk_y
    }

    /// Trace a ray and compute the radiance arriving along it.
    ///
    /// Recursively follows scattered rays up to the depth limit; emitted
    /// radiance is collected at every bounce, so lights remain visible in
    /// reflections.
    fn ray_color(&self, ray: &Ray, world: &dyn Hittable, depth: u32) -> Color {
        // Past the bounce limit no more light is gathered.
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(rec) = world.hit(ray, Interval::with_min(SCATTER_EPSILON)) else {
            return self.background_color(ray);
        };

        let emitted = rec.material.emit();
        match rec.material.scatter(ray, &rec) {
            Some(scatter) => {
                emitted + scatter.attenuation * self.ray_color(&scatter.ray, world, depth - 1)
            }
            None => emitted,
        }
    }

    /// Color for rays that leave the scene.
    fn background_color(&self, ray: &Ray) -> Color {
        if let Some(color) = self.background {
            return color;
        }

        // Sky gradient: white at the horizon blending to light blue upward.
        // Rounding in normalize() can leave y a hair outside [-1, 1].
        let unit_direction = ray.direction.normalize();
        let a = (0.5 * (unit_direction.y + 1.0)).clamp(0.0, 1.0);
        lerp(Color::ONE, Color::new(0.5, 0.7, 1.0), a)
    }
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
fn lerp(a: Color, b: Color, t: f64) -> Color {
    assert!((0.0..=1.0).contains(&t), "lerp parameter {t} outside [0, 1]");
    (1.0 - t) * a + t * b
}

fn check_fov(fov: f64, which: &str) {
    if !(fov > 0.0 && fov < 180.0) {
        fatal(&format!(
            "{which} field of view of {fov} degrees is outside (0, 180)"
        ));
    }
}

/// Reports an invalid-configuration error and terminates.
fn fatal(message: &str) -> ! {
    log::error!("Invalid camera configuration: {message}");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, MaterialKind};
    use crate::sphere::Sphere;

    fn single_sphere_world() -> Scene {
        let mut world = Scene::new();
        world.add(Sphere::new(
            DVec3::new(0.0, 0.0, -1.0),
            0.5,
            MaterialKind::Lambertian {
                albedo: Color::splat(0.5),
            },
        ));
        world
    }

    #[test]
    fn test_render_produces_full_image() {
        let image = Camera::new()
            .image_width(16)
            .image_height(9)
            .samples_per_pixel(2)
            .max_depth(3)
            .render(&single_sphere_world());
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 9);
        // The sky gradient guarantees no pixel is exactly black.
        for row in 0..9 {
            for col in 0..16 {
                assert!(image.pixel(row, col).max_element() > 0.0);
            }
        }
    }

    #[test]
    fn test_aspect_ratio_derivation() {
        let camera = Camera::new().image_by_width_and_aspect_ratio(400, 16.0 / 9.0);
        assert_eq!(camera.image_width, 400);
        assert_eq!(camera.image_height, 225);

        let camera = Camera::new().image_by_height_and_aspect_ratio(225, 16.0 / 9.0);
        assert_eq!(camera.image_width, 400);

        // Extreme ratios still leave at least one pixel.
        let camera = Camera::new().image_by_width_and_aspect_ratio(10, 1e9);
        assert_eq!(camera.image_height, 1);
    }

    #[test]
    fn test_later_fov_overwrites() {
        let camera = Camera::new().horizontal_fov_deg(120.0).vertical_fov_deg(45.0);
        assert!(matches!(camera.fov, FieldOfView::Vertical(v) if v == 45.0));
    }

    #[test]
    fn test_look_at_tracks_moved_eye() {
        let mut camera = Camera::new()
            .look_at(DVec3::new(0.0, 0.0, -5.0))
            .center(DVec3::new(0.0, 0.0, 5.0));
        camera.initialize();
        assert!((camera.direction - DVec3::new(0.0, 0.0, -10.0)).length() < 1e-12);

        // direction_towards is resolved at call time instead.
        let mut camera = Camera::new()
            .direction_towards(DVec3::new(0.0, 0.0, -5.0))
            .center(DVec3::new(0.0, 0.0, 5.0));
        camera.initialize();
        assert!((camera.direction - DVec3::new(0.0, 0.0, -5.0)).length() < 1e-12);
    }

    #[test]
    fn test_pinhole_rays_originate_at_eye() {
        let mut camera = Camera::new()
            .image_width(10)
            .image_height(10)
            .center(DVec3::new(1.0, 2.0, 3.0))
            .turn_blur_off();
        camera.initialize();
        for _ in 0..10 {
            let ray = camera.get_ray(5, 5);
            assert_eq!(ray.origin, DVec3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_defocus_rays_originate_on_lens_disk() {
        let mut camera = Camera::new()
            .image_width(10)
            .image_height(10)
            .defocus_angle_deg(10.0)
            .focus_distance(5.0);
        camera.initialize();
        let max_radius = 5.0 * (10.0f64.to_radians() / 2.0).tan();
        for _ in 0..100 {
            let ray = camera.get_ray(5, 5);
            assert!(ray.origin.length() <= max_radius + 1e-12);
        }
    }

    #[test]
    fn test_emission_rule_adds_scattered_light() {
        // A ray that misses everything picks up only the background.
        let camera = Camera::new().background(Color::new(0.25, 0.5, 0.75));
        let mut cam = camera.clone();
        cam.initialize();
        let world = Scene::new();
        let bvh = crate::bvh::Bvh::new(&world);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(
            cam.ray_color(&ray, &bvh, 5),
            Color::new(0.25, 0.5, 0.75)
        );
        // Depth exhaustion yields black regardless of background.
        assert_eq!(cam.ray_color(&ray, &bvh, 0), Color::ZERO);
    }

    #[test]
    fn test_pure_emitter_returns_emission() {
        let mut world = Scene::new();
        world.add(Sphere::new(
            DVec3::new(0.0, 0.0, -2.0),
            0.5,
            MaterialKind::DiffuseLight {
                color: Color::ONE,
                intensity: 3.0,
            },
        ));
        let mut cam = Camera::new().background(Color::ZERO);
        cam.initialize();
        let bvh = crate::bvh::Bvh::new(&world);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(cam.ray_color(&ray, &bvh, 5), Color::splat(3.0));
    }
}
