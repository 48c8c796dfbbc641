use clap::Parser;
use glam::DVec3;
use log::info;

use lumenpath::camera::Camera;
use lumenpath::cli::{Args, ScenePreset};
use lumenpath::hittable::Scene;
use lumenpath::image::Image;
use lumenpath::logger::init_logger;
use lumenpath::material::{Color, MaterialKind};
use lumenpath::parallelogram::Parallelogram;
use lumenpath::random;
use lumenpath::sphere::Sphere;
use lumenpath::box3::Box3;

type Point3 = DVec3;

/// Create the book cover scene with random spheres.
///
/// With `with_lights` set, a portion of the small spheres become emitters
/// and the sky is replaced by darkness, so they are the only light.
fn create_cover_scene(with_lights: bool) -> Scene {
    let mut world = Scene::new();

    // Ground sphere
    let ground_material = MaterialKind::Lambertian {
        albedo: Color::new(0.5, 0.5, 0.5),
    };
    world.add(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground_material));

    // Generate 22x22 grid of small spheres
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random::random_f64();
            let center = Point3::new(
                a as f64 + 0.9 * random::random_f64(),
                0.2,
                b as f64 + 0.9 * random::random_f64(),
            );

            // Don't place spheres too close to the large feature spheres
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere_material = if with_lights && choose_mat < 0.035 {
                MaterialKind::DiffuseLight {
                    color: random::random_color(),
                    intensity: random::random_f64_range(5.0, 15.0),
                }
            } else if choose_mat < 0.8 {
                // Diffuse material
                MaterialKind::Lambertian {
                    albedo: random::random_color() * random::random_color(),
                }
            } else if choose_mat < 0.95 {
                // Metal material
                MaterialKind::metal(
                    random::random_color_range(0.5, 1.0),
                    random::random_f64_range(0.0, 0.5),
                )
            } else {
                // Glass material
                MaterialKind::Dielectric {
                    refraction_index: 1.5,
                }
            };

            world.add(Sphere::new(center, 0.2, sphere_material));
        }
    }

    // Three large feature spheres
    world.add(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        MaterialKind::Dielectric {
            refraction_index: 1.5,
        },
    ));
    world.add(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        MaterialKind::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        },
    ));
    world.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        MaterialKind::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    ));

    if with_lights {
        // A moon-like light hanging above the scene
        world.add(Sphere::new(
            Point3::new(0.0, 12.0, 0.0),
            3.0,
            MaterialKind::DiffuseLight {
                color: Color::new(0.380205, 0.680817, 0.385431),
                intensity: 150.0,
            },
        ));
    }

    world
}

/// Camera for the book cover shot.
fn cover_camera(args: &Args, with_lights: bool) -> Camera {
    let camera = Camera::new()
        .image_by_width_and_aspect_ratio(args.width, 16.0 / 9.0)
        .vertical_fov_deg(20.0)
        .center(Point3::new(13.0, 2.0, 3.0))
        .look_at(Point3::ZERO)
        .up(DVec3::new(0.0, 1.0, 0.0))
        .defocus_angle_deg(0.6)
        .focus_distance(10.0)
        .samples_per_pixel(args.samples_per_pixel)
        .max_depth(args.max_depth);
    if with_lights {
        camera.background(Color::ZERO)
    } else {
        camera
    }
}

/// Five flat parallelograms facing the camera.
fn create_quads_scene() -> Scene {
    let left_red = MaterialKind::Lambertian {
        albedo: Color::new(1.0, 0.2, 0.2),
    };
    let back_green = MaterialKind::Lambertian {
        albedo: Color::new(0.2, 1.0, 0.2),
    };
    let right_blue = MaterialKind::Lambertian {
        albedo: Color::new(0.2, 0.2, 1.0),
    };
    let upper_orange = MaterialKind::Lambertian {
        albedo: Color::new(1.0, 0.5, 0.0),
    };
    let lower_teal = MaterialKind::Lambertian {
        albedo: Color::new(0.2, 0.8, 0.8),
    };

    let mut world = Scene::new();
    world.add(Parallelogram::new(
        Point3::new(-3.0, -2.0, 5.0),
        DVec3::new(0.0, 0.0, -4.0),
        DVec3::new(0.0, 4.0, 0.0),
        left_red,
    ));
    world.add(Parallelogram::new(
        Point3::new(-2.0, -2.0, 0.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(0.0, 4.0, 0.0),
        back_green,
    ));
    world.add(Parallelogram::new(
        Point3::new(3.0, -2.0, 1.0),
        DVec3::new(0.0, 0.0, 4.0),
        DVec3::new(0.0, 4.0, 0.0),
        right_blue,
    ));
    world.add(Parallelogram::new(
        Point3::new(-2.0, 3.0, 1.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 4.0),
        upper_orange,
    ));
    world.add(Parallelogram::new(
        Point3::new(-2.0, -3.0, 5.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, -4.0),
        lower_teal,
    ));
    world
}

fn quads_camera(args: &Args) -> Camera {
    Camera::new()
        .image_by_width_and_aspect_ratio(args.width, 1.0)
        .vertical_fov_deg(80.0)
        .center(Point3::new(0.0, 0.0, 9.0))
        .direction_towards(Point3::ZERO)
        .up(DVec3::new(0.0, 1.0, 0.0))
        .turn_blur_off()
        .background(Color::new(0.7, 0.8, 1.0))
        .samples_per_pixel(args.samples_per_pixel)
        .max_depth(args.max_depth)
}

/// The standard Cornell box; `empty` leaves out the two interior boxes.
fn create_cornell_box(empty: bool) -> Scene {
    let red = MaterialKind::Lambertian {
        albedo: Color::new(0.65, 0.05, 0.05),
    };
    let white = MaterialKind::Lambertian {
        albedo: Color::new(0.73, 0.73, 0.73),
    };
    let green = MaterialKind::Lambertian {
        albedo: Color::new(0.12, 0.45, 0.15),
    };
    let light = MaterialKind::DiffuseLight {
        color: Color::ONE,
        intensity: 15.0,
    };

    // Walls and light of the standard Cornell box
    let mut world = Scene::new();
    world.add(Parallelogram::new(
        Point3::new(555.0, 0.0, 0.0),
        DVec3::new(0.0, 555.0, 0.0),
        DVec3::new(0.0, 0.0, 555.0),
        green,
    ));
    world.add(Parallelogram::new(
        Point3::ZERO,
        DVec3::new(0.0, 555.0, 0.0),
        DVec3::new(0.0, 0.0, 555.0),
        red,
    ));
    world.add(Parallelogram::new(
        Point3::new(343.0, 554.0, 332.0),
        DVec3::new(-130.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, -105.0),
        light,
    ));
    world.add(Parallelogram::new(
        Point3::ZERO,
        DVec3::new(555.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 555.0),
        white,
    ));
    world.add(Parallelogram::new(
        Point3::new(555.0, 555.0, 555.0),
        DVec3::new(-555.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, -555.0),
        white,
    ));
    world.add(Parallelogram::new(
        Point3::new(0.0, 0.0, 555.0),
        DVec3::new(555.0, 0.0, 0.0),
        DVec3::new(0.0, 555.0, 0.0),
        white,
    ));

    if !empty {
        world.add(Box3::new(
            Point3::new(130.0, 0.0, 65.0),
            Point3::new(295.0, 165.0, 230.0),
            white,
        ));
        world.add(Box3::new(
            Point3::new(265.0, 0.0, 295.0),
            Point3::new(430.0, 330.0, 460.0),
            white,
        ));
    }

    world
}

fn cornell_camera(args: &Args) -> Camera {
    Camera::new()
        .image_by_width_and_aspect_ratio(args.width, 1.0)
        .vertical_fov_deg(40.0)
        .center(Point3::new(278.0, 278.0, -800.0))
        .direction_towards(Point3::new(278.0, 278.0, 0.0))
        .up(DVec3::new(0.0, 1.0, 0.0))
        .turn_blur_off()
        .background(Color::ZERO)
        .samples_per_pixel(args.samples_per_pixel)
        .max_depth(args.max_depth)
}

fn save_image(image: &Image, output: &str) {
    let result = if output.ends_with(".ppm") {
        image.save_as_ppm(output)
    } else if output.ends_with(".png") {
        image.save_as_png(output)
    } else {
        log::error!(
            "Unsupported file extension '{}'. Only .ppm and .png formats are supported.",
            std::path::Path::new(output)
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
        );
        std::process::exit(1);
    };

    if let Err(e) = result {
        log::error!("Failed to save image to {}: {}", output, e);
        std::process::exit(1);
    }
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone());

    // Log application startup with version information
    info!("LumenPath - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if let Some(seed) = args.seed {
        random::set_seed(seed);
        info!("Using fixed RNG seed {seed}");
    }

    info!(
        "Scene: {:?}, image width: {}, samples per pixel: {}",
        args.scene, args.width, args.samples_per_pixel
    );

    let (world, camera) = match args.scene {
        ScenePreset::Cover => (create_cover_scene(false), cover_camera(&args, false)),
        ScenePreset::CoverLights => (create_cover_scene(true), cover_camera(&args, true)),
        ScenePreset::Quads => (create_quads_scene(), quads_camera(&args)),
        ScenePreset::CornellBox => (create_cornell_box(false), cornell_camera(&args)),
        ScenePreset::CornellBoxEmpty => (create_cornell_box(true), cornell_camera(&args)),
    };

    let image = camera.render(&world);
    save_image(&image, &args.output);
}
