//! Command line interface.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log verbosity choices exposed on the command line.
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages and above
    Info,
    /// Debugging output and above
    Debug,
    /// Everything, including per-module tracing
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// The built-in demo scenes.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScenePreset {
    /// Random spheres with mixed materials under a sky gradient
    Cover,
    /// The cover scene at night, lit only by emissive spheres
    CoverLights,
    /// Five flat parallelograms facing the camera
    Quads,
    /// The Cornell box with two boxes inside
    CornellBox,
    /// The Cornell box with nothing inside
    CornellBoxEmpty,
}

/// Everything the binary accepts on the command line.
#[derive(Parser)]
#[command(name = "lumenpath")]
#[command(about = "A CPU path tracer with a SAH-based BVH")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cover")]
    pub scene: ScenePreset,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels; height follows from the scene's aspect ratio
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: usize,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100", help = "Number of samples per pixel")]
    pub samples_per_pixel: u32,

    /// Maximum number of ray bounces
    #[arg(long, default_value = "20", help = "Maximum number of ray bounces")]
    pub max_depth: u32,

    /// Fixed RNG seed for reproducible renders (defaults to OS entropy)
    #[arg(long, help = "Fixed RNG seed for reproducible renders")]
    pub seed: Option<u64>,

    /// Output file path (.ppm for plain PPM, .png for 8-bit PNG)
    #[arg(
        short,
        long,
        default_value = "output.ppm",
        help = "Output file path (.ppm for plain PPM, .png for 8-bit PNG)"
    )]
    pub output: String,
}
