//! Randomness: a process-wide seed dispenser plus per-thread generators.
//!
//! The dispenser hands one seed to each worker thread; the per-thread
//! generator itself is a small linear congruential generator kept in
//! thread-local storage. Also home to the geometric samplers used by
//! materials and the camera (unit sphere, unit disk, random colors).

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Mutex;

use glam::DVec3;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};

/// Dispenses seeds for the per-thread generators.
///
/// With a custom seed installed (see [`set_seed`]), successive seeds follow
/// the multiplicative sequence `s <- s * 483475 mod 692253888527`, so a fixed
/// starting seed yields a reproducible seed stream. Without one, each seed is
/// drawn from OS entropy.
struct SeedSeqGenerator {
    custom_seed: Option<u64>,
    announced: bool,
}

impl SeedSeqGenerator {
    const fn new() -> Self {
        Self {
            custom_seed: None,
            announced: false,
        }
    }

    fn next_seed(&mut self) -> u64 {
        match self.custom_seed {
            Some(seed) => {
                let next = seed.wrapping_mul(483_475) % 692_253_888_527;
                self.custom_seed = Some(next);
                next
            }
            None => {
                if !self.announced {
                    println!("Seeding thread RNGs from OS entropy");
                    self.announced = true;
                }
                OsRng.next_u64()
            }
        }
    }
}

/// The process-wide seed source. Locked once per worker thread (on first use
/// of that thread's generator) and by [`set_seed`].
static SEED_SEQ: Mutex<SeedSeqGenerator> = Mutex::new(SeedSeqGenerator::new());

/// Installs a fixed seed for reproducible renders.
///
/// Call before any worker thread draws its first random number; threads that
/// have already pulled a seed keep their state.
pub fn set_seed(seed: u64) {
    let mut dispenser = SEED_SEQ.lock().unwrap();
    dispenser.custom_seed = Some(seed);
}

fn next_seed() -> u64 {
    SEED_SEQ.lock().unwrap().next_seed()
}

/// Linear congruential generator with the classic Numerical Recipes
/// constants: `s <- 1664525 * s + 1013904223 (mod 2^32)`.
///
/// Quality is traded for speed; every sample a path tracer draws goes
/// through this. Implements [`RngCore`]/[`SeedableRng`] so it composes with
/// the rand ecosystem where needed.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Advances the state and returns it.
    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform `f64` in `[min, max]`, by affine scaling of `state / (2^32 - 1)`.
    #[inline]
    pub fn next_f64_range(&mut self, min: f64, max: f64) -> f64 {
        const SCALE: f64 = 1.0 / (u32::MAX as f64);
        min + (max - min) * (self.step() as f64 * SCALE)
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.step()) << 32) | u64::from(self.step())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u32::from_le_bytes(seed),
        }
    }
}

thread_local! {
    /// Thread-local generator, seeded once per thread from the dispenser.
    static RNG: RefCell<Lcg> = RefCell::new(Lcg::seed_from_u64(next_seed()));
}

/// Uniform draw from [0.0, 1.0] on this thread's generator.
pub fn random_f64() -> f64 {
    RNG.with(|rng| rng.borrow_mut().next_f64_range(0.0, 1.0))
}

/// Uniform draw from [min, max] on this thread's generator.
pub fn random_f64_range(min: f64, max: f64) -> f64 {
    RNG.with(|rng| rng.borrow_mut().next_f64_range(min, max))
}

/// A direction drawn uniformly from the unit sphere.
///
/// Rejection-samples the unit ball, then normalizes; points of the ball
/// project uniformly onto directions.
pub fn random_unit_vector() -> DVec3 {
    loop {
        let v = DVec3::new(
            random_f64_range(-1.0, 1.0),
            random_f64_range(-1.0, 1.0),
            random_f64_range(-1.0, 1.0),
        );
        let len_sq = v.length_squared();
        // The lower cutoff keeps the normalization away from 0/0.
        if len_sq < 1.0 && len_sq > 1e-60 {
            return v / len_sq.sqrt();
        }
    }
}

/// A point drawn uniformly from the unit disk on the z = 0 plane, by
/// rejection from its bounding square.
pub fn random_in_unit_disk() -> DVec3 {
    loop {
        let p = DVec3::new(
            random_f64_range(-1.0, 1.0),
            random_f64_range(-1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// A color with each channel drawn from [0.0, 1.0].
pub fn random_color() -> DVec3 {
    DVec3::new(random_f64(), random_f64(), random_f64())
}

/// A color with each channel drawn from [min, max].
pub fn random_color_range(min: f64, max: f64) -> DVec3 {
    DVec3::new(
        random_f64_range(min, max),
        random_f64_range(min, max),
        random_f64_range(min, max),
    )
}
