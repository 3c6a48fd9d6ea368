use rand::{distributions::Standard, Rng};
use rand_pcg::Pcg32;

use crate::math::{Point2, Vec2, Vec3};

use std::f32::consts::{FRAC_1_PI, FRAC_PI_2, FRAC_PI_4, PI};

/// Per-sample random number source for the integrators.
///
/// The generator is reseeded for every pixel sample from the render seed, the pixel and the
/// sample index. The sequence a sample sees is thus independent of which thread renders it or in
/// which order tiles are handed out, which makes renders reproducible.
#[derive(Clone, Debug)]
pub struct Sampler {
    seed: u64,
    rng: Pcg32,
}

impl Sampler {
    /// Creates a new `Sampler` for a render seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::new(splitmix64(seed), 0),
        }
    }

    /// Returns the render seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Readies the sampler for `sample_index` of pixel `p`.
    pub fn start_pixel_sample(&mut self, p: Point2<u16>, sample_index: u32) {
        let pixel = ((p.y as u64) << 16) | (p.x as u64);
        let state = splitmix64(self.seed ^ splitmix64(pixel));
        // Pcg has uncorrelated streams so let's leverage that
        self.rng = Pcg32::new(state, sample_index as u64);
    }

    /// Returns the next uniform sample in `[0, 1)`.
    #[inline]
    pub fn get_1d(&mut self) -> f32 {
        self.rng.sample(Standard)
    }

    /// Returns the next two uniform samples in `[0, 1)^2`.
    #[inline]
    pub fn get_2d(&mut self) -> Point2<f32> {
        Point2::new(self.rng.sample(Standard), self.rng.sample(Standard))
    }
}

// Sebastiano Vigna's splitmix64 finalizer
fn splitmix64(v: u64) -> u64 {
    let mut z = v.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/2D_Sampling_with_Multidimensional_Transformations

pub fn concentric_sample_disk(u: Point2<f32>) -> Point2<f32> {
    let offset = u * 2.0 - Vec2::new(1.0, 1.0);
    if offset == Point2::from(0.0) {
        return Point2::from(0.0);
    }

    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (FRAC_PI_4 * (offset.y / offset.x), offset.x)
    } else {
        (FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y), offset.y)
    };

    Point2::new(theta.cos(), theta.sin()) * r
}

/// Samples a direction around +z with density `cos(theta) / pi`.
pub fn cosine_sample_hemisphere(u: Point2<f32>) -> Vec3<f32> {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta * FRAC_1_PI
}

/// Samples a direction on the unit sphere uniformly.
pub fn uniform_sample_sphere(u: Point2<f32>) -> Vec3<f32> {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[inline]
pub fn uniform_sphere_pdf() -> f32 {
    1.0 / (4.0 * PI)
}

/// Returns uniformly distributed barycentrics `(b0, b1)` on a triangle.
pub fn uniform_sample_triangle(u: Point2<f32>) -> (f32, f32) {
    let su0 = u.x.sqrt();
    (1.0 - su0, u.y * su0)
}
