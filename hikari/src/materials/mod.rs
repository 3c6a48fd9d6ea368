mod bsdf;
mod matte;
mod mirror;

pub use bsdf::Bsdf;
pub use matte::Matte;
pub use mirror::Mirror;

use bitflags::bitflags;

use crate::math::{Point2, Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Basic_Interface

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BxdfType: u8 {
        const REFLECTION = 0b00001;
        const TRANSMISSION = 0b00010;
        const DIFFUSE = 0b00100;
        const GLOSSY = 0b01000;
        const SPECULAR = 0b10000;
    }
}

/// A sampled scattering direction
#[derive(Copy, Clone, Debug)]
pub struct BxdfSample {
    pub wi: Vec3<f32>,
    pub f: Spectrum<f32>,
    pub pdf: f32,
    pub sample_type: BxdfType,
}

impl BxdfSample {
    /// A sample that terminates the path.
    pub fn empty() -> Self {
        Self {
            wi: Vec3::zeros(),
            f: Spectrum::zeros(),
            pdf: 0.0,
            sample_type: BxdfType::empty(),
        }
    }
}

/// Scattering at a surface point. All directions are in the local shading frame where z is the
/// normal and both `wo` and `wi` point away from the surface.
pub trait Material: Send + Sync {
    /// Samples an incident direction for `wo` from `u`.
    fn sample_f(&self, wo: Vec3<f32>, u: Point2<f32>) -> BxdfSample;
    /// Evaluates the distribution function for the pair of directions.
    fn f(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> Spectrum<f32>;
    /// Returns the density [sample_f](Material::sample_f) would have for `wi`.
    fn pdf(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> f32;
    fn bxdf_type(&self) -> BxdfType;
}

#[inline]
fn same_hemisphere(w: Vec3<f32>, wp: Vec3<f32>) -> bool {
    w.z * wp.z > 0.0
}
