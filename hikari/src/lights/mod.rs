mod area_light;
mod distant_light;
mod infinite_light;
mod point_light;

pub use area_light::DiffuseAreaLight;
pub use distant_light::DistantLight;
pub use infinite_light::UniformInfiniteLight;
pub use point_light::PointLight;

use crate::math::{Point2, Point3, Ray, Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Light_Interface.html#Light

/// Sample from a light source for visibility testing and shading
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    /// Normalized direction from the reference point toward the light
    pub wi: Vec3<f32>,
    pub li: Spectrum<f32>,
    /// Solid angle density, zero for failed samples
    pub pdf: f32,
    /// Sampled point on the light used for the visibility test
    pub p: Point3<f32>,
}

impl LightSample {
    fn empty(p: Point3<f32>) -> Self {
        Self {
            wi: Vec3::zeros(),
            li: Spectrum::zeros(),
            pdf: 0.0,
            p,
        }
    }
}

pub trait Light: Send + Sync {
    /// Samples incident radiance at `ref_p` from this `Light`.
    fn sample_li(&self, ref_p: Point3<f32>, u: Point2<f32>) -> LightSample;

    /// Returns the solid angle density [Light::sample_li] has for direction `wi` at `ref_p`.
    fn pdf_li(&self, ref_p: Point3<f32>, wi: Vec3<f32>) -> f32;

    /// Returns `true` if this `Light` is described by a delta distribution.
    fn is_delta(&self) -> bool;

    /// Returns `true` if rays escaping the scene see this `Light`.
    fn is_infinite(&self) -> bool {
        false
    }

    /// Returns the radiance carried along an escaping `ray`.
    fn le(&self, _ray: &Ray<f32>) -> Spectrum<f32> {
        Spectrum::zeros()
    }

    /// Called once with the scene bounding sphere before rendering.
    fn preprocess(&self, _world_center: Point3<f32>, _world_radius: f32) {}
}

/// Radius used for lights at infinity if the scene was never preprocessed.
const FALLBACK_WORLD_RADIUS: f32 = 1e5;
