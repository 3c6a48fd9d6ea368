use super::{same_hemisphere, BxdfSample, BxdfType, Material};
use crate::{
    math::{Point2, Spectrum, Vec3},
    sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere},
};

use std::f32::consts::FRAC_1_PI;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Lambertian_Reflection

/// A Lambertian reflector
pub struct Matte {
    albedo: Spectrum<f32>,
}

impl Matte {
    pub fn new(albedo: Spectrum<f32>) -> Self {
        Self { albedo }
    }
}

impl Material for Matte {
    fn sample_f(&self, wo: Vec3<f32>, u: Point2<f32>) -> BxdfSample {
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        BxdfSample {
            wi,
            f: self.f(wo, wi),
            pdf: self.pdf(wo, wi),
            sample_type: self.bxdf_type(),
        }
    }

    fn f(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> Spectrum<f32> {
        if same_hemisphere(wo, wi) {
            self.albedo * FRAC_1_PI
        } else {
            Spectrum::zeros()
        }
    }

    fn pdf(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> f32 {
        if same_hemisphere(wo, wi) {
            cosine_hemisphere_pdf(wi.z.abs())
        } else {
            0.0
        }
    }

    fn bxdf_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::DIFFUSE
    }
}
