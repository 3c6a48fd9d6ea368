use super::{BxdfSample, BxdfType, Material};
use crate::math::{Point2, Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission

/// A perfect specular reflector
pub struct Mirror {
    reflectance: Spectrum<f32>,
}

impl Mirror {
    pub fn new(reflectance: Spectrum<f32>) -> Self {
        Self { reflectance }
    }
}

impl Material for Mirror {
    fn sample_f(&self, wo: Vec3<f32>, _u: Point2<f32>) -> BxdfSample {
        let wi = Vec3::new(-wo.x, -wo.y, wo.z);
        let cos_theta = wi.z.abs();
        if cos_theta == 0.0 {
            return BxdfSample::empty();
        }
        BxdfSample {
            wi,
            // Cancels the cosine term the integrator applies
            f: self.reflectance / cos_theta,
            pdf: 1.0,
            sample_type: self.bxdf_type(),
        }
    }

    // Delta distribution is never hit by chance
    fn f(&self, _wo: Vec3<f32>, _wi: Vec3<f32>) -> Spectrum<f32> {
        Spectrum::zeros()
    }

    fn pdf(&self, _wo: Vec3<f32>, _wi: Vec3<f32>) -> f32 {
        0.0
    }

    fn bxdf_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::SPECULAR
    }
}
