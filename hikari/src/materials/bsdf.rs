use super::{BxdfSample, BxdfType, Material};
use crate::math::{Frame, Point2, Spectrum, Vec3};

/// A [Material] bound to the shading frame of a surface point.
pub struct Bsdf<'a> {
    frame: Frame,
    material: &'a dyn Material,
}

impl<'a> Bsdf<'a> {
    pub fn new(frame: Frame, material: &'a dyn Material) -> Self {
        Self { frame, material }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn bxdf_type(&self) -> BxdfType {
        self.material.bxdf_type()
    }

    /// Returns `true` if this only scatters into discrete directions.
    pub fn is_specular(&self) -> bool {
        self.material.bxdf_type().contains(BxdfType::SPECULAR)
    }

    /// Evaluates the distribution function for the pair of world space directions.
    pub fn f(&self, wo_world: Vec3<f32>, wi_world: Vec3<f32>) -> Spectrum<f32> {
        let wo = self.frame.to_local(wo_world);
        let wi = self.frame.to_local(wi_world);
        if wo.z == 0.0 {
            return Spectrum::zeros();
        }
        self.material.f(wo, wi)
    }

    /// Samples a world space incident direction for `wo_world`.
    pub fn sample_f(&self, wo_world: Vec3<f32>, u: Point2<f32>) -> BxdfSample {
        let wo = self.frame.to_local(wo_world);
        if wo.z == 0.0 {
            return BxdfSample::empty();
        }
        let sample = self.material.sample_f(wo, u);
        if sample.pdf == 0.0 || sample.f.is_black() {
            return BxdfSample::empty();
        }
        BxdfSample {
            wi: self.frame.to_world(sample.wi),
            ..sample
        }
    }

    pub fn pdf(&self, wo_world: Vec3<f32>, wi_world: Vec3<f32>) -> f32 {
        let wo = self.frame.to_local(wo_world);
        let wi = self.frame.to_local(wi_world);
        if wo.z == 0.0 {
            return 0.0;
        }
        self.material.pdf(wo, wi)
    }
}
