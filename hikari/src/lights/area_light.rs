use super::{Light, LightSample};
use crate::{
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec3},
    primitive::SHADOW_EPSILON,
    shapes::Shape,
};

use std::sync::Arc;

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Sources/Area_Lights

/// Uniform emission from the surface of a [Shape]
pub struct DiffuseAreaLight {
    shape: Arc<dyn Shape>,
    l_emit: Spectrum<f32>,
    two_sided: bool,
}

impl DiffuseAreaLight {
    pub fn new(shape: Arc<dyn Shape>, l_emit: Spectrum<f32>, two_sided: bool) -> Self {
        Self {
            shape,
            l_emit,
            two_sided,
        }
    }

    /// Returns the radiance emitted from a surface point with normal `n` toward `w`.
    pub fn l(&self, n: Normal<f32>, w: Vec3<f32>) -> Spectrum<f32> {
        if self.two_sided || n.dot_v(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::zeros()
        }
    }

    /// Converts the area density of the shape at `p` to solid angle at `ref_p`.
    fn solid_angle_pdf(&self, ref_p: Point3<f32>, p: Point3<f32>, n: Normal<f32>) -> f32 {
        let to_light = p - ref_p;
        let dist_sqr = to_light.len_sqr();
        if dist_sqr == 0.0 {
            return 0.0;
        }
        let cos_light = n.dot_v(to_light).abs() / dist_sqr.sqrt();
        if cos_light == 0.0 {
            return 0.0;
        }
        dist_sqr / (cos_light * self.shape.area())
    }
}

impl Light for DiffuseAreaLight {
    fn sample_li(&self, ref_p: Point3<f32>, u: Point2<f32>) -> LightSample {
        let sample = self.shape.sample(u);
        let pdf = self.solid_angle_pdf(ref_p, sample.p, sample.n);
        if pdf == 0.0 || !pdf.is_finite() {
            return LightSample::empty(sample.p);
        }

        let wi = (sample.p - ref_p).normalized();
        LightSample {
            wi,
            li: self.l(sample.n, -wi),
            pdf,
            p: sample.p,
        }
    }

    fn pdf_li(&self, ref_p: Point3<f32>, wi: Vec3<f32>) -> f32 {
        let ray = Ray::segment(ref_p, wi, SHADOW_EPSILON, f32::INFINITY);
        match self.shape.intersect(&ray) {
            Some(hit) => self.solid_angle_pdf(ref_p, hit.p, hit.n),
            None => 0.0,
        }
    }

    fn is_delta(&self) -> bool {
        false
    }
}
