use super::{Light, LightSample};
use crate::math::{Point2, Point3, Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Point_Lights.html

pub struct PointLight {
    p: Point3<f32>,
    i: Spectrum<f32>,
}

impl PointLight {
    /// Creates a new `PointLight` at `p` with intensity `i`.
    pub fn new(p: Point3<f32>, i: Spectrum<f32>) -> Self {
        Self { p, i }
    }
}

impl Light for PointLight {
    fn sample_li(&self, ref_p: Point3<f32>, _u: Point2<f32>) -> LightSample {
        let to_light = self.p - ref_p;
        let dist_sqr = to_light.len_sqr();
        if dist_sqr == 0.0 {
            return LightSample::empty(self.p);
        }

        LightSample {
            wi: to_light / dist_sqr.sqrt(),
            li: self.i / dist_sqr,
            pdf: 1.0,
            p: self.p,
        }
    }

    fn pdf_li(&self, _ref_p: Point3<f32>, _wi: Vec3<f32>) -> f32 {
        0.0
    }

    fn is_delta(&self) -> bool {
        true
    }
}
