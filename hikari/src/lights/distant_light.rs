use super::{Light, LightSample, FALLBACK_WORLD_RADIUS};
use crate::math::{Point2, Point3, Spectrum, Vec3};

use std::sync::OnceLock;

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Distant_Lights.html

pub struct DistantLight {
    /// Direction toward the light
    w: Vec3<f32>,
    l: Spectrum<f32>,
    world_radius: OnceLock<f32>,
}

impl DistantLight {
    /// Creates a new `DistantLight` arriving from direction `w` with radiance `l`.
    pub fn new(w: Vec3<f32>, l: Spectrum<f32>) -> Self {
        Self {
            w: w.normalized(),
            l,
            world_radius: OnceLock::new(),
        }
    }
}

impl Light for DistantLight {
    fn sample_li(&self, ref_p: Point3<f32>, _u: Point2<f32>) -> LightSample {
        let radius = self
            .world_radius
            .get()
            .copied()
            .unwrap_or(FALLBACK_WORLD_RADIUS);
        LightSample {
            wi: self.w,
            li: self.l,
            pdf: 1.0,
            p: ref_p + self.w * (2.0 * radius),
        }
    }

    fn pdf_li(&self, _ref_p: Point3<f32>, _wi: Vec3<f32>) -> f32 {
        0.0
    }

    fn is_delta(&self) -> bool {
        true
    }

    fn preprocess(&self, _world_center: Point3<f32>, world_radius: f32) {
        // Repeated calls keep the first radius
        let _ = self.world_radius.set(world_radius);
    }
}
