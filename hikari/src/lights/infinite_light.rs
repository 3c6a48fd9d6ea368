use super::{Light, LightSample, FALLBACK_WORLD_RADIUS};
use crate::{
    math::{Point2, Point3, Ray, Spectrum, Vec3},
    sampling::{uniform_sample_sphere, uniform_sphere_pdf},
};

use std::sync::OnceLock;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Light_Sources/Infinite_Area_Lights

/// Constant radiance arriving from every direction
pub struct UniformInfiniteLight {
    l: Spectrum<f32>,
    world_radius: OnceLock<f32>,
}

impl UniformInfiniteLight {
    pub fn new(l: Spectrum<f32>) -> Self {
        Self {
            l,
            world_radius: OnceLock::new(),
        }
    }
}

impl Light for UniformInfiniteLight {
    fn sample_li(&self, ref_p: Point3<f32>, u: Point2<f32>) -> LightSample {
        let radius = self
            .world_radius
            .get()
            .copied()
            .unwrap_or(FALLBACK_WORLD_RADIUS);
        let wi = uniform_sample_sphere(u);
        LightSample {
            wi,
            li: self.l,
            pdf: uniform_sphere_pdf(),
            p: ref_p + wi * (2.0 * radius),
        }
    }

    fn pdf_li(&self, _ref_p: Point3<f32>, _wi: Vec3<f32>) -> f32 {
        uniform_sphere_pdf()
    }

    fn is_delta(&self) -> bool {
        false
    }

    fn is_infinite(&self) -> bool {
        true
    }

    fn le(&self, _ray: &Ray<f32>) -> Spectrum<f32> {
        self.l
    }

    fn preprocess(&self, _world_center: Point3<f32>, world_radius: f32) {
        let _ = self.world_radius.set(world_radius);
    }
}
