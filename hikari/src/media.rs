use std::sync::Arc;

use crate::{
    math::{Ray, Spectrum},
    sampling::Sampler,
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Volume_Scattering/Media

pub trait Medium: Send + Sync {
    /// Returns the beam transmittance along `ray` from `t_min` to `t_max`.
    fn tr(&self, ray: &Ray<f32>, sampler: &mut Sampler) -> Spectrum<f32>;
}

/// A medium with constant attenuation
pub struct HomogeneousMedium {
    sigma_t: Spectrum<f32>,
}

impl HomogeneousMedium {
    /// Creates a new `HomogeneousMedium` from absorption and out-scattering coefficients.
    pub fn new(sigma_a: Spectrum<f32>, sigma_s: Spectrum<f32>) -> Self {
        Self {
            sigma_t: sigma_a + sigma_s,
        }
    }
}

impl Medium for HomogeneousMedium {
    fn tr(&self, ray: &Ray<f32>, _sampler: &mut Sampler) -> Spectrum<f32> {
        let dist = ((ray.t_max - ray.t_min) * ray.d.len()).min(f32::MAX);
        // Beer-Lambert
        (-(self.sigma_t * dist)).exp()
    }
}

/// The media on the two sides of a surface
#[derive(Clone, Default)]
pub struct MediumInterface {
    /// Medium on the side the normal points away from
    pub inside: Option<Arc<dyn Medium>>,
    /// Medium on the side the normal points to
    pub outside: Option<Arc<dyn Medium>>,
}

impl MediumInterface {
    pub fn new(inside: Option<Arc<dyn Medium>>, outside: Option<Arc<dyn Medium>>) -> Self {
        Self { inside, outside }
    }

    /// Returns `true` if the surface separates two different media.
    pub fn is_transition(&self) -> bool {
        match (&self.inside, &self.outside) {
            (Some(inside), Some(outside)) => !Arc::ptr_eq(inside, outside),
            (None, None) => false,
            _ => true,
        }
    }
}
