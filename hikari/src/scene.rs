use std::sync::Arc;

use crate::{
    hikari_debug,
    lights::Light,
    math::{Bounds3, Point3, Ray, Spectrum},
    media::Medium,
    primitive::{Aggregate, Intersection, Primitive, SHADOW_EPSILON},
    sampling::Sampler,
};

/// Surfaces crossed before a transmittance query gives up and reports the segment blocked.
const MAX_TRANSMITTANCE_CROSSINGS: usize = 64;

/// An immutable scene ready for rendering
pub struct Scene {
    aggregate: Aggregate,
    lights: Vec<Arc<dyn Light>>,
    infinite_lights: Vec<Arc<dyn Light>>,
}

impl Scene {
    /// Creates a new `Scene` and preprocesses `lights` against the bounds of `aggregate`.
    pub fn new(aggregate: Aggregate, lights: Vec<Arc<dyn Light>>) -> Self {
        let (world_center, world_radius) = aggregate
            .world_bound()
            .bounding_sphere()
            .unwrap_or((Point3::zeros(), 1.0));
        for light in &lights {
            light.preprocess(world_center, world_radius);
        }

        let infinite_lights: Vec<Arc<dyn Light>> = lights
            .iter()
            .filter(|l| l.is_infinite())
            .cloned()
            .collect();

        hikari_debug!(
            "Scene: {} lights, {} of them infinite",
            lights.len(),
            infinite_lights.len()
        );

        Self {
            aggregate,
            lights,
            infinite_lights,
        }
    }

    pub fn lights(&self) -> &[Arc<dyn Light>] {
        &self.lights
    }

    pub fn infinite_lights(&self) -> &[Arc<dyn Light>] {
        &self.infinite_lights
    }

    pub fn world_bound(&self) -> Bounds3<f32> {
        self.aggregate.world_bound()
    }

    /// Finds the closest hit of `ray`, narrowing `ray.t_max` to it.
    pub fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>> {
        self.aggregate.intersect(ray)
    }

    /// Checks if `ray` hits anything within its `[t_min, t_max]`.
    pub fn intersect_any(&self, ray: &Ray<f32>) -> bool {
        self.aggregate.intersect_any(ray)
    }

    /// Checks if the segment between `p0` and `p1` is blocked. Both ends are shortened slightly to
    /// skip the surfaces the points lie on.
    pub fn is_occluded(&self, p0: Point3<f32>, p1: Point3<f32>) -> bool {
        let ray = Ray::segment(p0, p1 - p0, SHADOW_EPSILON, 1.0 - SHADOW_EPSILON);
        self.aggregate.intersect_any(&ray)
    }

    /// Picks a light uniformly with `u`. Returns the light and the probability it was picked.
    pub fn sample_light(&self, u: f32) -> Option<(&Arc<dyn Light>, f32)> {
        if self.lights.is_empty() {
            return None;
        }
        let count = self.lights.len();
        let index = ((u * count as f32) as usize).min(count - 1);
        Some((&self.lights[index], self.light_selection_pdf()))
    }

    /// Returns the probability [Scene::sample_light] picks any given light, zero without lights.
    pub fn light_selection_pdf(&self) -> f32 {
        if self.lights.is_empty() {
            0.0
        } else {
            1.0 / (self.lights.len() as f32)
        }
    }

    /// Returns the radiance the infinite lights carry along an escaped `ray`.
    pub fn eval_infinite_lights(&self, ray: &Ray<f32>) -> Spectrum<f32> {
        self.infinite_lights
            .iter()
            .fold(Spectrum::zeros(), |acc, l| acc + l.le(ray))
    }

    /// Returns the fraction of light that travels from `p0` to `p1`. Surfaces without a material
    /// are medium boundaries that the segment passes through, any other surface blocks it.
    pub fn transmittance(
        &self,
        p0: Point3<f32>,
        p1: Point3<f32>,
        medium: Option<&Arc<dyn Medium>>,
        sampler: &mut Sampler,
    ) -> Spectrum<f32> {
        let mut tr = Spectrum::ones();
        let mut medium = medium.cloned();
        let mut ray = Ray::segment(p0, p1 - p0, SHADOW_EPSILON, 1.0 - SHADOW_EPSILON);

        for _ in 0..MAX_TRANSMITTANCE_CROSSINGS {
            let hit = self.aggregate.intersect(&mut ray);

            if let Some(m) = &medium {
                tr *= m.tr(&ray, sampler);
            }

            let isect = match hit {
                Some(isect) => isect,
                None => return tr,
            };
            if isect.primitive.material().is_some() {
                return Spectrum::zeros();
            }

            medium = isect.medium_toward(ray.d, medium.as_ref());
            ray = isect.spawn_ray_to(p1);
        }

        Spectrum::zeros()
    }
}
