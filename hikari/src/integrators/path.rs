use super::{Integrator, RadianceResult};
use crate::{
    lights::{Light, LightSample},
    materials::{BxdfSample, BxdfType},
    math::{Ray, Spectrum},
    media::Medium,
    sampling::Sampler,
    scene::Scene,
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use std::sync::Arc;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Light_Transport_I_Surface_Reflection/Path_Tracing
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/Importance_Sampling#MultipleImportanceSampling

/// How direct lighting is estimated at path vertices
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumVariantNames,
    EnumString,
)]
pub enum LightStrategy {
    /// Lights are only found by following sampled scattering directions
    BsdfOnly,
    /// One light is sampled explicitly at each non-specular vertex
    NextEvent,
    /// Both of the above weighted by the power heuristic
    #[default]
    Mis,
}

/// Stochastic path termination.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RussianRoulette {
    /// Paths are never terminated on bounces up to this one
    pub min_depth: u32,
    /// Upper bound for the survival probability
    pub threshold: f32,
}

impl RussianRoulette {
    /// Starts late and lets bright paths survive almost surely.
    pub fn classic() -> Self {
        Self {
            min_depth: 3,
            threshold: 0.95,
        }
    }

    /// Starts after the first bounce and terminates more eagerly.
    pub fn aggressive() -> Self {
        Self {
            min_depth: 1,
            threshold: 0.75,
        }
    }

    /// Returns the probability of continuing a path with throughput `beta` after `bounces`.
    pub fn survival_probability(&self, bounces: u32, beta: &Spectrum<f32>) -> f32 {
        if bounces > self.min_depth {
            beta.max_comp().min(self.threshold).max(0.0)
        } else {
            1.0
        }
    }
}

impl Default for RussianRoulette {
    fn default() -> Self {
        Self::classic()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Params {
    pub strategy: LightStrategy,
    /// Maximum number of scattering events
    pub max_depth: u32,
    pub roulette: RussianRoulette,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            strategy: LightStrategy::Mis,
            max_depth: 5,
            roulette: RussianRoulette::classic(),
        }
    }
}

/// The weight of a sample from strategy f that is also reachable by strategy g.
pub fn power_heuristic(nf: u32, f_pdf: f32, ng: u32, g_pdf: f32) -> f32 {
    let f = (nf as f32) * f_pdf;
    let g = (ng as f32) * g_pdf;
    if g == 0.0 {
        // Also covers delta distributions on the other side
        return if f == 0.0 { 0.0 } else { 1.0 };
    }
    if f.is_infinite() {
        return 1.0;
    }
    (f * f) / (f * f + g * g)
}

pub struct Path {
    params: Params,
}

impl Path {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// Weight for emission found by following a scattering direction.
    fn emission_weight(
        &self,
        follows_specular: bool,
        bsdf_pdf: f32,
        light_pdf: impl FnOnce() -> f32,
    ) -> f32 {
        if follows_specular {
            return 1.0;
        }
        match self.params.strategy {
            LightStrategy::BsdfOnly => 1.0,
            // Already accounted for by the light sample of the previous vertex
            LightStrategy::NextEvent => 0.0,
            LightStrategy::Mis => power_heuristic(1, bsdf_pdf, 1, light_pdf()),
        }
    }
}

impl Integrator for Path {
    fn li(&self, mut ray: Ray<f32>, scene: &Scene, sampler: &mut Sampler) -> RadianceResult {
        let mut incoming_radiance = Spectrum::zeros();
        let mut beta = Spectrum::ones();
        let mut bounces = 0;
        // The camera ray behaves like a specular bounce, there's no light sample to compete with
        let mut specular_bounce = true;
        let mut prev_bsdf_pdf = 0.0;
        let mut prev_p = ray.o;
        let mut ray_count = 0;
        // Camera rays start in vacuum
        let mut medium: Option<Arc<dyn Medium>> = None;

        loop {
            ray_count += 1;
            let hit = scene.intersect(&mut ray);

            if let Some(m) = &medium {
                beta *= m.tr(&ray, sampler);
                if beta.is_black() {
                    break;
                }
            }

            let isect = match hit {
                Some(isect) => isect,
                None => {
                    for light in scene.infinite_lights() {
                        let le = light.le(&ray);
                        if le.is_black() {
                            continue;
                        }
                        let w = self.emission_weight(specular_bounce, prev_bsdf_pdf, || {
                            scene.light_selection_pdf() * light.pdf_li(prev_p, ray.d)
                        });
                        incoming_radiance += beta * le * w;
                    }
                    break;
                }
            };

            let bsdf = match isect.bsdf() {
                Some(bsdf) => bsdf,
                None => {
                    // Medium boundary, only the medium changes
                    medium = isect.medium_toward(ray.d, medium.as_ref());
                    ray = isect.spawn_ray(ray.d);
                    continue;
                }
            };

            let wo = isect.wo;
            let le = isect.le(wo);
            if !le.is_black() {
                let w = self.emission_weight(specular_bounce, prev_bsdf_pdf, || {
                    isect.primitive.area_light().map_or(0.0, |light| {
                        scene.light_selection_pdf() * light.pdf_li(prev_p, -wo)
                    })
                });
                incoming_radiance += beta * le * w;
            }

            if bounces >= self.params.max_depth {
                break;
            }

            if self.params.strategy != LightStrategy::BsdfOnly && !bsdf.is_specular() {
                if let Some((light, selection_pdf)) = scene.sample_light(sampler.get_1d()) {
                    let LightSample { wi, li, pdf, p } = light.sample_li(isect.p, sampler.get_2d());
                    if pdf > 0.0 && !li.is_black() {
                        let f = bsdf.f(wo, wi) * isect.shading.n.dot(wi).abs();
                        if !f.is_black() {
                            ray_count += 1;
                            let tr = scene.transmittance(
                                isect.offset_origin(wi),
                                p,
                                isect.medium_toward(wi, medium.as_ref()).as_ref(),
                                sampler,
                            );
                            if !tr.is_black() {
                                let light_pdf = selection_pdf * pdf;
                                let w = if light.is_delta()
                                    || self.params.strategy == LightStrategy::NextEvent
                                {
                                    1.0
                                } else {
                                    power_heuristic(1, light_pdf, 1, bsdf.pdf(wo, wi))
                                };
                                incoming_radiance += beta * f * li * tr * (w / light_pdf);
                            }
                        }
                    }
                }
            }

            let BxdfSample {
                wi,
                f,
                pdf,
                sample_type,
            } = bsdf.sample_f(wo, sampler.get_2d());
            if f.is_black() || pdf == 0.0 {
                break;
            }
            specular_bounce = sample_type.contains(BxdfType::SPECULAR);
            beta *= f * (isect.shading.n.dot(wi).abs() / pdf);
            prev_bsdf_pdf = pdf;
            prev_p = isect.p;
            medium = isect.medium_toward(wi, medium.as_ref());
            ray = isect.spawn_ray(wi);

            // Russian roulette
            let q = self.params.roulette.survival_probability(bounces, &beta);
            if q < 1.0 {
                if sampler.get_1d() >= q {
                    break;
                }
                beta /= q;
            }

            bounces += 1;
        }

        RadianceResult {
            li: incoming_radiance,
            ray_scene_intersections: ray_count,
        }
    }
}
