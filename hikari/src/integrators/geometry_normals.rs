use super::{Integrator, RadianceResult};
use crate::{
    math::{Ray, Spectrum},
    sampling::Sampler,
    scene::Scene,
};

/// Maps the geometric normal of the first hit into a color
pub struct GeometryNormals {}

impl Integrator for GeometryNormals {
    fn li(&self, mut ray: Ray<f32>, scene: &Scene, _sampler: &mut Sampler) -> RadianceResult {
        let li = match scene.intersect(&mut ray) {
            Some(isect) => {
                let n = isect.n;
                Spectrum::new(n.x + 1.0, n.y + 1.0, n.z + 1.0) / 2.0
            }
            None => Spectrum::zeros(),
        };

        RadianceResult {
            li,
            ray_scene_intersections: 1,
        }
    }
}
