mod geometry_normals;
mod path;

pub use geometry_normals::GeometryNormals;
pub use path::{power_heuristic, LightStrategy, Path, RussianRoulette};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use std::sync::Arc;

use crate::{
    camera::{Camera, CameraSample},
    film::FilmTile,
    hikari_warn,
    math::{Point2, Ray, Spectrum, Vec2},
    sampling::Sampler,
    scene::Scene,
};

pub type PathParams = path::Params;

#[derive(
    Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display, EnumVariantNames, EnumString,
)]
pub enum IntegratorType {
    Path(path::Params),
    GeometryNormals,
}

impl IntegratorType {
    pub fn instantiate(self) -> Arc<dyn Integrator> {
        match self {
            IntegratorType::Path(params) => Arc::new(Path::new(params)),
            IntegratorType::GeometryNormals => Arc::new(GeometryNormals {}),
        }
    }
}

impl Default for IntegratorType {
    fn default() -> Self {
        IntegratorType::Path(path::Params::default())
    }
}

pub struct RadianceResult {
    pub li: Spectrum<f32>,
    pub ray_scene_intersections: usize,
}

impl Default for RadianceResult {
    fn default() -> Self {
        Self {
            li: Spectrum::zeros(),
            ray_scene_intersections: 0,
        }
    }
}

/// Work done while rendering a [FilmTile]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TileStats {
    pub ray_count: usize,
    /// Samples that were NaN, infinite or negative and got replaced by black
    pub invalid_samples: usize,
    /// `true` if rendering stopped before all samples were taken
    pub interrupted: bool,
}

// Public interface for scene integrators.
pub trait Integrator: Send + Sync {
    /// Evaluates the incoming radiance along `ray`. Also returns the number of rays intersected with `scene`.
    fn li(&self, ray: Ray<f32>, scene: &Scene, sampler: &mut Sampler) -> RadianceResult;

    /// Renders the given [FilmTile] into `tile_pixels`, which is row-major within the tile.
    /// `early_termination_predicate` is polled before every sample.
    #[allow(clippy::too_many_arguments)]
    fn render(
        &self,
        scene: &Scene,
        camera: &Camera,
        sampler: &mut Sampler,
        samples_per_pixel: u32,
        tile: &FilmTile,
        tile_pixels: &mut [Spectrum<f32>],
        early_termination_predicate: &mut dyn FnMut() -> bool,
    ) -> TileStats {
        assert!(tile_pixels.len() >= tile.pixel_count());

        let tile_width = tile.bb.width();
        let mut stats = TileStats::default();

        for p in tile.bb {
            let Vec2 {
                x: tile_x,
                y: tile_y,
            } = p - tile.bb.p_min;
            let pixel_offset = (tile_y as usize) * (tile_width as usize) + (tile_x as usize);

            let mut color = Spectrum::zeros();
            for sample_index in 0..samples_per_pixel {
                if early_termination_predicate() {
                    // Keep what was accumulated so far
                    tile_pixels[pixel_offset] = color / (samples_per_pixel.max(1) as f32);
                    stats.interrupted = true;
                    return stats;
                }

                // Seeded per pixel sample to get the same results regardless of which threads
                // take which tiles
                sampler.start_pixel_sample(p, sample_index);

                let p_film = Point2::new(p.x as f32, p.y as f32) + sampler.get_2d();
                let ray = camera.ray(&CameraSample { p_film });

                let result = self.li(ray, scene, sampler);
                stats.ray_count += result.ray_scene_intersections;

                if result.li.is_valid() {
                    color += result.li;
                } else {
                    hikari_warn!(
                        "Invalid radiance {:?} at pixel ({}, {}) sample {}",
                        result.li,
                        p.x,
                        p.y,
                        sample_index
                    );
                    stats.invalid_samples += 1;
                }
            }
            tile_pixels[pixel_offset] = color / (samples_per_pixel.max(1) as f32);
        }

        stats
    }
}
