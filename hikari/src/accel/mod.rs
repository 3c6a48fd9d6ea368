mod bvh;
mod octree;

pub use bvh::{BoundingVolumeHierarchy, BvhStats, SplitMethod};
pub use octree::{Octree, OctreeStats};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use std::sync::Arc;

use crate::{
    math::{Bounds3, Ray},
    primitive::{Intersection, Primitive},
};

/// Ray queries over a set of primitives
pub trait SpatialIndex: Send + Sync {
    /// Returns the union of the bounds of all indexed primitives. Invalid if there are none.
    fn world_bound(&self) -> Bounds3<f32>;

    /// Checks if `ray` hits any primitive within its `[t_min, t_max]`.
    fn intersect_any(&self, ray: &Ray<f32>) -> bool;

    /// Finds the closest hit of `ray`, narrowing `ray.t_max` to it.
    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BvhSettings {
    pub split_method: SplitMethod,
    pub max_prims_in_node: u32,
}

impl Default for BvhSettings {
    fn default() -> Self {
        Self {
            split_method: SplitMethod::SurfaceAreaHeuristic,
            max_prims_in_node: 4,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct OctreeSettings {
    /// Clamped to [Octree::MAX_DEPTH]
    pub max_depth: u32,
    pub max_prims_in_node: u32,
    /// Scale of a node's bound relative to its octant, in `[1, 2)`
    pub looseness: f32,
}

impl Default for OctreeSettings {
    fn default() -> Self {
        Self {
            max_depth: 12,
            max_prims_in_node: 4,
            looseness: 1.25,
        }
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display, EnumVariantNames, EnumString,
)]
pub enum IndexSettings {
    Bvh(BvhSettings),
    Octree(OctreeSettings),
}

impl Default for IndexSettings {
    fn default() -> Self {
        IndexSettings::Bvh(BvhSettings::default())
    }
}

/// Builds the [SpatialIndex] described by `settings` over `primitives`.
pub fn build_index(
    primitives: Vec<Arc<dyn Primitive>>,
    settings: IndexSettings,
) -> Box<dyn SpatialIndex> {
    match settings {
        IndexSettings::Bvh(BvhSettings {
            split_method,
            max_prims_in_node,
        }) => Box::new(BoundingVolumeHierarchy::new(
            primitives,
            max_prims_in_node as usize,
            split_method,
        )),
        IndexSettings::Octree(settings) => Box::new(Octree::new(primitives, settings)),
    }
}
