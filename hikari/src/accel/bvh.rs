use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use std::{sync::Arc, time::Instant};

use super::SpatialIndex;
use crate::{
    hikari_debug, hikari_info,
    math::{Bounds3, Point3, Ray},
    primitive::{Intersection, Primitive},
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Primitives_and_Intersection_Acceleration/Bounding_Volume_Hierarchies.html

#[derive(
    Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display, EnumVariantNames, EnumString,
)]
pub enum SplitMethod {
    SurfaceAreaHeuristic,
    Middle,
    EqualCounts,
}

/// Ranges this deep always become leaves. Traversal pushes at most one node per level, so the
/// fixed stack below is never exceeded.
const MAX_BUILD_DEPTH: usize = 64;
const SAH_BUCKET_COUNT: usize = 12;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BvhStats {
    pub primitive_count: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
}

pub struct BoundingVolumeHierarchy {
    split_method: SplitMethod,
    max_prims_in_node: usize,
    nodes: Vec<BVHNode>,
    primitives: Vec<Arc<dyn Primitive>>,
    stats: BvhStats,
}

impl BoundingVolumeHierarchy {
    /// Creates a new `BoundingVolumeHierarchy` for the given [Primitive]s.
    pub fn new(
        primitives: Vec<Arc<dyn Primitive>>,
        max_prims_in_node: usize,
        split_method: SplitMethod,
    ) -> Self {
        let build_start = Instant::now();

        let mut ret = Self {
            split_method,
            max_prims_in_node: max_prims_in_node.max(1),
            nodes: Vec::new(),
            primitives: Vec::new(),
            stats: BvhStats {
                primitive_count: primitives.len(),
                ..BvhStats::default()
            },
        };

        if primitives.is_empty() {
            hikari_debug!("Empty BVH");
            return ret;
        }

        let mut primitive_info: Vec<BVHPrimitiveInfo> = primitives
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let bounds = p.world_bound();
                BVHPrimitiveInfo {
                    primitive_index: i,
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        let mut ordered_indices = Vec::with_capacity(primitives.len());
        let (root, node_count) =
            ret.recursive_build(&mut primitive_info, 0, &mut ordered_indices);

        ret.primitives = ordered_indices
            .into_iter()
            .map(|i| Arc::clone(&primitives[i]))
            .collect();

        ret.nodes = vec![BVHNode::default(); node_count];
        ret.flatten_tree(root, 0);
        ret.stats.node_count = node_count;

        hikari_info!(
            "BVH: Built for {} primitives in {:.2}s",
            ret.stats.primitive_count,
            build_start.elapsed().as_secs_f32()
        );
        hikari_debug!("BVH: {:?}", ret.stats);

        ret
    }

    pub fn stats(&self) -> BvhStats {
        self.stats
    }

    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    /// Builds the subtree for `primitive_info`. Returns the root and the node count of the subtree.
    fn recursive_build(
        &mut self,
        primitive_info: &mut [BVHPrimitiveInfo],
        depth: usize,
        ordered_indices: &mut Vec<usize>,
    ) -> (Box<BVHBuildNode>, usize) {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let bounds = primitive_info
            .iter()
            .fold(Bounds3::default(), |b, p| b.union_b(p.bounds));
        let primitive_count = primitive_info.len();

        macro_rules! init_leaf {
            () => {{
                let first_primitive_index = ordered_indices.len();
                ordered_indices.extend(primitive_info.iter().map(|p| p.primitive_index));
                self.stats.leaf_count += 1;
                (
                    BVHBuildNode::leaf(first_primitive_index, primitive_count, bounds),
                    1,
                )
            }};
        }

        if primitive_count == 1 || depth + 1 >= MAX_BUILD_DEPTH {
            return init_leaf!();
        }

        let centroid_bounds = primitive_info
            .iter()
            .fold(Bounds3::default(), |b, p| b.union_p(p.centroid));
        let axis = centroid_bounds.maximum_extent();

        // All centroids coincide, there's no meaningful way to split
        if centroid_bounds.p_max[axis] == centroid_bounds.p_min[axis] {
            return init_leaf!();
        }

        let mid = match self.split_method {
            SplitMethod::SurfaceAreaHeuristic => {
                match self.sah_split(primitive_info, &bounds, &centroid_bounds, axis) {
                    SahSplit::Split(mid) => mid,
                    SahSplit::Leaf => return init_leaf!(),
                }
            }
            SplitMethod::Middle => {
                let mid_value = (centroid_bounds.p_min[axis] + centroid_bounds.p_max[axis]) / 2.0;
                let mid = itertools::partition(primitive_info.iter_mut(), |p| {
                    p.centroid[axis] < mid_value
                });
                // We need to fall back to 'equal counts' if 'middle' fails
                if mid != 0 && mid != primitive_count {
                    mid
                } else {
                    split_equal_counts(primitive_info, axis)
                }
            }
            SplitMethod::EqualCounts => split_equal_counts(primitive_info, axis),
        };

        assert!(
            mid != 0 && mid != primitive_count,
            "BVH: Split failed with {} primitives",
            primitive_count
        );

        let (first, second) = primitive_info.split_at_mut(mid);
        let (child0, child0_node_count) = self.recursive_build(first, depth + 1, ordered_indices);
        let (child1, child1_node_count) =
            self.recursive_build(second, depth + 1, ordered_indices);
        (
            BVHBuildNode::interior(axis, child0, child1),
            1 + child0_node_count + child1_node_count,
        )
    }

    fn sah_split(
        &self,
        primitive_info: &mut [BVHPrimitiveInfo],
        bounds: &Bounds3<f32>,
        centroid_bounds: &Bounds3<f32>,
        axis: usize,
    ) -> SahSplit {
        let primitive_count = primitive_info.len();
        if primitive_count <= 2 {
            return SahSplit::Split(split_equal_counts(primitive_info, axis));
        }

        let bucket_index = |p: &BVHPrimitiveInfo| -> usize {
            let b = (SAH_BUCKET_COUNT as f32) * centroid_bounds.offset(p.centroid)[axis];
            (b as usize).min(SAH_BUCKET_COUNT - 1)
        };

        let mut buckets = [SahBucket::default(); SAH_BUCKET_COUNT];
        for p in primitive_info.iter() {
            let b = &mut buckets[bucket_index(p)];
            b.count += 1;
            b.bounds = b.bounds.union_b(p.bounds);
        }

        let parent_area = bounds.surface_area();
        if !(parent_area > 0.0) {
            return SahSplit::Split(split_equal_counts(primitive_info, axis));
        }

        // Cost of splitting after each bucket, relative to a primitive intersection
        let (min_bucket, min_cost) = (0..(SAH_BUCKET_COUNT - 1))
            .map(|i| {
                let (b0, b1) = buckets.split_at(i + 1);
                let (count0, bounds0) = b0.iter().fold((0, Bounds3::default()), |(c, b), s| {
                    (c + s.count, b.union_b(s.bounds))
                });
                let (count1, bounds1) = b1.iter().fold((0, Bounds3::default()), |(c, b), s| {
                    (c + s.count, b.union_b(s.bounds))
                });
                let cost = 1.0
                    + ((count0 as f32) * bounds0.surface_area()
                        + (count1 as f32) * bounds1.surface_area())
                        / parent_area;
                (i, cost)
            })
            .fold((0, f32::INFINITY), |(min_i, min_c), (i, c)| {
                if c < min_c {
                    (i, c)
                } else {
                    (min_i, min_c)
                }
            });

        let leaf_cost = primitive_count as f32;
        if primitive_count <= self.max_prims_in_node && min_cost >= leaf_cost {
            return SahSplit::Leaf;
        }

        let mid = itertools::partition(primitive_info.iter_mut(), |p| {
            bucket_index(p) <= min_bucket
        });
        if mid == 0 || mid == primitive_count {
            SahSplit::Split(split_equal_counts(primitive_info, axis))
        } else {
            SahSplit::Split(mid)
        }
    }

    fn flatten_tree(&mut self, root: Box<BVHBuildNode>, mut next_index: usize) -> usize {
        match root.content {
            BuildNodeContent::Interior {
                children: [child0, child1],
                split_axis,
            } => {
                let self_index = next_index;
                let second_child_index = self.flatten_tree(child0, self_index + 1);
                next_index = self.flatten_tree(child1, second_child_index);
                self.nodes[self_index] =
                    BVHNode::interior(root.bounds, second_child_index, split_axis);
            }
            BuildNodeContent::Leaf {
                first_primitive_index,
                primitive_count,
            } => {
                self.nodes[next_index] =
                    BVHNode::leaf(root.bounds, first_primitive_index, primitive_count);
                next_index += 1;
            }
        }
        next_index
    }

    /// Walks the nodes hit by `ray` front to back, calling `visit_leaf` with the primitives of
    /// each leaf. Stops early if `visit_leaf` returns `true`.
    #[inline]
    fn traverse<'a, F>(&'a self, ray: &Ray<f32>, mut visit_leaf: F)
    where
        F: FnMut(&'a [Arc<dyn Primitive>], &mut Ray<f32>) -> bool,
    {
        if self.nodes.is_empty() || ray.is_degenerate() {
            return;
        }

        let mut ray = *ray;
        let dir_is_neg = ray.dir_is_neg();

        let mut current_node_index = 0;
        let mut to_visit_index = 0;
        let mut to_visit_stack = [0; MAX_BUILD_DEPTH];
        loop {
            let node = &self.nodes[current_node_index];
            if node.bounds.intersect(&ray, dir_is_neg) {
                match node.content {
                    NodeContent::Interior {
                        second_child_index,
                        split_axis,
                    } => {
                        // Traverse children front to back
                        if dir_is_neg[split_axis as usize] {
                            to_visit_stack[to_visit_index] = current_node_index + 1;
                            current_node_index = second_child_index as usize;
                        } else {
                            to_visit_stack[to_visit_index] = second_child_index as usize;
                            current_node_index += 1;
                        }
                        to_visit_index += 1;
                        continue;
                    }
                    NodeContent::Leaf {
                        first_primitive_index,
                        primitive_count,
                    } => {
                        let range = (first_primitive_index as usize)
                            ..((first_primitive_index + primitive_count) as usize);
                        if visit_leaf(&self.primitives[range], &mut ray) {
                            return;
                        }
                    }
                    NodeContent::Uninitialized => unreachable!(),
                }
            }

            if to_visit_index == 0 {
                break;
            }
            to_visit_index -= 1;
            current_node_index = to_visit_stack[to_visit_index];
        }
    }
}

impl SpatialIndex for BoundingVolumeHierarchy {
    fn world_bound(&self) -> Bounds3<f32> {
        self.nodes
            .first()
            .map_or(Bounds3::default(), |root| root.bounds)
    }

    fn intersect_any(&self, ray: &Ray<f32>) -> bool {
        let mut hit = false;
        self.traverse(ray, |primitives, ray| {
            hit = primitives.iter().any(|p| p.intersect_any(ray));
            hit
        });
        hit
    }

    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>> {
        let mut hit = None;
        let mut t_max = ray.t_max;
        self.traverse(ray, |primitives, traversal_ray| {
            // Each hit narrows t_max so the last one found is the closest
            for p in primitives {
                if let Some(isect) = p.intersect(traversal_ray) {
                    hit = Some(isect);
                }
            }
            t_max = traversal_ray.t_max;
            false
        });
        ray.t_max = t_max;
        hit
    }
}

fn split_equal_counts(primitive_info: &mut [BVHPrimitiveInfo], axis: usize) -> usize {
    let mid = primitive_info.len() / 2;
    primitive_info.select_nth_unstable_by(mid, |a, b| {
        a.centroid[axis]
            .partial_cmp(&b.centroid[axis])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    mid
}

enum SahSplit {
    Split(usize),
    Leaf,
}

#[derive(Copy, Clone, Default)]
struct SahBucket {
    count: usize,
    bounds: Bounds3<f32>,
}

struct BVHPrimitiveInfo {
    primitive_index: usize,
    bounds: Bounds3<f32>,
    centroid: Point3<f32>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum NodeContent {
    Interior {
        second_child_index: u32,
        split_axis: u8,
    },
    Leaf {
        first_primitive_index: u32,
        primitive_count: u32,
    },
    Uninitialized,
}

#[derive(Copy, Clone)]
struct BVHNode {
    bounds: Bounds3<f32>,
    content: NodeContent,
}

impl BVHNode {
    fn default() -> Self {
        Self {
            bounds: Bounds3::default(),
            content: NodeContent::Uninitialized,
        }
    }

    fn interior(bounds: Bounds3<f32>, second_child_index: usize, split_axis: usize) -> Self {
        Self {
            bounds,
            content: NodeContent::Interior {
                second_child_index: second_child_index as u32,
                split_axis: split_axis as u8,
            },
        }
    }

    fn leaf(bounds: Bounds3<f32>, first_primitive_index: usize, primitive_count: usize) -> Self {
        Self {
            bounds,
            content: NodeContent::Leaf {
                first_primitive_index: first_primitive_index as u32,
                primitive_count: primitive_count as u32,
            },
        }
    }
}

enum BuildNodeContent {
    Interior {
        children: [Box<BVHBuildNode>; 2],
        split_axis: usize,
    },
    Leaf {
        // Index into the ordered primitive array
        first_primitive_index: usize,
        primitive_count: usize,
    },
}

struct BVHBuildNode {
    bounds: Bounds3<f32>,
    content: BuildNodeContent,
}

impl BVHBuildNode {
    fn interior(
        split_axis: usize,
        child0: Box<BVHBuildNode>,
        child1: Box<BVHBuildNode>,
    ) -> Box<Self> {
        Box::new(Self {
            bounds: child0.bounds.union_b(child1.bounds),
            content: BuildNodeContent::Interior {
                children: [child0, child1],
                split_axis,
            },
        })
    }

    fn leaf(
        first_primitive_index: usize,
        primitive_count: usize,
        bounds: Bounds3<f32>,
    ) -> Box<Self> {
        Box::new(Self {
            bounds,
            content: BuildNodeContent::Leaf {
                first_primitive_index,
                primitive_count,
            },
        })
    }
}
