use std::{sync::Arc, time::Instant};

use super::{OctreeSettings, SpatialIndex};
use crate::{
    hikari_debug, hikari_info, hikari_warn,
    math::{Bounds3, Point3, Ray, Vec3},
    primitive::{Intersection, Primitive},
};

// Loose octree after Ulrich, Loose Octrees, Game Programming Gems 2000.
// Children split the loosened bound of their parent so every primitive that overlaps a node also
// overlaps one of its children.

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OctreeStats {
    pub primitive_count: usize,
    /// Primitives stored in more than one leaf count once per leaf
    pub primitive_references: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
}

pub struct Octree {
    nodes: Vec<OctreeNode>,
    /// Leaves reference contiguous ranges of this
    leaf_primitives: Vec<u32>,
    primitives: Vec<Arc<dyn Primitive>>,
    primitive_bounds: Vec<Bounds3<f32>>,
    max_depth: usize,
    max_prims_in_node: usize,
    looseness: f32,
    stats: OctreeStats,
}

#[derive(Copy, Clone, Debug)]
struct OctreeNode {
    /// Union of the bounds of all primitives below, used in traversal
    bounds: Bounds3<f32>,
    /// Loosened octant that decides which primitives go below
    outer: Bounds3<f32>,
    content: NodeContent,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum NodeContent {
    Interior { first_child: u32, child_count: u8 },
    Leaf { first_index: u32, count: u32 },
}

impl Octree {
    /// Traversal keeps at most 7 siblings per level on its stack, deeper trees aren't built.
    pub const MAX_DEPTH: usize = 16;
    const STACK_SIZE: usize = 8 * Self::MAX_DEPTH;

    /// Creates a new `Octree` for the given [Primitive]s.
    pub fn new(primitives: Vec<Arc<dyn Primitive>>, settings: OctreeSettings) -> Self {
        let build_start = Instant::now();

        let looseness = if (1.0..2.0).contains(&settings.looseness) {
            settings.looseness
        } else {
            let clamped = settings.looseness.clamp(1.0, 1.99);
            hikari_warn!(
                "Octree: Looseness {} out of range, using {}",
                settings.looseness,
                clamped
            );
            clamped
        };

        let primitive_bounds: Vec<Bounds3<f32>> =
            primitives.iter().map(|p| p.world_bound()).collect();

        let mut ret = Self {
            nodes: Vec::new(),
            leaf_primitives: Vec::new(),
            primitive_bounds,
            max_depth: (settings.max_depth as usize).min(Self::MAX_DEPTH),
            max_prims_in_node: (settings.max_prims_in_node as usize).max(1),
            looseness,
            stats: OctreeStats {
                primitive_count: primitives.len(),
                ..OctreeStats::default()
            },
            primitives,
        };

        if ret.primitives.is_empty() {
            hikari_debug!("Empty octree");
            return ret;
        }

        let world = ret
            .primitive_bounds
            .iter()
            .fold(Bounds3::default(), |b, &pb| b.union_b(pb));
        // Cube around the scene
        let half_extent = {
            let d = world.diagonal();
            (d.max_comp() / 2.0).max(f32::EPSILON)
        };
        let root_region = Bounds3::new(
            world.centroid() - Vec3::from(half_extent),
            world.centroid() + Vec3::from(half_extent),
        );

        let ids: Vec<u32> = (0..ret.primitives.len() as u32).collect();
        ret.nodes.push(OctreeNode {
            bounds: world,
            outer: ret.loosen(&root_region),
            content: NodeContent::Leaf {
                first_index: 0,
                count: 0,
            },
        });
        ret.build(0, ids, 0);
        ret.stats.node_count = ret.nodes.len();
        ret.stats.primitive_references = ret.leaf_primitives.len();

        hikari_info!(
            "Octree: Built for {} primitives in {:.2}s",
            ret.stats.primitive_count,
            build_start.elapsed().as_secs_f32()
        );
        hikari_debug!("Octree: {:?}", ret.stats);

        ret
    }

    pub fn stats(&self) -> OctreeStats {
        self.stats
    }

    /// Scales `region` around its center by the looseness factor.
    fn loosen(&self, region: &Bounds3<f32>) -> Bounds3<f32> {
        let center = region.centroid();
        let half = region.diagonal() * (0.5 * self.looseness);
        Bounds3::new(center - half, center + half)
    }

    /// Fills in `node_index` from the primitives in `ids`. Children are pushed contiguously.
    fn build(&mut self, node_index: usize, ids: Vec<u32>, depth: usize) {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let node_outer = self.nodes[node_index].outer;
        let children = if ids.len() <= self.max_prims_in_node || depth >= self.max_depth {
            None
        } else {
            self.distribute(&node_outer, &ids)
        };

        match children {
            Some(children) => {
                let first_child = self.nodes.len();
                for (outer, child_ids) in &children {
                    let bounds = child_ids.iter().fold(Bounds3::default(), |b, &i| {
                        b.union_b(self.primitive_bounds[i as usize])
                    });
                    self.nodes.push(OctreeNode {
                        bounds,
                        outer: *outer,
                        content: NodeContent::Leaf {
                            first_index: 0,
                            count: 0,
                        },
                    });
                }
                self.nodes[node_index].content = NodeContent::Interior {
                    first_child: first_child as u32,
                    child_count: children.len() as u8,
                };
                for (i, (_, child_ids)) in children.into_iter().enumerate() {
                    self.build(first_child + i, child_ids, depth + 1);
                }
            }
            None => {
                self.nodes[node_index].content = NodeContent::Leaf {
                    first_index: self.leaf_primitives.len() as u32,
                    count: ids.len() as u32,
                };
                self.leaf_primitives.extend_from_slice(&ids);
                self.stats.leaf_count += 1;
            }
        }
    }

    /// Sorts `ids` into the octants of `outer`. Returns the non-empty children with their loose
    /// bounds, or `None` if no child would have fewer primitives than the parent.
    fn distribute(
        &self,
        outer: &Bounds3<f32>,
        ids: &[u32],
    ) -> Option<Vec<(Bounds3<f32>, Vec<u32>)>> {
        let center = outer.centroid();
        let child_outers: Vec<Bounds3<f32>> = (0..8)
            .map(|octant| {
                let corner = Point3::new(
                    outer[octant & 1].x,
                    outer[(octant >> 1) & 1].y,
                    outer[(octant >> 2) & 1].z,
                );
                self.loosen(&Bounds3::new(center, corner))
            })
            .collect();

        let mut child_ids: Vec<Vec<u32>> = vec![Vec::new(); 8];
        for &id in ids {
            let b = &self.primitive_bounds[id as usize];
            match child_outers.iter().position(|o| o.contains_b(b)) {
                Some(octant) => child_ids[octant].push(id),
                None => {
                    // Straddles the loosened octants, so goes to all it overlaps
                    let mut inserted = false;
                    for (octant, o) in child_outers.iter().enumerate() {
                        if o.overlaps(b) {
                            child_ids[octant].push(id);
                            inserted = true;
                        }
                    }
                    // Only possible through rounding, the octants tile the parent
                    if !inserted {
                        let c = b.centroid();
                        let octant = (0..8)
                            .min_by(|&i, &j| {
                                let di = child_outers[i].centroid().dist_sqr(c);
                                let dj = child_outers[j].centroid().dist_sqr(c);
                                di.partial_cmp(&dj).unwrap_or(std::cmp::Ordering::Equal)
                            })
                            .unwrap_or(0);
                        child_ids[octant].push(id);
                    }
                }
            }
        }

        if child_ids.iter().all(|c| c.len() >= ids.len() || c.is_empty()) {
            return None;
        }

        Some(
            child_outers
                .into_iter()
                .zip(child_ids)
                .filter(|(_, ids)| !ids.is_empty())
                .collect(),
        )
    }

    /// Walks the nodes hit by `ray`, nearest entry first, calling `visit_leaf` with the
    /// primitive indices of each leaf. Stops early if `visit_leaf` returns `true`.
    #[inline]
    fn traverse<F>(&self, ray: &Ray<f32>, mut visit_leaf: F)
    where
        F: FnMut(&[u32], &mut Ray<f32>) -> bool,
    {
        if self.nodes.is_empty() || ray.is_degenerate() {
            return;
        }

        let mut ray = *ray;
        let dir_is_neg = ray.dir_is_neg();

        let mut to_visit_index = 0;
        let mut to_visit_stack = [0u32; Self::STACK_SIZE];
        to_visit_stack[0] = 0;
        to_visit_index += 1;
        while to_visit_index > 0 {
            to_visit_index -= 1;
            let node = &self.nodes[to_visit_stack[to_visit_index] as usize];
            if !node.bounds.intersect(&ray, dir_is_neg) {
                continue;
            }

            match node.content {
                NodeContent::Interior {
                    first_child,
                    child_count,
                } => {
                    let mut hit_children = [(0.0f32, 0u32); 8];
                    let mut hit_count = 0;
                    for c in first_child..(first_child + child_count as u32) {
                        if let Some((t0, _)) = self.nodes[c as usize].bounds.intersections(&ray) {
                            hit_children[hit_count] = (t0, c);
                            hit_count += 1;
                        }
                    }
                    // Farthest first onto the stack so the nearest is popped next
                    hit_children[..hit_count].sort_unstable_by(|a, b| {
                        b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    for &(_, c) in &hit_children[..hit_count] {
                        to_visit_stack[to_visit_index] = c;
                        to_visit_index += 1;
                    }
                }
                NodeContent::Leaf { first_index, count } => {
                    let range = (first_index as usize)..((first_index + count) as usize);
                    if visit_leaf(&self.leaf_primitives[range], &mut ray) {
                        return;
                    }
                }
            }
        }
    }
}

impl SpatialIndex for Octree {
    fn world_bound(&self) -> Bounds3<f32> {
        self.nodes
            .first()
            .map_or(Bounds3::default(), |root| root.bounds)
    }

    fn intersect_any(&self, ray: &Ray<f32>) -> bool {
        let mut hit = false;
        self.traverse(ray, |ids, ray| {
            hit = ids
                .iter()
                .any(|&i| self.primitives[i as usize].intersect_any(ray));
            hit
        });
        hit
    }

    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>> {
        let mut hit = None;
        let mut t_max = ray.t_max;
        self.traverse(ray, |ids, traversal_ray| {
            for &i in ids {
                if let Some(isect) = self.primitives[i as usize].intersect(traversal_ray) {
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
