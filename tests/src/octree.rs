#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use std::sync::Arc;

    use hikari::{
        accel::{build_index, IndexSettings, Octree, OctreeSettings, SpatialIndex},
        math::{Point3, Ray, Vec3},
        primitive::Primitive,
    };

    use crate::common::{
        assert_close, brute_force_any, brute_force_closest, random_primitives, random_ray, sphere,
    };

    fn check_against_brute_force(
        primitives: &[Arc<dyn Primitive>],
        index: &dyn SpatialIndex,
        rng: &mut Pcg32,
    ) {
        let mut hits = 0;
        for _ in 0..1500 {
            let ray = random_ray(rng);
            assert_eq!(
                index.intersect_any(&ray),
                brute_force_any(primitives, &ray),
                "any-hit mismatch on {:?}",
                ray
            );

            let mut index_ray = ray;
            let index_t = index.intersect(&mut index_ray).map(|isect| isect.t);
            match (index_t, brute_force_closest(primitives, &ray)) {
                (Some(a), Some(b)) => {
                    assert_close(a, b);
                    hits += 1;
                }
                (None, None) => (),
                (a, b) => panic!("closest hit mismatch on {:?}: {:?} vs {:?}", ray, a, b),
            }
        }
        assert!(hits > 100);
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = Pcg32::seed_from_u64(0x0C7);
        let primitives = random_primitives(&mut rng, 300);

        for (looseness, max_depth, max_prims_in_node) in
            [(1.0, 12, 4), (1.25, 12, 4), (1.75, 6, 1), (1.5, 16, 16)]
        {
            let index = build_index(
                primitives.clone(),
                IndexSettings::Octree(OctreeSettings {
                    max_depth,
                    max_prims_in_node,
                    looseness,
                }),
            );
            check_against_brute_force(&primitives, index.as_ref(), &mut rng);
        }
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let mut rng = Pcg32::seed_from_u64(3);
        let primitives = random_primitives(&mut rng, 100);
        let octree = Octree::new(
            primitives.clone(),
            OctreeSettings {
                max_depth: 1000,
                max_prims_in_node: 0,
                looseness: 5.0,
            },
        );
        assert!(octree.stats().max_depth <= Octree::MAX_DEPTH);
        check_against_brute_force(&primitives, &octree, &mut rng);
    }

    #[test]
    fn stats() {
        let mut rng = Pcg32::seed_from_u64(11);
        let primitives = random_primitives(&mut rng, 200);
        let octree = Octree::new(primitives, OctreeSettings::default());
        let stats = octree.stats();
        assert_eq!(stats.primitive_count, 200);
        // Primitives straddling octants can be referenced from several leaves
        assert!(stats.primitive_references >= stats.primitive_count);
        assert!(stats.leaf_count >= 1);
        assert!(stats.node_count > stats.leaf_count);
        assert!(stats.max_depth <= OctreeSettings::default().max_depth as usize);
    }

    #[test]
    fn single_sphere() {
        let primitives = vec![sphere(Point3::zeros(), 0.5)];
        let octree = Octree::new(primitives, OctreeSettings::default());
        let mut ray = Ray::new(
            Point3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            f32::INFINITY,
        );
        assert!(octree.intersect_any(&ray));
        let isect = octree.intersect(&mut ray).unwrap();
        assert_close(isect.t, 2.5);
        assert_close(ray.t_max, 2.5);
    }

    #[test]
    fn empty() {
        let octree = Octree::new(Vec::new(), OctreeSettings::default());
        assert!(!octree.world_bound().is_valid());
        let mut ray = Ray::new(Point3::zeros(), Vec3::new(1.0, 0.0, 0.0), f32::INFINITY);
        assert!(!octree.intersect_any(&ray));
        assert!(octree.intersect(&mut ray).is_none());
    }

    #[test]
    fn coincident_primitives() {
        // Splitting can't separate these so the build has to give up gracefully
        let primitives: Vec<Arc<dyn Primitive>> = (0..50)
            .map(|_| sphere(Point3::new(1.0, 2.0, 3.0), 0.25))
            .collect();
        let octree = Octree::new(primitives.clone(), OctreeSettings::default());
        let ray = Ray::new(
            Point3::new(1.0, 2.0, -3.0),
            Vec3::new(0.0, 0.0, 1.0),
            f32::INFINITY,
        );
        assert!(octree.intersect_any(&ray));
        assert_close(
            octree.intersect(&mut ray.clone()).unwrap().t,
            brute_force_closest(&primitives, &ray).unwrap(),
        );
    }
}
