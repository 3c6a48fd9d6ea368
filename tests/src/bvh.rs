#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use std::sync::Arc;

    use hikari::{
        accel::{
            build_index, BoundingVolumeHierarchy, BvhSettings, IndexSettings, SpatialIndex,
            SplitMethod,
        },
        math::{Point3, Ray, Vec3},
        primitive::Primitive,
    };

    use crate::common::{
        assert_close, brute_force_any, brute_force_closest, random_primitives, random_ray, sphere,
    };

    const SPLIT_METHODS: [SplitMethod; 3] = [
        SplitMethod::SurfaceAreaHeuristic,
        SplitMethod::Middle,
        SplitMethod::EqualCounts,
    ];

    fn bvh(primitives: &[Arc<dyn Primitive>], split_method: SplitMethod) -> Box<dyn SpatialIndex> {
        build_index(
            primitives.to_vec(),
            IndexSettings::Bvh(BvhSettings {
                split_method,
                max_prims_in_node: 4,
            }),
        )
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = Pcg32::seed_from_u64(0xB0B);
        let primitives = random_primitives(&mut rng, 300);

        for split_method in SPLIT_METHODS {
            let index = bvh(&primitives, split_method);
            let mut hits = 0;
            for _ in 0..2000 {
                let ray = random_ray(&mut rng);

                assert_eq!(
                    index.intersect_any(&ray),
                    brute_force_any(&primitives, &ray),
                    "{:?} any-hit mismatch on {:?}",
                    split_method,
                    ray
                );

                let mut index_ray = ray;
                let index_t = index.intersect(&mut index_ray).map(|isect| isect.t);
                let brute_t = brute_force_closest(&primitives, &ray);
                match (index_t, brute_t) {
                    (Some(a), Some(b)) => {
                        assert_close(a, b);
                        assert_close(index_ray.t_max, a);
                        hits += 1;
                    }
                    (None, None) => assert_eq!(index_ray.t_max, ray.t_max),
                    _ => panic!(
                        "{:?} closest hit mismatch on {:?}: {:?} vs {:?}",
                        split_method, ray, index_t, brute_t
                    ),
                }
            }
            // Make sure the comparison wasn't vacuous
            assert!(hits > 100);
        }
    }

    #[test]
    fn single_sphere() {
        let primitives = vec![sphere(Point3::zeros(), 0.5)];
        let ray = Ray::new(
            Point3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            f32::INFINITY,
        );
        let brute_t = brute_force_closest(&primitives, &ray).unwrap();
        assert_close(brute_t, 2.5);

        for split_method in SPLIT_METHODS {
            let index = bvh(&primitives, split_method);
            assert!(index.intersect_any(&ray));
            let mut index_ray = ray;
            let isect = index.intersect(&mut index_ray).unwrap();
            assert_eq!(isect.t, brute_t);
            assert_close(isect.p.z, 0.5);
            assert_close(isect.n.z, 1.0);
        }
    }

    #[test]
    fn empty() {
        let mut rng = Pcg32::seed_from_u64(7);
        for split_method in SPLIT_METHODS {
            let index = bvh(&[], split_method);
            assert!(!index.world_bound().is_valid());
            for _ in 0..100 {
                let mut ray = random_ray(&mut rng);
                assert!(!index.intersect_any(&ray));
                assert!(index.intersect(&mut ray).is_none());
            }
        }
    }

    #[test]
    fn degenerate_rays_miss() {
        let primitives = vec![sphere(Point3::zeros(), 1.0)];
        let index = bvh(&primitives, SplitMethod::SurfaceAreaHeuristic);
        for d in [
            Vec3::zeros(),
            Vec3::new(f32::NAN, 0.0, 1.0),
            Vec3::new(0.0, f32::INFINITY, 0.0),
        ] {
            let mut ray = Ray::new(Point3::new(0.0, 0.0, -3.0), d, f32::INFINITY);
            assert!(!index.intersect_any(&ray));
            assert!(index.intersect(&mut ray).is_none());
        }
    }

    #[test]
    fn respects_ray_interval() {
        let primitives = vec![
            sphere(Point3::new(0.0, 0.0, 2.0), 0.5),
            sphere(Point3::new(0.0, 0.0, 6.0), 0.5),
        ];
        let index = bvh(&primitives, SplitMethod::Middle);

        // Segment ends before the first sphere
        let short = Ray::new(Point3::zeros(), Vec3::new(0.0, 0.0, 1.0), 1.0);
        assert!(!index.intersect_any(&short));

        // Segment starts past the first sphere
        let mut late = Ray::segment(Point3::zeros(), Vec3::new(0.0, 0.0, 1.0), 3.0, 100.0);
        assert!(index.intersect_any(&late));
        let isect = index.intersect(&mut late).unwrap();
        assert_close(isect.t, 5.5);
    }

    #[test]
    fn leaf_size_and_stats() {
        let mut rng = Pcg32::seed_from_u64(42);
        let primitives = random_primitives(&mut rng, 257);
        for max_prims_in_node in [1, 4, 255] {
            let bvh = BoundingVolumeHierarchy::new(
                primitives.clone(),
                max_prims_in_node,
                SplitMethod::SurfaceAreaHeuristic,
            );
            let stats = bvh.stats();
            assert_eq!(stats.primitive_count, 257);
            assert!(stats.leaf_count >= 1);
            assert!(stats.node_count >= stats.leaf_count);
            // Full binary tree
            assert_eq!(stats.node_count, 2 * stats.leaf_count - 1);
            assert!(stats.max_depth < 64);
            assert_eq!(bvh.split_method(), SplitMethod::SurfaceAreaHeuristic);

            let world = primitives
                .iter()
                .fold(hikari::math::Bounds3::default(), |acc, p| {
                    acc.union_b(p.world_bound())
                });
            assert_eq!(bvh.world_bound(), world);
        }
    }

    #[test]
    fn settings_parse_by_name() {
        assert_eq!(
            "SurfaceAreaHeuristic".parse::<SplitMethod>().unwrap(),
            SplitMethod::SurfaceAreaHeuristic
        );
        assert_eq!(
            "EqualCounts".parse::<SplitMethod>().unwrap(),
            SplitMethod::EqualCounts
        );
        assert!("Bogus".parse::<SplitMethod>().is_err());
    }
}
