#[cfg(test)]
mod tests {
    use num::Bounded;

    use hikari::math::{point2, point3, vec3, Bounds2, Bounds3, Point2, Point3, Ray, Vec3};

    #[test]
    fn new() {
        let bb = Bounds2::new(point2(0, 0), point2(1, 1));
        assert_eq!(bb.p_min, point2(0, 0));
        assert_eq!(bb.p_max, point2(1, 1));
        let bb = Bounds2::new(point2(1, 0), point2(0, 1));
        assert_eq!(bb.p_min, point2(0, 0));
        assert_eq!(bb.p_max, point2(1, 1));

        let bb = Bounds3::new(point3(1, 1, 1), point3(0, 0, 0));
        assert_eq!(bb.p_min, point3(0, 0, 0));
        assert_eq!(bb.p_max, point3(1, 1, 1));
    }

    #[test]
    fn default_is_inverted() {
        let bb = Bounds3::<f32>::default();
        for i in 0..3 {
            assert_eq!(bb.p_max[i], f32::min_value());
            assert_eq!(bb.p_min[i], f32::max_value());
        }
        assert!(!bb.is_valid());
        assert_eq!(bb.surface_area(), 0.0);
        assert!(bb.bounding_sphere().is_none());

        let p = point3(1.0, -2.0, 3.0);
        let bb = bb.union_p(p);
        assert!(bb.is_valid());
        assert_eq!(bb.p_min, p);
        assert_eq!(bb.p_max, p);
    }

    #[test]
    fn index() {
        let bb = Bounds3::new(point3(0, 0, 0), point3(1, 1, 1));
        assert_eq!(bb[0], point3(0, 0, 0));
        assert_eq!(bb[1], point3(1, 1, 1));
    }

    #[test]
    fn dims_2d() {
        let bb = Bounds2::new(point2(2u16, 3), point2(7, 5));
        assert_eq!(bb.width(), 5);
        assert_eq!(bb.height(), 2);
        assert_eq!(bb.area(), 10);
        assert!(bb.inside_exclusive(point2(2, 3)));
        assert!(bb.inside_exclusive(point2(6, 4)));
        assert!(!bb.inside_exclusive(point2(7, 4)));
        assert!(!bb.inside_exclusive(point2(6, 5)));
    }

    #[test]
    fn intersection_2d() {
        let a = Bounds2::new(point2(0u16, 0), point2(16, 16));
        let b = Bounds2::new(point2(8u16, 4), point2(40, 10));
        assert_eq!(
            a.intersection(b),
            Some(Bounds2::new(point2(8, 4), point2(16, 10)))
        );
        // Touching edges share no pixels
        let c = Bounds2::new(point2(16u16, 0), point2(32, 16));
        assert_eq!(a.intersection(c), None);
    }

    #[test]
    fn iterate_rows() {
        let bb = Bounds2::new(point2(1u16, 2), point2(3, 4));
        let points: Vec<Point2<u16>> = bb.into_iter().collect();
        assert_eq!(
            points,
            vec![point2(1, 2), point2(2, 2), point2(1, 3), point2(2, 3)]
        );

        let empty = Bounds2::new(point2(1u16, 2), point2(1, 4));
        assert_eq!(empty.into_iter().count(), 0);
    }

    #[test]
    fn unions() {
        let bb = Bounds3::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0));
        let bb = bb.union_p(point3(-1.0, 0.5, 2.0));
        assert_eq!(bb.p_min, point3(-1.0, 0.0, 0.0));
        assert_eq!(bb.p_max, point3(1.0, 1.0, 2.0));

        let other = Bounds3::new(point3(0.5, -3.0, 0.5), point3(0.6, 0.0, 0.6));
        let bb = bb.union_b(other);
        assert_eq!(bb.p_min, point3(-1.0, -3.0, 0.0));
        assert_eq!(bb.p_max, point3(1.0, 1.0, 2.0));

        // Unioning with default keeps the other side untouched
        assert_eq!(Bounds3::default().union_b(other), other);
    }

    #[test]
    fn measures() {
        let bb = Bounds3::new(point3(0.0, 0.0, 0.0), point3(1.0, 2.0, 3.0));
        assert_eq!(bb.diagonal(), vec3(1.0, 2.0, 3.0));
        assert_eq!(bb.surface_area(), 22.0);
        assert_eq!(bb.maximum_extent(), 2);
        assert_eq!(bb.centroid(), point3(0.5, 1.0, 1.5));
        assert_eq!(bb.offset(point3(0.5, 0.5, 3.0)), vec3(0.5, 0.25, 1.0));

        let flat = Bounds3::new(point3(0.0, 0.0, 0.0), point3(4.0, 0.0, 1.0));
        assert_eq!(flat.maximum_extent(), 0);
        // Degenerate axes don't divide by zero
        assert_eq!(flat.offset(point3(1.0, 0.0, 0.5)), vec3(0.25, 0.0, 0.5));

        let (center, radius) = bb.bounding_sphere().unwrap();
        assert_eq!(center, point3(0.5, 1.0, 1.5));
        assert!((radius - 14.0f32.sqrt() * 0.5).abs() < 1e-6);
    }

    #[test]
    fn containment() {
        let bb = Bounds3::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0));
        assert!(bb.inside(point3(0.0, 0.5, 1.0)));
        assert!(!bb.inside(point3(0.0, 0.5, 1.01)));

        let inner = Bounds3::new(point3(0.2, 0.2, 0.2), point3(1.0, 0.9, 0.5));
        assert!(bb.contains_b(&inner));
        assert!(!inner.contains_b(&bb));

        let touching = Bounds3::new(point3(1.0, 0.0, 0.0), point3(2.0, 1.0, 1.0));
        assert!(bb.overlaps(&touching));
        let apart = Bounds3::new(point3(1.5, 0.0, 0.0), point3(2.0, 1.0, 1.0));
        assert!(!bb.overlaps(&apart));

        let grown = bb.expanded(0.5);
        assert_eq!(grown.p_min, point3(-0.5, -0.5, -0.5));
        assert_eq!(grown.p_max, point3(1.5, 1.5, 1.5));
    }

    #[test]
    fn ray_intersect() {
        let bb = Bounds3::new(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0));

        let hit = Ray::new(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0), f32::INFINITY);
        assert!(bb.intersect(&hit, hit.dir_is_neg()));
        let (t0, t1) = bb.intersections(&hit).unwrap();
        assert_eq!(t0, 4.0);
        assert!((t1 - 6.0).abs() < 1e-5);

        let backwards = Ray::new(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, -1.0), f32::INFINITY);
        assert!(!bb.intersect(&backwards, backwards.dir_is_neg()));
        assert!(bb.intersections(&backwards).is_none());

        let short = Ray::new(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0), 3.0);
        assert!(!bb.intersect(&short, short.dir_is_neg()));

        // Axis aligned rays have infinite inverse components
        let beside = Ray::new(point3(2.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0), f32::INFINITY);
        assert!(!bb.intersect(&beside, beside.dir_is_neg()));

        // Starting inside clamps the entry to t_min
        let inside = Ray::new(Point3::zeros(), vec3(1.0, 1.0, 0.0), f32::INFINITY);
        let (t0, t1) = bb.intersections(&inside).unwrap();
        assert_eq!(t0, 0.0);
        assert!((t1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_grazing_a_face() {
        // A ray running along the face plane still counts as a hit
        let bb = Bounds3::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0));
        let ray = Ray::new(point3(-1.0, 1.0, 0.5), Vec3::new(1.0, 0.0, 0.0), f32::INFINITY);
        assert!(bb.intersect(&ray, ray.dir_is_neg()));
    }
}
