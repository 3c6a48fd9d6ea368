#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use hikari::math::{
        point3,
        transforms::{look_at, rotation, scale, translation},
        vec3, Bounds3, Matrix4x4, Normal, Ray, Transform, Vec3,
    };

    // These are by no means exhaustive. We throw some simple cases at the implementation
    // to catch obvious typos

    fn assert_matrix_eq(a: &Matrix4x4<f32>, b: &Matrix4x4<f32>) {
        for r in 0..4 {
            for c in 0..4 {
                assert_abs_diff_eq!(a.m[r][c], b.m[r][c], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn new() {
        let md = [
            [2.0, 0.0, 0.0, 1.0],
            [0.0, 4.0, 0.0, 2.0],
            [0.0, 0.0, 8.0, 3.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let t = Transform::new(md).unwrap();
        assert_eq!(t.m(), &Matrix4x4::new(md));
        assert_matrix_eq(
            &(t.m() * t.inverted().m()),
            &Matrix4x4::<f32>::identity(),
        );

        let singular = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        assert!(Transform::new(singular).is_none());
        assert!(Matrix4x4::new(singular).inverted().is_none());
    }

    #[test]
    fn rank_deficiency_at_any_scale() {
        // Rounding leaves residue in place of the zero pivot that grows with the entries
        let singular = [
            [10.0, 20.0, 30.0, 40.0],
            [50.0, 60.0, 70.0, 80.0],
            [90.0, 100.0, 110.0, 120.0],
            [130.0, 140.0, 150.0, 160.0],
        ];
        assert!(Transform::new(singular).is_none());

        // Third row is the sum of the first two
        let flattened = [
            [3.1, 7.3, 2.9, 11.0],
            [5.7, 1.3, 9.1, 4.0],
            [8.8, 8.6, 12.0, 15.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        assert!(Transform::new(flattened).is_none());

        // Tiny scales stay invertible next to large translations
        let t = Transform::new([
            [0.01, 0.0, 0.0, 1000.0],
            [0.0, 0.01, 0.0, -1000.0],
            [0.0, 0.0, 0.01, 500.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        let inv = t.inverted();
        assert_abs_diff_eq!(inv.m().m[0][0], 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(inv.m().m[0][3], -100_000.0, epsilon = 1.0);
        assert_abs_diff_eq!(inv.m().m[1][3], 100_000.0, epsilon = 1.0);
        assert_abs_diff_eq!(inv.m().m[2][3], -50_000.0, epsilon = 1.0);
    }

    #[test]
    fn transposed() {
        let m = Matrix4x4::new([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        let mt = m.transposed();
        assert_eq!(mt.m[0], [1.0, 5.0, 9.0, 13.0]);
        assert_eq!(mt.m[3], [4.0, 8.0, 12.0, 16.0]);
        assert_eq!(mt.transposed(), m);
    }

    #[test]
    fn inverted_with_pivoting() {
        // Zero on the diagonal needs a row swap
        let m = Matrix4x4::new([
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 2.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let mi = m.inverted().unwrap();
        assert_matrix_eq(&(&m * &mi), &Matrix4x4::identity());
        assert_matrix_eq(&(&mi * &m), &Matrix4x4::identity());
    }

    #[test]
    fn translate() {
        let t = translation(vec3(1.0, 2.0, 3.0));
        assert_eq!(&t * point3(1.0, 1.0, 1.0), point3(2.0, 3.0, 4.0));
        // Vectors and normals are unaffected
        assert_eq!(&t * vec3(1.0, 1.0, 1.0), vec3(1.0, 1.0, 1.0));
        assert_eq!(&t * Normal::new(0.0, 1.0, 0.0), Normal::new(0.0, 1.0, 0.0));
        assert_eq!(&t.inverted() * point3(2.0, 3.0, 4.0), point3(1.0, 1.0, 1.0));
    }

    #[test]
    fn scaling() {
        let t = scale(2.0, 3.0, 4.0);
        assert_eq!(&t * point3(1.0, 1.0, 1.0), point3(2.0, 3.0, 4.0));
        assert_eq!(&t * vec3(1.0, 1.0, 1.0), vec3(2.0, 3.0, 4.0));
        // Normals use the inverse transpose
        assert_abs_diff_eq!(
            &t * Normal::new(1.0, 1.0, 1.0),
            Normal::new(0.5, 1.0 / 3.0, 0.25)
        );
        assert_matrix_eq(&(&t * &t.inverted()).m(), &Matrix4x4::identity());
    }

    #[test]
    fn rotate() {
        let t = rotation(90.0, vec3(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(
            &t * vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            &t * point3(0.0, 2.0, 5.0),
            point3(-2.0, 0.0, 5.0),
            epsilon = 1e-6
        );
        // Axis doesn't need to be normalized
        let t2 = rotation(90.0, vec3(0.0, 0.0, 7.0));
        assert_matrix_eq(t.m(), t2.m());
        assert_matrix_eq(
            (&t * &t.inverted()).m(),
            &Matrix4x4::identity(),
        );
    }

    #[test]
    fn normals_stay_perpendicular() {
        let t = &rotation(30.0, vec3(1.0, 1.0, 0.0)) * &scale(1.0, 5.0, 0.5);
        let tangent = vec3(1.0, -1.0, 0.0);
        let n = Normal::new(1.0, 1.0, 2.0);
        assert_eq!(Vec3::from(n).dot(tangent), 0.0);
        let tn = Vec3::from(&t * n);
        let tt = &t * tangent;
        assert_abs_diff_eq!(tn.dot(tt), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn compose() {
        let t = &translation(vec3(5.0, 0.0, 0.0)) * &scale(2.0, 2.0, 2.0);
        // Rightmost is applied first
        assert_eq!(&t * point3(1.0, 1.0, 1.0), point3(7.0, 2.0, 2.0));
        assert_eq!(&t.inverted() * point3(7.0, 2.0, 2.0), point3(1.0, 1.0, 1.0));
    }

    #[test]
    fn ray() {
        let t = &translation(vec3(0.0, 1.0, 0.0)) * &scale(2.0, 2.0, 2.0);
        let r = Ray::segment(point3(1.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), 0.5, 10.0);
        let tr = &t * r;
        assert_eq!(tr.o, point3(2.0, 1.0, 0.0));
        // The direction keeps its scale so the interval stays valid
        assert_eq!(tr.d, vec3(0.0, 0.0, 2.0));
        assert_eq!(tr.t_min, 0.5);
        assert_eq!(tr.t_max, 10.0);
        assert_eq!(tr.point(1.0), &t * r.point(1.0));
    }

    #[test]
    fn bounds() {
        let bb = Bounds3::new(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0));
        let tb = &rotation(45.0, vec3(0.0, 1.0, 0.0)) * bb;
        let r = 2.0f32.sqrt();
        assert_abs_diff_eq!(tb.p_min, point3(-r, -1.0, -r), epsilon = 1e-5);
        assert_abs_diff_eq!(tb.p_max, point3(r, 1.0, r), epsilon = 1e-5);

        // Inverted bounds pass through
        let empty = Bounds3::<f32>::default();
        assert_eq!(&translation(vec3(1.0, 0.0, 0.0)) * empty, empty);
    }

    #[test]
    fn camera_look_at() {
        let world_to_camera = look_at(
            point3(0.0, 0.0, -5.0),
            point3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(
            &world_to_camera * point3(0.0, 0.0, 0.0),
            point3(0.0, 0.0, 5.0),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            &world_to_camera.inverted() * point3(0.0, 0.0, 0.0),
            point3(0.0, 0.0, -5.0),
            epsilon = 1e-6
        );

        // Up parallel to the view direction
        assert!(look_at(
            point3(0.0, 0.0, 0.0),
            point3(0.0, 3.0, 0.0),
            vec3(0.0, 1.0, 0.0)
        )
        .is_none());
    }

    #[test]
    fn identity() {
        let t = Transform::<f32>::identity();
        let p = point3(1.0, 2.0, 3.0);
        assert_eq!(&t * p, p);
        assert_eq!(t, t.inverted());
    }
}
