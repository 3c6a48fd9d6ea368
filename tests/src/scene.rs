#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use std::sync::Arc;

    use hikari::{
        accel::{build_index, IndexSettings},
        lights::{DiffuseAreaLight, DistantLight, Light, PointLight, UniformInfiniteLight},
        math::{point2, point3, vec3, Point3, Ray, Spectrum},
        media::{HomogeneousMedium, Medium, MediumInterface},
        primitive::{Aggregate, GeometricPrimitive, Primitive},
        sampling::Sampler,
        scene::Scene,
        shapes::{Shape, Sphere, Triangle},
    };

    use crate::common::sphere;

    fn scene(primitives: Vec<Arc<dyn Primitive>>, lights: Vec<Arc<dyn Light>>) -> Scene {
        Scene::new(
            Aggregate::new(build_index(primitives, IndexSettings::default())),
            lights,
        )
    }

    #[test]
    fn occlusion() {
        let scene = scene(vec![sphere(Point3::zeros(), 1.0)], Vec::new());
        assert!(scene.is_occluded(point3(-5.0, 0.0, 0.0), point3(5.0, 0.0, 0.0)));
        assert!(!scene.is_occluded(point3(-5.0, 2.0, 0.0), point3(5.0, 2.0, 0.0)));
        // Segment ends before reaching the sphere
        assert!(!scene.is_occluded(point3(-5.0, 0.0, 0.0), point3(-2.0, 0.0, 0.0)));
        // Points on surfaces don't occlude themselves
        assert!(!scene.is_occluded(point3(0.0, 1.0, 0.0), point3(0.0, 5.0, 0.0)));
    }

    #[test]
    fn closest_hit() {
        let scene = scene(
            vec![
                sphere(point3(0.0, 0.0, 5.0), 1.0),
                sphere(point3(0.0, 0.0, 2.0), 0.5),
            ],
            Vec::new(),
        );
        let mut ray = Ray::new(Point3::zeros(), vec3(0.0, 0.0, 1.0), f32::INFINITY);
        assert!(scene.intersect_any(&ray));
        let isect = scene.intersect(&mut ray).unwrap();
        assert_relative_eq!(isect.t, 1.5);
        assert!(isect.bsdf().is_some());
        assert!(isect.le(isect.wo).is_black());
    }

    #[test]
    fn light_selection() {
        let a: Arc<dyn Light> = Arc::new(PointLight::new(
            point3(0.0, 3.0, 0.0),
            Spectrum::ones(),
        ));
        let b: Arc<dyn Light> = Arc::new(UniformInfiniteLight::new(Spectrum::ones()));
        let scene = scene(
            vec![sphere(Point3::zeros(), 1.0)],
            vec![a.clone(), b.clone()],
        );

        assert_eq!(scene.lights().len(), 2);
        assert_eq!(scene.infinite_lights().len(), 1);
        assert_eq!(scene.light_selection_pdf(), 0.5);

        let (light, pdf) = scene.sample_light(0.0).unwrap();
        assert!(Arc::ptr_eq(light, &a));
        assert_eq!(pdf, 0.5);
        let (light, _) = scene.sample_light(0.75).unwrap();
        assert!(Arc::ptr_eq(light, &b));
        // u = 1 can show up through rounding and mustn't go out of bounds
        let (light, _) = scene.sample_light(1.0).unwrap();
        assert!(Arc::ptr_eq(light, &b));
    }

    #[test]
    fn no_lights() {
        let scene = scene(vec![sphere(Point3::zeros(), 1.0)], Vec::new());
        assert!(scene.sample_light(0.3).is_none());
        assert_eq!(scene.light_selection_pdf(), 0.0);
        let escaped = Ray::new(point3(0.0, 5.0, 0.0), vec3(0.0, 1.0, 0.0), f32::INFINITY);
        assert!(scene.eval_infinite_lights(&escaped).is_black());
    }

    #[test]
    fn infinite_lights() {
        let lights: Vec<Arc<dyn Light>> = vec![
            Arc::new(UniformInfiniteLight::new(Spectrum::new(0.1, 0.2, 0.3))),
            Arc::new(UniformInfiniteLight::new(Spectrum::new(1.0, 1.0, 1.0))),
            Arc::new(DistantLight::new(vec3(0.0, 1.0, 0.0), Spectrum::ones())),
        ];
        let scene = scene(vec![sphere(Point3::zeros(), 1.0)], lights);
        assert_eq!(scene.infinite_lights().len(), 2);
        let escaped = Ray::new(point3(0.0, 5.0, 0.0), vec3(0.0, 1.0, 0.0), f32::INFINITY);
        assert_relative_eq!(
            scene.eval_infinite_lights(&escaped),
            Spectrum::new(1.1, 1.2, 1.3)
        );

        // Samples toward lights at infinity land outside the scene
        let mut sampler = Sampler::new(0);
        for light in scene.lights() {
            let sample = light.sample_li(Point3::zeros(), sampler.get_2d());
            assert!(sample.pdf > 0.0);
            assert!(Point3::zeros().dist(sample.p) > 1.0);
        }
    }

    #[test]
    fn area_light_pdf_matches_sampling() {
        let shape: Arc<dyn Shape> = Arc::new(Triangle::new(
            point3(-1.0, 2.0, -1.0),
            point3(1.0, 2.0, -1.0),
            point3(0.0, 2.0, 1.0),
        ));
        let light = DiffuseAreaLight::new(shape, Spectrum::ones(), true);
        let ref_p = point3(0.3, 0.0, 0.1);

        let mut sampler = Sampler::new(5);
        for _ in 0..100 {
            let sample = light.sample_li(ref_p, sampler.get_2d());
            assert!(sample.pdf > 0.0);
            assert!(!sample.li.is_black());
            assert_relative_eq!(sample.wi.len(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(
                light.pdf_li(ref_p, sample.wi),
                sample.pdf,
                max_relative = 1e-3
            );
        }

        // Directions missing the shape have no density
        assert_eq!(light.pdf_li(ref_p, vec3(0.0, -1.0, 0.0)), 0.0);
    }

    #[test]
    fn one_sided_area_light() {
        let shape: Arc<dyn Shape> = Arc::new(Triangle::new(
            point3(-1.0, 2.0, -1.0),
            point3(1.0, 2.0, -1.0),
            point3(0.0, 2.0, 1.0),
        ));
        // Counter-clockwise seen from below, so the front faces down
        let light = DiffuseAreaLight::new(shape, Spectrum::ones(), false);
        let below = light.sample_li(Point3::zeros(), point2(0.3, 0.3));
        assert!(!below.li.is_black());
        let above = light.sample_li(point3(0.0, 4.0, 0.0), point2(0.3, 0.3));
        assert!(above.li.is_black());
    }

    fn medium_sphere(radius: f32, sigma_a: Spectrum<f32>) -> Arc<dyn Primitive> {
        let medium: Arc<dyn Medium> = Arc::new(HomogeneousMedium::new(sigma_a, Spectrum::zeros()));
        Arc::new(
            GeometricPrimitive::new(Arc::new(Sphere::new(Point3::zeros(), radius)), None)
                .with_medium_interface(MediumInterface::new(Some(medium), None)),
        )
    }

    #[test]
    fn transmittance_through_medium() {
        let sigma_a = Spectrum::new(0.5, 1.0, 2.0);
        let scene = scene(vec![medium_sphere(1.0, sigma_a)], Vec::new());
        let mut sampler = Sampler::new(0);

        let tr = scene.transmittance(
            point3(0.0, 0.0, -5.0),
            point3(0.0, 0.0, 5.0),
            None,
            &mut sampler,
        );
        // Beer-Lambert over the diameter
        let expected = (-(sigma_a * 2.0)).exp();
        assert_relative_eq!(tr, expected, max_relative = 1e-3);

        // Boundaries are invisible to the closest hit search of the integrator but still there
        let mut ray = Ray::new(point3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0), f32::INFINITY);
        let isect = scene.intersect(&mut ray).unwrap();
        assert!(isect.bsdf().is_none());

        // Missing the medium entirely
        let tr = scene.transmittance(
            point3(0.0, 3.0, -5.0),
            point3(0.0, 3.0, 5.0),
            None,
            &mut sampler,
        );
        assert_eq!(tr, Spectrum::ones());
    }

    #[test]
    fn transmittance_from_inside() {
        let sigma_a = Spectrum::new(1.0, 1.0, 1.0);
        let medium: Arc<dyn Medium> = Arc::new(HomogeneousMedium::new(sigma_a, Spectrum::zeros()));
        let scene = scene(vec![medium_sphere(10.0, sigma_a)], Vec::new());
        let mut sampler = Sampler::new(0);
        let tr = scene.transmittance(
            point3(0.0, 0.0, 0.0),
            point3(0.0, 0.0, 3.0),
            Some(&medium),
            &mut sampler,
        );
        assert_relative_eq!(tr, (-(sigma_a * 3.0)).exp(), max_relative = 1e-3);
    }

    #[test]
    fn boundaries_without_media_keep_the_current_one() {
        let sigma_a = Spectrum::new(1.0, 1.0, 1.0);
        let medium: Arc<dyn Medium> = Arc::new(HomogeneousMedium::new(sigma_a, Spectrum::zeros()));
        let bare = |interface: MediumInterface| -> Arc<dyn Primitive> {
            Arc::new(
                GeometricPrimitive::new(Arc::new(Sphere::new(point3(0.0, 0.0, 1.5), 0.5)), None)
                    .with_medium_interface(interface),
            )
        };
        let expected = (-(sigma_a * 3.0)).exp();

        for interface in [
            MediumInterface::new(None, None),
            MediumInterface::new(Some(medium.clone()), Some(medium.clone())),
        ] {
            assert!(!interface.is_transition());
            let scene = scene(vec![medium_sphere(10.0, sigma_a), bare(interface)], Vec::new());
            let mut sampler = Sampler::new(0);
            let tr = scene.transmittance(
                point3(0.0, 0.0, 0.0),
                point3(0.0, 0.0, 3.0),
                Some(&medium),
                &mut sampler,
            );
            assert_relative_eq!(tr, expected, max_relative = 1e-3);
        }

        // A vacuum bubble does clear the medium over its diameter
        let scene = scene(
            vec![
                medium_sphere(10.0, sigma_a),
                bare(MediumInterface::new(None, Some(medium.clone()))),
            ],
            Vec::new(),
        );
        let mut sampler = Sampler::new(0);
        let tr = scene.transmittance(
            point3(0.0, 0.0, 0.0),
            point3(0.0, 0.0, 3.0),
            Some(&medium),
            &mut sampler,
        );
        assert_relative_eq!(tr, (-(sigma_a * 2.0)).exp(), max_relative = 1e-3);
    }

    #[test]
    fn opaque_blocks_transmittance() {
        let scene = scene(
            vec![
                medium_sphere(1.0, Spectrum::new(0.1, 0.1, 0.1)),
                sphere(point3(0.0, 0.0, 3.0), 0.5),
            ],
            Vec::new(),
        );
        let mut sampler = Sampler::new(0);
        let tr = scene.transmittance(
            point3(0.0, 0.0, -5.0),
            point3(0.0, 0.0, 5.0),
            None,
            &mut sampler,
        );
        assert!(tr.is_black());
    }
}
