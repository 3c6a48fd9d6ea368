#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        thread,
        time::{Duration, Instant},
    };

    use hikari::{
        accel::IndexSettings,
        camera::{Camera, CameraParameters, CameraSample, FoV},
        integrators::{Integrator, IntegratorType, PathParams, RadianceResult},
        math::{point2, Point2, Ray, Spectrum, Vec2},
        renderer::{RenderOutcome, RenderSettings, RenderStatus, Renderer},
        sampling::Sampler,
        scene::Scene,
        scenes::BuiltinScene,
        Error,
    };

    struct Constant(Spectrum<f32>);

    impl Integrator for Constant {
        fn li(&self, _ray: Ray<f32>, _scene: &Scene, _sampler: &mut Sampler) -> RadianceResult {
            RadianceResult {
                li: self.0,
                ray_scene_intersections: 1,
            }
        }
    }

    /// Panics on rays toward the top of the frame.
    struct FailsUpward;

    impl Integrator for FailsUpward {
        fn li(&self, ray: Ray<f32>, _scene: &Scene, _sampler: &mut Sampler) -> RadianceResult {
            if ray.d.normalized().y > 0.3 {
                panic!("Upward ray");
            }
            RadianceResult {
                li: Spectrum::ones(),
                ray_scene_intersections: 1,
            }
        }
    }

    fn cornell_box(res: Vec2<u16>) -> (Arc<Scene>, Camera) {
        let (scene, camera_params) = BuiltinScene::CornellBox.build(IndexSettings::default());
        let camera = Camera::new(camera_params, res).unwrap();
        (Arc::new(scene), camera)
    }

    fn settings(samples_per_pixel: u32, thread_count: usize, tile_dim: u16) -> RenderSettings {
        RenderSettings {
            samples_per_pixel,
            thread_count,
            tile_dim,
            seed: 0,
        }
    }

    fn path_integrator() -> Arc<dyn Integrator> {
        IntegratorType::Path(PathParams::default()).instantiate()
    }

    #[test]
    fn renders_to_completion() {
        let (scene, camera) = cornell_box(Vec2::new(40, 30));
        let renderer =
            Renderer::new(scene, camera, path_integrator(), settings(4, 3, 8)).unwrap();
        let result = renderer.start().unwrap().wait();

        assert_eq!(result.outcome, RenderOutcome::Completed);
        assert!(result.is_success());
        assert_eq!(result.tiles_total, 5 * 4);
        assert_eq!(result.tiles_done, result.tiles_total);
        assert!(result.ray_count >= 40 * 30 * 4);
        assert_eq!(result.invalid_samples, 0);
        assert_eq!(result.film.res(), Vec2::new(40, 30));
        assert!(result.film.pixels().iter().all(|p| p.is_valid()));
        // The light is in view and the walls are lit
        assert!(result.film.pixels().iter().any(|p| p.avg() > 1.0));
        assert!(result.film.pixel(point2(20, 15)).avg() > 0.0);
    }

    #[test]
    fn thread_count_does_not_change_the_image() {
        let render = |thread_count, seed| {
            let (scene, camera) = cornell_box(Vec2::new(24, 20));
            let renderer = Renderer::new(
                scene,
                camera,
                path_integrator(),
                RenderSettings {
                    seed,
                    ..settings(2, thread_count, 7)
                },
            )
            .unwrap();
            renderer.start().unwrap().wait().film
        };

        let single = render(1, 3);
        let multi = render(4, 3);
        assert_eq!(single.pixels(), multi.pixels());

        let reseeded = render(4, 4);
        assert_ne!(single.pixels(), reseeded.pixels());
    }

    #[test]
    fn stop_cancels() {
        let (scene, camera) = cornell_box(Vec2::new(256, 256));
        let renderer =
            Renderer::new(scene, camera, path_integrator(), settings(256, 2, 16)).unwrap();
        let handle = renderer.start().unwrap();
        handle.stop();
        let result = handle.wait();

        assert_eq!(result.outcome, RenderOutcome::Cancelled);
        assert!(result.is_success());
        assert!(result.tiles_done < result.tiles_total);
        assert!(result.film.pixels().iter().all(|p| p.is_valid()));
    }

    #[test]
    fn dropping_the_handle_stops_workers() {
        let (scene, camera) = cornell_box(Vec2::new(256, 256));
        let renderer =
            Renderer::new(scene, camera, path_integrator(), settings(256, 2, 16)).unwrap();
        let start = Instant::now();
        drop(renderer.start().unwrap());
        // A full render would take far longer
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn worker_failure_is_reported() {
        let (scene, camera) = cornell_box(Vec2::new(64, 64));
        let renderer =
            Renderer::new(scene, camera, Arc::new(FailsUpward), settings(1, 1, 16)).unwrap();
        let result = renderer.start().unwrap().wait();

        match &result.outcome {
            RenderOutcome::Failed { reason } => assert!(reason.contains("Upward ray")),
            outcome => panic!("Expected failure, got {:?}", outcome),
        }
        assert!(!result.is_success());
        assert!(result.tiles_done < result.tiles_total);
        // The spiral starts from the center so that got rendered before the failure
        assert_eq!(result.film.pixel(point2(32, 32)), Spectrum::ones());
    }

    #[test]
    fn invalid_samples_are_dropped() {
        let (scene, camera) = cornell_box(Vec2::new(16, 8));
        let renderer = Renderer::new(
            scene,
            camera,
            Arc::new(Constant(Spectrum::new(f32::NAN, 1.0, 1.0))),
            settings(3, 2, 8),
        )
        .unwrap();
        let result = renderer.start().unwrap().wait();

        assert_eq!(result.outcome, RenderOutcome::Completed);
        assert_eq!(result.invalid_samples, 16 * 8 * 3);
        assert!(result.film.pixels().iter().all(|p| p.is_black()));
    }

    #[test]
    fn constant_radiance_averages() {
        let (scene, camera) = cornell_box(Vec2::new(20, 10));
        let radiance = Spectrum::new(0.25, 0.5, 2.0);
        let renderer =
            Renderer::new(scene, camera, Arc::new(Constant(radiance)), settings(5, 0, 6))
                .unwrap();
        let result = renderer.start().unwrap().wait();
        for p in result.film.pixels() {
            assert!((p.r - radiance.r).abs() < 1e-6);
            assert!((p.g - radiance.g).abs() < 1e-6);
            assert!((p.b - radiance.b).abs() < 1e-6);
        }
    }

    #[test]
    fn status_reports_progress_and_finish() {
        let (scene, camera) = cornell_box(Vec2::new(32, 32));
        let renderer =
            Renderer::new(scene, camera, path_integrator(), settings(2, 2, 8)).unwrap();
        let mut handle = renderer.start().unwrap();
        assert_eq!(handle.tiles_total(), 16);

        let mut finished_rays = None;
        let deadline = Instant::now() + Duration::from_secs(60);
        while finished_rays.is_none() && Instant::now() < deadline {
            match handle.check_status() {
                Some(RenderStatus::Progress {
                    tiles_done,
                    tiles_total,
                    approx_remaining_s,
                    ..
                }) => {
                    assert!(tiles_done <= tiles_total);
                    assert!(approx_remaining_s >= 0.0);
                }
                Some(RenderStatus::Finished { ray_count }) => finished_rays = Some(ray_count),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }

        assert!(finished_rays.unwrap() > 0);
        assert_eq!(handle.tiles_done(), 16);
        // Finish is only reported once
        assert!(handle.check_status().is_none());

        let result = handle.wait();
        assert_eq!(result.outcome, RenderOutcome::Completed);
        assert_eq!(result.ray_count, finished_rays.unwrap());
        assert!(result.elapsed_s > 0.0);
    }

    #[test]
    fn invalid_settings() {
        let (scene, camera) = cornell_box(Vec2::new(8, 8));
        let integrator = path_integrator();
        assert!(matches!(
            Renderer::new(
                scene.clone(),
                camera.clone(),
                integrator.clone(),
                settings(0, 1, 8)
            ),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(
            Renderer::new(scene, camera, integrator, settings(1, 1, 0)),
            Err(Error::InvalidSettings(_))
        ));

        assert!(matches!(
            Camera::new(CameraParameters::default(), Vec2::new(0, 8)),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn more_threads_than_tiles() {
        let (scene, camera) = cornell_box(Vec2::new(8, 8));
        let renderer =
            Renderer::new(scene, camera, path_integrator(), settings(1, 16, 8)).unwrap();
        let result = renderer.start().unwrap().wait();
        assert_eq!(result.tiles_total, 1);
        assert_eq!(result.outcome, RenderOutcome::Completed);
    }

    #[test]
    fn camera_rays_span_the_field_of_view() {
        let ray_dir = |camera: &Camera, x: f32, y: f32| {
            camera
                .ray(&CameraSample {
                    p_film: Point2::new(x, y),
                })
                .d
                .normalized()
        };
        let half_tan = 20.0f32.to_radians().tan();

        // Default looks down +z from (0, 0, -5), wide image with a vertical fov
        let camera = Camera::new(CameraParameters::default(), Vec2::new(200, 100)).unwrap();
        let center = ray_dir(&camera, 100.0, 50.0);
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);
        assert!((center.z - 1.0).abs() < 1e-5);

        // Raster y grows downwards
        let top = ray_dir(&camera, 100.0, 0.0);
        assert!((top.y / top.z - half_tan).abs() < 1e-4);
        let bottom = ray_dir(&camera, 100.0, 100.0);
        assert!((bottom.y / bottom.z + half_tan).abs() < 1e-4);
        let side = ray_dir(&camera, 0.0, 50.0);
        assert!(((side.x / side.z).abs() - 2.0 * half_tan).abs() < 1e-4);

        // Horizontal fov spans the width instead
        let camera = Camera::new(
            CameraParameters {
                fov: FoV::X(40.0),
                ..CameraParameters::default()
            },
            Vec2::new(200, 100),
        )
        .unwrap();
        let side = ray_dir(&camera, 0.0, 50.0);
        assert!(((side.x / side.z).abs() - half_tan).abs() < 1e-4);
        let top = ray_dir(&camera, 100.0, 0.0);
        assert!((top.y / top.z - 0.5 * half_tan).abs() < 1e-4);
    }
}
