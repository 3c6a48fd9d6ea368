use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use std::{sync::Arc, time::Instant};

use hikari::{
    accel::{build_index, BvhSettings, IndexSettings, OctreeSettings, SplitMethod},
    camera::Camera,
    integrators::{IntegratorType, PathParams},
    materials::{Material, Matte},
    math::{Point3, Ray, Spectrum, Vec2, Vec3},
    primitive::{GeometricPrimitive, Primitive},
    renderer::{RenderSettings, Renderer},
    scenes::BuiltinScene,
    shapes::{Shape, Sphere, Triangle},
};

const PRIMITIVE_COUNT: usize = 100_000;
const RAY_COUNT: usize = 1_000_000;

fn random_point(rng: &mut Pcg32, extent: f32) -> Point3<f32> {
    Point3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

fn primitives(rng: &mut Pcg32) -> Vec<Arc<dyn Primitive>> {
    let material: Arc<dyn Material> = Arc::new(Matte::new(Spectrum::new(0.5, 0.5, 0.5)));
    (0..PRIMITIVE_COUNT)
        .map(|i| {
            let c = random_point(rng, 50.0);
            let shape: Arc<dyn Shape> = if i % 2 == 0 {
                Arc::new(Sphere::new(c, rng.gen_range(0.05..0.5)))
            } else {
                let e0 = random_point(rng, 0.5) - Point3::zeros();
                let e1 = random_point(rng, 0.5) - Point3::zeros();
                Arc::new(Triangle::new(c, c + e0, c + e1))
            };
            Arc::new(GeometricPrimitive::new(shape, Some(Arc::clone(&material))))
                as Arc<dyn Primitive>
        })
        .collect()
}

fn rays(rng: &mut Pcg32) -> Vec<Ray<f32>> {
    (0..RAY_COUNT)
        .map(|_| {
            let o = random_point(rng, 60.0);
            let d = random_point(rng, 40.0) - o;
            let d = if d.len_sqr() > 0.0 {
                d.normalized()
            } else {
                Vec3::new(0.0, 0.0, 1.0)
            };
            Ray::new(o, d, f32::INFINITY)
        })
        .collect()
}

fn bench_index(name: &str, settings: IndexSettings, seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed);
    let primitives = primitives(&mut rng);
    let rays = rays(&mut rng);

    let build_start = Instant::now();
    let index = build_index(primitives, settings);
    let build_ms = build_start.elapsed().as_secs_f64() * 1e3;

    let closest_start = Instant::now();
    let mut hits = 0;
    for ray in &rays {
        let mut ray = *ray;
        if index.intersect(&mut ray).is_some() {
            hits += 1;
        }
    }
    let closest_s = closest_start.elapsed().as_secs_f64();

    let any_start = Instant::now();
    let mut occluded = 0;
    for ray in &rays {
        if index.intersect_any(ray) {
            occluded += 1;
        }
    }
    let any_s = any_start.elapsed().as_secs_f64();

    println!(
        "{:<14} build {:7.1} ms, closest {:6.2} Mrays/s, any {:6.2} Mrays/s, {}/{} hits",
        name,
        build_ms,
        (RAY_COUNT as f64) / closest_s * 1e-6,
        (RAY_COUNT as f64) / any_s * 1e-6,
        hits,
        occluded
    );
}

fn bench_render(scene: BuiltinScene) {
    let (scene_built, camera_params) = scene.build(IndexSettings::default());
    let camera = match Camera::new(camera_params, Vec2::new(320, 240)) {
        Ok(camera) => camera,
        Err(why) => panic!("Failed to create camera: {}", why),
    };
    let settings = RenderSettings {
        samples_per_pixel: 16,
        ..RenderSettings::default()
    };
    let renderer = match Renderer::new(
        Arc::new(scene_built),
        camera,
        IntegratorType::Path(PathParams::default()).instantiate(),
        settings,
    ) {
        Ok(renderer) => renderer,
        Err(why) => panic!("Failed to create renderer: {}", why),
    };

    let result = match renderer.start() {
        Ok(handle) => handle.wait(),
        Err(why) => panic!("Failed to start render: {}", why),
    };
    println!(
        "{:<14} {:6.2} s, {:6.2} Mrays/s, {:?}",
        scene,
        result.elapsed_s,
        (result.ray_count as f32) / result.elapsed_s * 1e-6,
        result.outcome
    );
}

fn main() {
    println!("Spatial indices over {} primitives", PRIMITIVE_COUNT);
    for (name, split_method) in [
        ("BVH SAH", SplitMethod::SurfaceAreaHeuristic),
        ("BVH Middle", SplitMethod::Middle),
        ("BVH Equal", SplitMethod::EqualCounts),
    ] {
        bench_index(
            name,
            IndexSettings::Bvh(BvhSettings {
                split_method,
                max_prims_in_node: 4,
            }),
            0,
        );
    }
    for (name, looseness) in [("Octree 1.0", 1.0), ("Octree 1.5", 1.5)] {
        bench_index(
            name,
            IndexSettings::Octree(OctreeSettings {
                looseness,
                ..OctreeSettings::default()
            }),
            0,
        );
    }

    println!("Renders");
    bench_render(BuiltinScene::CornellBox);
    bench_render(BuiltinScene::Spheres);
}
