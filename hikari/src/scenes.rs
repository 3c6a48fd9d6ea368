use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use std::{sync::Arc, time::Instant};

use crate::{
    accel::{build_index, IndexSettings},
    camera::{CameraParameters, FoV},
    hikari_info,
    lights::{DiffuseAreaLight, DistantLight, Light, UniformInfiniteLight},
    materials::{Material, Matte, Mirror},
    math::{
        transforms::{rotation, translation},
        Point3, Spectrum, Vec3,
    },
    primitive::{Aggregate, GeometricPrimitive, InstancedPrimitive, Primitive},
    scene::Scene,
    shapes::{Shape, Sphere, Triangle},
};

/// Scenes that can be rendered without a scene file
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumVariantNames,
    EnumString,
)]
pub enum BuiltinScene {
    #[default]
    CornellBox,
    Spheres,
}

impl BuiltinScene {
    /// Builds the scene with the given index and returns it with a matching camera.
    pub fn build(self, index_settings: IndexSettings) -> (Scene, CameraParameters) {
        let start = Instant::now();
        let ret = match self {
            BuiltinScene::CornellBox => cornell_box(index_settings),
            BuiltinScene::Spheres => spheres(index_settings),
        };
        hikari_info!(
            "Built scene '{}' in {:.2}s",
            self,
            start.elapsed().as_secs_f32()
        );
        ret
    }
}

/// Triangles for the quad `p0 p1 p2 p3`, facing the side the corners wind counter-clockwise
/// towards.
fn quad(
    p0: Point3<f32>,
    p1: Point3<f32>,
    p2: Point3<f32>,
    p3: Point3<f32>,
) -> [Arc<dyn Shape>; 2] {
    let t0: Arc<dyn Shape> = Arc::new(Triangle::new(p0, p1, p2));
    let t1: Arc<dyn Shape> = Arc::new(Triangle::new(p0, p2, p3));
    [t0, t1]
}

fn push_quad(
    primitives: &mut Vec<Arc<dyn Primitive>>,
    corners: [Point3<f32>; 4],
    material: &Arc<dyn Material>,
) {
    let [p0, p1, p2, p3] = corners;
    for shape in quad(p0, p1, p2, p3) {
        primitives.push(Arc::new(GeometricPrimitive::new(
            shape,
            Some(Arc::clone(material)),
        )));
    }
}

/// The classic box with a red left wall, a green right wall and a square light in the ceiling.
/// Holds a diffuse and a mirror sphere.
pub fn cornell_box(index_settings: IndexSettings) -> (Scene, CameraParameters) {
    let white: Arc<dyn Material> = Arc::new(Matte::new(Spectrum::new(0.73, 0.73, 0.73)));
    let red: Arc<dyn Material> = Arc::new(Matte::new(Spectrum::new(0.65, 0.05, 0.05)));
    let green: Arc<dyn Material> = Arc::new(Matte::new(Spectrum::new(0.12, 0.45, 0.15)));
    let mirror: Arc<dyn Material> = Arc::new(Mirror::new(Spectrum::new(0.95, 0.95, 0.95)));
    let black: Arc<dyn Material> = Arc::new(Matte::new(Spectrum::zeros()));

    let p = Point3::new;
    let mut primitives: Vec<Arc<dyn Primitive>> = Vec::new();
    // Floor
    push_quad(
        &mut primitives,
        [
            p(-1.0, -1.0, -1.0),
            p(-1.0, -1.0, 1.0),
            p(1.0, -1.0, 1.0),
            p(1.0, -1.0, -1.0),
        ],
        &white,
    );
    // Ceiling
    push_quad(
        &mut primitives,
        [
            p(-1.0, 1.0, -1.0),
            p(1.0, 1.0, -1.0),
            p(1.0, 1.0, 1.0),
            p(-1.0, 1.0, 1.0),
        ],
        &white,
    );
    // Back wall
    push_quad(
        &mut primitives,
        [
            p(-1.0, -1.0, 1.0),
            p(-1.0, 1.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(1.0, -1.0, 1.0),
        ],
        &white,
    );
    // Left wall
    push_quad(
        &mut primitives,
        [
            p(-1.0, -1.0, -1.0),
            p(-1.0, 1.0, -1.0),
            p(-1.0, 1.0, 1.0),
            p(-1.0, -1.0, 1.0),
        ],
        &red,
    );
    // Right wall
    push_quad(
        &mut primitives,
        [
            p(1.0, -1.0, -1.0),
            p(1.0, -1.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(1.0, 1.0, -1.0),
        ],
        &green,
    );

    primitives.push(Arc::new(GeometricPrimitive::new(
        Arc::new(Sphere::new(p(-0.4, -0.65, 0.3), 0.35)),
        Some(Arc::clone(&white)),
    )));
    primitives.push(Arc::new(GeometricPrimitive::new(
        Arc::new(Sphere::new(p(0.45, -0.65, -0.2), 0.35)),
        Some(mirror),
    )));

    // Light faces down, slightly below the ceiling to avoid coplanar surfaces
    let light_y = 0.99;
    let radiance = Spectrum::new(17.0, 12.0, 4.0);
    let mut lights: Vec<Arc<dyn Light>> = Vec::new();
    for shape in quad(
        p(-0.25, light_y, -0.25),
        p(0.25, light_y, -0.25),
        p(0.25, light_y, 0.25),
        p(-0.25, light_y, 0.25),
    ) {
        let light = Arc::new(DiffuseAreaLight::new(Arc::clone(&shape), radiance, false));
        primitives.push(Arc::new(
            GeometricPrimitive::new(shape, Some(Arc::clone(&black)))
                .with_area_light(Arc::clone(&light)),
        ));
        lights.push(light);
    }

    let aggregate = Aggregate::new(build_index(primitives, index_settings));
    let camera = CameraParameters {
        position: p(0.0, 0.0, -3.9),
        target: p(0.0, 0.0, 0.0),
        up: Vec3::new(0.0, 1.0, 0.0),
        fov: FoV::Y(40.0),
    };

    (Scene::new(aggregate, lights), camera)
}

/// Clusters of spheres on a ground plane under a sky and a sun. The clusters are instances of a
/// shared aggregate.
pub fn spheres(index_settings: IndexSettings) -> (Scene, CameraParameters) {
    let ground: Arc<dyn Material> = Arc::new(Matte::new(Spectrum::new(0.5, 0.5, 0.5)));
    let p = Point3::new;

    let mut primitives: Vec<Arc<dyn Primitive>> = Vec::new();
    let extent = 20.0;
    push_quad(
        &mut primitives,
        [
            p(-extent, 0.0, -extent),
            p(-extent, 0.0, extent),
            p(extent, 0.0, extent),
            p(extent, 0.0, -extent),
        ],
        &ground,
    );

    // A ring of small spheres around a mirror ball
    let mut cluster: Vec<Arc<dyn Primitive>> = vec![Arc::new(GeometricPrimitive::new(
        Arc::new(Sphere::new(p(0.0, 0.5, 0.0), 0.5)),
        Some(Arc::new(Mirror::new(Spectrum::new(0.9, 0.9, 0.9)))),
    ))];
    let ring_count = 8;
    for i in 0..ring_count {
        let t = (i as f32) / (ring_count as f32);
        let angle = t * std::f32::consts::TAU;
        let albedo = Spectrum::new(0.2 + 0.6 * t, 0.8 - 0.6 * t, 0.3);
        cluster.push(Arc::new(GeometricPrimitive::new(
            Arc::new(Sphere::new(p(angle.cos(), 0.2, angle.sin()), 0.2)),
            Some(Arc::new(Matte::new(albedo))),
        )));
    }
    let cluster = Arc::new(Aggregate::new(build_index(cluster, index_settings)));

    for (offset, angle) in [
        (Vec3::new(-2.5, 0.0, 1.5), 0.0),
        (Vec3::new(0.0, 0.0, 0.0), 22.5),
        (Vec3::new(2.5, 0.0, 1.5), 45.0),
    ] {
        let instance_to_world = &translation(offset) * &rotation(angle, Vec3::new(0.0, 1.0, 0.0));
        primitives.push(Arc::new(InstancedPrimitive::new(
            instance_to_world,
            Arc::clone(&cluster),
        )));
    }

    let lights: Vec<Arc<dyn Light>> = vec![
        Arc::new(UniformInfiniteLight::new(Spectrum::new(0.4, 0.5, 0.7))),
        Arc::new(DistantLight::new(
            Vec3::new(-0.4, 1.0, -0.6),
            Spectrum::new(2.5, 2.3, 2.0),
        )),
    ];

    let aggregate = Aggregate::new(build_index(primitives, index_settings));
    let camera = CameraParameters {
        position: p(0.0, 2.5, -7.0),
        target: p(0.0, 0.4, 0.5),
        up: Vec3::new(0.0, 1.0, 0.0),
        fov: FoV::X(55.0),
    };

    (Scene::new(aggregate, lights), camera)
}
