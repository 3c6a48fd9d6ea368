use std::sync::Arc;

use crate::{
    accel::SpatialIndex,
    lights::DiffuseAreaLight,
    materials::{Bsdf, Material},
    math::{Bounds3, Frame, Normal, Point2, Point3, Ray, Spectrum, Transform, Vec3},
    media::{Medium, MediumInterface},
    shapes::{Shape, ShapeHit},
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Primitives_and_Intersection_Acceleration/Primitive_Interface_and_Geometric_Primitives

/// Relative offset used when spawning rays off surfaces
const RAY_EPSILON: f32 = 1e-4;
/// Parametric slack left at the end of rays that target a point
pub const SHADOW_EPSILON: f32 = 1e-4;

pub trait Primitive: Send + Sync {
    /// Returns the world space AABB of this `Primitive`.
    fn world_bound(&self) -> Bounds3<f32>;

    /// Checks if `ray` hits anything within its `[t_min, t_max]`.
    fn intersect_any(&self, ray: &Ray<f32>) -> bool;

    /// Finds the closest hit of `ray`. Narrows `ray.t_max` to the hit distance on success.
    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>>;
}

/// Surface information of a ray hit
#[derive(Clone)]
pub struct Intersection<'a> {
    pub p: Point3<f32>,
    /// Geometric normal, facing out of the surface
    pub n: Normal<f32>,
    pub uv: Point2<f32>,
    /// Distance along the ray that found the hit
    pub t: f32,
    pub shading: Frame,
    /// Normalized direction toward the ray origin
    pub wo: Vec3<f32>,
    pub primitive: &'a GeometricPrimitive,
}

impl<'a> Intersection<'a> {
    fn new(hit: ShapeHit, ray: &Ray<f32>, primitive: &'a GeometricPrimitive) -> Self {
        Self {
            p: hit.p,
            n: hit.n,
            uv: hit.uv,
            t: hit.t,
            shading: Frame::from_normal_tangent(hit.n, hit.dpdu),
            wo: -ray.d.normalized(),
            primitive,
        }
    }

    /// Returns the radiance emitted from this point toward `w`.
    pub fn le(&self, w: Vec3<f32>) -> Spectrum<f32> {
        self.primitive
            .area_light()
            .map_or(Spectrum::zeros(), |light| light.l(self.n, w))
    }

    /// Returns the [Bsdf] at this point, `None` for medium boundaries.
    pub fn bsdf(&self) -> Option<Bsdf<'a>> {
        self.primitive
            .material()
            .map(|material| Bsdf::new(self.shading, material))
    }

    /// Returns the medium on the side of the surface `w` points to. Surfaces that don't separate
    /// two media keep `current`.
    pub fn medium_toward(
        &self,
        w: Vec3<f32>,
        current: Option<&Arc<dyn Medium>>,
    ) -> Option<Arc<dyn Medium>> {
        match self.primitive.medium_interface() {
            Some(interface) if interface.is_transition() => {
                if self.n.dot_v(w) > 0.0 {
                    interface.outside.clone()
                } else {
                    interface.inside.clone()
                }
            }
            _ => current.cloned(),
        }
    }

    /// Returns the point offset off the surface toward `w`.
    pub fn offset_origin(&self, w: Vec3<f32>) -> Point3<f32> {
        let n = Vec3::from(self.n);
        let scale = RAY_EPSILON * (1.0 + self.p.abs().max_comp());
        if n.dot(w) < 0.0 {
            self.p - n * scale
        } else {
            self.p + n * scale
        }
    }

    /// Spawns a new unbounded [Ray] from this point in direction `d`.
    pub fn spawn_ray(&self, d: Vec3<f32>) -> Ray<f32> {
        Ray::new(self.offset_origin(d), d, f32::INFINITY)
    }

    /// Spawns a new [Ray] from this point that ends just short of `p`.
    pub fn spawn_ray_to(&self, p: Point3<f32>) -> Ray<f32> {
        let o = self.offset_origin(p - self.p);
        Ray::segment(o, p - o, 0.0, 1.0 - SHADOW_EPSILON)
    }

    /// Moves this `Intersection` through `transform`.
    fn transformed(mut self, transform: &Transform<f32>) -> Self {
        self.p = transform * self.p;
        self.n = (transform * self.n).normalized();
        self.shading = Frame::from_normal_tangent(self.n, transform * self.shading.s);
        self.wo = (transform * self.wo).normalized();
        self
    }
}

/// A [Shape] with its surface properties
pub struct GeometricPrimitive {
    shape: Arc<dyn Shape>,
    material: Option<Arc<dyn Material>>,
    area_light: Option<Arc<DiffuseAreaLight>>,
    medium_interface: Option<MediumInterface>,
}

impl GeometricPrimitive {
    /// Creates a new `GeometricPrimitive`. A `None` material makes this an invisible medium boundary.
    pub fn new(shape: Arc<dyn Shape>, material: Option<Arc<dyn Material>>) -> Self {
        Self {
            shape,
            material,
            area_light: None,
            medium_interface: None,
        }
    }

    /// Makes this primitive emissive through `light`. The light should be built around the same shape.
    pub fn with_area_light(mut self, light: Arc<DiffuseAreaLight>) -> Self {
        self.area_light = Some(light);
        self
    }

    pub fn with_medium_interface(mut self, interface: MediumInterface) -> Self {
        self.medium_interface = Some(interface);
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }

    pub fn material(&self) -> Option<&dyn Material> {
        self.material.as_deref()
    }

    pub fn area_light(&self) -> Option<&Arc<DiffuseAreaLight>> {
        self.area_light.as_ref()
    }

    pub fn medium_interface(&self) -> Option<&MediumInterface> {
        self.medium_interface.as_ref()
    }
}

impl Primitive for GeometricPrimitive {
    fn world_bound(&self) -> Bounds3<f32> {
        self.shape.world_bound()
    }

    fn intersect_any(&self, ray: &Ray<f32>) -> bool {
        self.shape.intersect_p(ray)
    }

    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>> {
        let hit = self.shape.intersect(ray)?;
        ray.t_max = hit.t;
        Some(Intersection::new(hit, ray, self))
    }
}

/// A built [SpatialIndex] over child primitives
pub struct Aggregate {
    index: Box<dyn SpatialIndex>,
}

impl Aggregate {
    pub fn new(index: Box<dyn SpatialIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &dyn SpatialIndex {
        self.index.as_ref()
    }
}

impl Primitive for Aggregate {
    fn world_bound(&self) -> Bounds3<f32> {
        self.index.world_bound()
    }

    fn intersect_any(&self, ray: &Ray<f32>) -> bool {
        self.index.intersect_any(ray)
    }

    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>> {
        self.index.intersect(ray)
    }
}

/// A transformed reference to a shared [Aggregate]
pub struct InstancedPrimitive {
    instance_to_world: Transform<f32>,
    world_to_instance: Transform<f32>,
    aggregate: Arc<Aggregate>,
}

impl InstancedPrimitive {
    pub fn new(instance_to_world: Transform<f32>, aggregate: Arc<Aggregate>) -> Self {
        Self {
            world_to_instance: instance_to_world.inverted(),
            instance_to_world,
            aggregate,
        }
    }
}

impl Primitive for InstancedPrimitive {
    fn world_bound(&self) -> Bounds3<f32> {
        &self.instance_to_world * self.aggregate.world_bound()
    }

    fn intersect_any(&self, ray: &Ray<f32>) -> bool {
        self.aggregate.intersect_any(&(&self.world_to_instance * *ray))
    }

    fn intersect(&self, ray: &mut Ray<f32>) -> Option<Intersection<'_>> {
        // Directions aren't renormalized so t is the same in both spaces
        let mut instance_ray = &self.world_to_instance * *ray;
        let isect = self.aggregate.intersect(&mut instance_ray)?;
        ray.t_max = instance_ray.t_max;
        Some(isect.transformed(&self.instance_to_world))
    }
}
