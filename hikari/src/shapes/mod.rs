mod sphere;
mod triangle;

pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::math::{Bounds3, Normal, Point2, Point3, Ray, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Shapes/Basic_Shape_Interface.html#Shape

/// Geometric data of a ray-shape hit
#[derive(Copy, Clone, Debug)]
pub struct ShapeHit {
    /// Distance along the ray
    pub t: f32,
    pub p: Point3<f32>,
    /// Unit length, facing out of the surface
    pub n: Normal<f32>,
    pub uv: Point2<f32>,
    pub dpdu: Vec3<f32>,
}

/// Point sampled on the surface of a [Shape]
#[derive(Copy, Clone, Debug)]
pub struct ShapeSample {
    pub p: Point3<f32>,
    pub n: Normal<f32>,
}

pub trait Shape: Send + Sync {
    /// Intersects [Ray] with this object within the ray's `[t_min, t_max]`.
    fn intersect(&self, ray: &Ray<f32>) -> Option<ShapeHit>;
    /// Checks if [Ray] hits this object within the ray's `[t_min, t_max]`.
    fn intersect_p(&self, ray: &Ray<f32>) -> bool {
        self.intersect(ray).is_some()
    }
    /// Returns the world space AABB of the Shape
    fn world_bound(&self) -> Bounds3<f32>;
    /// Returns the surface area of the Shape
    fn area(&self) -> f32;
    /// Samples a point uniformly by area
    fn sample(&self, u: Point2<f32>) -> ShapeSample;
}
