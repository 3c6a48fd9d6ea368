mod bounds;
mod common;
mod frame;
mod point;
mod ray;
mod spectrum;
mod transform;
mod vector;

pub mod transforms {
    pub use super::transform::{look_at, rotation, scale, translation};
}

pub use bounds::{Bounds2, Bounds3};
pub use common::{FloatValueType, ValueType};
pub use frame::Frame;
pub use point::{point2, point3, Normal, Point2, Point3};
pub use ray::Ray;
pub use spectrum::Spectrum;
pub use transform::{Matrix4x4, Transform};
pub use vector::{vec2, vec3, Vec2, Vec3};
