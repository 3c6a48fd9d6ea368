use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use super::{
    common::{FloatValueType, ValueType},
    vector::{impl_container, impl_vec_assign_op, impl_vec_op, Vec2, Vec3},
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Points.html
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Normals.html

// Note about Point ops:
// Some don't really make mathematical sense but are useful in weighted sums
// point + point = point
// point * scalar = point

/// A two-dimensional point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Point2<T>
where
    T: ValueType,
{
    /// The x component of the point.
    pub x: T,
    /// The y component of the point.
    pub y: T,
}

/// A three-dimensional point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Point3<T>
where
    T: ValueType,
{
    /// The x component of the point.
    pub x: T,
    /// The y component of the point.
    pub y: T,
    /// The z component of the point.
    pub z: T,
}

/// A three-dimensional surface normal. Not necessarily unit length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Normal<T>
where
    T: ValueType,
{
    /// The x component of the normal.
    pub x: T,
    /// The y component of the normal.
    pub y: T,
    /// The z component of the normal.
    pub z: T,
}

impl_container!(Point2 { x: 0, y: 1 });
impl_container!(Point3 { x: 0, y: 1, z: 2 });
impl_container!(Normal { x: 0, y: 1, z: 2 });

impl_vec_op!(Add add, Point2, Vec2 => Point2 { x, y });
impl_vec_op!(Add add, Point2, Point2 => Point2 { x, y });
impl_vec_op!(Sub sub, Point2, Vec2 => Point2 { x, y });
impl_vec_op!(Sub sub, Point2, Point2 => Vec2 { x, y });
impl_vec_op!(Add add, Point3, Vec3 => Point3 { x, y, z });
impl_vec_op!(Add add, Point3, Point3 => Point3 { x, y, z });
impl_vec_op!(Sub sub, Point3, Vec3 => Point3 { x, y, z });
impl_vec_op!(Sub sub, Point3, Point3 => Vec3 { x, y, z });
impl_vec_op!(Add add, Normal, Normal => Normal { x, y, z });
impl_vec_assign_op!(AddAssign add_assign, Add add, Point2, Vec2 { x, y });
impl_vec_assign_op!(SubAssign sub_assign, Sub sub, Point2, Vec2 { x, y });
impl_vec_assign_op!(AddAssign add_assign, Add add, Point3, Vec3 { x, y, z });
impl_vec_assign_op!(SubAssign sub_assign, Sub sub, Point3, Vec3 { x, y, z });

/// Shorthand constructor for [Point2].
#[inline]
pub fn point2<T: ValueType>(x: T, y: T) -> Point2<T> {
    Point2::new(x, y)
}

/// Shorthand constructor for [Point3].
#[inline]
pub fn point3<T: ValueType>(x: T, y: T, z: T) -> Point3<T> {
    Point3::new(x, y, z)
}

impl<T> Point3<T>
where
    T: FloatValueType,
{
    /// Returns the squared distance between `self` and `other`.
    #[inline]
    pub fn dist_sqr(&self, other: Self) -> T {
        (*self - other).len_sqr()
    }

    /// Returns the distance between `self` and `other`.
    #[inline]
    pub fn dist(&self, other: Self) -> T {
        (*self - other).len()
    }

    /// Linearly interpolates between `self` at `t = 0` and `other` at `t = 1`.
    #[inline]
    pub fn lerp(&self, other: Self, t: T) -> Self {
        *self * (T::one() - t) + other * t
    }
}

impl<T> Normal<T>
where
    T: FloatValueType,
{
    /// Returns the dot product of `self` and `v`.
    #[inline]
    pub fn dot_v(&self, v: Vec3<T>) -> T {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Returns this `Normal` scaled to unit length.
    #[inline]
    pub fn normalized(&self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        *self / len
    }

    /// Flips this `Normal` to the same hemisphere with `v`.
    #[inline]
    pub fn face_forward(&self, v: Vec3<T>) -> Self {
        if self.dot_v(v) < T::zero() {
            -*self
        } else {
            *self
        }
    }
}

impl<T> Neg for Normal<T>
where
    T: FloatValueType,
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> From<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    fn from(v: Vec3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl<T> From<Point3<T>> for Vec3<T>
where
    T: ValueType,
{
    fn from(p: Point3<T>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl<T> From<Vec3<T>> for Normal<T>
where
    T: ValueType,
{
    fn from(v: Vec3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl<T> From<Normal<T>> for Vec3<T>
where
    T: ValueType,
{
    fn from(n: Normal<T>) -> Self {
        Self::new(n.x, n.y, n.z)
    }
}
