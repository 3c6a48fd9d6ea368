use num::{Bounded, Integer};
use std::{
    iter::{IntoIterator, Iterator},
    ops::Index,
};

use super::{
    common::{cast, FloatValueType, ValueType},
    point::{Point2, Point3},
    ray::Ray,
    vector::{Vec2, Vec3},
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Bounding_Boxes.html

// 1 + 2 * gamma(3)
// https://www.pbr-book.org/3ed-2018/Shapes/Managing_Rounding_Error#Robust
const SLAB_ROUNDING_SCALE: f64 = 1.0 + 2.0 * (3.0 * (f32::EPSILON as f64 * 0.5))
    / (1.0 - 3.0 * (f32::EPSILON as f64 * 0.5));

/// Two-dimensional bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2<T>
where
    T: ValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Point2<T>,
    /// The maximum extent of the bounds.
    pub p_max: Point2<T>,
}

/// Three-dimensional bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T>
where
    T: ValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Point3<T>,
    /// The maximum extent of the bounds.
    pub p_max: Point3<T>,
}

impl<T> Bounds2<T>
where
    T: ValueType,
{
    /// Creates new bounds spanning `p0` and `p1`.
    pub fn new(p0: Point2<T>, p1: Point2<T>) -> Self {
        Self {
            p_min: p0.min(p1),
            p_max: p0.max(p1),
        }
    }

    /// Returns the vector from `p_min` to `p_max`.
    #[inline]
    pub fn diagonal(&self) -> Vec2<T> {
        self.p_max - self.p_min
    }

    /// Returns the width of this `Bounds2`.
    #[inline]
    pub fn width(&self) -> T {
        self.p_max.x - self.p_min.x
    }

    /// Returns the height of this `Bounds2`.
    #[inline]
    pub fn height(&self) -> T {
        self.p_max.y - self.p_min.y
    }

    /// Calculates the area of this `Bounds2`
    #[inline]
    pub fn area(&self) -> T {
        let d = self.diagonal();
        d.x * d.y
    }

    /// Returns the overlapping region of `self` and `other`, `None` if they don't overlap.
    /// Upper bounds are treated as exclusive.
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let p_min = self.p_min.max(other.p_min);
        let p_max = self.p_max.min(other.p_max);
        if p_min.x < p_max.x && p_min.y < p_max.y {
            Some(Self { p_min, p_max })
        } else {
            None
        }
    }

    /// Checks if `p` is inside this `Bounds2`, excluding the upper bounds.
    #[inline]
    pub fn inside_exclusive(&self, p: Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }
}

/// A row-by-row iterator over the [Point2]s in a `Bounds2`.
/// Starts from `p_min` and excludes the upper bounds.
pub struct Bounds2IntoIter<T>
where
    T: ValueType + Integer,
{
    bb: Bounds2<T>,
    curr: Point2<T>,
}

/// A row-by-row iterator over the [Point2]s in a `Bounds2`.
/// Starts from `p_min` and excludes the upper bounds.
impl<T> IntoIterator for Bounds2<T>
where
    T: ValueType + Integer,
{
    type Item = Point2<T>;
    type IntoIter = Bounds2IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        Bounds2IntoIter {
            bb: self,
            curr: self.p_min,
        }
    }
}

impl<T> Iterator for Bounds2IntoIter<T>
where
    T: ValueType + Integer,
{
    type Item = Point2<T>;

    fn next(&mut self) -> Option<Self::Item> {
        // Empty bounds yield nothing
        if self.bb.p_min.x >= self.bb.p_max.x || self.curr.y >= self.bb.p_max.y {
            return None;
        }

        let ret = self.curr;
        self.curr.x = self.curr.x + T::one();
        // We exclude the max bound
        if self.curr.x >= self.bb.p_max.x {
            self.curr.x = self.bb.p_min.x;
            self.curr.y = self.curr.y + T::one();
        }

        Some(ret)
    }
}

impl<T> Default for Bounds3<T>
where
    T: ValueType,
{
    /// Returns the inverted bounds that any union will overwrite.
    fn default() -> Self {
        Self {
            p_min: Point3::from(<T as Bounded>::max_value()),
            p_max: Point3::from(<T as Bounded>::min_value()),
        }
    }
}

impl<T> Index<usize> for Bounds3<T>
where
    T: ValueType,
{
    type Output = Point3<T>;

    fn index(&self, i: usize) -> &Point3<T> {
        match i {
            0 => &self.p_min,
            1 => &self.p_max,
            _ => panic!("Bounds3 index {} out of bounds", i),
        }
    }
}

impl<T> Bounds3<T>
where
    T: ValueType,
{
    /// Creates new bounds spanning `p0` and `p1`.
    pub fn new(p0: Point3<T>, p1: Point3<T>) -> Self {
        Self {
            p_min: p0.min(p1),
            p_max: p0.max(p1),
        }
    }

    /// Returns `true` if `p_max >= p_min` on every axis, i.e. the bounds have been unioned with
    /// at least one point.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.p_max.x >= self.p_min.x && self.p_max.y >= self.p_min.y && self.p_max.z >= self.p_min.z
    }

    /// Returns these bounds expanded to include `p`.
    #[inline]
    pub fn union_p(&self, p: Point3<T>) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns these bounds expanded to include `other`.
    #[inline]
    pub fn union_b(&self, other: Self) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    /// Returns the vector from `p_min` to `p_max`.
    #[inline]
    pub fn diagonal(&self) -> Vec3<T> {
        self.p_max - self.p_min
    }

    /// Calculates the surface area of this `Bounds3`. Invalid bounds have zero area.
    #[inline]
    pub fn surface_area(&self) -> T {
        if !self.is_valid() {
            return T::zero();
        }
        let d = self.diagonal();
        (T::one() + T::one()) * (d.x * d.y + d.z * d.y + d.x * d.z)
    }

    /// Finds the axis of maximum extent of this `Bounds3`
    #[inline]
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Returns the position of `p` relative to the corners: `p_min` is at 0 and `p_max` at 1
    /// on each axis.
    #[inline]
    pub fn offset(&self, p: Point3<T>) -> Vec3<T> {
        let mut o = p - self.p_min;
        for i in 0..3 {
            if self.p_max[i] > self.p_min[i] {
                o[i] = o[i] / (self.p_max[i] - self.p_min[i]);
            }
        }
        o
    }

    /// Checks if `p` is inside this `Bounds3`, including the boundary.
    #[inline]
    pub fn inside(&self, p: Point3<T>) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Checks if `other` is fully inside this `Bounds3`.
    #[inline]
    pub fn contains_b(&self, other: &Self) -> bool {
        self.inside(other.p_min) && self.inside(other.p_max)
    }

    /// Checks if `self` and `other` overlap, touching counts.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.p_max.x >= other.p_min.x
            && self.p_min.x <= other.p_max.x
            && self.p_max.y >= other.p_min.y
            && self.p_min.y <= other.p_max.y
            && self.p_max.z >= other.p_min.z
            && self.p_min.z <= other.p_max.z
    }
}

impl<T> Bounds3<T>
where
    T: FloatValueType,
{
    /// Returns the center of this `Bounds3`.
    #[inline]
    pub fn centroid(&self) -> Point3<T> {
        (self.p_min + self.p_max) * cast::<T>(0.5)
    }

    /// Returns these bounds grown by `delta` on every side.
    #[inline]
    pub fn expanded(&self, delta: T) -> Self {
        Self {
            p_min: self.p_min - Vec3::from(delta),
            p_max: self.p_max + Vec3::from(delta),
        }
    }

    /// Returns the center and radius of this `Bounds3`'s bounding sphere. Returns `None` if there is no valid bounding sphere.
    #[inline]
    pub fn bounding_sphere(&self) -> Option<(Point3<T>, T)> {
        if self.is_valid() {
            let center = self.centroid();
            Some((center, self.p_max.dist(center)))
        } else {
            None
        }
    }

    /// Checks if `ray` hits this `Bounds3` within its `[t_min, t_max]`.
    /// `dir_is_neg` precomputed from `ray` is supplied as an optimization.
    #[inline]
    pub fn intersect(&self, ray: &Ray<T>, dir_is_neg: [bool; 3]) -> bool {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for i in 0..3 {
            let near = (self[dir_is_neg[i] as usize][i] - ray.o[i]) * ray.inv_d[i];
            // Conservative far distance so rounding doesn't cull hits on the faces
            let far = (self[1 - (dir_is_neg[i] as usize)][i] - ray.o[i])
                * ray.inv_d[i]
                * cast::<T>(SLAB_ROUNDING_SCALE);
            // NaNs from 0 * inf fail both comparisons and leave the interval as is
            if near > t0 {
                t0 = near;
            }
            if far < t1 {
                t1 = far;
            }
            if t0 > t1 {
                return false;
            }
        }
        true
    }

    /// Returns the parametric interval `[t0, t1]` of `ray` inside this `Bounds3`, `None` if the
    /// ray misses it.
    pub fn intersections(&self, ray: &Ray<T>) -> Option<(T, T)> {
        if !self.is_valid() {
            return None;
        }
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for i in 0..3 {
            let mut near = (self.p_min[i] - ray.o[i]) * ray.inv_d[i];
            let mut far = (self.p_max[i] - ray.o[i]) * ray.inv_d[i];
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            far = far * cast::<T>(SLAB_ROUNDING_SCALE);
            if near > t0 {
                t0 = near;
            }
            if far < t1 {
                t1 = far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}
