use approx::{AbsDiffEq, RelativeEq};

use super::{
    common::FloatValueType,
    point::Point3,
    vector::Vec3,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Rays.html

/// A ray with an origin, a direction and a valid parametric interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<T>
where
    T: FloatValueType,
{
    /// The origin of the ray.
    pub o: Point3<T>,
    /// The direction of the ray. Not necessarily unit length.
    pub d: Vec3<T>,
    /// Component-wise inverse of `d`, kept in sync by the constructors.
    pub inv_d: Vec3<T>,
    /// The start of the valid segment.
    pub t_min: T,
    /// The end of the valid segment. Narrowed during closest hit searches.
    pub t_max: T,
}

impl<T> Ray<T>
where
    T: FloatValueType,
{
    /// Creates a new `Ray` valid on `[0, t_max]`.
    pub fn new(o: Point3<T>, d: Vec3<T>, t_max: T) -> Self {
        Self::segment(o, d, T::zero(), t_max)
    }

    /// Creates a new `Ray` valid on `[t_min, t_max]`.
    pub fn segment(o: Point3<T>, d: Vec3<T>, t_min: T, t_max: T) -> Self {
        assert!(!t_min.is_nan() && !t_max.is_nan(), "Ray with a NaN interval");
        Self {
            o,
            d,
            inv_d: Vec3::new(T::one() / d.x, T::one() / d.y, T::one() / d.z),
            t_min,
            t_max,
        }
    }

    /// Returns the point at `t` along this `Ray`.
    #[inline]
    pub fn point(&self, t: T) -> Point3<T> {
        self.o + self.d * t
    }

    /// Returns `true` if any of the components is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_min.is_nan() || self.t_max.is_nan()
    }

    /// Returns `true` if this `Ray` can't be traced: its direction is zero-length or not finite.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let len_sqr = self.d.len_sqr();
        !(len_sqr > T::zero()) || !len_sqr.is_finite() || self.o.has_nans()
    }

    /// Returns the signs of the direction used to pick the near slab of a bounding box per axis.
    #[inline]
    pub fn dir_is_neg(&self) -> [bool; 3] {
        [
            self.inv_d.x < T::zero(),
            self.inv_d.y < T::zero(),
            self.inv_d.z < T::zero(),
        ]
    }
}

impl Default for Ray<f32> {
    fn default() -> Self {
        Self::new(Point3::zeros(), Vec3::new(0.0, 1.0, 0.0), f32::INFINITY)
    }
}

impl<T> AbsDiffEq for Ray<T>
where
    T: FloatValueType + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.o.abs_diff_eq(&other.o, epsilon)
            && self.d.abs_diff_eq(&other.d, epsilon)
            && self.t_min.abs_diff_eq(&other.t_min, epsilon)
            && self.t_max.abs_diff_eq(&other.t_max, epsilon)
    }
}

impl<T> RelativeEq for Ray<T>
where
    T: FloatValueType + RelativeEq<Epsilon = T>,
{
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.o.relative_eq(&other.o, epsilon, max_relative)
            && self.d.relative_eq(&other.d, epsilon, max_relative)
            && self.t_min.relative_eq(&other.t_min, epsilon, max_relative)
            && self.t_max.relative_eq(&other.t_max, epsilon, max_relative)
    }
}
