use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use super::common::{FloatValueType, ValueType};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html

/// Implements component-wise arithmetic, scalar scaling, indexing and approx comparisons for a
/// fixed size value container.
macro_rules! impl_container {
    ($name:ident { $($c:ident: $i:literal),+ }) => {
        impl<T> $name<T>
        where
            T: ValueType,
        {
            /// Creates a new value from components.
            #[inline]
            pub fn new($($c: T),+) -> Self {
                Self { $($c),+ }
            }

            /// Creates a new value with all components set to zero.
            #[inline]
            pub fn zeros() -> Self {
                Self { $($c: T::zero()),+ }
            }

            /// Creates a new value with all components set to one.
            #[inline]
            pub fn ones() -> Self {
                Self { $($c: T::one()),+ }
            }

            /// Returns the component-wise minimum of `self` and `other`.
            #[inline]
            pub fn min(&self, other: Self) -> Self {
                Self { $($c: self.$c.mini(other.$c)),+ }
            }

            /// Returns the component-wise maximum of `self` and `other`.
            #[inline]
            pub fn max(&self, other: Self) -> Self {
                Self { $($c: self.$c.maxi(other.$c)),+ }
            }

            /// Returns the smallest component.
            #[inline]
            pub fn min_comp(&self) -> T {
                let mut ret = T::max_value();
                $(ret = ret.mini(self.$c);)+
                ret
            }

            /// Returns the largest component.
            #[inline]
            pub fn max_comp(&self) -> T {
                let mut ret = T::min_value();
                $(ret = ret.maxi(self.$c);)+
                ret
            }
        }

        impl<T> $name<T>
        where
            T: FloatValueType,
        {
            /// Returns `true` if any of the components is NaN.
            #[inline]
            pub fn has_nans(&self) -> bool {
                false $(|| self.$c.is_nan())+
            }

            /// Returns the component-wise absolute value.
            #[inline]
            pub fn abs(&self) -> Self {
                Self { $($c: self.$c.abs()),+ }
            }
        }

        impl<T> From<T> for $name<T>
        where
            T: ValueType,
        {
            fn from(v: T) -> Self {
                Self { $($c: v),+ }
            }
        }

        impl<T> Index<usize> for $name<T>
        where
            T: ValueType,
        {
            type Output = T;

            fn index(&self, component: usize) -> &T {
                match component {
                    $($i => &self.$c,)+
                    _ => panic!("Component {} out of bounds", component),
                }
            }
        }

        impl<T> IndexMut<usize> for $name<T>
        where
            T: ValueType,
        {
            fn index_mut(&mut self, component: usize) -> &mut T {
                match component {
                    $($i => &mut self.$c,)+
                    _ => panic!("Component {} out of bounds", component),
                }
            }
        }

        impl<T> Mul<T> for $name<T>
        where
            T: ValueType,
        {
            type Output = Self;

            fn mul(self, s: T) -> Self {
                Self { $($c: self.$c * s),+ }
            }
        }

        impl<T> Div<T> for $name<T>
        where
            T: ValueType,
        {
            type Output = Self;

            fn div(self, s: T) -> Self {
                Self { $($c: self.$c / s),+ }
            }
        }

        impl<T> MulAssign<T> for $name<T>
        where
            T: ValueType,
        {
            fn mul_assign(&mut self, s: T) {
                $(self.$c = self.$c * s;)+
            }
        }

        impl<T> DivAssign<T> for $name<T>
        where
            T: ValueType,
        {
            fn div_assign(&mut self, s: T) {
                $(self.$c = self.$c / s;)+
            }
        }

        impl<T> AbsDiffEq for $name<T>
        where
            T: FloatValueType + AbsDiffEq<Epsilon = T>,
        {
            type Epsilon = T;

            fn default_epsilon() -> T {
                T::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
                true $(&& self.$c.abs_diff_eq(&other.$c, epsilon))+
            }
        }

        impl<T> RelativeEq for $name<T>
        where
            T: FloatValueType + RelativeEq<Epsilon = T>,
        {
            fn default_max_relative() -> T {
                T::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
                true $(&& self.$c.relative_eq(&other.$c, epsilon, max_relative))+
            }
        }
    };
}
pub(crate) use impl_container;

/// Implements `$op` between `$lhs` and `$rhs` component-wise, resulting in `$out`.
macro_rules! impl_vec_op {
    ($op:ident $fn:ident, $lhs:ident, $rhs:ident => $out:ident { $($c:ident),+ }) => {
        impl<T> $op<$rhs<T>> for $lhs<T>
        where
            T: ValueType,
        {
            type Output = $out<T>;

            fn $fn(self, other: $rhs<T>) -> $out<T> {
                $out { $($c: $op::$fn(self.$c, other.$c)),+ }
            }
        }
    };
}
pub(crate) use impl_vec_op;

/// Implements `$op` in place on `$lhs` with `$rhs` component-wise.
macro_rules! impl_vec_assign_op {
    ($op:ident $fn:ident, $inner:ident $inner_fn:ident, $lhs:ident, $rhs:ident { $($c:ident),+ }) => {
        impl<T> $op<$rhs<T>> for $lhs<T>
        where
            T: ValueType,
        {
            fn $fn(&mut self, other: $rhs<T>) {
                $(self.$c = $inner::$inner_fn(self.$c, other.$c);)+
            }
        }
    };
}
pub(crate) use impl_vec_assign_op;

/// A two-dimensional vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Vec2<T>
where
    T: ValueType,
{
    /// The x component of the vector.
    pub x: T,
    /// The y component of the vector.
    pub y: T,
}

/// A three-dimensional vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Vec3<T>
where
    T: ValueType,
{
    /// The x component of the vector.
    pub x: T,
    /// The y component of the vector.
    pub y: T,
    /// The z component of the vector.
    pub z: T,
}

impl_container!(Vec2 { x: 0, y: 1 });
impl_container!(Vec3 { x: 0, y: 1, z: 2 });

impl_vec_op!(Add add, Vec2, Vec2 => Vec2 { x, y });
impl_vec_op!(Sub sub, Vec2, Vec2 => Vec2 { x, y });
impl_vec_op!(Add add, Vec3, Vec3 => Vec3 { x, y, z });
impl_vec_op!(Sub sub, Vec3, Vec3 => Vec3 { x, y, z });
impl_vec_op!(Mul mul, Vec3, Vec3 => Vec3 { x, y, z });
impl_vec_assign_op!(AddAssign add_assign, Add add, Vec2, Vec2 { x, y });
impl_vec_assign_op!(SubAssign sub_assign, Sub sub, Vec2, Vec2 { x, y });
impl_vec_assign_op!(AddAssign add_assign, Add add, Vec3, Vec3 { x, y, z });
impl_vec_assign_op!(SubAssign sub_assign, Sub sub, Vec3, Vec3 { x, y, z });

/// Shorthand constructor for [Vec2].
#[inline]
pub fn vec2<T: ValueType>(x: T, y: T) -> Vec2<T> {
    Vec2::new(x, y)
}

/// Shorthand constructor for [Vec3].
#[inline]
pub fn vec3<T: ValueType>(x: T, y: T, z: T) -> Vec3<T> {
    Vec3::new(x, y, z)
}

impl<T> Vec2<T>
where
    T: ValueType,
{
    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Returns the squared length of this `Vec2`.
    #[inline]
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }
}

impl<T> Vec3<T>
where
    T: ValueType,
{
    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product of `self` and `other`.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns the squared length of this `Vec3`.
    #[inline]
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Returns the index of the component with the largest value.
    #[inline]
    pub fn max_dimension(&self) -> usize {
        if self.x > self.y {
            if self.x > self.z {
                0
            } else {
                2
            }
        } else if self.y > self.z {
            1
        } else {
            2
        }
    }

    /// Returns a new `Vec3` with components chosen by the given indices.
    #[inline]
    pub fn permuted(&self, x: usize, y: usize, z: usize) -> Self {
        Self::new(self[x], self[y], self[z])
    }
}

impl<T> Vec3<T>
where
    T: FloatValueType,
{
    /// Returns the length of this `Vec3`.
    #[inline]
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }

    /// Returns this `Vec3` scaled to unit length.
    #[inline]
    pub fn normalized(&self) -> Self {
        *self / self.len()
    }

    /// Returns the dot product of `self` and `other` flipped to the positive side.
    #[inline]
    pub fn abs_dot(&self, other: Self) -> T {
        self.dot(other).abs()
    }
}

impl<T> Neg for Vec3<T>
where
    T: FloatValueType,
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> Neg for Vec2<T>
where
    T: FloatValueType,
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
