use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use super::{
    common::{FloatValueType, ValueType},
    vector::{impl_container, impl_vec_assign_op, impl_vec_op},
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Color_and_Radiometry/Spectral_Representation

/// A spectral power distribution stored as RGB
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Spectrum<T>
where
    T: ValueType,
{
    /// The r component of the spd
    pub r: T,
    /// The g component of the spd
    pub g: T,
    /// The b component of the spd
    pub b: T,
}

impl_container!(Spectrum { r: 0, g: 1, b: 2 });

impl_vec_op!(Add add, Spectrum, Spectrum => Spectrum { r, g, b });
impl_vec_op!(Sub sub, Spectrum, Spectrum => Spectrum { r, g, b });
impl_vec_op!(Mul mul, Spectrum, Spectrum => Spectrum { r, g, b });
impl_vec_op!(Div div, Spectrum, Spectrum => Spectrum { r, g, b });
impl_vec_assign_op!(AddAssign add_assign, Add add, Spectrum, Spectrum { r, g, b });
impl_vec_assign_op!(SubAssign sub_assign, Sub sub, Spectrum, Spectrum { r, g, b });
impl_vec_assign_op!(MulAssign mul_assign, Mul mul, Spectrum, Spectrum { r, g, b });
impl_vec_assign_op!(DivAssign div_assign, Div div, Spectrum, Spectrum { r, g, b });

impl<T> Spectrum<T>
where
    T: ValueType,
{
    /// Returns `true` if all channels are zero.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.r == T::zero() && self.g == T::zero() && self.b == T::zero()
    }

    /// Returns the average of the channels.
    #[inline]
    pub fn avg(&self) -> T {
        (self.r + self.g + self.b) / (T::one() + T::one() + T::one())
    }
}

impl<T> Spectrum<T>
where
    T: FloatValueType,
{
    /// Returns `true` if every channel is finite and non-negative.
    #[inline]
    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|&c| c.is_finite() && c >= T::zero())
    }

    /// Returns the per-channel exponential.
    #[inline]
    pub fn exp(&self) -> Self {
        Self::new(self.r.exp(), self.g.exp(), self.b.exp())
    }
}

impl<T> Neg for Spectrum<T>
where
    T: FloatValueType,
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.r, -self.g, -self.b)
    }
}
