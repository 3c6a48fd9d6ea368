use num::cast::{FromPrimitive, ToPrimitive};
use num::traits::{Bounded, Float, Num};

/// Generic types that can be stored in the math containers
pub trait ValueType: Num + Bounded + PartialOrd + ToPrimitive + FromPrimitive + Copy {
    /// Returns the smaller of `self` and `other`.
    #[inline]
    fn mini(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Returns the larger of `self` and `other`.
    #[inline]
    fn maxi(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }
}

/// Floating point types that can be stored in the math containers
pub trait FloatValueType: ValueType + Float {}

// Impls for all matching types
impl<T> ValueType for T where T: Num + Bounded + PartialOrd + ToPrimitive + FromPrimitive + Copy {}
impl<T> FloatValueType for T where T: ValueType + Float {}

/// Converts `v` to `T`. Only used for small literal constants so the conversion can't fail for
/// the float types the containers are instantiated with.
#[inline]
pub(crate) fn cast<T: ValueType>(v: f64) -> T {
    T::from_f64(v).unwrap_or_else(T::zero)
}
