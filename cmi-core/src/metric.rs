//! Numeric types the interpreter can average
//!
//! A [`Metric`] is any ordered number with the four basic operators. The
//! interpreter only ever adds, subtracts, multiplies and divides, so plain
//! integers work as well as floats or fixed-point types. Pick the type (and the
//! configuration weights) so that `weight * value` can never overflow; the hot
//! path does not check.
//!
//! Implementations are provided for every primitive integer, `f32`, `f64` and,
//! with the `fixed` feature, for `fixed::FixedU32`/`fixed::FixedI32`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Numeric type a channel average is tracked in
pub trait Metric:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity, also the average of an unused channel
    const ZERO: Self;

    /// Largest representable value
    const MAX: Self;

    /// Convert a small integer constant (percentages, weights) into the metric
    fn from_u8(value: u8) -> Self;

    /// Absolute value; identity for unsigned types
    fn magnitude(self) -> Self;

    /// Addition that reports overflow instead of wrapping
    fn try_add(self, rhs: Self) -> Option<Self>;

    /// Multiplication that reports overflow instead of wrapping
    fn try_mul(self, rhs: Self) -> Option<Self>;
}

macro_rules! unsigned_metric {
    ($($t:ty),*) => {$(
        impl Metric for $t {
            const ZERO: Self = 0;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn from_u8(value: u8) -> Self {
                value as $t
            }

            #[inline]
            fn magnitude(self) -> Self {
                self
            }

            #[inline]
            fn try_add(self, rhs: Self) -> Option<Self> {
                self.checked_add(rhs)
            }

            #[inline]
            fn try_mul(self, rhs: Self) -> Option<Self> {
                self.checked_mul(rhs)
            }
        }
    )*};
}

macro_rules! signed_metric {
    ($($t:ty),*) => {$(
        impl Metric for $t {
            const ZERO: Self = 0;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn from_u8(value: u8) -> Self {
                value as $t
            }

            #[inline]
            fn magnitude(self) -> Self {
                // MIN has no positive counterpart
                self.saturating_abs()
            }

            #[inline]
            fn try_add(self, rhs: Self) -> Option<Self> {
                self.checked_add(rhs)
            }

            #[inline]
            fn try_mul(self, rhs: Self) -> Option<Self> {
                self.checked_mul(rhs)
            }
        }
    )*};
}

unsigned_metric!(u8, u16, u32, u64, u128, usize);
signed_metric!(i8, i16, i32, i64, i128, isize);

impl Metric for f32 {
    const ZERO: Self = 0.0;
    const MAX: Self = f32::MAX;

    #[inline]
    fn from_u8(value: u8) -> Self {
        value as f32
    }

    #[inline]
    fn magnitude(self) -> Self {
        libm::fabsf(self)
    }

    #[inline]
    fn try_add(self, rhs: Self) -> Option<Self> {
        Some(self + rhs).filter(|sum| sum.is_finite())
    }

    #[inline]
    fn try_mul(self, rhs: Self) -> Option<Self> {
        Some(self * rhs).filter(|product| product.is_finite())
    }
}

impl Metric for f64 {
    const ZERO: Self = 0.0;
    const MAX: Self = f64::MAX;

    #[inline]
    fn from_u8(value: u8) -> Self {
        value as f64
    }

    #[inline]
    fn magnitude(self) -> Self {
        libm::fabs(self)
    }

    #[inline]
    fn try_add(self, rhs: Self) -> Option<Self> {
        Some(self + rhs).filter(|sum| sum.is_finite())
    }

    #[inline]
    fn try_mul(self, rhs: Self) -> Option<Self> {
        Some(self * rhs).filter(|product| product.is_finite())
    }
}

#[cfg(feature = "fixed")]
mod fixed_point {
    use super::Metric;
    use fixed::types::extra::LeEqU32;
    use fixed::{FixedI32, FixedU32};

    // Integer constants must fit the integer part; with too few integer
    // bits `from_u8` saturates instead of panicking.

    impl<Frac: LeEqU32> Metric for FixedU32<Frac> {
        const ZERO: Self = Self::from_bits(0);
        const MAX: Self = Self::from_bits(u32::MAX);

        #[inline]
        fn from_u8(value: u8) -> Self {
            Self::saturating_from_num(value)
        }

        #[inline]
        fn magnitude(self) -> Self {
            self
        }

        #[inline]
        fn try_add(self, rhs: Self) -> Option<Self> {
            self.checked_add(rhs)
        }

        #[inline]
        fn try_mul(self, rhs: Self) -> Option<Self> {
            self.checked_mul(rhs)
        }
    }

    impl<Frac: LeEqU32> Metric for FixedI32<Frac> {
        const ZERO: Self = Self::from_bits(0);
        const MAX: Self = Self::from_bits(i32::MAX);

        #[inline]
        fn from_u8(value: u8) -> Self {
            Self::saturating_from_num(value)
        }

        #[inline]
        fn magnitude(self) -> Self {
            self.saturating_abs()
        }

        #[inline]
        fn try_add(self, rhs: Self) -> Option<Self> {
            self.checked_add(rhs)
        }

        #[inline]
        fn try_mul(self, rhs: Self) -> Option<Self> {
            self.checked_mul(rhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_signed_and_unsigned() {
        assert_eq!((-7i32).magnitude(), 7);
        assert_eq!(7u32.magnitude(), 7);
        assert_eq!(i16::MIN.magnitude(), i16::MAX);
        assert_eq!((-2.5f32).magnitude(), 2.5);
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(200u8.try_add(100), None);
        assert_eq!(16u8.try_mul(16), None);
        assert_eq!(10u8.try_mul(10), Some(100));
        assert_eq!(f32::MAX.try_mul(2.0), None);
        assert_eq!(1.5f64.try_add(1.0), Some(2.5));
    }

    #[test]
    fn small_constants() {
        assert_eq!(<u16 as Metric>::from_u8(100), 100u16);
        assert_eq!(<f64 as Metric>::from_u8(3), 3.0);
    }
}
