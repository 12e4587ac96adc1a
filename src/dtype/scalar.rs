//! Dtype-independent scalar values

use std::fmt;

/// A single number that has not been given a dtype yet
///
/// Integers are kept integral so that writing them into an integer array
/// is exact beyond the 53-bit range of `f64`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Floating-point value
    Float(f64),
    /// Signed integer
    Int(i64),
    /// Unsigned integer too large for `Int`
    UInt(u64),
}

impl Scalar {
    /// True for floats
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// True unless the value is zero
    pub fn is_nonzero(self) -> bool {
        match self {
            Self::Float(v) => v != 0.0,
            Self::Int(v) => v != 0,
            Self::UInt(v) => v != 0,
        }
    }

    /// Nearest `f64`
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Float(v) => v,
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::UInt(v), Self::Int)
    }
}

impl From<usize> for Scalar {
    fn from(v: usize) -> Self {
        Self::from(v as u64)
    }
}

macro_rules! impl_signed_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_signed_scalar!(i64, i32, i16, i8, u32, u16, u8);

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_prefers_int() {
        assert_eq!(Scalar::from(5u64), Scalar::Int(5));
        assert_eq!(Scalar::from(u64::MAX), Scalar::UInt(u64::MAX));
        assert_eq!(Scalar::from(true), Scalar::Int(1));
    }

    #[test]
    fn test_nonzero() {
        assert!(Scalar::from(-0.5).is_nonzero());
        assert!(!Scalar::from(0u8).is_nonzero());
    }
}
