//! Element trait for mapping Rust types to DType

use super::{DType, Scalar};
use bytemuck::{Pod, Zeroable};
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be elements of an array
///
/// This trait connects Rust's type system to the runtime dtype system.
/// It's implemented for all primitive numeric types.
///
/// # Bounds
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `Add + Sub + Mul + Div` - Arithmetic operations (Output = Self)
/// - `PartialOrd` - Comparison for min/max operations
///
/// Note: `bool` is not `Pod`, so `DType::Bool` is stored as `u8` and has no
/// `Element` impl of its own.
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + PartialOrd
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric operations
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    ///
    /// Integer targets truncate toward zero and saturate at the type bounds
    /// (Rust `as` semantics); NaN becomes zero.
    fn from_f64(v: f64) -> Self;

    /// The exact integer value of an integer element, None for floats
    fn to_int(self) -> Option<i128>;

    /// Convert from an integer
    ///
    /// Integer targets saturate at the type bounds; float targets round to
    /// the nearest representable value.
    fn from_int(v: i128) -> Self;

    /// Convert a [`Scalar`], keeping integers exact where the target allows
    fn from_scalar(v: Scalar) -> Self {
        match v {
            Scalar::Float(f) => Self::from_f64(f),
            Scalar::Int(i) => Self::from_int(i128::from(i)),
            Scalar::UInt(u) => Self::from_int(i128::from(u)),
        }
    }

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;
}

macro_rules! impl_primitive_element {
    (@common $ty:ty, $dtype:ident, $zero:expr, $one:expr) => {
        const DTYPE: DType = DType::$dtype;

        #[inline]
        fn to_f64(self) -> f64 {
            self as f64
        }

        #[inline]
        fn from_f64(v: f64) -> Self {
            v as $ty
        }

        #[inline]
        fn zero() -> Self {
            $zero
        }

        #[inline]
        fn one() -> Self {
            $one
        }
    };
    (ints: [$($ity:ty => $idtype:ident;)+] floats: [$($fty:ty => $fdtype:ident;)+]) => {
        $(
            impl Element for $ity {
                impl_primitive_element!(@common $ity, $idtype, 0, 1);

                #[inline]
                fn to_int(self) -> Option<i128> {
                    Some(self as i128)
                }

                #[inline]
                fn from_int(v: i128) -> Self {
                    v.clamp(<$ity>::MIN as i128, <$ity>::MAX as i128) as $ity
                }
            }
        )+
        $(
            impl Element for $fty {
                impl_primitive_element!(@common $fty, $fdtype, 0.0, 1.0);

                #[inline]
                fn to_int(self) -> Option<i128> {
                    None
                }

                #[inline]
                fn from_int(v: i128) -> Self {
                    v as $fty
                }
            }
        )+
    };
}

impl_primitive_element! {
    ints: [
    i64 => I64;
    i32 => I32;
    i16 => I16;
    i8 => I8;
    u64 => U64;
    u32 => U32;
    u16 => U16;
    u8 => U8;
    ]
    floats: [
    f64 => F64;
    f32 => F32;
    ]
}

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_f64(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }

    #[inline]
    fn to_int(self) -> Option<i128> {
        None
    }

    #[inline]
    fn from_int(v: i128) -> Self {
        half::f16::from_f64(v as f64)
    }

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::f16::ONE
    }
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn to_f64(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }

    #[inline]
    fn to_int(self) -> Option<i128> {
        None
    }

    #[inline]
    fn from_int(v: i128) -> Self {
        half::bf16::from_f64(v as f64)
    }

    #[inline]
    fn zero() -> Self {
        half::bf16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::bf16::ONE
    }
}
