//! DType dispatch utilities
//!
//! This module provides the `dispatch_dtype!` macro for runtime type dispatch
//! in CPU operations. It converts from the `DType` enum to a concrete Rust
//! type bound in a code block.
//!
//! # Usage
//!
//! ```ignore
//! fn my_operation(dtype: DType) -> Result<usize> {
//!     dispatch_dtype!(dtype, T => {
//!         // T is now a concrete type (f32, f64, i32, etc.)
//!         Ok(std::mem::size_of::<T>())
//!     }, "my_operation")
//! }
//! ```
//!
//! ## Supported Types
//!
//! - `F64` -> `f64`, `F32` -> `f32`
//! - `F16` -> `half::f16`, `BF16` -> `half::bf16` (requires "f16" feature)
//! - `I64`..`I8` -> `i64`..`i8`, `U64`..`U8` -> `u64`..`u8`
//! - `Bool` -> Returns `UnsupportedDType` error (use [`dispatch_storage!`] for
//!   operations that only move or compare bytes)

/// Internal helper macro to dispatch types requiring the "f16" feature.
#[macro_export]
#[doc(hidden)]
macro_rules! dispatch_f16_type {
    ($T:ident, $body:block, $dtype:expr, $error_op:expr, $type:ty) => {{
        #[cfg(feature = "f16")]
        {
            type $T = $type;
            $body
        }
        #[cfg(not(feature = "f16"))]
        {
            Err($crate::error::Error::unsupported_dtype($dtype, $error_op))
        }
    }};
}

/// Macro for runtime dtype dispatch to typed numeric operations.
///
/// The body must evaluate to a `Result`; unsupported dtypes produce
/// `Error::UnsupportedDType`.
#[macro_export]
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                $crate::dispatch_f16_type!($T, $body, $dtype, $error_op, half::f16)
            }
            $crate::dtype::DType::BF16 => {
                $crate::dispatch_f16_type!($T, $body, $dtype, $error_op, half::bf16)
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::Bool => Err($crate::error::Error::unsupported_dtype(
                $dtype, $error_op,
            )),
        }
    };
}

/// Like [`dispatch_dtype!`], but treats `Bool` as its `u8` storage type
///
/// Suitable for kernels that only need a numeric representation of each
/// element, such as fill or cast, where the caller normalizes booleans.
#[macro_export]
macro_rules! dispatch_storage {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = u8;
                $body
            }
            other => $crate::dispatch_dtype!(other, $T => $body, $error_op),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::dtype::DType;
    use crate::error::{Error, Result};

    fn elem_size(dtype: DType) -> Result<usize> {
        dispatch_dtype!(dtype, T => { Ok(std::mem::size_of::<T>()) }, "elem_size")
    }

    fn storage_size(dtype: DType) -> Result<usize> {
        dispatch_storage!(dtype, T => { Ok(std::mem::size_of::<T>()) }, "storage_size")
    }

    #[test]
    fn test_dispatch_sizes_match_dtype() {
        for dtype in [DType::F64, DType::F32, DType::I64, DType::I16, DType::U8] {
            assert_eq!(elem_size(dtype).unwrap(), dtype.size_in_bytes());
        }
    }

    #[test]
    fn test_dispatch_bool() {
        assert!(matches!(
            elem_size(DType::Bool),
            Err(Error::UnsupportedDType { .. })
        ));
        assert_eq!(storage_size(DType::Bool).unwrap(), 1);
    }
}
