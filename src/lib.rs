//! # npindex
//!
//! **NumPy-compatible n-dimensional arrays with zero-copy views and fancy indexing.**
//!
//! npindex layers a NumPy-style [`NdArray`](array::NdArray) over a small
//! tensor storage engine. Its focus is the indexing subsystem: deciding for
//! every key whether a read or write can be served by a view into existing
//! storage, or needs a gather/scatter into freshly allocated memory.
//!
//! ## Features
//!
//! - **Basic indexing**: integers, slices with steps, new axes and ellipsis;
//!   contiguous selections are zero-copy views
//! - **Advanced indexing**: integer arrays mixed with slices and integers,
//!   broadcast into one gather/scatter index tensor
//! - **Assignment**: scalars, arrays and nested host data, cast and
//!   broadcast to the selection
//! - **Multiple dtypes**: f64, f32, f16, bf16, integers, bool
//!
//! ## Quick Start
//!
//! ```rust
//! use npindex::idx;
//! use npindex::prelude::*;
//!
//! # fn main() -> npindex::error::Result<()> {
//! let client = CpuRuntime::default_client(&CpuDevice::new());
//! let a = NdArray::<CpuRuntime>::arange(0.0, 9.0, 1.0, DType::F32, &client)?.reshape(&[3, 3])?;
//!
//! let picked = a.index_get(idx![vec![0, 1], vec![2, 0]])?;
//! assert_eq!(picked.to_vec::<f32>()?, vec![2.0, 3.0]);
//!
//! a.index_set(idx![.., NewAxis, 0], 7.0)?;
//! assert_eq!(a.index_get(idx![2, 0])?.item::<f32>()?, 7.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): Multi-threaded CPU operations
//! - `f16`: Half-precision floats (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod array;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Build an [`IndexKey`](array::IndexKey) from selector expressions
///
/// Each argument is converted with `Selector::from`: integers, ranges
/// (`a..b`, `a..`, `..b`, `..`), [`SliceSpec`](array::SliceSpec) values,
/// [`NewAxis`](array::NewAxis), [`Ellipsis`](array::Ellipsis), integer
/// vectors and arrays, and index `NdArray`s. `idx![]` is the empty key `()`.
///
/// ```
/// use npindex::idx;
/// use npindex::prelude::*;
///
/// let key: IndexKey<CpuRuntime> = idx![1, .., NewAxis, SliceSpec::full().with_step(-1)];
/// assert_eq!(key.to_string(), "(1, :, None, ::-1)");
/// ```
#[macro_export]
macro_rules! idx {
    () => {
        $crate::array::IndexKey::empty()
    };
    ($($sel:expr),+ $(,)?) => {
        $crate::array::IndexKey::new(vec![$($crate::array::Selector::from($sel)),+])
    };
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::array::{
        ArrayLike, Ellipsis, IndexArray, IndexKey, NEW_AXIS, NdArray, NewAxis, Selector,
        SliceSpec, Value,
    };
    pub use crate::dtype::{DType, Scalar};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::ops::{
        ArrayOps, BinaryOps, IndexingOps, ShapeOps, TypeConversionOps, UtilityOps,
    };
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
    pub use crate::tensor::{Layout, Tensor};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime, ParallelismConfig};
}
