//! Tensor operations
//!
//! This module defines the storage-engine primitives the array layer is
//! built on, as traits implemented by runtime clients.
//!
//! # Design
//!
//! Operations are defined as traits that are implemented by `RuntimeClient`.
//! This gives operations access to the device and parallelism settings
//! when creating output tensors.
//!
//! ```text
//! RuntimeClient<R>
//!   └── implements ArrayOps<R>
//!         ├── IndexingOps        strided_slice, slice_assign, gather_nd, scatter_set_nd
//!         ├── TypeConversionOps  cast
//!         ├── UtilityOps         fill, fill_into, copy_into, arange
//!         ├── ShapeOps           stack
//!         └── BinaryOps          add, sub, mul, div (broadcasting)
//! ```

mod arithmetic;
#[cfg(feature = "cpu")]
mod cpu;
mod dispatch;
mod indexing;
pub mod traits;

pub use arithmetic::BinaryOp;
pub use indexing::{gather_nd_output_shape, resolve_slice, resolve_slices};
pub use traits::{ArrayOps, BinaryOps, IndexingOps, ShapeOps, TypeConversionOps, UtilityOps};
