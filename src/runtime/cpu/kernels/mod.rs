//! CPU kernel implementations
//!
//! This module provides low-level compute kernels for CPU operations.
//! Data-movement kernels work on raw bytes so every dtype shares them;
//! arithmetic kernels are generic over `T: Element`.

#![allow(unsafe_op_in_unsafe_fn)] // Kernels are already marked unsafe, inner unsafe is redundant

pub mod binary;
pub mod index;
pub mod memory;

pub use binary::{binary_op_kernel, binary_op_strided_kernel};
pub use index::{gather_nd_kernel, scatter_set_nd_kernel};
pub use memory::{arange_kernel, cast_kernel, copy_strided_kernel, fill_kernel};
