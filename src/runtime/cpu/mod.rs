//! CPU runtime implementation
//!
//! The CPU runtime uses standard heap allocation and provides the reference
//! implementation for all storage-engine operations.
//!
//! # Broadcasting
//!
//! NumPy-style broadcasting is supported for binary arithmetic operations
//! (add, sub, mul, div). Shapes are broadcast according to standard rules:
//! dimensions are right-aligned and expanded where one operand has size 1.
//!
//! # Non-contiguous Tensors
//!
//! Operations handle non-contiguous tensors via strided memory access. For
//! broadcasting, a strided kernel is used that correctly handles stride-0
//! dimensions (where a single value is broadcast across the dimension).

mod client;
mod device;
pub(crate) mod helpers;
pub(crate) mod kernels;
mod runtime;

pub use crate::tensor::Tensor;
pub use client::{CpuClient, ParallelismConfig};
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
