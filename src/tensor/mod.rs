//! Tensor types and operations
//!
//! This module provides the core `Tensor` type, which represents an n-dimensional
//! array stored on a compute device, together with its `Storage` and `Layout`.

mod core;
mod layout;
mod storage;

pub use core::Tensor;
pub use layout::{AxisSlice, Layout, Shape, Strides, broadcast_shapes};
pub use storage::Storage;
