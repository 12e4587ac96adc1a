//! Helper functions for CPU tensor operations
//!
//! This module contains shared helper functions used by operation implementations,
//! organized by functional category.

pub mod binary;
pub mod indexing;
pub mod memory;
pub mod shape;

// Re-export all helper functions
pub use binary::binary_op_impl;
pub use indexing::{gather_nd_impl, scatter_set_nd_impl, slice_assign_impl, strided_slice_impl};
pub use memory::{arange_impl, cast_impl, copy_into_impl, fill_impl, fill_into_impl};
pub use shape::stack_impl;
