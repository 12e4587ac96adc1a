//! Operation traits for tensor operations.
//!
//! This module contains trait definitions for the storage-engine primitives.
//! Implementations are in the backend-specific modules (cpu/).

mod binary;
mod indexing;
mod shape;
mod type_conversion;
mod utility;

pub use binary::BinaryOps;
pub use indexing::IndexingOps;
pub use shape::ShapeOps;
pub use type_conversion::TypeConversionOps;
pub use utility::UtilityOps;

use crate::runtime::{Runtime, RuntimeClient};

/// Every primitive the array layer needs from a backend client
///
/// Implemented automatically for any client that implements the individual
/// operation traits.
pub trait ArrayOps<R: Runtime>:
    RuntimeClient<R>
    + IndexingOps<R>
    + TypeConversionOps<R>
    + UtilityOps<R>
    + ShapeOps<R>
    + BinaryOps<R>
{
}

impl<R, C> ArrayOps<R> for C
where
    R: Runtime,
    C: RuntimeClient<R>
        + IndexingOps<R>
        + TypeConversionOps<R>
        + UtilityOps<R>
        + ShapeOps<R>
        + BinaryOps<R>,
{
}
