//! Shape operations trait.

use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Shape operations that allocate new tensors
pub trait ShapeOps<R: Runtime> {
    /// Stack tensors of identical shape along a new dimension
    ///
    /// `dim` may be negative and ranges over `-(ndim + 1)..=ndim`.
    fn stack(&self, tensors: &[&Tensor<R>], dim: isize) -> Result<Tensor<R>>;
}
