//! Type conversion operations trait.

use crate::dtype::DType;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Type conversion operations
pub trait TypeConversionOps<R: Runtime> {
    /// Cast tensor to a different data type
    ///
    /// Returns a new contiguous tensor with elements converted to `dtype`.
    /// Float-to-integer conversion truncates toward zero and saturates;
    /// conversion to `Bool` maps non-zero values to `true`. When `dtype`
    /// already matches, the input is returned as a view.
    fn cast(&self, a: &Tensor<R>, dtype: DType) -> Result<Tensor<R>>;
}
