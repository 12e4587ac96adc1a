//! Utility operations trait.

use crate::dtype::{DType, Scalar};
use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Creation and copy utilities
pub trait UtilityOps<R: Runtime> {
    /// Create a tensor filled with `value` (converted to `dtype`)
    ///
    /// Integer scalars are written exactly when `dtype` can hold them.
    fn fill(&self, shape: &[usize], value: Scalar, dtype: DType) -> Result<Tensor<R>>;

    /// Overwrite every element of `dst` with `value` in place
    fn fill_into(&self, dst: &Tensor<R>, value: Scalar) -> Result<()>;

    /// Element-wise copy of `src` into `dst` (same shape and dtype)
    ///
    /// `src` may be any strided view, including broadcasts. When `src` and
    /// `dst` are the same view the copy is skipped with a warning.
    fn copy_into(&self, src: &Tensor<R>, dst: &Tensor<R>) -> Result<()>;

    /// Evenly spaced values in `[start, stop)`
    fn arange(&self, start: f64, stop: f64, step: f64, dtype: DType) -> Result<Tensor<R>>;
}
