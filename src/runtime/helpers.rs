//! Shared helper functions for runtime backends

use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Ensure a tensor is contiguous in memory.
///
/// If the tensor is already contiguous, returns a clone (zero-copy, just
/// increments the Arc refcount). Otherwise, creates a new contiguous copy of
/// the data by materializing the strided view.
///
/// Kernels that walk memory linearly require this.
#[inline]
pub fn ensure_contiguous<R: Runtime>(tensor: &Tensor<R>) -> Result<Tensor<R>> {
    if tensor.is_contiguous() {
        Ok(tensor.clone())
    } else {
        tensor.contiguous()
    }
}
