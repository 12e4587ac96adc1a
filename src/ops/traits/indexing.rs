//! Indexing operations trait.

use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Indexing operations
///
/// Slice bounds are NumPy-style optional integers resolved with
/// [`resolve_slices`](crate::ops::resolve_slices); lists shorter than
/// `ndim` leave the trailing axes whole.
pub trait IndexingOps<R: Runtime> {
    /// Copy a strided selection into a new contiguous tensor.
    ///
    /// The result never shares storage with `a`.
    ///
    /// # Arguments
    ///
    /// * `a` - Input tensor
    /// * `begin`, `end`, `step` - Per-axis slice bounds (`None` = default)
    fn strided_slice(
        &self,
        a: &Tensor<R>,
        begin: &[Option<isize>],
        end: &[Option<isize>],
        step: &[Option<isize>],
    ) -> Result<Tensor<R>>;

    /// Write `src` into the strided selection of `dst` in place.
    ///
    /// `src` must already have the selection's shape and `dst`'s dtype.
    fn slice_assign(
        &self,
        dst: &Tensor<R>,
        begin: &[Option<isize>],
        end: &[Option<isize>],
        step: &[Option<isize>],
        src: &Tensor<R>,
    ) -> Result<()>;

    /// Gather sub-tensors addressed by coordinate vectors.
    ///
    /// `indices` is an I64 tensor of shape `(M, *B)`; column `b` of it is a
    /// coordinate into the first `M` axes of `a`. The output has shape
    /// `B + a.shape[M..]`. Coordinates must be non-negative and in bounds.
    fn gather_nd(&self, a: &Tensor<R>, indices: &Tensor<R>) -> Result<Tensor<R>>;

    /// Scatter `src` into `dst` at coordinate vectors, overwriting in place.
    ///
    /// Inverse of [`gather_nd`](Self::gather_nd): `src` has shape
    /// `B + dst.shape[M..]`. Coordinates are written in row-major order of
    /// `B`, so for repeated coordinates the last one wins (no accumulation).
    fn scatter_set_nd(&self, dst: &Tensor<R>, indices: &Tensor<R>, src: &Tensor<R>)
    -> Result<()>;
}
