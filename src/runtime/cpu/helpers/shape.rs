//! Shape operation helpers for CPU tensors

use super::super::{CpuClient, CpuRuntime};
use super::memory::copy_view_into;
use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Stack tensors of identical shape and dtype along a new dimension
pub fn stack_impl(
    client: &CpuClient,
    tensors: &[&Tensor<CpuRuntime>],
    dim: isize,
) -> Result<Tensor<CpuRuntime>> {
    let Some(first) = tensors.first() else {
        return Err(Error::InvalidArgument {
            arg: "tensors",
            reason: "stack requires at least one tensor".into(),
        });
    };

    for t in &tensors[1..] {
        if t.shape() != first.shape() {
            return Err(Error::shape_mismatch(first.shape(), t.shape()));
        }
        if t.dtype() != first.dtype() {
            return Err(Error::DTypeMismatch {
                lhs: first.dtype(),
                rhs: t.dtype(),
            });
        }
    }

    let ndim = first.ndim();
    let d = if dim < 0 { dim + ndim as isize + 1 } else { dim };
    if d < 0 || d as usize > ndim {
        return Err(Error::InvalidDimension { dim, ndim: ndim + 1 });
    }
    let d = d as usize;

    let mut out_shape = first.shape().to_vec();
    out_shape.insert(d, tensors.len());
    let out = Tensor::<CpuRuntime>::try_empty(&out_shape, first.dtype(), &client.device)?;

    for (i, t) in tensors.iter().enumerate() {
        let slot = out.narrow(d as isize, i, 1)?.squeeze(Some(&[d]))?;
        copy_view_into(t, &slot);
    }
    Ok(out)
}
