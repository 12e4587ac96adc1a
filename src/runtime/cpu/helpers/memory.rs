//! Fill, copy, cast and arange helpers for CPU tensors

use super::super::kernels;
use super::super::{CpuClient, CpuRuntime};
use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::runtime::ensure_contiguous;
use crate::tensor::Tensor;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Copy every element of `src` into the view `dst` (same shape and dtype)
///
/// Callers must rule out overlapping storage first.
pub(crate) fn copy_view_into(src: &Tensor<CpuRuntime>, dst: &Tensor<CpuRuntime>) {
    if dst.numel() == 0 {
        return;
    }
    unsafe {
        kernels::copy_strided_kernel(
            src.data_ptr() as *const u8,
            src.strides(),
            dst.data_ptr() as *mut u8,
            dst.strides(),
            dst.shape(),
            dst.dtype().size_in_bytes(),
        );
    }
}

/// Copy `src` into freshly allocated contiguous storage, even if it is
/// already contiguous
pub(crate) fn deep_copy(
    client: &CpuClient,
    src: &Tensor<CpuRuntime>,
) -> Result<Tensor<CpuRuntime>> {
    let out = Tensor::<CpuRuntime>::try_empty(src.shape(), src.dtype(), &client.device)?;
    copy_view_into(src, &out);
    Ok(out)
}

/// Materialize `src` so it can be read while `dst` is written
pub(crate) fn detach_from(
    client: &CpuClient,
    src: &Tensor<CpuRuntime>,
    dst: &Tensor<CpuRuntime>,
) -> Result<Tensor<CpuRuntime>> {
    if src.shares_storage(dst) {
        deep_copy(client, src)
    } else {
        Ok(src.clone())
    }
}

fn check_same_dtype(a: &Tensor<CpuRuntime>, b: &Tensor<CpuRuntime>) -> Result<()> {
    if a.dtype() != b.dtype() {
        return Err(Error::DTypeMismatch {
            lhs: a.dtype(),
            rhs: b.dtype(),
        });
    }
    Ok(())
}

pub fn fill_impl(
    client: &CpuClient,
    shape: &[usize],
    value: Scalar,
    dtype: DType,
) -> Result<Tensor<CpuRuntime>> {
    let out = Tensor::<CpuRuntime>::try_empty(shape, dtype, &client.device)?;
    fill_into_impl(client, &out, value)?;
    Ok(out)
}

pub fn fill_into_impl(client: &CpuClient, dst: &Tensor<CpuRuntime>, value: Scalar) -> Result<()> {
    let len = dst.numel();
    if len == 0 {
        return Ok(());
    }
    if !dst.is_contiguous() {
        let filled = fill_impl(client, dst.shape(), value, dst.dtype())?;
        copy_view_into(&filled, dst);
        return Ok(());
    }

    let dtype = dst.dtype();
    let value = if dtype == DType::Bool {
        Scalar::from(value.is_nonzero())
    } else {
        value
    };
    let out_ptr = dst.data_ptr();

    crate::dispatch_storage!(dtype, T => {
        let v = T::from_scalar(value);

        #[cfg(feature = "rayon")]
        {
            let min_len = client.rayon_min_len();
            if len > min_len {
                log::trace!("fill: {len} elements in chunks of {min_len}");
                let out = unsafe { std::slice::from_raw_parts_mut(out_ptr as *mut T, len) };
                client.install_parallelism(|| {
                    out.par_chunks_mut(min_len).for_each(|chunk| chunk.fill(v));
                });
                return Ok(());
            }
        }

        unsafe { kernels::fill_kernel::<T>(out_ptr as *mut T, v, len) };
        Ok(())
    }, "fill")
}

pub fn copy_into_impl(
    client: &CpuClient,
    src: &Tensor<CpuRuntime>,
    dst: &Tensor<CpuRuntime>,
) -> Result<()> {
    if src.shape() != dst.shape() {
        return Err(Error::shape_mismatch(dst.shape(), src.shape()));
    }
    check_same_dtype(dst, src)?;

    if src.shares_storage(dst) && src.layout() == dst.layout() {
        log::warn!("copy_into: source and destination are the same view, skipping copy");
        return Ok(());
    }

    let src = detach_from(client, src, dst)?;
    copy_view_into(&src, dst);
    Ok(())
}

pub fn cast_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    dtype: DType,
) -> Result<Tensor<CpuRuntime>> {
    if a.dtype() == dtype {
        return Ok(a.clone());
    }

    let a_contig = ensure_contiguous(a)?;
    let out = Tensor::<CpuRuntime>::try_empty(a.shape(), dtype, &client.device)?;
    unsafe {
        kernels::cast_kernel(
            a_contig.data_ptr() as *const u8,
            out.data_ptr() as *mut u8,
            a.numel(),
            a.dtype(),
            dtype,
        )?;
    }
    Ok(out)
}

pub fn arange_impl(
    client: &CpuClient,
    start: f64,
    stop: f64,
    step: f64,
    dtype: DType,
) -> Result<Tensor<CpuRuntime>> {
    let len = kernels::memory::arange_len(start, stop, step)?;
    let out = Tensor::<CpuRuntime>::try_empty(&[len], dtype, &client.device)?;
    if len == 0 {
        return Ok(out);
    }

    let out_ptr = out.data_ptr();
    crate::dispatch_dtype!(dtype, T => {
        unsafe { kernels::arange_kernel::<T>(out_ptr as *mut T, start, step, len) };
        Ok(())
    }, "arange")?;
    Ok(out)
}
