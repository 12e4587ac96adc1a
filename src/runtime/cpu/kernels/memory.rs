//! Memory operation kernels (fill, strided copy, cast, arange)

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};

/// Fill buffer with a constant value
///
/// # Safety
/// - `out` must be a valid pointer to `len` elements
#[inline]
pub unsafe fn fill_kernel<T: Element>(out: *mut T, value: T, len: usize) {
    let out_slice = std::slice::from_raw_parts_mut(out, len);
    out_slice.fill(value);
}

/// Copy a strided view into another strided view, element by element
///
/// Both sides are walked in row-major order of `shape`. Strides are in
/// elements and may be zero (broadcast source) or negative.
///
/// # Safety
/// - `src` and `dst` must be valid for every address reached by their strides
/// - the two regions must not overlap unless they are identical views
#[inline]
pub unsafe fn copy_strided_kernel(
    src: *const u8,
    src_strides: &[isize],
    dst: *mut u8,
    dst_strides: &[isize],
    shape: &[usize],
    elem_size: usize,
) {
    let ndim = shape.len();
    let total: usize = shape.iter().product();
    if total == 0 {
        return;
    }

    let es = elem_size as isize;
    let mut indices = vec![0usize; ndim];
    let mut s_idx = 0isize;
    let mut d_idx = 0isize;

    for _ in 0..total {
        std::ptr::copy_nonoverlapping(src.offset(s_idx * es), dst.offset(d_idx * es), elem_size);

        for dim in (0..ndim).rev() {
            indices[dim] += 1;
            s_idx += src_strides[dim];
            d_idx += dst_strides[dim];
            if indices[dim] < shape[dim] {
                break;
            }
            indices[dim] = 0;
            s_idx -= shape[dim] as isize * src_strides[dim];
            d_idx -= shape[dim] as isize * dst_strides[dim];
        }
    }
}

/// Converts one element of a known source type into the destination buffer
macro_rules! cast_into {
    ($src_slice:expr, $dst:expr, $len:expr, $dst_dtype:expr) => {{
        let src_slice = $src_slice;
        if $dst_dtype == DType::Bool {
            let dst_slice = std::slice::from_raw_parts_mut($dst, $len);
            for (d, s) in dst_slice.iter_mut().zip(src_slice) {
                *d = u8::from(s.to_f64() != 0.0);
            }
            Ok(())
        } else {
            crate::dispatch_dtype!($dst_dtype, D => {
                let dst_slice = std::slice::from_raw_parts_mut($dst as *mut D, $len);
                for (d, s) in dst_slice.iter_mut().zip(src_slice) {
                    *d = match s.to_int() {
                        Some(i) => D::from_int(i),
                        None => D::from_f64(s.to_f64()),
                    };
                }
                Ok(())
            }, "cast")
        }
    }};
}

/// Cast tensor data from one dtype to another.
///
/// Integer sources convert exactly (saturating at integer targets' bounds);
/// float sources go through f64. Booleans are read as 0/1 and written as
/// `value != 0`.
///
/// # Safety
/// - `src` must be valid pointer to `len` elements of `src_dtype`
/// - `dst` must be valid pointer to `len` elements of `dst_dtype`
/// - `src` and `dst` must not overlap
pub unsafe fn cast_kernel(
    src: *const u8,
    dst: *mut u8,
    len: usize,
    src_dtype: DType,
    dst_dtype: DType,
) -> Result<()> {
    if len == 0 {
        return Ok(());
    }
    if src_dtype == DType::Bool {
        let src_slice = std::slice::from_raw_parts(src, len);
        return cast_into!(src_slice, dst, len, dst_dtype);
    }

    crate::dispatch_dtype!(src_dtype, S => {
        let src_slice = std::slice::from_raw_parts(src as *const S, len);
        cast_into!(src_slice, dst, len, dst_dtype)
    }, "cast")
}

/// Fill `out` with `start, start + step, ...` for `len` elements
///
/// # Safety
/// - `out` must be a valid pointer to `len` elements
#[inline]
pub unsafe fn arange_kernel<T: Element>(out: *mut T, start: f64, step: f64, len: usize) {
    let out_slice = std::slice::from_raw_parts_mut(out, len);
    for (i, v) in out_slice.iter_mut().enumerate() {
        *v = T::from_f64(start + step * i as f64);
    }
}

/// Number of elements produced by `arange(start, stop, step)`
pub fn arange_len(start: f64, stop: f64, step: f64) -> Result<usize> {
    if step == 0.0 || !step.is_finite() {
        return Err(Error::InvalidArgument {
            arg: "step",
            reason: format!("arange step must be finite and non-zero, got {step}"),
        });
    }
    let n = ((stop - start) / step).ceil();
    Ok(if n > 0.0 { n as usize } else { 0 })
}
