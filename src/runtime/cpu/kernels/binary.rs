//! Binary operations kernels

use crate::dtype::Element;
use crate::ops::BinaryOp;

#[inline(always)]
fn apply<T: Element>(op: BinaryOp, a: T, b: T) -> T {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
    }
}

/// Execute a binary operation element-wise
///
/// # Safety
/// - `a`, `b`, and `out` must be valid pointers to `len` elements
/// - `out` must not overlap with `a` or `b` unless they are the same pointer
#[inline]
pub unsafe fn binary_op_kernel<T: Element>(
    op: BinaryOp,
    a: *const T,
    b: *const T,
    out: *mut T,
    len: usize,
) {
    for i in 0..len {
        *out.add(i) = apply(op, *a.add(i), *b.add(i));
    }
}

/// Execute a binary operation with broadcasting support
///
/// Strides of 0 repeat a single value along that dimension. The output is
/// written contiguously in row-major order.
///
/// # Safety
/// - All pointers must be valid for the specified shapes and strides
/// - `out` must not overlap with `a` or `b`
#[inline]
pub unsafe fn binary_op_strided_kernel<T: Element>(
    op: BinaryOp,
    a: *const T,
    b: *const T,
    out: *mut T,
    out_shape: &[usize],
    a_strides: &[isize],
    b_strides: &[isize],
) {
    let ndim = out_shape.len();
    let total = out_shape.iter().product::<usize>();

    if total == 0 {
        return;
    }

    // General strided iteration with incremental offset updates
    // (avoids O(ndim) recalculation per element)
    let mut indices = vec![0usize; ndim];
    let mut a_idx = 0isize;
    let mut b_idx = 0isize;

    for out_idx in 0..total {
        *out.add(out_idx) = apply(op, *a.offset(a_idx), *b.offset(b_idx));

        for dim in (0..ndim).rev() {
            indices[dim] += 1;
            a_idx += a_strides[dim];
            b_idx += b_strides[dim];

            if indices[dim] < out_shape[dim] {
                break;
            }

            // Reset this dimension and adjust offsets
            indices[dim] = 0;
            a_idx -= (out_shape[dim] as isize) * a_strides[dim];
            b_idx -= (out_shape[dim] as isize) * b_strides[dim];
        }
    }
}
