//! Indexing kernels (gather_nd/scatter_set_nd)
//!
//! Index tensors use the `(M, *B)` layout: coordinate `d` of index vector
//! `j` lives at `indices[d * num + j]`, where `num = prod(B)`.

/// Row-major element strides of `shape[..m]` within a contiguous tensor
fn leading_strides(shape: &[usize], m: usize) -> Vec<usize> {
    let mut strides = vec![0usize; m];
    let mut stride: usize = shape[m..].iter().product();
    for d in (0..m).rev() {
        strides[d] = stride;
        stride *= shape[d];
    }
    strides
}

#[inline]
unsafe fn element_offset(indices: *const i64, strides: &[usize], num: usize, j: usize) -> usize {
    let mut offset = 0usize;
    for (d, &stride) in strides.iter().enumerate() {
        offset += *indices.add(d * num + j) as usize * stride;
    }
    offset
}

/// Gather sub-tensors by coordinate vectors into a contiguous output
///
/// # Arguments
/// * `src` - Contiguous source data
/// * `src_shape` - Source shape
/// * `indices` - I64 coordinates, `m` rows of `num` entries
/// * `out` - Output buffer of `num * prod(src_shape[m..])` elements
///
/// # Safety
/// - every coordinate must be within `[0, src_shape[d])`
/// - all pointers must be valid for the sizes above
pub unsafe fn gather_nd_kernel(
    src: *const u8,
    src_shape: &[usize],
    indices: *const i64,
    m: usize,
    num: usize,
    out: *mut u8,
    elem_size: usize,
) {
    let strides = leading_strides(src_shape, m);
    let chunk: usize = src_shape[m..].iter().product::<usize>() * elem_size;
    if chunk == 0 {
        return;
    }

    for j in 0..num {
        let offset = element_offset(indices, &strides, num, j) * elem_size;
        std::ptr::copy_nonoverlapping(src.add(offset), out.add(j * chunk), chunk);
    }
}

/// Overwrite sub-tensors of `dst` addressed by coordinate vectors
///
/// Index vectors are applied in order, so the last write to a repeated
/// coordinate is the one that survives.
///
/// # Safety
/// - every coordinate must be within `[0, dst_shape[d])`
/// - `dst` must be contiguous and must not overlap `src`
pub unsafe fn scatter_set_nd_kernel(
    dst: *mut u8,
    dst_shape: &[usize],
    indices: *const i64,
    m: usize,
    num: usize,
    src: *const u8,
    elem_size: usize,
) {
    let strides = leading_strides(dst_shape, m);
    let chunk: usize = dst_shape[m..].iter().product::<usize>() * elem_size;
    if chunk == 0 {
        return;
    }

    for j in 0..num {
        let offset = element_offset(indices, &strides, num, j) * elem_size;
        std::ptr::copy_nonoverlapping(src.add(j * chunk), dst.add(offset), chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_pairs() {
        // 3x3 matrix, coordinates (0, 2) and (1, 0)
        let src: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let indices = [0i64, 1, 2, 0];
        let mut out = [0.0f32; 2];
        unsafe {
            gather_nd_kernel(
                src.as_ptr() as *const u8,
                &[3, 3],
                indices.as_ptr(),
                2,
                2,
                out.as_mut_ptr() as *mut u8,
                4,
            );
        }
        assert_eq!(out, [2.0, 3.0]);
    }

    #[test]
    fn test_scatter_rows_last_writer_wins() {
        let mut dst = [0i64; 6];
        let indices = [0i64, 0];
        let src = [1i64, 1, 1, 2, 2, 2];
        unsafe {
            scatter_set_nd_kernel(
                dst.as_mut_ptr() as *mut u8,
                &[2, 3],
                indices.as_ptr(),
                1,
                2,
                src.as_ptr() as *const u8,
                8,
            );
        }
        assert_eq!(dst, [2, 2, 2, 0, 0, 0]);
    }
}
