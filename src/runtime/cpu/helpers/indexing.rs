//! Indexing operation helpers for CPU tensors

use super::super::kernels;
use super::super::{CpuClient, CpuRuntime};
use super::memory::{copy_view_into, detach_from};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::ops::{gather_nd_output_shape, resolve_slices};
use crate::runtime::ensure_contiguous;
use crate::tensor::Tensor;

pub fn strided_slice_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    begin: &[Option<isize>],
    end: &[Option<isize>],
    step: &[Option<isize>],
) -> Result<Tensor<CpuRuntime>> {
    let axes = resolve_slices(a.shape(), begin, end, step)?;
    let view = a.slice_view(&axes)?;
    let out = Tensor::<CpuRuntime>::try_empty(view.shape(), a.dtype(), &client.device)?;
    copy_view_into(&view, &out);
    Ok(out)
}

pub fn slice_assign_impl(
    client: &CpuClient,
    dst: &Tensor<CpuRuntime>,
    begin: &[Option<isize>],
    end: &[Option<isize>],
    step: &[Option<isize>],
    src: &Tensor<CpuRuntime>,
) -> Result<()> {
    let axes = resolve_slices(dst.shape(), begin, end, step)?;
    let view = dst.slice_view(&axes)?;
    if src.shape() != view.shape() {
        return Err(Error::shape_mismatch(view.shape(), src.shape()));
    }
    if src.dtype() != dst.dtype() {
        return Err(Error::DTypeMismatch {
            lhs: dst.dtype(),
            rhs: src.dtype(),
        });
    }

    let src = detach_from(client, src, dst)?;
    copy_view_into(&src, &view);
    Ok(())
}

/// Read an I64 `(M, *B)` index tensor and check every coordinate
///
/// Returns the host copy of the coordinates together with `M` and `prod(B)`.
fn checked_indices(
    indices: &Tensor<CpuRuntime>,
    shape: &[usize],
) -> Result<(Vec<i64>, usize, usize)> {
    if indices.dtype() != DType::I64 {
        return Err(Error::DTypeMismatch {
            lhs: DType::I64,
            rhs: indices.dtype(),
        });
    }
    // Validates the (M, *B) layout against `shape`
    gather_nd_output_shape(shape, indices.shape())?;

    let m = indices.shape()[0];
    let num: usize = indices.shape()[1..].iter().product();
    let coords = ensure_contiguous(indices)?.to_vec::<i64>()?;

    for d in 0..m {
        let size = shape[d];
        for &coord in &coords[d * num..(d + 1) * num] {
            if coord < 0 || coord as usize >= size {
                return Err(Error::IndexOutOfBounds {
                    index: coord,
                    axis: d,
                    size,
                });
            }
        }
    }
    Ok((coords, m, num))
}

pub fn gather_nd_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    indices: &Tensor<CpuRuntime>,
) -> Result<Tensor<CpuRuntime>> {
    let out_shape = gather_nd_output_shape(a.shape(), indices.shape())?;
    let (coords, m, num) = checked_indices(indices, a.shape())?;

    let out = Tensor::<CpuRuntime>::try_empty(&out_shape, a.dtype(), &client.device)?;
    if out.numel() == 0 {
        return Ok(out);
    }

    let a_contig = ensure_contiguous(a)?;
    unsafe {
        kernels::gather_nd_kernel(
            a_contig.data_ptr() as *const u8,
            a.shape(),
            coords.as_ptr(),
            m,
            num,
            out.data_ptr() as *mut u8,
            a.dtype().size_in_bytes(),
        );
    }
    Ok(out)
}

pub fn scatter_set_nd_impl(
    client: &CpuClient,
    dst: &Tensor<CpuRuntime>,
    indices: &Tensor<CpuRuntime>,
    src: &Tensor<CpuRuntime>,
) -> Result<()> {
    if !dst.is_contiguous() {
        return Err(Error::NotContiguous);
    }
    if src.dtype() != dst.dtype() {
        return Err(Error::DTypeMismatch {
            lhs: dst.dtype(),
            rhs: src.dtype(),
        });
    }
    let expected = gather_nd_output_shape(dst.shape(), indices.shape())?;
    if src.shape() != expected.as_slice() {
        return Err(Error::shape_mismatch(&expected, src.shape()));
    }
    let (coords, m, num) = checked_indices(indices, dst.shape())?;
    if src.numel() == 0 {
        return Ok(());
    }

    let src = ensure_contiguous(&detach_from(client, src, dst)?)?;
    unsafe {
        kernels::scatter_set_nd_kernel(
            dst.data_ptr() as *mut u8,
            dst.shape(),
            coords.as_ptr(),
            m,
            num,
            src.data_ptr() as *const u8,
            dst.dtype().size_in_bytes(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::runtime::cpu::CpuDevice;

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);
        (device, client)
    }

    #[test]
    fn test_strided_slice_copies() {
        let (device, client) = setup();
        let data: Vec<f32> = (0..20).map(|v| v as f32).collect();
        let a = Tensor::<CpuRuntime>::from_slice(&data, &[4, 5], &device);
        let out = strided_slice_impl(&client, &a, &[Some(1), None], &[Some(3), None], &[None, Some(2)])
            .unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert!(!out.shares_storage(&a));
        assert_eq!(out.to_vec::<f32>().unwrap(), vec![5.0, 7.0, 9.0, 10.0, 12.0, 14.0]);
    }

    #[test]
    fn test_slice_assign_reversed() {
        let (device, client) = setup();
        let a = Tensor::<CpuRuntime>::from_slice(&[0i32; 5], &[5], &device);
        let src = Tensor::<CpuRuntime>::from_slice(&[1i32, 2, 3], &[3], &device);
        slice_assign_impl(&client, &a, &[None], &[None], &[Some(-2)], &src).unwrap();
        assert_eq!(a.to_vec::<i32>().unwrap(), vec![3, 0, 2, 0, 1]);
    }

    #[test]
    fn test_gather_nd_rows() {
        let (device, client) = setup();
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2], &device);
        let idx = Tensor::<CpuRuntime>::from_slice(&[2i64, 0], &[1, 2], &device);
        let out = gather_nd_impl(&client, &a, &idx).unwrap();
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.to_vec::<f64>().unwrap(), vec![5.0, 6.0, 1.0, 2.0]);
    }

    #[test]
    fn test_gather_nd_rejects_out_of_bounds() {
        let (device, client) = setup();
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0], &[2], &device);
        let idx = Tensor::<CpuRuntime>::from_slice(&[2i64], &[1, 1], &device);
        assert!(matches!(
            gather_nd_impl(&client, &a, &idx),
            Err(Error::IndexOutOfBounds { index: 2, axis: 0, size: 2 })
        ));
    }

    #[test]
    fn test_scatter_set_nd_shape_check() {
        let (device, client) = setup();
        let a = Tensor::<CpuRuntime>::from_slice(&[0.0f32; 6], &[2, 3], &device);
        let idx = Tensor::<CpuRuntime>::from_slice(&[1i64], &[1, 1], &device);
        let bad = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0], &[1, 2], &device);
        assert!(matches!(
            scatter_set_nd_impl(&client, &a, &idx, &bad),
            Err(Error::ShapeMismatch { .. })
        ));
        let good = Tensor::<CpuRuntime>::from_slice(&[7.0f32, 8.0, 9.0], &[1, 3], &device);
        scatter_set_nd_impl(&client, &a, &idx, &good).unwrap();
        assert_eq!(a.to_vec::<f32>().unwrap(), vec![0.0, 0.0, 0.0, 7.0, 8.0, 9.0]);
    }
}
