//! Binary operation helpers for CPU tensors

use super::super::kernels;
use super::super::{CpuClient, CpuRuntime};
use crate::dispatch_dtype;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::ops::BinaryOp;
use crate::tensor::{Tensor, broadcast_shapes};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Helper for binary operations (add, sub, mul, div)
pub fn binary_op_impl(
    client: &CpuClient,
    op: BinaryOp,
    a: &Tensor<CpuRuntime>,
    b: &Tensor<CpuRuntime>,
) -> Result<Tensor<CpuRuntime>> {
    if a.dtype() != b.dtype() {
        return Err(Error::DTypeMismatch {
            lhs: a.dtype(),
            rhs: b.dtype(),
        });
    }
    let dtype = a.dtype();
    if dtype == DType::Bool {
        return Err(Error::unsupported_dtype(dtype, op.name()));
    }
    let out_shape =
        broadcast_shapes(a.shape(), b.shape()).ok_or_else(|| Error::broadcast(a.shape(), b.shape()))?;

    let out = Tensor::<CpuRuntime>::try_empty(&out_shape, dtype, &client.device)?;
    let len = out.numel();
    if len == 0 {
        return Ok(out);
    }
    let out_ptr = out.data_ptr();

    // Check if we can use the fast path (same shapes, both contiguous)
    let same_shapes = a.shape() == b.shape() && a.shape() == out_shape.as_slice();
    let both_contiguous = a.is_contiguous() && b.is_contiguous();

    if same_shapes && both_contiguous {
        let a_ptr = a.data_ptr();
        let b_ptr = b.data_ptr();

        dispatch_dtype!(dtype, T => {
            #[cfg(feature = "rayon")]
            {
                let min_len = client.rayon_min_len();
                if len > min_len {
                    log::trace!("{}: {len} elements in chunks of {min_len}", op.name());
                    let chunks = len.div_ceil(min_len);
                    client.install_parallelism(|| {
                        (0..chunks).into_par_iter().for_each(|c| unsafe {
                            let start = c * min_len;
                            let n = min_len.min(len - start);
                            kernels::binary_op_kernel::<T>(
                                op,
                                (a_ptr as *const T).add(start),
                                (b_ptr as *const T).add(start),
                                (out_ptr as *mut T).add(start),
                                n,
                            );
                        });
                    });
                    return Ok(out);
                }
            }

            unsafe {
                kernels::binary_op_kernel::<T>(
                    op,
                    a_ptr as *const T,
                    b_ptr as *const T,
                    out_ptr as *mut T,
                    len,
                );
            }
            Ok(())
        }, op.name())?;
    } else {
        // Broadcast both inputs to output shape (zero-copy views with stride 0 for broadcast dims)
        let a_broadcast = a.broadcast_to(&out_shape)?;
        let b_broadcast = b.broadcast_to(&out_shape)?;
        let a_ptr = a_broadcast.data_ptr();
        let b_ptr = b_broadcast.data_ptr();

        dispatch_dtype!(dtype, T => {
            unsafe {
                kernels::binary_op_strided_kernel::<T>(
                    op,
                    a_ptr as *const T,
                    b_ptr as *const T,
                    out_ptr as *mut T,
                    &out_shape,
                    a_broadcast.strides(),
                    b_broadcast.strides(),
                );
            }
            Ok(())
        }, op.name())?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::runtime::cpu::{CpuDevice, ParallelismConfig};

    #[test]
    fn test_broadcast_column() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0], &[2, 1], &device);
        let b = Tensor::<CpuRuntime>::from_slice(&[10.0f32, 20.0, 30.0], &[3], &device);
        let out = binary_op_impl(&client, BinaryOp::Mul, &a, &b).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(
            out.to_vec::<f32>().unwrap(),
            vec![10.0, 20.0, 30.0, 20.0, 40.0, 60.0]
        );
    }

    #[test]
    fn test_parallel_path() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device)
            .with_parallelism(ParallelismConfig::new(Some(2), Some(8)));
        let data: Vec<i32> = (0..100).collect();
        let a = Tensor::<CpuRuntime>::from_slice(&data, &[100], &device);
        let out = binary_op_impl(&client, BinaryOp::Add, &a, &a).unwrap();
        let expected: Vec<i32> = (0..100).map(|v| v * 2).collect();
        assert_eq!(out.to_vec::<i32>().unwrap(), expected);
    }

    #[test]
    fn test_dtype_mismatch() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32], &[1], &device);
        let b = Tensor::<CpuRuntime>::from_slice(&[1.0f64], &[1], &device);
        assert!(matches!(
            binary_op_impl(&client, BinaryOp::Sub, &a, &b),
            Err(Error::DTypeMismatch { .. })
        ));
    }
}
