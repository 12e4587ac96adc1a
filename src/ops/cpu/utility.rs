//! CPU implementation of utility operations.

use crate::dtype::{DType, Scalar};
use crate::error::Result;
use crate::ops::UtilityOps;
use crate::runtime::cpu::{
    CpuClient, CpuRuntime,
    helpers::{arange_impl, copy_into_impl, fill_impl, fill_into_impl},
};
use crate::tensor::Tensor;

/// UtilityOps implementation for CPU runtime.
impl UtilityOps<CpuRuntime> for CpuClient {
    fn fill(&self, shape: &[usize], value: Scalar, dtype: DType) -> Result<Tensor<CpuRuntime>> {
        fill_impl(self, shape, value, dtype)
    }

    fn fill_into(&self, dst: &Tensor<CpuRuntime>, value: Scalar) -> Result<()> {
        fill_into_impl(self, dst, value)
    }

    fn copy_into(&self, src: &Tensor<CpuRuntime>, dst: &Tensor<CpuRuntime>) -> Result<()> {
        copy_into_impl(self, src, dst)
    }

    fn arange(
        &self,
        start: f64,
        stop: f64,
        step: f64,
        dtype: DType,
    ) -> Result<Tensor<CpuRuntime>> {
        arange_impl(self, start, stop, step, dtype)
    }
}
