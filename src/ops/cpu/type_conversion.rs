//! CPU implementation of type conversion operations.

use crate::dtype::DType;
use crate::error::Result;
use crate::ops::TypeConversionOps;
use crate::runtime::cpu::{CpuClient, CpuRuntime, helpers::cast_impl};
use crate::tensor::Tensor;

/// TypeConversionOps implementation for CPU runtime.
impl TypeConversionOps<CpuRuntime> for CpuClient {
    fn cast(&self, a: &Tensor<CpuRuntime>, dtype: DType) -> Result<Tensor<CpuRuntime>> {
        cast_impl(self, a, dtype)
    }
}
