//! CPU implementation of shape operations.

use crate::error::Result;
use crate::ops::ShapeOps;
use crate::runtime::cpu::{CpuClient, CpuRuntime, helpers::stack_impl};
use crate::tensor::Tensor;

/// ShapeOps implementation for CPU runtime.
impl ShapeOps<CpuRuntime> for CpuClient {
    fn stack(&self, tensors: &[&Tensor<CpuRuntime>], dim: isize) -> Result<Tensor<CpuRuntime>> {
        stack_impl(self, tensors, dim)
    }
}
