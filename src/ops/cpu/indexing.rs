//! CPU implementation of indexing operations.

use crate::error::Result;
use crate::ops::IndexingOps;
use crate::runtime::cpu::{
    CpuClient, CpuRuntime,
    helpers::{gather_nd_impl, scatter_set_nd_impl, slice_assign_impl, strided_slice_impl},
};
use crate::tensor::Tensor;

/// IndexingOps implementation for CPU runtime.
impl IndexingOps<CpuRuntime> for CpuClient {
    fn strided_slice(
        &self,
        a: &Tensor<CpuRuntime>,
        begin: &[Option<isize>],
        end: &[Option<isize>],
        step: &[Option<isize>],
    ) -> Result<Tensor<CpuRuntime>> {
        strided_slice_impl(self, a, begin, end, step)
    }

    fn slice_assign(
        &self,
        dst: &Tensor<CpuRuntime>,
        begin: &[Option<isize>],
        end: &[Option<isize>],
        step: &[Option<isize>],
        src: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        slice_assign_impl(self, dst, begin, end, step, src)
    }

    fn gather_nd(
        &self,
        a: &Tensor<CpuRuntime>,
        indices: &Tensor<CpuRuntime>,
    ) -> Result<Tensor<CpuRuntime>> {
        gather_nd_impl(self, a, indices)
    }

    fn scatter_set_nd(
        &self,
        dst: &Tensor<CpuRuntime>,
        indices: &Tensor<CpuRuntime>,
        src: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        scatter_set_nd_impl(self, dst, indices, src)
    }
}
