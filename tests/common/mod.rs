//! Common test utilities
#![allow(dead_code)]

use npindex::array::NdArray;
use npindex::dtype::DType;
use npindex::runtime::Runtime;
use npindex::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

/// Install the test logger once per binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    init_logging();
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// f32 array holding 0, 1, 2, ... in row-major order
pub fn iota(shape: &[usize]) -> NdArray<CpuRuntime> {
    let (client, _) = create_cpu_client();
    let n: usize = shape.iter().product();
    let data: Vec<f32> = (0..n).map(|v| v as f32).collect();
    NdArray::from_slice(&data, shape, &client).expect("iota")
}

/// f32 zeros
pub fn zeros(shape: &[usize]) -> NdArray<CpuRuntime> {
    let (client, _) = create_cpu_client();
    NdArray::zeros(shape, DType::F32, &client).expect("zeros")
}

/// Row-major values of an f32 array
pub fn values(a: &NdArray<CpuRuntime>) -> Vec<f32> {
    a.to_vec::<f32>().expect("to_vec")
}
