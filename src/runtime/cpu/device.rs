//! CPU device implementation

use crate::runtime::Device;

/// CPU device
///
/// All CPU devices share host memory, but distinct ids model distinct
/// contexts: moving an array between them produces an independent copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuDevice {
    id: usize,
}

impl CpuDevice {
    /// Create the default CPU device (`cpu(0)`)
    pub fn new() -> Self {
        Self { id: 0 }
    }

    /// Create a CPU device with an explicit context id
    pub fn with_id(id: usize) -> Self {
        Self { id }
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        format!("cpu({})", self.id)
    }
}
