//! Trait for device identification

/// Trait for device identification
///
/// Two handles with the same id address the same memory space; moving an
/// array between them is a no-op.
pub trait Device: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}
