//! Core Tensor type

use super::layout::AxisSlice;
use super::{Layout, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::{Device, Runtime};
use std::fmt;

/// N-dimensional array stored on a compute device
///
/// `Tensor` is the storage-engine handle underneath every `NdArray`. It
/// consists of:
/// - **Storage**: Reference-counted device memory
/// - **Layout**: Shape, strides, and offset defining the view into storage
/// - **DType**: Element type (determined at runtime)
///
/// # Zero-Copy Views
///
/// `flat_slice`, `reshape`, `broadcast_to` and friends create new tensors
/// that share the same underlying storage. This is achieved through:
/// - Arc-wrapped storage (reference counting)
/// - Modified layout (different strides/offset)
///
/// # Example
///
/// ```
/// use npindex::prelude::*;
///
/// let device = CpuDevice::new();
/// let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[4], &device);
/// let b = a.flat_slice(1, 3).unwrap(); // Zero-copy, shares storage with a
/// assert!(b.shares_storage(&a));
/// ```
pub struct Tensor<R: Runtime> {
    /// Device memory
    storage: Storage<R>,
    /// Shape, strides, offset
    layout: Layout,
}

impl<R: Runtime> Tensor<R> {
    /// Create a tensor from storage and layout
    pub fn from_parts(storage: Storage<R>, layout: Layout) -> Self {
        Self { storage, layout }
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_slice(data, shape, device).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions,
    /// or if memory allocation fails.
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let storage = Storage::from_slice(data, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor from raw little-endian element bytes with explicit dtype
    pub fn try_from_bytes(
        data: &[u8],
        shape: &[usize],
        dtype: DType,
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product::<usize>() * dtype.size_in_bytes();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len() / dtype.size_in_bytes()],
            });
        }

        let storage = Storage::from_bytes(data, dtype, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create an uninitialized tensor
    ///
    /// The CPU runtime zero-fills new allocations, but callers must not rely
    /// on the contents.
    pub fn empty(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::try_empty(shape, dtype, device).expect("Tensor::empty failed")
    }

    /// Create an uninitialized tensor (fallible version)
    pub fn try_empty(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len: usize = shape.iter().product();
        let storage = Storage::new(len, dtype, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Check if the tensor is contiguous in memory
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    /// Device address of the first element of this view
    ///
    /// Kernels receive this rather than the raw storage pointer so that
    /// offset views are addressed correctly.
    #[inline]
    pub fn data_ptr(&self) -> u64 {
        if self.storage.ptr() == 0 {
            return 0;
        }
        self.storage.ptr() + (self.layout.offset() * self.dtype().size_in_bytes()) as u64
    }

    /// True if both tensors view the same allocation
    #[inline]
    pub fn shares_storage(&self, other: &Self) -> bool {
        self.storage.same_buffer(&other.storage)
    }

    // ===== View Operations (Zero-Copy) =====

    fn with_layout(&self, layout: Layout) -> Self {
        Self {
            storage: self.storage.clone(),
            layout,
        }
    }

    /// Transpose two dimensions (zero-copy)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let new_layout =
            self.layout
                .transpose(dim0, dim1)
                .ok_or_else(|| Error::InvalidDimension {
                    dim: dim0,
                    ndim: self.ndim(),
                })?;

        Ok(self.with_layout(new_layout))
    }

    /// Reshape to a new shape (zero-copy, requires a contiguous layout)
    ///
    /// Fails with `ShapeMismatch` if the element count differs and with
    /// `NotContiguous` if no view with the new shape exists.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let new_count: usize = shape.iter().product();
        if new_count != self.numel() {
            return Err(Error::shape_mismatch(self.shape(), shape));
        }
        let new_layout = self.layout.reshape(shape).ok_or(Error::NotContiguous)?;
        Ok(self.with_layout(new_layout))
    }

    /// Flatten to 1D (zero-copy if contiguous)
    pub fn flatten(&self) -> Result<Self> {
        self.reshape(&[self.numel()])
    }

    /// View the flat element range `[begin, end)` of a contiguous tensor
    ///
    /// The result is 1-dimensional and shares storage with `self`.
    pub fn flat_slice(&self, begin: usize, end: usize) -> Result<Self> {
        if !self.is_contiguous() {
            return Err(Error::NotContiguous);
        }
        if begin > end || end > self.numel() {
            return Err(Error::InvalidArgument {
                arg: "end",
                reason: format!(
                    "flat range [{begin}, {end}) outside tensor of {} elements",
                    self.numel()
                ),
            });
        }
        let layout = Layout::contiguous_at(&[end - begin], self.layout.offset() + begin);
        Ok(self.with_layout(layout))
    }

    /// Apply one resolved selection per axis (zero-copy strided view)
    pub fn slice_view(&self, axes: &[AxisSlice]) -> Result<Self> {
        let new_layout = self
            .layout
            .slice(axes)
            .ok_or_else(|| Error::InvalidIndex {
                reason: format!("slice selection {axes:?} outside shape {:?}", self.shape()),
            })?;
        Ok(self.with_layout(new_layout))
    }

    /// Remove size-1 dimensions (all of them when `axes` is None)
    pub fn squeeze(&self, axes: Option<&[usize]>) -> Result<Self> {
        let new_layout = self
            .layout
            .squeeze(axes)
            .ok_or_else(|| Error::InvalidArgument {
                arg: "axes",
                reason: format!(
                    "cannot squeeze axes {:?} of shape {:?}",
                    axes.unwrap_or(&[]),
                    self.shape()
                ),
            })?;
        Ok(self.with_layout(new_layout))
    }

    /// Add a dimension of size 1
    pub fn unsqueeze(&self, dim: isize) -> Result<Self> {
        let new_layout = self
            .layout
            .unsqueeze(dim)
            .ok_or_else(|| Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;

        Ok(self.with_layout(new_layout))
    }

    /// Narrow a dimension (zero-copy slice)
    pub fn narrow(&self, dim: isize, start: usize, length: usize) -> Result<Self> {
        let dim_idx = self
            .layout
            .normalize_dim(dim)
            .ok_or(Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;

        let new_layout =
            self.layout
                .narrow(dim_idx, start, length)
                .ok_or_else(|| Error::ShapeMismatch {
                    expected: vec![self.shape()[dim_idx]],
                    got: vec![start, length],
                })?;

        Ok(self.with_layout(new_layout))
    }

    /// Broadcast to a target shape (zero-copy)
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let new_layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::broadcast(self.shape(), shape))?;

        Ok(self.with_layout(new_layout))
    }

    /// Make tensor contiguous (copy if needed)
    ///
    /// If the tensor is already contiguous, returns a view (zero-copy).
    /// Otherwise, allocates new storage and copies the data to a contiguous
    /// layout with `Runtime::copy_strided`.
    pub fn contiguous(&self) -> Result<Self> {
        if self.is_contiguous() {
            return Ok(self.clone());
        }

        let dtype = self.dtype();
        let device = self.storage.device();
        let out = Self::try_empty(self.shape(), dtype, device)?;

        let elem_size = dtype.size_in_bytes();
        R::copy_strided(
            self.storage.ptr(),
            self.layout.offset() * elem_size,
            out.storage.ptr(),
            self.shape(),
            self.strides(),
            elem_size,
            device,
        )?;

        Ok(out)
    }

    /// Move the tensor to another device
    ///
    /// Returns a zero-copy clone when `device` is the tensor's own device.
    pub fn to_device(&self, device: &R::Device) -> Result<Self> {
        if self.device().is_same(device) {
            return Ok(self.clone());
        }
        let bytes = self.to_bytes()?;
        Self::try_from_bytes(&bytes, self.shape(), self.dtype(), device)
    }

    // ===== Data Access =====

    /// Copy the viewed elements to host memory as raw bytes (row-major)
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let src = self.contiguous()?;
        let mut bytes = vec![0u8; src.numel() * src.dtype().size_in_bytes()];
        R::copy_from_device(src.data_ptr(), &mut bytes, src.device())?;
        Ok(bytes)
    }

    /// Copy tensor data to a Vec on the host (row-major order)
    ///
    /// `T` must have the same size as the tensor's element type; use `u8`
    /// for boolean tensors.
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Result<Vec<T>> {
        if std::mem::size_of::<T>() != self.dtype().size_in_bytes() {
            return Err(Error::InvalidArgument {
                arg: "T",
                reason: format!(
                    "element size {} does not match dtype {}",
                    std::mem::size_of::<T>(),
                    self.dtype()
                ),
            });
        }

        let src = self.contiguous()?;
        // Allocate with correct alignment for T, then cast to bytes for copy.
        let mut result = vec![T::zeroed(); src.numel()];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        R::copy_from_device(src.data_ptr(), bytes, src.device())?;
        Ok(result)
    }

    /// Extract the scalar value from a single-element tensor
    pub fn item<T: bytemuck::Pod>(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: self.shape().to_vec(),
            });
        }
        let values = self.to_vec::<T>()?;
        Ok(values[0])
    }
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("offset", &self.layout.offset())
            .field("contiguous", &self.is_contiguous())
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::{CpuDevice, CpuRuntime};

    #[test]
    fn test_flat_slice_shares_storage() {
        let device = CpuDevice::new();
        let t = Tensor::<CpuRuntime>::from_slice(&[0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0], &[2, 3], &device);
        let s = t.flatten().unwrap().flat_slice(2, 5).unwrap();
        assert!(s.shares_storage(&t));
        assert_eq!(s.layout().offset(), 2);
        assert_eq!(s.to_vec::<f32>().unwrap(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_contiguous_materializes_strided_view() {
        let device = CpuDevice::new();
        let t = Tensor::<CpuRuntime>::from_slice(&[1i32, 2, 3, 4, 5, 6], &[2, 3], &device);
        let tt = t.transpose(0, 1).unwrap();
        assert!(!tt.is_contiguous());
        let c = tt.contiguous().unwrap();
        assert!(!c.shares_storage(&t));
        assert_eq!(c.to_vec::<i32>().unwrap(), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_reshape_errors() {
        let device = CpuDevice::new();
        let t = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2], &device);
        assert!(matches!(t.reshape(&[3]), Err(Error::ShapeMismatch { .. })));
        let tt = t.transpose(0, 1).unwrap();
        assert!(matches!(tt.reshape(&[4]), Err(Error::NotContiguous)));
    }

    #[test]
    fn test_to_device_same_device_is_view() {
        let device = CpuDevice::new();
        let t = Tensor::<CpuRuntime>::from_slice(&[1u8, 2], &[2], &device);
        assert!(t.to_device(&device).unwrap().shares_storage(&t));
        let other = CpuDevice::with_id(1);
        let moved = t.to_device(&other).unwrap();
        assert!(!moved.shares_storage(&t));
        assert_eq!(moved.to_vec::<u8>().unwrap(), vec![1, 2]);
    }
}
