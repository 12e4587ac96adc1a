//! NumPy-compatible arrays with zero-copy views and fancy indexing
//!
//! [`NdArray`] wraps a C-contiguous [`Tensor`] together with the client that
//! runs its operations and a writable flag. Indexing follows NumPy:
//!
//! - keys of integers, slices and [`NewAxis`] are *basic*; a selection that
//!   forms one run of flat offsets is returned as a view sharing storage,
//!   anything else is copied
//! - keys containing integer arrays are *advanced* and always produce a new
//!   array via gather; writes scatter with last-writer-wins semantics
//!
//! ```
//! use npindex::prelude::*;
//! use npindex::idx;
//!
//! # fn main() -> npindex::error::Result<()> {
//! let client = CpuRuntime::default_client(&CpuDevice::new());
//! let a = NdArray::<CpuRuntime>::zeros(&[4, 5], DType::F32, &client)?;
//!
//! let rows = a.index_get(idx![1..3, ..])?;
//! assert!(rows.shares_storage_with(&a));
//! rows.fill_with(1.0)?;
//! assert_eq!(a.index_get(idx![2, 0])?.item::<f32>()?, 1.0);
//!
//! let strided = a.index_get(idx![1..3, SliceSpec::full().with_step(2)])?;
//! assert_eq!(strided.shape(), &[2, 3]);
//! assert!(!strided.shares_storage_with(&a));
//! # Ok(())
//! # }
//! ```

mod advanced;
mod basic;
mod dispatch;
mod key;
mod value;

pub use dispatch::{DispatchCode, classify};
pub use key::{Ellipsis, IndexArray, IndexKey, NEW_AXIS, NewAxis, Selector, SliceSpec};
pub use value::{ArrayLike, Value};

use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::ops::{ArrayOps, BinaryOp, BinaryOps, TypeConversionOps, UtilityOps};
use crate::runtime::{Device, Runtime, RuntimeClient};
use crate::tensor::Tensor;
use std::fmt;
use value::{prepare_value, value_to_tensor};

/// N-dimensional array with NumPy indexing semantics
///
/// Cloning is cheap and yields another handle to the same storage.
pub struct NdArray<R: Runtime> {
    tensor: Tensor<R>,
    client: R::Client,
    writable: bool,
}

impl<R: Runtime> NdArray<R> {
    /// Array of the same client and writability around another tensor
    pub(crate) fn derive(&self, tensor: Tensor<R>) -> Self {
        Self {
            tensor,
            client: self.client.clone(),
            writable: self.writable,
        }
    }

    /// Dimension sizes
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.tensor.ndim()
    }

    /// Number of elements
    #[inline]
    pub fn size(&self) -> usize {
        self.tensor.numel()
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.tensor.dtype()
    }

    /// Device holding the data
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.tensor.device()
    }

    /// Whether writes through this handle are allowed
    #[inline]
    pub fn writable(&self) -> bool {
        self.writable
    }

    /// Underlying storage-engine tensor
    #[inline]
    pub fn tensor(&self) -> &Tensor<R> {
        &self.tensor
    }

    /// Client running this array's operations
    #[inline]
    pub fn client(&self) -> &R::Client {
        &self.client
    }

    /// True if both arrays view the same buffer
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.tensor.shares_storage(&other.tensor)
    }

    /// Copy the elements to the host in row-major order
    ///
    /// `T` must match the element size; boolean arrays read as `u8`.
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Result<Vec<T>> {
        self.tensor.to_vec()
    }

    /// The single element of a one-element array
    pub fn item<T: bytemuck::Pod>(&self) -> Result<T> {
        self.tensor.item()
    }

    /// Allow or forbid writes through this handle
    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    /// Run subsequent operations on `client`
    pub fn with_client(mut self, client: R::Client) -> Self {
        self.client = client;
        self
    }

    fn check_writable(&self, op: &'static str) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(Error::ReadOnly { op })
        }
    }
}

impl<R: Runtime> NdArray<R>
where
    R::Client: ArrayOps<R>,
{
    // ===== Construction =====

    /// Wrap a tensor, copying it first if it is not C-contiguous
    pub fn from_tensor(tensor: Tensor<R>, client: &R::Client) -> Result<Self> {
        let tensor = if tensor.is_contiguous() {
            tensor
        } else {
            tensor.contiguous()?
        };
        Ok(Self {
            tensor,
            client: client.clone(),
            writable: true,
        })
    }

    /// Uninitialized array
    pub fn empty(shape: &[usize], dtype: DType, client: &R::Client) -> Result<Self> {
        Self::from_tensor(Tensor::try_empty(shape, dtype, client.device())?, client)
    }

    /// Array filled with `value`
    pub fn full(
        shape: &[usize],
        value: impl Into<Scalar>,
        dtype: DType,
        client: &R::Client,
    ) -> Result<Self> {
        Self::from_tensor(client.fill(shape, value.into(), dtype)?, client)
    }

    /// Array of zeros
    pub fn zeros(shape: &[usize], dtype: DType, client: &R::Client) -> Result<Self> {
        Self::full(shape, 0.0, dtype, client)
    }

    /// Array of ones
    pub fn ones(shape: &[usize], dtype: DType, client: &R::Client) -> Result<Self> {
        Self::full(shape, 1.0, dtype, client)
    }

    /// Array from row-major host data
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], client: &R::Client) -> Result<Self> {
        Self::from_tensor(Tensor::try_from_slice(data, shape, client.device())?, client)
    }

    /// Array from nested host data, converted to `dtype`
    pub fn from_array_like(
        value: impl Into<ArrayLike>,
        dtype: DType,
        client: &R::Client,
    ) -> Result<Self> {
        let value = Value::Nested(value.into());
        Self::from_tensor(value_to_tensor(client, &value, dtype)?, client)
    }

    /// Evenly spaced values in `[start, stop)`
    pub fn arange(start: f64, stop: f64, step: f64, dtype: DType, client: &R::Client) -> Result<Self> {
        Self::from_tensor(client.arange(start, stop, step, dtype)?, client)
    }

    // ===== Indexing =====

    /// `self[key]`
    ///
    /// Basic keys addressing one flat run of elements return a view that
    /// shares storage with `self`; other basic keys and all advanced keys
    /// return a new array. The empty key returns a view of the whole array.
    pub fn index_get(&self, key: IndexKey<R>) -> Result<Self> {
        if key.is_empty() {
            return Ok(self.clone());
        }
        if self.ndim() == 0 {
            return Err(scalar_key_error(&key));
        }

        let entries = key::normalize(key.into_selectors(), self.ndim())?;
        match classify(&entries) {
            DispatchCode::Basic => basic::get(self, &entries),
            DispatchCode::Advanced => advanced::get(self, &entries),
            DispatchCode::Unsupported => Err(Error::UnsupportedKey {
                key: key::render(&entries),
            }),
        }
    }

    /// `self[key] = value`
    ///
    /// The value is cast to this array's dtype, moved to its device and
    /// broadcast to the selection. Advanced keys with repeated positions
    /// keep the last value written.
    pub fn index_set<'v>(&self, key: IndexKey<R>, value: impl Into<Value<'v, R>>) -> Result<()>
    where
        R: 'v,
    {
        self.check_writable("assign to")?;
        let value = value.into();

        if self.ndim() == 0 {
            if !key.is_empty() {
                return Err(scalar_key_error(&key));
            }
            return self.set_scalar(&value);
        }

        let entries = key::normalize(key.into_selectors(), self.ndim())?;
        match classify(&entries) {
            DispatchCode::Basic => basic::set(self, &entries, &value),
            DispatchCode::Advanced => advanced::set(self, &entries, &value),
            DispatchCode::Unsupported => Err(Error::UnsupportedKey {
                key: key::render(&entries),
            }),
        }
    }

    fn set_scalar(&self, value: &Value<'_, R>) -> Result<()> {
        if let Value::Scalar(v) = value {
            return self.client.fill_into(&self.tensor, *v);
        }
        let src = value_to_tensor(&self.client, value, self.dtype())?;
        if src.numel() != 1 {
            log::debug!("rejecting value of shape {:?} for a 0-d array", src.shape());
            return Err(Error::ShapeMismatch {
                expected: Vec::new(),
                got: src.shape().to_vec(),
            });
        }
        self.client.copy_into(&src.reshape(&[])?, &self.tensor)
    }

    // ===== Shape =====

    /// Array with a new shape holding the same elements
    ///
    /// A view when possible. Empty arrays get fresh storage.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        if self.size() == 0 {
            let count: usize = shape.iter().product();
            if count != 0 {
                return Err(Error::shape_mismatch(self.shape(), shape));
            }
            return Ok(self.derive(Tensor::try_empty(shape, self.dtype(), self.device())?));
        }
        match self.tensor.reshape(shape) {
            Ok(view) => Ok(self.derive(view)),
            Err(Error::NotContiguous) => {
                Ok(self.derive(self.tensor.contiguous()?.reshape(shape)?))
            }
            Err(err) => Err(err),
        }
    }

    /// Zero-copy reshape; fails if no view with `shape` exists
    pub fn reshape_view(&self, shape: &[usize]) -> Result<Self> {
        Ok(self.derive(self.tensor.reshape(shape)?))
    }

    /// One-dimensional view of all elements
    pub fn flatten(&self) -> Result<Self> {
        self.reshape(&[self.size()])
    }

    /// Remove size-1 axes (all of them when `axes` is None)
    pub fn squeeze(&self, axes: Option<&[usize]>) -> Result<Self> {
        Ok(self.derive(self.tensor.squeeze(axes)?))
    }

    /// Insert a size-1 axis at `axis`
    pub fn expand_dims(&self, axis: isize) -> Result<Self> {
        Ok(self.derive(self.tensor.unsqueeze(axis)?))
    }

    /// Copy broadcast to `shape`
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let view = self.tensor.broadcast_to(shape)?;
        let out = Tensor::try_empty(shape, self.dtype(), self.device())?;
        self.client.copy_into(&view, &out)?;
        Ok(self.derive(out))
    }

    /// Copy with the axis order reversed
    pub fn t(&self) -> Result<Self> {
        let ndim = self.ndim() as isize;
        let mut view = self.tensor.clone();
        for d in 0..ndim / 2 {
            view = view.transpose(d, ndim - 1 - d)?;
        }
        Ok(self.derive(view.contiguous()?))
    }

    // ===== Conversion and copies =====

    /// Array converted to `dtype`
    ///
    /// Without `copy`, an array that already has `dtype` is returned as is.
    pub fn astype(&self, dtype: DType, copy: bool) -> Result<Self> {
        if !copy && dtype == self.dtype() {
            return Ok(self.clone());
        }
        if dtype == self.dtype() {
            return self.copy();
        }
        Ok(self.derive(self.client.cast(&self.tensor, dtype)?))
    }

    /// Independent copy
    pub fn copy(&self) -> Result<Self> {
        let out = Tensor::try_empty(self.shape(), self.dtype(), self.device())?;
        self.client.copy_into(&self.tensor, &out)?;
        Ok(self.derive(out))
    }

    /// Copy all elements into `dst`, casting to its dtype
    ///
    /// Copying an array onto itself is a no-op.
    pub fn copyto(&self, dst: &Self) -> Result<()> {
        if self.shares_storage_with(dst) && self.tensor.layout() == dst.tensor.layout() {
            log::warn!("copyto: source and destination are the same array, skipping");
            return Ok(());
        }
        dst.check_writable("copy into")?;
        if self.shape() != dst.shape() {
            return Err(Error::shape_mismatch(dst.shape(), self.shape()));
        }

        let moved = self.tensor.to_device(dst.device())?;
        let src = dst.client.cast(&moved, dst.dtype())?;
        dst.client.copy_into(&src, &dst.tensor)
    }

    /// Array on `device` (the array itself if it is already there)
    pub fn to_device(&self, device: &R::Device) -> Result<Self> {
        if self.device().is_same(device) {
            return Ok(self.clone());
        }
        Ok(Self {
            tensor: self.tensor.to_device(device)?,
            client: R::default_client(device),
            writable: self.writable,
        })
    }

    /// Overwrite every element with `value`
    pub fn fill_with(&self, value: impl Into<Scalar>) -> Result<()> {
        self.check_writable("fill")?;
        self.client.fill_into(&self.tensor, value.into())
    }

    // ===== Arithmetic =====

    fn binary<'v>(&self, op: BinaryOp, rhs: Value<'v, R>) -> Result<Tensor<R>>
    where
        R: 'v,
    {
        let rhs = value_to_tensor(&self.client, &rhs, self.dtype())?;
        match op {
            BinaryOp::Add => self.client.add(&self.tensor, &rhs),
            BinaryOp::Sub => self.client.sub(&self.tensor, &rhs),
            BinaryOp::Mul => self.client.mul(&self.tensor, &rhs),
            BinaryOp::Div => self.client.div(&self.tensor, &rhs),
        }
    }

    fn binary_assign<'v>(&self, op: BinaryOp, rhs: Value<'v, R>) -> Result<()>
    where
        R: 'v,
    {
        self.check_writable(op.name())?;
        let rhs = prepare_value(&self.client, &rhs, self.shape(), &[], self.dtype())?;
        let result = match op {
            BinaryOp::Add => self.client.add(&self.tensor, &rhs)?,
            BinaryOp::Sub => self.client.sub(&self.tensor, &rhs)?,
            BinaryOp::Mul => self.client.mul(&self.tensor, &rhs)?,
            BinaryOp::Div => self.client.div(&self.tensor, &rhs)?,
        };
        self.client.copy_into(&result, &self.tensor)
    }

    /// `self + rhs` with broadcasting
    pub fn add<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<Self>
    where
        R: 'v,
    {
        Ok(self.derive(self.binary(BinaryOp::Add, rhs.into())?))
    }

    /// `self - rhs` with broadcasting
    pub fn sub<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<Self>
    where
        R: 'v,
    {
        Ok(self.derive(self.binary(BinaryOp::Sub, rhs.into())?))
    }

    /// `self * rhs` with broadcasting
    pub fn mul<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<Self>
    where
        R: 'v,
    {
        Ok(self.derive(self.binary(BinaryOp::Mul, rhs.into())?))
    }

    /// `self / rhs` with broadcasting
    pub fn div<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<Self>
    where
        R: 'v,
    {
        Ok(self.derive(self.binary(BinaryOp::Div, rhs.into())?))
    }

    /// `self += rhs`; `rhs` must broadcast to `self.shape()`
    pub fn add_assign<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<()>
    where
        R: 'v,
    {
        self.binary_assign(BinaryOp::Add, rhs.into())
    }

    /// `self -= rhs`
    pub fn sub_assign<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<()>
    where
        R: 'v,
    {
        self.binary_assign(BinaryOp::Sub, rhs.into())
    }

    /// `self *= rhs`
    pub fn mul_assign<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<()>
    where
        R: 'v,
    {
        self.binary_assign(BinaryOp::Mul, rhs.into())
    }

    /// `self /= rhs`
    pub fn div_assign<'v>(&self, rhs: impl Into<Value<'v, R>>) -> Result<()>
    where
        R: 'v,
    {
        self.binary_assign(BinaryOp::Div, rhs.into())
    }
}

fn scalar_key_error<R: Runtime>(key: &IndexKey<R>) -> Error {
    Error::InvalidIndex {
        reason: format!("a 0-d array can only be indexed with (), got {key}"),
    }
}

impl<R: Runtime> Clone for NdArray<R> {
    fn clone(&self) -> Self {
        self.derive(self.tensor.clone())
    }
}

impl<R: Runtime> fmt::Debug for NdArray<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("writable", &self.writable)
            .finish()
    }
}

impl<R: Runtime> fmt::Display for NdArray<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array(shape={:?}, dtype={})", self.shape(), self.dtype())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idx;
    use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn client() -> CpuClient {
        CpuRuntime::default_client(&CpuDevice::new())
    }

    fn iota(shape: &[usize]) -> NdArray<CpuRuntime> {
        let n: usize = shape.iter().product();
        let data: Vec<f32> = (0..n).map(|v| v as f32).collect();
        NdArray::from_slice(&data, shape, &client()).unwrap()
    }

    #[test]
    fn test_empty_key_returns_view() {
        let a = iota(&[2, 3]);
        let b = a.index_get(idx![]).unwrap();
        assert!(b.shares_storage_with(&a));
        assert_eq!(b.shape(), &[2, 3]);
    }

    #[test]
    fn test_scalar_array_keys() {
        let s = NdArray::<CpuRuntime>::full(&[], 3.0, DType::F64, &client()).unwrap();
        assert_eq!(s.index_get(idx![]).unwrap().item::<f64>().unwrap(), 3.0);
        assert!(matches!(s.index_get(idx![0]), Err(Error::InvalidIndex { .. })));

        s.index_set(idx![], 5).unwrap();
        assert_eq!(s.item::<f64>().unwrap(), 5.0);
        s.index_set(idx![], vec![vec![7.0]]).unwrap();
        assert_eq!(s.item::<f64>().unwrap(), 7.0);
        let err = s.index_set(idx![], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Shape);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut a = iota(&[3]);
        a.set_writable(false);
        assert!(matches!(a.index_set(idx![0], 1.0), Err(Error::ReadOnly { .. })));
        assert!(matches!(a.fill_with(0.0), Err(Error::ReadOnly { .. })));
        assert!(matches!(a.add_assign(1.0), Err(Error::ReadOnly { .. })));
        let view = a.index_get(idx![..2]).unwrap();
        assert!(!view.writable());
        assert!(matches!(iota(&[3]).copyto(&a), Err(Error::ReadOnly { .. })));
    }

    #[test]
    fn test_reshape_and_views() {
        let a = iota(&[2, 3]);
        let r = a.reshape(&[3, 2]).unwrap();
        assert!(r.shares_storage_with(&a));
        assert!(a.reshape(&[4]).is_err());
        assert_eq!(a.expand_dims(0).unwrap().shape(), &[1, 2, 3]);
        assert_eq!(a.expand_dims(0).unwrap().squeeze(None).unwrap().shape(), &[2, 3]);

        let t = a.t().unwrap();
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.to_vec::<f32>().unwrap(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_astype_and_copyto() {
        let a = iota(&[3]);
        assert!(a.astype(DType::F32, false).unwrap().shares_storage_with(&a));
        assert!(!a.astype(DType::F32, true).unwrap().shares_storage_with(&a));
        let b = a.astype(DType::I32, false).unwrap();
        assert_eq!(b.to_vec::<i32>().unwrap(), vec![0, 1, 2]);

        let dst = NdArray::<CpuRuntime>::zeros(&[3], DType::F64, &client()).unwrap();
        a.copyto(&dst).unwrap();
        assert_eq!(dst.to_vec::<f64>().unwrap(), vec![0.0, 1.0, 2.0]);
        // self-copy is a no-op
        a.copyto(&a).unwrap();
        assert!(iota(&[2]).copyto(&dst).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = iota(&[2, 2]);
        let b = a.add(vec![10.0, 20.0]).unwrap();
        assert_eq!(b.to_vec::<f32>().unwrap(), vec![10.0, 21.0, 12.0, 23.0]);
        let c = a.mul(&b).unwrap();
        assert_eq!(c.to_vec::<f32>().unwrap(), vec![0.0, 21.0, 24.0, 69.0]);

        let row = a.index_get(idx![1]).unwrap();
        row.sub_assign(2.0).unwrap();
        assert_eq!(a.to_vec::<f32>().unwrap(), vec![0.0, 1.0, 0.0, 1.0]);
        a.div_assign(vec![1.0, 0.5]).unwrap();
        assert_eq!(a.to_vec::<f32>().unwrap(), vec![0.0, 2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_bool_index_array_unsupported() {
        let a = iota(&[3]);
        let mask = NdArray::<CpuRuntime>::full(&[3], 1.0, DType::Bool, &client()).unwrap();
        let err = a.index_get(idx![&mask]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnsupportedKey);
    }

    #[test]
    fn test_from_array_like() {
        let a = NdArray::<CpuRuntime>::from_array_like(vec![vec![1, 2], vec![3, 4]], DType::I32, &client())
            .unwrap();
        assert_eq!(a.shape(), &[2, 2]);
        assert_eq!(a.to_vec::<i32>().unwrap(), vec![1, 2, 3, 4]);
    }
}
