//! Assignment values and their preparation against a target shape

use super::NdArray;
use crate::dtype::{DType, Scalar};
use crate::error::{Error, Result};
use crate::ops::{ArrayOps, TypeConversionOps, UtilityOps};
use crate::runtime::{Runtime, RuntimeClient};
use crate::tensor::Tensor;

/// Nested host data, the foreign array-like accepted for assignment
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayLike {
    /// A single number
    Scalar(Scalar),
    /// One level of nesting
    List(Vec<ArrayLike>),
}

impl ArrayLike {
    /// Shape and row-major values; ragged nesting is rejected
    pub fn flatten(&self) -> Result<(Vec<usize>, Vec<Scalar>)> {
        let mut shape = Vec::new();
        let mut level = self;
        while let Self::List(items) = level {
            shape.push(items.len());
            match items.first() {
                Some(first) => level = first,
                None => break,
            }
        }

        let mut values = Vec::with_capacity(shape.iter().product());
        self.collect(&shape, &mut values)?;
        Ok((shape, values))
    }

    fn collect(&self, shape: &[usize], out: &mut Vec<Scalar>) -> Result<()> {
        match (self, shape.split_first()) {
            (Self::Scalar(v), None) => {
                out.push(*v);
                Ok(())
            }
            (Self::List(items), Some((&len, rest))) if items.len() == len => {
                items.iter().try_for_each(|item| item.collect(rest, out))
            }
            _ => Err(Error::unsupported_value(
                "nested sequence is ragged and cannot be converted to an array",
            )),
        }
    }
}

macro_rules! impl_scalar_like {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ArrayLike {
                fn from(v: $t) -> Self {
                    Self::Scalar(Scalar::from(v))
                }
            }

            impl<R: Runtime> From<$t> for Value<'_, R> {
                fn from(v: $t) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

impl_scalar_like!(Scalar, f64, f32, i64, i32, i16, i8, u64, u32, u16, u8, usize, bool);

impl<T: Into<ArrayLike>> From<Vec<T>> for ArrayLike {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// Right-hand side of an assignment
pub enum Value<'a, R: Runtime> {
    /// Broadcast to every selected element
    Scalar(Scalar),
    /// An existing array, moved and cast as needed
    Array(&'a NdArray<R>),
    /// Host data converted with the target dtype
    Nested(ArrayLike),
}

impl<'a, R: Runtime> From<&'a NdArray<R>> for Value<'a, R> {
    fn from(a: &'a NdArray<R>) -> Self {
        Value::Array(a)
    }
}

impl<R: Runtime> From<ArrayLike> for Value<'_, R> {
    fn from(v: ArrayLike) -> Self {
        Value::Nested(v)
    }
}

impl<R: Runtime, T: Into<ArrayLike>> From<Vec<T>> for Value<'_, R> {
    fn from(v: Vec<T>) -> Self {
        Value::Nested(ArrayLike::from(v))
    }
}

/// Host tensor holding `values` in the narrowest exact representation
///
/// Any float makes the whole tensor F64. All-integer data is I64, or U64
/// when it needs the unsigned range and has no negatives.
fn host_tensor<R: Runtime>(values: &[Scalar], shape: &[usize], device: &R::Device) -> Result<Tensor<R>> {
    let has_float = values.iter().any(|v| v.is_float());
    let has_unsigned = values.iter().any(|v| matches!(v, Scalar::UInt(_)));
    let has_negative = values.iter().any(|v| matches!(v, Scalar::Int(i) if *i < 0));

    if !has_float && !has_unsigned {
        let data: Vec<i64> = values
            .iter()
            .map(|v| match v {
                Scalar::Int(i) => *i,
                _ => 0,
            })
            .collect();
        return Tensor::try_from_slice(&data, shape, device);
    }
    if !has_float && !has_negative {
        let data: Vec<u64> = values
            .iter()
            .map(|v| match v {
                Scalar::Int(i) => *i as u64,
                Scalar::UInt(u) => *u,
                Scalar::Float(_) => 0,
            })
            .collect();
        return Tensor::try_from_slice(&data, shape, device);
    }
    let data: Vec<f64> = values.iter().map(|v| v.to_f64()).collect();
    Tensor::try_from_slice(&data, shape, device)
}

/// Materialize a value as a tensor of `dtype` on the client's device
///
/// Scalars become 0-d tensors; arrays are moved and cast only when needed,
/// so the result may share storage with the input array.
pub(crate) fn value_to_tensor<R>(
    client: &R::Client,
    value: &Value<'_, R>,
    dtype: DType,
) -> Result<Tensor<R>>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    let device = client.device();
    match value {
        Value::Scalar(v) => client.fill(&[], *v, dtype),
        Value::Array(a) => {
            let moved = a.tensor().to_device(device)?;
            client.cast(&moved, dtype)
        }
        Value::Nested(like) => {
            let (shape, values) = like.flatten()?;
            let host = host_tensor::<R>(&values, &shape, device)?;
            client.cast(&host, dtype)
        }
    }
}

/// Coerce `value` to `target` shape and `dtype`
///
/// `squeeze_axes` names size-1 axes the value may carry that the target
/// lacks (new axes written in the key). They are removed only when the
/// value has more dimensions than the target; leading size-1 axes beyond
/// the target's rank are dropped after that. A value that still differs in
/// shape is reshaped when empty and broadcast otherwise.
pub(crate) fn prepare_value<R>(
    client: &R::Client,
    value: &Value<'_, R>,
    target: &[usize],
    squeeze_axes: &[usize],
    dtype: DType,
) -> Result<Tensor<R>>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    if let Value::Scalar(v) = value {
        return client.fill(target, *v, dtype);
    }

    let mut prepared = value_to_tensor(client, value, dtype)?;

    if !squeeze_axes.is_empty() && prepared.ndim() > target.len() {
        let axes: Vec<usize> = squeeze_axes
            .iter()
            .copied()
            .filter(|&ax| ax < prepared.ndim())
            .collect();
        prepared = prepared
            .squeeze(Some(&axes))
            .map_err(|_| Error::shape_mismatch(target, prepared.shape()))?;
    }

    if prepared.ndim() > target.len() {
        let extra = prepared.ndim() - target.len();
        if prepared.shape()[..extra].iter().all(|&d| d == 1) {
            let leading: Vec<usize> = (0..extra).collect();
            prepared = prepared.squeeze(Some(&leading))?;
        }
    }

    if prepared.shape() == target {
        return Ok(prepared);
    }
    if prepared.numel() == 0 {
        return prepared.reshape(target);
    }
    prepared.broadcast_to(target)
}
