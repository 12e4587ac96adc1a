//! Advanced indexing: integer position arrays mixed with other selectors
//!
//! The key is lowered to one I64 index tensor of shape `(M, *O)` for
//! `gather_nd` / `scatter_set_nd`, where `M` covers every source axis up to
//! the last entry that is not a full slice. Integer and array entries are
//! broadcast together into one block of `O`; slices before `M` contribute
//! their own axis of `O` holding the selected positions. Full slices from
//! `M` on stay as trailing unindexed axes.

use super::NdArray;
use super::basic::wrap_index;
use super::key::{IndexArray, Selector};
use super::value::{Value, prepare_value};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::ops::{
    ArrayOps, IndexingOps, ShapeOps, TypeConversionOps, gather_nd_output_shape, resolve_slice,
};
use crate::runtime::{Runtime, RuntimeClient};
use crate::tensor::{Tensor, broadcast_shapes};

/// Coordinates along one indexed source axis
enum Coords {
    /// Broadcast block entry: positions with their own shape
    Block { data: Vec<i64>, shape: Vec<usize> },
    /// Slice positions `begin + i * step` for `i < len`, laid along axis
    /// `o_axis` of `O`
    Range {
        begin: i64,
        step: i64,
        len: usize,
        o_axis: usize,
    },
}

/// Index tensor layout derived from a normalized advanced key
pub(crate) struct AdvancedPlan {
    /// Number of leading source axes addressed by the index tensor
    pub m: usize,
    /// Shape `O` of the coordinate space
    pub index_shape: Vec<usize>,
    /// Positions of inserted size-1 axes in the final shape
    pub new_axes: Vec<usize>,
    /// Gathered shape with the new axes inserted
    pub final_shape: Vec<usize>,
    coords: Vec<Coords>,
    block_shape: Vec<usize>,
    block_start: usize,
}

impl AdvancedPlan {
    pub fn new<R>(client: &R::Client, entries: &[Selector<R>], shape: &[usize]) -> Result<Self>
    where
        R: Runtime,
        R::Client: ArrayOps<R>,
    {
        // Source axis of every axis-consuming entry, paired with its key position
        let mut axis_entries = Vec::with_capacity(shape.len());
        let mut axis = 0;
        for (pos, entry) in entries.iter().enumerate() {
            if entry.consumes_axis() {
                axis_entries.push((pos, axis, entry));
                axis += 1;
            }
        }

        let m = axis_entries
            .iter()
            .rev()
            .find(|(_, _, e)| !e.is_full_slice())
            .map_or(0, |&(_, axis, _)| axis + 1);

        let is_block = |e: &Selector<R>| matches!(e, Selector::Int(_) | Selector::Array(_));
        let block_positions: Vec<usize> = axis_entries
            .iter()
            .filter(|&&(_, ax, e)| ax < m && is_block(e))
            .map(|&(pos, _, _)| pos)
            .collect();
        if block_positions.is_empty() {
            return Err(Error::Internal(
                "advanced key without integer or array entries".into(),
            ));
        }
        let adjacent = block_positions.windows(2).all(|w| w[1] == w[0] + 1);

        // Convert block entries up front so broadcasting errors surface early
        let mut coords = Vec::with_capacity(m);
        let mut block_shape: Vec<usize> = Vec::new();
        for &(_, ax, entry) in axis_entries.iter().take(m) {
            let c = match entry {
                Selector::Int(i) => Coords::Block {
                    data: vec![wrap_index(*i, ax, shape[ax])? as i64],
                    shape: Vec::new(),
                },
                Selector::Array(a) => {
                    let (data, arr_shape) = positions(client, a, ax, shape[ax])?;
                    Coords::Block {
                        data,
                        shape: arr_shape,
                    }
                }
                Selector::Slice(s) => {
                    let r = resolve_slice(s.start, s.stop, s.step, shape[ax])?;
                    // o_axis is assigned once the output layout is known
                    Coords::Range {
                        begin: r.begin as i64,
                        step: r.step as i64,
                        len: r.len,
                        o_axis: 0,
                    }
                }
                Selector::NewAxis | Selector::Ellipsis => {
                    return Err(Error::Internal(format!(
                        "selector {entry} counted as an axis"
                    )));
                }
            };
            if let Coords::Block { shape: s, .. } = &c {
                block_shape = broadcast_shapes(&block_shape, s)
                    .ok_or_else(|| Error::broadcast(&block_shape, s))?
                    .to_vec();
            }
            coords.push(c);
        }

        // Lay out the output: the broadcast block either replaces the
        // adjacent entries in place or moves to the front.
        let mut index_shape = Vec::new();
        let mut final_shape = Vec::new();
        let mut new_axes = Vec::new();
        let mut block_start = None;
        if !adjacent {
            block_start = Some(0);
            index_shape.extend_from_slice(&block_shape);
            final_shape.extend_from_slice(&block_shape);
        }
        let mut ax = 0;
        for entry in entries {
            if let Selector::NewAxis = entry {
                new_axes.push(final_shape.len());
                final_shape.push(1);
                continue;
            }
            if !entry.consumes_axis() {
                continue;
            }
            if ax >= m {
                final_shape.push(shape[ax]);
            } else if let Coords::Range { len, o_axis, .. } = &mut coords[ax] {
                *o_axis = index_shape.len();
                index_shape.push(*len);
                final_shape.push(*len);
            } else if block_start.is_none() {
                block_start = Some(index_shape.len());
                index_shape.extend_from_slice(&block_shape);
                final_shape.extend_from_slice(&block_shape);
            }
            ax += 1;
        }

        Ok(Self {
            m,
            index_shape,
            new_axes,
            final_shape,
            coords,
            block_shape,
            block_start: block_start.unwrap_or(0),
        })
    }

    /// Build the `(M, *O)` index tensor on `client`'s device
    pub fn index_tensor<R>(&self, client: &R::Client) -> Result<Tensor<R>>
    where
        R: Runtime,
        R::Client: ArrayOps<R>,
    {
        let num: usize = self.index_shape.iter().product();
        let o_ndim = self.index_shape.len();
        let block_ndim = self.block_shape.len();

        let mut per_axis = Vec::with_capacity(self.m);
        for c in &self.coords {
            let mut values = Vec::with_capacity(num);
            let mut pos = vec![0usize; o_ndim];
            match c {
                Coords::Block { data, shape } => {
                    let strides = broadcast_strides(shape, &self.block_shape);
                    for _ in 0..num {
                        let block = &pos[self.block_start..self.block_start + block_ndim];
                        let flat: usize = block.iter().zip(&strides).map(|(p, s)| p * s).sum();
                        values.push(data[flat]);
                        advance(&mut pos, &self.index_shape);
                    }
                }
                Coords::Range {
                    begin, step, o_axis, ..
                } => {
                    for _ in 0..num {
                        values.push(begin + pos[*o_axis] as i64 * step);
                        advance(&mut pos, &self.index_shape);
                    }
                }
            }
            per_axis.push(Tensor::<R>::try_from_slice(
                &values,
                &self.index_shape,
                client.device(),
            )?);
        }

        let refs: Vec<&Tensor<R>> = per_axis.iter().collect();
        client.stack(&refs, 0)
    }
}

/// Host copy of an index array's positions, wrapped and bounds-checked
fn positions<R>(
    client: &R::Client,
    a: &IndexArray<R>,
    axis: usize,
    size: usize,
) -> Result<(Vec<i64>, Vec<usize>)>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    let dtype = a.dtype();
    if !dtype.is_int() {
        return Err(Error::unsupported_selector(format!(
            "arrays used as indices must be of integer type, got {dtype}"
        )));
    }

    let (raw, shape) = match a {
        IndexArray::Host { data, shape } => (data.clone(), shape.clone()),
        IndexArray::Device(arr) => {
            let as_i64 = client.cast(arr.tensor(), DType::I64)?;
            (as_i64.to_vec::<i64>()?, arr.shape().to_vec())
        }
    };

    let n = size as i64;
    let wrapped = raw
        .into_iter()
        .map(|i| {
            if i < -n || i >= n {
                Err(Error::IndexOutOfBounds {
                    index: i,
                    axis,
                    size,
                })
            } else if i < 0 {
                Ok(i + n)
            } else {
                Ok(i)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((wrapped, shape))
}

/// Element strides of `shape` broadcast (right-aligned) to `target`
fn broadcast_strides(shape: &[usize], target: &[usize]) -> Vec<usize> {
    let mut strides = vec![0usize; target.len()];
    let lead = target.len() - shape.len();
    let mut stride = 1;
    for d in (0..shape.len()).rev() {
        if shape[d] != 1 {
            strides[lead + d] = stride;
        }
        stride *= shape[d];
    }
    strides
}

/// Step a row-major multi-index
fn advance(pos: &mut [usize], shape: &[usize]) {
    for d in (0..shape.len()).rev() {
        pos[d] += 1;
        if pos[d] < shape[d] {
            return;
        }
        pos[d] = 0;
    }
}

/// Read an advanced selection (always a new array)
pub(crate) fn get<R>(a: &NdArray<R>, entries: &[Selector<R>]) -> Result<NdArray<R>>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    let client = a.client();
    let plan = AdvancedPlan::new(client, entries, a.shape())?;
    let indices = plan.index_tensor(client)?;
    log::debug!(
        "advanced get: gather_nd with index tensor {:?}",
        indices.shape()
    );

    let gathered = client.gather_nd(a.tensor(), &indices)?;
    Ok(a.derive(gathered.reshape(&plan.final_shape)?))
}

/// Scatter `value` into an advanced selection
///
/// Repeated coordinates are overwritten in order, so the last one wins.
pub(crate) fn set<R>(a: &NdArray<R>, entries: &[Selector<R>], value: &Value<'_, R>) -> Result<()>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    let client = a.client();
    let plan = AdvancedPlan::new(client, entries, a.shape())?;
    let indices = plan.index_tensor(client)?;
    let vshape = gather_nd_output_shape(a.shape(), indices.shape())?;
    log::debug!(
        "advanced set: scatter_set_nd with index tensor {:?} and value shape {vshape:?}",
        indices.shape()
    );

    let prepared = prepare_value(client, value, &vshape, &plan.new_axes, a.dtype())?;
    client.scatter_set_nd(a.tensor(), &indices, &prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::key::SliceSpec;
    use crate::error::ErrorKind;
    use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    type Sel = Selector<CpuRuntime>;

    fn client() -> CpuClient {
        CpuRuntime::default_client(&CpuDevice::new())
    }

    fn plan(entries: &[Sel], shape: &[usize]) -> Result<AdvancedPlan> {
        AdvancedPlan::new::<CpuRuntime>(&client(), entries, shape)
    }

    fn indices(p: &AdvancedPlan) -> (Vec<usize>, Vec<i64>) {
        let t = p.index_tensor::<CpuRuntime>(&client()).unwrap();
        (t.shape().to_vec(), t.to_vec::<i64>().unwrap())
    }

    #[test]
    fn test_pairwise_arrays() {
        let p = plan(&[Sel::from(vec![0, 1]), Sel::from(vec![2, 0])], &[3, 3]).unwrap();
        assert_eq!(p.m, 2);
        assert_eq!(p.final_shape, vec![2]);
        let (shape, data) = indices(&p);
        assert_eq!(shape, vec![2, 2]);
        assert_eq!(data, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_trailing_full_slices_are_unindexed() {
        let p = plan(&[Sel::from(vec![2, 0]), Sel::from(..), Sel::from(..)], &[3, 4, 5]).unwrap();
        assert_eq!(p.m, 1);
        assert_eq!(p.final_shape, vec![2, 4, 5]);
    }

    #[test]
    fn test_leading_slice_keeps_its_axis() {
        let p = plan(&[Sel::from(..), Sel::from(vec![1, 2, 1])], &[2, 4]).unwrap();
        assert_eq!(p.final_shape, vec![2, 3]);
        let (shape, data) = indices(&p);
        assert_eq!(shape, vec![2, 2, 3]);
        // row coordinates, then column coordinates
        assert_eq!(data, vec![0, 0, 0, 1, 1, 1, 1, 2, 1, 1, 2, 1]);
    }

    #[test]
    fn test_separated_block_moves_to_front() {
        let entries = [Sel::from(vec![0, 1]), Sel::from(..), Sel::from(0)];
        let p = plan(&entries, &[2, 3, 4]).unwrap();
        assert_eq!(p.final_shape, vec![2, 3]);
    }

    #[test]
    fn test_adjacent_block_stays_in_place() {
        let entries = [
            Sel::from(SliceSpec::range(0, 2)),
            Sel::from(vec![0, 1, 0]),
            Sel::from(1),
        ];
        let p = plan(&entries, &[3, 2, 4]).unwrap();
        assert_eq!(p.final_shape, vec![2, 3]);
    }

    #[test]
    fn test_new_axis_positions() {
        let entries = [Sel::from(vec![0, 1]), Sel::NewAxis, Sel::from(..)];
        let p = plan(&entries, &[3, 4]).unwrap();
        assert_eq!(p.new_axes, vec![1]);
        assert_eq!(p.final_shape, vec![2, 1, 4]);
    }

    #[test]
    fn test_negative_positions_wrap() {
        let p = plan(&[Sel::from(vec![-1, -3])], &[3]).unwrap();
        let (_, data) = indices(&p);
        assert_eq!(data, vec![2, 0]);
    }

    #[test]
    fn test_errors() {
        let err = plan(&[Sel::from(vec![3])], &[3]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Bounds);

        let err = plan(&[Sel::from(vec![0, 1]), Sel::from(vec![0, 1, 2])], &[3, 3])
            .err()
            .unwrap();
        assert!(matches!(err, Error::BroadcastError { .. }));

        let floats = NdArray::<CpuRuntime>::full(&[2], 1.0, DType::F32, &client()).unwrap();
        let err = plan(&[Sel::from(&floats)], &[3]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::TypeKind);
    }

    #[test]
    fn test_broadcast_strides() {
        assert_eq!(broadcast_strides(&[3], &[2, 3]), vec![0, 1]);
        assert_eq!(broadcast_strides(&[2, 1], &[2, 3]), vec![1, 0]);
        assert_eq!(broadcast_strides(&[], &[2]), vec![0]);
    }
}
