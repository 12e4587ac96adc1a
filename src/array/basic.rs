//! Basic indexing: integers, slices and new axes
//!
//! A basic key selects a rectangular strided region. When that region is a
//! single run of flat row-major offsets the result is a zero-copy view made
//! with `flat_slice` + `reshape`; otherwise the storage engine copies it
//! with `strided_slice` (reads) or writes it with `slice_assign`.

use super::NdArray;
use super::key::Selector;
use super::value::{Value, prepare_value};
use crate::error::{Error, Result};
use crate::ops::{ArrayOps, IndexingOps, UtilityOps, resolve_slice};
use crate::runtime::Runtime;
use crate::tensor::{AxisSlice, Tensor};

/// Resolved form of a basic key against a source shape
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BasicPlan {
    /// One resolved selection per source axis
    pub axes: Vec<AxisSlice>,
    /// Raw per-axis bounds handed to the strided primitives
    pub begin: Vec<Option<isize>>,
    pub end: Vec<Option<isize>>,
    pub step: Vec<Option<isize>>,
    /// Source axes selected by an integer (dropped from the result)
    pub int_axes: Vec<usize>,
    /// Positions of inserted size-1 axes in the final shape
    pub new_axes: Vec<usize>,
    /// Per-axis selection lengths, integers counted as 1
    pub sliced_shape: Vec<usize>,
    /// `sliced_shape` without the integer axes
    pub kept_shape: Vec<usize>,
    /// `kept_shape` with the new axes inserted
    pub final_shape: Vec<usize>,
}

impl BasicPlan {
    /// Resolve normalized `entries` against `shape`
    ///
    /// Integers are bounds-checked against `[-dim, dim)` and turned into
    /// one-element slices.
    pub fn new<R: Runtime>(entries: &[Selector<R>], shape: &[usize]) -> Result<Self> {
        let ndim = shape.len();
        let mut plan = Self {
            axes: Vec::with_capacity(ndim),
            begin: Vec::with_capacity(ndim),
            end: Vec::with_capacity(ndim),
            step: Vec::with_capacity(ndim),
            int_axes: Vec::new(),
            new_axes: Vec::new(),
            sliced_shape: Vec::with_capacity(ndim),
            kept_shape: Vec::with_capacity(ndim),
            final_shape: Vec::new(),
        };

        let mut axis = 0;
        let mut out = 0;
        for entry in entries {
            match entry {
                Selector::NewAxis => {
                    plan.new_axes.push(out);
                    out += 1;
                }
                Selector::Int(i) => {
                    let dim = shape[axis];
                    let w = wrap_index(*i, axis, dim)?;
                    plan.axes.push(AxisSlice {
                        begin: w,
                        len: 1,
                        step: 1,
                    });
                    plan.begin.push(Some(w as isize));
                    plan.end.push(Some(w as isize + 1));
                    plan.step.push(Some(1));
                    plan.int_axes.push(axis);
                    axis += 1;
                }
                Selector::Slice(s) => {
                    plan.axes.push(resolve_slice(s.start, s.stop, s.step, shape[axis])?);
                    plan.begin.push(s.start);
                    plan.end.push(s.stop);
                    plan.step.push(s.step);
                    axis += 1;
                    out += 1;
                }
                Selector::Ellipsis | Selector::Array(_) => {
                    return Err(Error::Internal(format!(
                        "selector {entry} reached the basic indexing engine"
                    )));
                }
            }
        }
        if axis != ndim {
            return Err(Error::Internal(format!(
                "basic key covers {axis} of {ndim} axes"
            )));
        }

        plan.sliced_shape = plan.axes.iter().map(|a| a.len).collect();
        plan.kept_shape = plan
            .sliced_shape
            .iter()
            .enumerate()
            .filter(|(ax, _)| !plan.int_axes.contains(ax))
            .map(|(_, &len)| len)
            .collect();
        plan.final_shape = plan.kept_shape.clone();
        for &pos in &plan.new_axes {
            plan.final_shape.insert(pos, 1);
        }
        Ok(plan)
    }

    /// Number of selected elements
    pub fn size(&self) -> usize {
        self.sliced_shape.iter().product()
    }

    /// Flat row-major range `[begin, end)` of a C-contiguous source covered
    /// by the selection, if the selection is exactly that range
    ///
    /// Walking from the innermost axis, axes selecting the whole of a
    /// dimension are skipped. The first axis that does not must be step-1
    /// (or a single element), and every axis outside it must select a
    /// single element.
    pub fn contiguous_range(&self, shape: &[usize]) -> Option<(usize, usize)> {
        let size = self.size();
        if size == 0 {
            return None;
        }

        let is_whole = |ax: &AxisSlice, dim: usize| ax.len == dim && (ax.step == 1 || dim <= 1);
        let partial = (0..shape.len())
            .rev()
            .find(|&d| !is_whole(&self.axes[d], shape[d]));

        if let Some(k) = partial {
            let ax = &self.axes[k];
            if ax.step != 1 && ax.len != 1 {
                return None;
            }
            if self.axes[..k].iter().any(|a| a.len != 1) {
                return None;
            }
        }

        let strides = row_major_strides(shape);
        let begin: usize = self
            .axes
            .iter()
            .zip(&strides)
            .map(|(a, &s)| a.begin * s)
            .sum();
        Some((begin, begin + size))
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Wrap a possibly negative integer index, rejecting anything outside
/// `[-dim, dim)`
pub(crate) fn wrap_index(i: isize, axis: usize, dim: usize) -> Result<usize> {
    let n = dim as isize;
    if i < -n || i >= n {
        return Err(Error::IndexOutOfBounds {
            index: i as i64,
            axis,
            size: dim,
        });
    }
    Ok(if i < 0 { (i + n) as usize } else { i as usize })
}

/// Read a basic selection
pub(crate) fn get<R>(a: &NdArray<R>, entries: &[Selector<R>]) -> Result<NdArray<R>>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    let plan = BasicPlan::new(entries, a.shape())?;

    if plan.size() == 0 {
        log::debug!("basic get: empty selection {:?}", plan.final_shape);
        let out = Tensor::<R>::try_empty(&plan.final_shape, a.dtype(), a.device())?;
        return Ok(a.derive(out));
    }

    if let Some((begin, end)) = plan.contiguous_range(a.shape()) {
        log::debug!("basic get: view of flat range [{begin}, {end})");
        let view = a
            .tensor()
            .flatten()?
            .flat_slice(begin, end)?
            .reshape(&plan.final_shape)?;
        return Ok(a.derive(view));
    }

    log::debug!("basic get: strided copy of shape {:?}", plan.sliced_shape);
    let copied = a
        .client()
        .strided_slice(a.tensor(), &plan.begin, &plan.end, &plan.step)?;
    Ok(a.derive(copied.reshape(&plan.final_shape)?))
}

/// Write `value` into a basic selection
pub(crate) fn set<R>(a: &NdArray<R>, entries: &[Selector<R>], value: &Value<'_, R>) -> Result<()>
where
    R: Runtime,
    R::Client: ArrayOps<R>,
{
    let plan = BasicPlan::new(entries, a.shape())?;
    let client = a.client();
    let prepared = prepare_value(client, value, &plan.kept_shape, &plan.new_axes, a.dtype())?;

    if plan.size() == 0 {
        return Ok(());
    }

    if let Some((begin, end)) = plan.contiguous_range(a.shape()) {
        log::debug!("basic set: copy into flat range [{begin}, {end})");
        let view = a
            .tensor()
            .flatten()?
            .flat_slice(begin, end)?
            .reshape(&plan.kept_shape)?;
        return client.copy_into(&prepared, &view);
    }

    log::debug!("basic set: strided assign of shape {:?}", plan.sliced_shape);
    let src = prepared.contiguous()?.reshape(&plan.sliced_shape)?;
    client.slice_assign(a.tensor(), &plan.begin, &plan.end, &plan.step, &src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::key::SliceSpec;
    use crate::error::ErrorKind;
    use crate::runtime::cpu::CpuRuntime;

    type Sel = Selector<CpuRuntime>;

    fn plan(entries: &[Sel], shape: &[usize]) -> BasicPlan {
        BasicPlan::new(entries, shape).unwrap()
    }

    fn full() -> Sel {
        Sel::from(..)
    }

    #[test]
    fn test_final_shape_drops_ints_and_inserts_new_axes() {
        let p = plan(&[Sel::NewAxis, Sel::from(0), full()], &[2, 3]);
        assert_eq!(p.sliced_shape, vec![1, 3]);
        assert_eq!(p.int_axes, vec![0]);
        assert_eq!(p.new_axes, vec![0]);
        assert_eq!(p.final_shape, vec![1, 3]);

        let p = plan(&[full(), Sel::NewAxis, full()], &[2, 3]);
        assert_eq!(p.final_shape, vec![2, 1, 3]);

        let p = plan(&[Sel::from(1), Sel::from(-1)], &[2, 3]);
        assert_eq!(p.final_shape, Vec::<usize>::new());
    }

    #[test]
    fn test_integer_bounds() {
        assert!(BasicPlan::new(&[Sel::from(3)], &[4]).is_ok());
        assert!(BasicPlan::new(&[Sel::from(-4)], &[4]).is_ok());
        for bad in [4, -5] {
            let err = BasicPlan::new(&[Sel::from(bad)], &[4]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Bounds);
        }
    }

    #[test]
    fn test_contiguous_row_block() {
        let shape = [4, 5];
        let p = plan(&[Sel::from(1..3), full()], &shape);
        assert_eq!(p.contiguous_range(&shape), Some((5, 15)));
    }

    #[test]
    fn test_contiguous_partial_inner_run() {
        let shape = [4, 5, 6];
        // one row, one plane, inner run 2..5
        let p = plan(&[Sel::from(2), Sel::from(3), Sel::from(2..5)], &shape);
        assert_eq!(p.contiguous_range(&shape), Some((2 * 30 + 3 * 6 + 2, 2 * 30 + 3 * 6 + 5)));

        let p = plan(&[Sel::from(1), Sel::from(1..3), full()], &shape);
        assert_eq!(p.contiguous_range(&shape), Some((36, 48)));
    }

    #[test]
    fn test_non_contiguous_selections() {
        let shape = [4, 5];
        let p = plan(&[Sel::from(1..3), Sel::from(SliceSpec::full().with_step(2))], &shape);
        assert_eq!(p.contiguous_range(&shape), None);

        let p = plan(&[full(), Sel::from(1..3)], &shape);
        assert_eq!(p.contiguous_range(&shape), None);

        let p = plan(&[Sel::from(SliceSpec::new(None, None, Some(-1))), full()], &shape);
        assert_eq!(p.contiguous_range(&shape), None);
    }

    #[test]
    fn test_single_element_axes_ignore_step() {
        let shape = [1, 5];
        let p = plan(&[Sel::from(SliceSpec::new(None, None, Some(-1))), full()], &shape);
        assert_eq!(p.contiguous_range(&shape), Some((0, 5)));
    }

    #[test]
    fn test_empty_selection_is_never_contiguous() {
        let shape = [4, 5];
        let p = plan(&[Sel::from(2..2), full()], &shape);
        assert_eq!(p.final_shape, vec![0, 5]);
        assert_eq!(p.contiguous_range(&shape), None);
    }
}
