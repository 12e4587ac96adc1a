//! Indexing helpers shared by all backends
//!
//! Slice bound resolution and the gather/scatter shape rule live here so the
//! array layer and the backend kernels agree on them.

use crate::error::{Error, Result};
use crate::tensor::AxisSlice;

/// Resolve optional `start:stop:step` bounds against an axis of size `dim`
///
/// Follows NumPy clamping: missing bounds default to the whole axis in the
/// direction of `step`, negative bounds count from the end, and out-of-range
/// bounds are clamped rather than rejected. A zero step is an error.
///
/// # Example
///
/// ```
/// use npindex::ops::resolve_slice;
///
/// let s = resolve_slice(None, None, Some(-2), 5).unwrap();
/// assert_eq!((s.begin, s.len, s.step), (4, 3, -2));
/// ```
pub fn resolve_slice(
    start: Option<isize>,
    stop: Option<isize>,
    step: Option<isize>,
    dim: usize,
) -> Result<AxisSlice> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(Error::InvalidArgument {
            arg: "step",
            reason: "slice step cannot be zero".into(),
        });
    }

    let n = dim as isize;
    let (begin, len) = if step > 0 {
        let clamp = |v: isize| if v < 0 { (v + n).max(0) } else { v.min(n) };
        let s = start.map_or(0, clamp);
        let e = stop.map_or(n, clamp);
        let len = if e > s { (e - s - 1) / step + 1 } else { 0 };
        (s, len)
    } else {
        let clamp = |v: isize| if v < 0 { (v + n).max(-1) } else { v.min(n - 1) };
        let s = start.map_or(n - 1, clamp);
        let e = stop.map_or(-1, clamp);
        let len = if s > e {
            ((s - e - 1) as usize / step.unsigned_abs()) as isize + 1
        } else {
            0
        };
        (s, len)
    };

    // the step of a selection with at most one element never reaches a stride
    Ok(AxisSlice {
        begin: if len > 0 { begin as usize } else { 0 },
        len: len as usize,
        step: if len > 1 { step } else { 1 },
    })
}

/// Resolve per-axis bound lists, padding missing trailing axes with full slices
pub fn resolve_slices(
    shape: &[usize],
    begin: &[Option<isize>],
    end: &[Option<isize>],
    step: &[Option<isize>],
) -> Result<Vec<AxisSlice>> {
    if begin.len() != end.len() || begin.len() != step.len() {
        return Err(Error::InvalidArgument {
            arg: "begin",
            reason: format!(
                "begin/end/step lengths differ ({}, {}, {})",
                begin.len(),
                end.len(),
                step.len()
            ),
        });
    }
    if begin.len() > shape.len() {
        return Err(Error::TooManyIndices {
            got: begin.len(),
            ndim: shape.len(),
        });
    }

    shape
        .iter()
        .enumerate()
        .map(|(axis, &dim)| {
            if axis < begin.len() {
                resolve_slice(begin[axis], end[axis], step[axis], dim)
            } else {
                resolve_slice(None, None, None, dim)
            }
        })
        .collect()
}

/// Output shape of `gather_nd(src, indices)`
///
/// `indices` has shape `(M, *B)`: its leading axis enumerates coordinates
/// into the first `M` axes of `src`. The result has shape `B + src[M..]`.
/// The same shape is the value shape expected by `scatter_set_nd`.
pub fn gather_nd_output_shape(src_shape: &[usize], indices_shape: &[usize]) -> Result<Vec<usize>> {
    let Some((&m, batch)) = indices_shape.split_first() else {
        return Err(Error::InvalidArgument {
            arg: "indices",
            reason: "index tensor must have at least one dimension".into(),
        });
    };
    if m > src_shape.len() {
        return Err(Error::TooManyIndices {
            got: m,
            ndim: src_shape.len(),
        });
    }

    let mut out = batch.to_vec();
    out.extend_from_slice(&src_shape[m..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(start: Option<isize>, stop: Option<isize>, step: Option<isize>, dim: usize) -> (usize, usize, isize) {
        let s = resolve_slice(start, stop, step, dim).unwrap();
        (s.begin, s.len, s.step)
    }

    #[test]
    fn test_resolve_positive_step() {
        assert_eq!(resolved(None, None, None, 5), (0, 5, 1));
        assert_eq!(resolved(Some(1), Some(3), None, 5), (1, 2, 1));
        assert_eq!(resolved(None, None, Some(2), 5), (0, 3, 2));
        assert_eq!(resolved(Some(-2), None, None, 5), (3, 2, 1));
        assert_eq!(resolved(Some(-10), Some(10), None, 5), (0, 5, 1));
        assert_eq!(resolved(Some(4), Some(2), None, 5), (0, 0, 1));
    }

    #[test]
    fn test_resolve_negative_step() {
        assert_eq!(resolved(None, None, Some(-1), 5), (4, 5, -1));
        assert_eq!(resolved(Some(3), Some(0), Some(-1), 5), (3, 3, -1));
        assert_eq!(resolved(Some(10), None, Some(-2), 5), (4, 3, -2));
        assert_eq!(resolved(Some(0), Some(3), Some(-1), 5), (0, 0, 1));
        assert_eq!(resolved(None, None, Some(-1), 0), (0, 0, 1));
    }

    #[test]
    fn test_resolve_extreme_steps() {
        assert_eq!(resolved(None, None, Some(isize::MAX), 5), (0, 1, 1));
        assert_eq!(resolved(Some(2), None, Some(isize::MAX), 5), (2, 1, 1));
        assert_eq!(resolved(None, None, Some(isize::MIN), 5), (4, 1, 1));
        assert_eq!(resolved(Some(-1), Some(isize::MIN), Some(isize::MIN), 5), (4, 1, 1));
        assert_eq!(resolved(Some(isize::MIN), Some(isize::MAX), None, 5), (0, 5, 1));
    }

    #[test]
    fn test_resolve_zero_step() {
        assert!(matches!(
            resolve_slice(None, None, Some(0), 3),
            Err(Error::InvalidArgument { arg: "step", .. })
        ));
    }

    #[test]
    fn test_gather_nd_output_shape() {
        assert_eq!(gather_nd_output_shape(&[3, 3], &[2, 2]).unwrap(), vec![2]);
        assert_eq!(gather_nd_output_shape(&[4, 5, 6], &[1, 2, 3]).unwrap(), vec![2, 3, 5, 6]);
        assert!(gather_nd_output_shape(&[3], &[2, 1]).is_err());
    }
}
