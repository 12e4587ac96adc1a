//! Index keys: per-axis selectors and their normalization
//!
//! A key is a tuple of [`Selector`]s. Before dispatch it is normalized
//! against the array's dimensionality: a single `Ellipsis` expands to as
//! many full slices as needed, missing trailing axes become full slices, and
//! the number of axis-consuming entries is checked against `ndim`.

use super::NdArray;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// Marker inserting a new size-1 axis (NumPy's `None` / `np.newaxis`)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NewAxis;

/// Convenience constant for [`NewAxis`]
pub const NEW_AXIS: NewAxis = NewAxis;

/// Marker standing for "as many full slices as needed" (`...`)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ellipsis;

/// A `start:stop:step` slice with optional bounds
///
/// Bounds are resolved against the axis with NumPy clamping rules, see
/// [`resolve_slice`](crate::ops::resolve_slice).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceSpec {
    /// First index (default: start of the axis in the direction of `step`)
    pub start: Option<isize>,
    /// One past the last index (default: end of the axis)
    pub stop: Option<isize>,
    /// Stride between selected indices (default 1, never 0)
    pub step: Option<isize>,
}

impl SliceSpec {
    /// The whole axis, `:`
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: None,
        }
    }

    /// Slice with explicit optional bounds
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// `start:stop`
    pub const fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// Replace the step
    pub const fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// True for `:` and `::1`
    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && matches!(self.step, None | Some(1))
    }
}

impl fmt::Display for SliceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |v: Option<isize>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "{}:{}", bound(self.start), bound(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{step}")?;
        }
        Ok(())
    }
}

/// Integer positions used as an advanced selector
pub enum IndexArray<R: Runtime> {
    /// Host-side positions in row-major order together with their shape
    Host {
        /// Positions
        data: Vec<i64>,
        /// Shape of the position array
        shape: Vec<usize>,
    },
    /// Positions held in an array on a device
    Device(NdArray<R>),
}

impl<R: Runtime> IndexArray<R> {
    /// Host positions with an explicit shape
    pub fn host(data: Vec<i64>, shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Self::Host {
            data,
            shape: shape.to_vec(),
        })
    }

    /// The positions `start, start + step, ...` below `stop` as a 1-D array
    pub fn range(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidArgument {
                arg: "step",
                reason: "range step cannot be zero".into(),
            });
        }
        let mut data = Vec::new();
        let mut next = Some(start);
        while let Some(v) = next.filter(|&v| (step > 0 && v < stop) || (step < 0 && v > stop)) {
            data.push(v);
            next = v.checked_add(step);
        }
        let len = data.len();
        Self::host(data, &[len])
    }

    /// Shape of the position array
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Host { shape, .. } => shape,
            Self::Device(a) => a.shape(),
        }
    }

    /// Element type of the positions
    pub fn dtype(&self) -> DType {
        match self {
            Self::Host { .. } => DType::I64,
            Self::Device(a) => a.dtype(),
        }
    }
}

impl<R: Runtime> Clone for IndexArray<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Host { data, shape } => Self::Host {
                data: data.clone(),
                shape: shape.clone(),
            },
            Self::Device(a) => Self::Device(a.clone()),
        }
    }
}

impl<R: Runtime> fmt::Debug for IndexArray<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<R: Runtime> fmt::Display for IndexArray<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host { data, shape } if shape.len() == 1 => write!(f, "array({data:?})"),
            Self::Host { shape, .. } => write!(f, "array(shape={shape:?}, dtype=int64)"),
            Self::Device(a) => write!(f, "array(shape={:?}, dtype={})", a.shape(), a.dtype()),
        }
    }
}

/// One entry of an index key
pub enum Selector<R: Runtime> {
    /// A single position; removes the axis from the result
    Int(isize),
    /// A range of positions
    Slice(SliceSpec),
    /// Inserts a size-1 axis
    NewAxis,
    /// Expands to full slices over the unmentioned axes
    Ellipsis,
    /// Integer position array (advanced indexing)
    Array(IndexArray<R>),
}

impl<R: Runtime> Selector<R> {
    /// True for entries that consume an axis of the source array
    pub fn consumes_axis(&self) -> bool {
        !matches!(self, Self::NewAxis | Self::Ellipsis)
    }

    /// True for `Slice(:)`
    pub fn is_full_slice(&self) -> bool {
        matches!(self, Self::Slice(s) if s.is_full())
    }
}

impl<R: Runtime> Clone for Selector<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Int(i) => Self::Int(*i),
            Self::Slice(s) => Self::Slice(*s),
            Self::NewAxis => Self::NewAxis,
            Self::Ellipsis => Self::Ellipsis,
            Self::Array(a) => Self::Array(a.clone()),
        }
    }
}

impl<R: Runtime> fmt::Debug for Selector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<R: Runtime> fmt::Display for Selector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Slice(s) => write!(f, "{s}"),
            Self::NewAxis => f.write_str("None"),
            Self::Ellipsis => f.write_str("..."),
            Self::Array(a) => write!(f, "{a}"),
        }
    }
}

/// Integer key entry as `isize`, saturating at the bounds
///
/// A saturated value is out of bounds for every axis and clamps like any
/// other oversized slice bound.
fn saturating_isize<T>(v: T) -> isize
where
    T: TryInto<isize> + PartialOrd + Default,
{
    let negative = v < T::default();
    v.try_into().unwrap_or(if negative { isize::MIN } else { isize::MAX })
}

fn saturating_i64<T>(v: T) -> i64
where
    T: TryInto<i64> + PartialOrd + Default,
{
    let negative = v < T::default();
    v.try_into().unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

macro_rules! impl_int_selector {
    ($($t:ty),*) => {
        $(
            impl<R: Runtime> From<$t> for Selector<R> {
                fn from(i: $t) -> Self {
                    Self::Int(saturating_isize(i))
                }
            }

            impl<R: Runtime> From<Range<$t>> for Selector<R> {
                fn from(r: Range<$t>) -> Self {
                    Self::Slice(SliceSpec::new(
                        Some(saturating_isize(r.start)),
                        Some(saturating_isize(r.end)),
                        None,
                    ))
                }
            }

            impl<R: Runtime> From<RangeFrom<$t>> for Selector<R> {
                fn from(r: RangeFrom<$t>) -> Self {
                    Self::Slice(SliceSpec::new(Some(saturating_isize(r.start)), None, None))
                }
            }

            impl<R: Runtime> From<RangeTo<$t>> for Selector<R> {
                fn from(r: RangeTo<$t>) -> Self {
                    Self::Slice(SliceSpec::new(None, Some(saturating_isize(r.end)), None))
                }
            }

            impl<R: Runtime> From<Vec<$t>> for Selector<R> {
                fn from(v: Vec<$t>) -> Self {
                    let shape = [v.len()];
                    Self::Array(IndexArray::Host {
                        data: v.into_iter().map(saturating_i64).collect(),
                        shape: shape.to_vec(),
                    })
                }
            }

            impl<R: Runtime, const N: usize> From<[$t; N]> for Selector<R> {
                fn from(v: [$t; N]) -> Self {
                    Self::from(v.to_vec())
                }
            }
        )*
    };
}

impl_int_selector!(i32, i64, isize, u32, u64, usize);

impl<R: Runtime> From<RangeFull> for Selector<R> {
    fn from(_: RangeFull) -> Self {
        Self::Slice(SliceSpec::full())
    }
}

impl<R: Runtime> From<SliceSpec> for Selector<R> {
    fn from(s: SliceSpec) -> Self {
        Self::Slice(s)
    }
}

impl<R: Runtime> From<NewAxis> for Selector<R> {
    fn from(_: NewAxis) -> Self {
        Self::NewAxis
    }
}

impl<R: Runtime> From<Ellipsis> for Selector<R> {
    fn from(_: Ellipsis) -> Self {
        Self::Ellipsis
    }
}

impl<R: Runtime> From<IndexArray<R>> for Selector<R> {
    fn from(a: IndexArray<R>) -> Self {
        Self::Array(a)
    }
}

impl<R: Runtime> From<NdArray<R>> for Selector<R> {
    fn from(a: NdArray<R>) -> Self {
        Self::Array(IndexArray::Device(a))
    }
}

impl<R: Runtime> From<&NdArray<R>> for Selector<R> {
    fn from(a: &NdArray<R>) -> Self {
        Self::Array(IndexArray::Device(a.clone()))
    }
}

/// A tuple of selectors, usually built with [`idx!`](crate::idx)
pub struct IndexKey<R: Runtime> {
    selectors: Vec<Selector<R>>,
}

impl<R: Runtime> IndexKey<R> {
    /// The empty tuple `()`
    pub fn empty() -> Self {
        Self {
            selectors: Vec::new(),
        }
    }

    /// Key from explicit selectors
    pub fn new(selectors: Vec<Selector<R>>) -> Self {
        Self { selectors }
    }

    /// Number of selectors as written
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// True for `()`
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Iterate over the selectors
    pub fn iter(&self) -> std::slice::Iter<'_, Selector<R>> {
        self.selectors.iter()
    }

    pub(crate) fn into_selectors(self) -> Vec<Selector<R>> {
        self.selectors
    }
}

impl<R: Runtime> Clone for IndexKey<R> {
    fn clone(&self) -> Self {
        Self {
            selectors: self.selectors.clone(),
        }
    }
}

impl<R: Runtime> From<Selector<R>> for IndexKey<R> {
    fn from(s: Selector<R>) -> Self {
        Self::new(vec![s])
    }
}

impl<R: Runtime> fmt::Debug for IndexKey<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<R: Runtime> fmt::Display for IndexKey<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.selectors)
    }
}

pub(crate) fn write_tuple<R: Runtime>(
    f: &mut fmt::Formatter<'_>,
    selectors: &[Selector<R>],
) -> fmt::Result {
    f.write_str("(")?;
    for (i, s) in selectors.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{s}")?;
    }
    if selectors.len() == 1 {
        f.write_str(",")?;
    }
    f.write_str(")")
}

/// Render normalized entries for error messages
pub(crate) fn render<R: Runtime>(selectors: &[Selector<R>]) -> String {
    struct Tuple<'a, R: Runtime>(&'a [Selector<R>]);
    impl<R: Runtime> fmt::Display for Tuple<'_, R> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_tuple(f, self.0)
        }
    }
    Tuple(selectors).to_string()
}

/// Expand `key` to exactly `ndim` axis-consuming entries
///
/// `NewAxis` entries are kept in place. An `Ellipsis` is replaced by full
/// slices; without one, full slices are appended.
pub(crate) fn normalize<R: Runtime>(key: Vec<Selector<R>>, ndim: usize) -> Result<Vec<Selector<R>>> {
    let ellipses = key.iter().filter(|s| matches!(s, Selector::Ellipsis)).count();
    if ellipses > 1 {
        return Err(Error::InvalidIndex {
            reason: "an index can only have a single ellipsis ('...')".into(),
        });
    }

    let consumed = key.iter().filter(|s| s.consumes_axis()).count();
    if consumed > ndim {
        return Err(Error::TooManyIndices {
            got: consumed,
            ndim,
        });
    }
    let fill = ndim - consumed;

    let mut out = Vec::with_capacity(key.len() + fill);
    let mut expanded = false;
    for s in key {
        if let Selector::Ellipsis = s {
            out.extend((0..fill).map(|_| Selector::Slice(SliceSpec::full())));
            expanded = true;
        } else {
            out.push(s);
        }
    }
    if !expanded {
        out.extend((0..fill).map(|_| Selector::Slice(SliceSpec::full())));
    }

    check_axis_count(&out, ndim)?;
    Ok(out)
}

/// Verify that `entries` consume exactly `ndim` axes
///
/// More entries is a caller error; fewer means normalization went wrong.
pub(crate) fn check_axis_count<R: Runtime>(entries: &[Selector<R>], ndim: usize) -> Result<()> {
    let consumed = entries.iter().filter(|s| s.consumes_axis()).count();
    if consumed > ndim {
        return Err(Error::TooManyIndices {
            got: consumed,
            ndim,
        });
    }
    if consumed < ndim {
        return Err(Error::Internal(format!(
            "index normalized to {consumed} axes for an array with {ndim} dimensions"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::cpu::CpuRuntime;

    type Sel = Selector<CpuRuntime>;

    fn kinds(entries: &[Sel]) -> String {
        render(entries)
    }

    #[test]
    fn test_pads_trailing_axes() {
        let out = normalize::<CpuRuntime>(vec![Sel::from(1)], 3).unwrap();
        assert_eq!(kinds(&out), "(1, :, :)");
    }

    #[test]
    fn test_ellipsis_expands_in_place() {
        let key = vec![Sel::from(Ellipsis), Sel::from(NewAxis), Sel::from(0)];
        let out = normalize::<CpuRuntime>(key, 3).unwrap();
        assert_eq!(kinds(&out), "(:, :, None, 0)");
    }

    #[test]
    fn test_ellipsis_may_expand_to_nothing() {
        let key = vec![Sel::from(0), Sel::from(Ellipsis), Sel::from(1..2)];
        let out = normalize::<CpuRuntime>(key, 2).unwrap();
        assert_eq!(kinds(&out), "(0, 1:2)");
    }

    #[test]
    fn test_newaxis_does_not_count() {
        let key = vec![Sel::from(NewAxis), Sel::from(0), Sel::from(NewAxis), Sel::from(1)];
        let out = normalize::<CpuRuntime>(key, 2).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_too_many_indices() {
        let err = normalize::<CpuRuntime>(vec![Sel::from(0), Sel::from(0), Sel::from(0)], 2)
            .unwrap_err();
        assert!(matches!(err, Error::TooManyIndices { got: 3, ndim: 2 }));
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_double_ellipsis_rejected() {
        let err = normalize::<CpuRuntime>(vec![Sel::from(Ellipsis), Sel::from(Ellipsis)], 2)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_short_key_is_internal_error() {
        let err = check_axis_count::<CpuRuntime>(&[Sel::from(0)], 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInvariant);
    }

    #[test]
    fn test_selector_conversions() {
        assert!(matches!(Sel::from(-1), Selector::Int(-1)));
        assert!(Sel::from(..).is_full_slice());
        assert!(!Sel::from(SliceSpec::full().with_step(2)).is_full_slice());
        assert!(Sel::from(SliceSpec::full().with_step(1)).is_full_slice());
        match Sel::from([2usize, 0]) {
            Selector::Array(a) => {
                assert_eq!(a.shape(), &[2]);
                assert_eq!(a.dtype(), DType::I64);
            }
            other => panic!("expected index array, got {other}"),
        }
    }

    #[test]
    fn test_oversized_unsigned_saturates() {
        assert!(matches!(Sel::from(usize::MAX), Selector::Int(isize::MAX)));
        assert!(matches!(Sel::from(u64::MAX), Selector::Int(isize::MAX)));
        match Sel::from(..usize::MAX) {
            Selector::Slice(s) => assert_eq!(s.stop, Some(isize::MAX)),
            other => panic!("expected slice, got {other}"),
        }
        match Sel::from(vec![usize::MAX, 1]) {
            Selector::Array(IndexArray::Host { data, .. }) => assert_eq!(data, vec![i64::MAX, 1]),
            other => panic!("expected host array, got {other}"),
        }
        assert!(matches!(Sel::from(i64::MIN), Selector::Int(isize::MIN)));
    }

    #[test]
    fn test_slice_display() {
        assert_eq!(SliceSpec::full().to_string(), ":");
        assert_eq!(SliceSpec::range(1, 3).to_string(), "1:3");
        assert_eq!(SliceSpec::new(None, None, Some(-1)).to_string(), "::-1");
    }

    #[test]
    fn test_index_array_range() {
        let r = IndexArray::<CpuRuntime>::range(5, 0, -2).unwrap();
        match r {
            IndexArray::Host { data, shape } => {
                assert_eq!(data, vec![5, 3, 1]);
                assert_eq!(shape, vec![3]);
            }
            IndexArray::Device(_) => unreachable!(),
        }
        assert!(IndexArray::<CpuRuntime>::range(0, 3, 0).is_err());
        match IndexArray::<CpuRuntime>::range(i64::MAX - 2, i64::MAX, 5).unwrap() {
            IndexArray::Host { data, .. } => assert_eq!(data, vec![i64::MAX - 2]),
            IndexArray::Device(_) => unreachable!(),
        }
        match IndexArray::<CpuRuntime>::range(i64::MIN + 1, i64::MIN, -3).unwrap() {
            IndexArray::Host { data, .. } => assert_eq!(data, vec![i64::MIN + 1]),
            IndexArray::Device(_) => unreachable!(),
        }
        assert!(IndexArray::<CpuRuntime>::host(vec![1, 2, 3], &[2, 2]).is_err());
    }
}
