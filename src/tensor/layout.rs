//! Layout: shape, strides, and offset for tensor memory layout

use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Most arrays have 4 or fewer dimensions, so we stack-allocate up to 4
const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Strides type: element offsets between consecutive elements along each dimension
/// Signed to support negative-step slices
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// One resolved axis selection: first element, element count, and step
///
/// `begin` is always a valid index into the axis when `len > 0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxisSlice {
    /// Index of the first selected element
    pub begin: usize,
    /// Number of selected elements
    pub len: usize,
    /// Distance between selected elements (never zero)
    pub step: isize,
}

/// Layout describes the memory layout of a tensor
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    /// Shape: size along each dimension
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each dimension
    strides: Strides,
    /// Offset: starting element index in the underlying storage
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use npindex::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self::contiguous_at(shape, 0)
    }

    /// Create a contiguous layout starting at `offset` elements into storage
    pub fn contiguous_at(shape: &[usize], offset: usize) -> Self {
        let shape: Shape = shape.iter().copied().collect();
        let strides = Self::compute_contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset,
        }
    }

    /// Create a layout with explicit shape, strides, and offset
    pub fn new(shape: Shape, strides: Strides, offset: usize) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape,
            strides,
            offset,
        }
    }

    /// Create a scalar (0-dimensional) layout
    pub fn scalar() -> Self {
        Self {
            shape: SmallVec::new(),
            strides: SmallVec::new(),
            offset: 0,
        }
    }

    /// Compute contiguous strides for a given shape (row-major order)
    pub fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1isize;

        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim.max(1) as isize;
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check if the tensor is a scalar (0 dimensions)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Check if memory is contiguous (row-major order)
    ///
    /// The offset is not part of the test: a flat sub-range of a contiguous
    /// buffer is itself contiguous. Strides of size-1 axes are ignored.
    pub fn is_contiguous(&self) -> bool {
        let expected = Self::compute_contiguous_strides(&self.shape);
        self.shape
            .iter()
            .zip(self.strides.iter().zip(expected.iter()))
            .all(|(&dim, (&st, &exp))| dim <= 1 || st == exp)
    }

    /// Normalize a dimension index (handle negative indices)
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Compute the linear index (element offset) for given indices
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }

        for (idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if *idx >= dim {
                return None;
            }
        }

        let mut linear = self.offset as isize;
        for (&idx, &stride) in indices.iter().zip(self.strides.iter()) {
            linear += idx as isize * stride;
        }

        Some(linear as usize)
    }

    /// Create a transposed layout (swap two dimensions)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Option<Self> {
        let d0 = self.normalize_dim(dim0)?;
        let d1 = self.normalize_dim(dim1)?;

        let mut new_shape = self.shape.clone();
        let mut new_strides = self.strides.clone();

        new_shape.swap(d0, d1);
        new_strides.swap(d0, d1);

        Some(Self {
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
        })
    }

    /// Create a reshaped layout (if contiguous)
    ///
    /// Returns None if the layout is not contiguous or element counts differ.
    /// The storage offset is preserved, so views of sub-ranges stay views.
    pub fn reshape(&self, new_shape: &[usize]) -> Option<Self> {
        if !self.is_contiguous() {
            return None;
        }

        let new_count: usize = new_shape.iter().product();
        if new_count != self.elem_count() {
            return None;
        }

        Some(Self::contiguous_at(new_shape, self.offset))
    }

    /// Remove the listed size-1 dimensions
    ///
    /// `None` removes every size-1 dimension. Returns None if a listed axis is
    /// out of range or does not have size 1.
    pub fn squeeze(&self, axes: Option<&[usize]>) -> Option<Self> {
        let keep: Vec<bool> = match axes {
            Some(axes) => {
                let mut keep = vec![true; self.ndim()];
                for &ax in axes {
                    if ax >= self.ndim() || self.shape[ax] != 1 {
                        return None;
                    }
                    keep[ax] = false;
                }
                keep
            }
            None => self.shape.iter().map(|&s| s != 1).collect(),
        };

        let mut new_shape = Shape::new();
        let mut new_strides = Strides::new();
        for ((&s, &st), keep) in self.shape.iter().zip(self.strides.iter()).zip(keep) {
            if keep {
                new_shape.push(s);
                new_strides.push(st);
            }
        }
        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Create an unsqueezed layout (add dimension of size 1)
    pub fn unsqueeze(&self, dim: isize) -> Option<Self> {
        let ndim = self.ndim();
        let idx = if dim < 0 {
            ndim as isize + dim + 1
        } else {
            dim
        };

        if idx < 0 || idx as usize > ndim {
            return None;
        }
        let idx = idx as usize;

        let mut new_shape = self.shape.clone();
        let mut new_strides = self.strides.clone();

        let new_stride = if idx < ndim {
            new_strides[idx] * new_shape[idx] as isize
        } else {
            1
        };

        new_shape.insert(idx, 1);
        new_strides.insert(idx, new_stride);

        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Create a broadcast layout to a target shape
    ///
    /// Returns None if shapes are not broadcastable
    pub fn broadcast_to(&self, target: &[usize]) -> Option<Self> {
        if target.len() < self.ndim() {
            return None;
        }

        let mut new_shape = Shape::new();
        let mut new_strides = Strides::new();

        // Pad with leading 1s
        let pad = target.len() - self.ndim();
        for &t in &target[..pad] {
            new_shape.push(t);
            new_strides.push(0);
        }

        for ((&s, &st), &t) in self
            .shape
            .iter()
            .zip(self.strides.iter())
            .zip(&target[pad..])
        {
            if s == t {
                new_shape.push(t);
                new_strides.push(st);
            } else if s == 1 {
                new_shape.push(t);
                new_strides.push(0);
            } else {
                return None;
            }
        }

        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Narrow one dimension to `[start, start + length)` (zero-copy)
    pub fn narrow(&self, dim: usize, start: usize, length: usize) -> Option<Self> {
        if dim >= self.ndim() || start + length > self.shape[dim] {
            return None;
        }

        let mut new_shape = self.shape.clone();
        new_shape[dim] = length;
        let offset = if length == 0 {
            self.offset
        } else {
            (self.offset as isize + start as isize * self.strides[dim]) as usize
        };

        Some(Self::new(new_shape, self.strides.clone(), offset))
    }

    /// Apply one resolved selection per dimension, producing a strided layout
    ///
    /// Returns None if the number of selections differs from `ndim` or a
    /// selection reaches outside its axis.
    pub fn slice(&self, axes: &[AxisSlice]) -> Option<Self> {
        if axes.len() != self.ndim() {
            return None;
        }

        let mut offset = self.offset as isize;
        let mut new_shape = Shape::with_capacity(axes.len());
        let mut new_strides = Strides::with_capacity(axes.len());
        let empty = axes.iter().any(|a| a.len == 0);

        for (ax, (&dim, &stride)) in axes.iter().zip(self.shape.iter().zip(self.strides.iter())) {
            if ax.step == 0 {
                return None;
            }
            if ax.len > 0 {
                let last = ax.begin as isize + (ax.len as isize - 1) * ax.step;
                if ax.begin >= dim || last < 0 || last as usize >= dim {
                    return None;
                }
                if !empty {
                    offset += ax.begin as isize * stride;
                }
            }
            new_shape.push(ax.len);
            new_strides.push(stride * ax.step);
        }

        Some(Self::new(new_shape, new_strides, offset as usize))
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}

/// Compute the broadcast shape of two shapes
///
/// Trailing dimensions are aligned; a size-1 dimension stretches to match.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Option<Shape> {
    let max_ndim = a.len().max(b.len());
    let mut result = Shape::with_capacity(max_ndim);

    for i in 0..max_ndim {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        if a_dim == b_dim {
            result.push(a_dim);
        } else if a_dim == 1 {
            result.push(b_dim);
        } else if b_dim == 1 {
            result.push(a_dim);
        } else {
            return None;
        }
    }

    result.reverse();
    Some(result)
}
