//! Error types for npindex

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using npindex's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
///
/// Mirrors the NumPy exception families callers usually branch on:
/// shape problems, out-of-range integers, wrong selector or value kinds,
/// keys that cannot be dispatched, and internal invariant violations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Axis-count mismatch or non-broadcastable shapes
    Shape,
    /// Integer index outside `[-dim, dim)`
    Bounds,
    /// Unsupported selector type or assignment value type
    TypeKind,
    /// Key classifies as neither basic nor advanced
    UnsupportedKey,
    /// Normalizer produced fewer axes than `ndim` (a bug, not user error)
    InternalInvariant,
    /// Storage-engine failures (allocation, dtype, read-only, ...)
    Other,
}

/// Errors that can occur in npindex operations
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// More non-newaxis indices than array dimensions
    #[error("too many indices ({got}) for array with {ndim} dimensions")]
    TooManyIndices {
        /// Number of indices supplied
        got: usize,
        /// Number of array dimensions
        ndim: usize,
    },

    /// Key shape not accepted by the array (e.g. non-`()` key on a 0-d array)
    #[error("Invalid index: {reason}")]
    InvalidIndex {
        /// Description of the problem
        reason: String,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Integer index out of bounds along an axis
    #[error("index {index} is out of bounds for axis {axis} with size {size}")]
    IndexOutOfBounds {
        /// The offending index as written by the caller
        index: i64,
        /// Axis being indexed
        axis: usize,
        /// Size of that axis
        size: usize,
    },

    /// Selector kind that cannot be used as an index
    #[error("Unsupported index selector: {reason}")]
    UnsupportedSelector {
        /// Description of the selector
        reason: String,
    },

    /// Value kind that cannot be assigned into an array
    #[error("Unsupported assignment value: {reason}")]
    UnsupportedValue {
        /// Description of the value
        reason: String,
    },

    /// Key that is neither basic nor advanced
    #[error("Indexing with key {key} is not supported")]
    UnsupportedKey {
        /// Rendered key
        key: String,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// DType mismatch between operands
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Tensor is not contiguous when contiguous memory is required
    #[error("Operation requires contiguous tensor")]
    NotContiguous,

    /// Write attempted through a read-only array
    #[error("trying to {op} a readonly ndarray")]
    ReadOnly {
        /// What was attempted
        op: &'static str,
    },

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an unsupported selector error
    pub fn unsupported_selector(reason: impl Into<String>) -> Self {
        Self::UnsupportedSelector {
            reason: reason.into(),
        }
    }

    /// Create an unsupported value error
    pub fn unsupported_value(reason: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            reason: reason.into(),
        }
    }

    /// Which family this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ShapeMismatch { .. }
            | Self::BroadcastError { .. }
            | Self::TooManyIndices { .. }
            | Self::InvalidIndex { .. }
            | Self::InvalidDimension { .. } => ErrorKind::Shape,
            Self::IndexOutOfBounds { .. } => ErrorKind::Bounds,
            Self::UnsupportedSelector { .. } | Self::UnsupportedValue { .. } => {
                ErrorKind::TypeKind
            }
            Self::UnsupportedKey { .. } => ErrorKind::UnsupportedKey,
            Self::Internal(_) => ErrorKind::InternalInvariant,
            Self::UnsupportedDType { .. }
            | Self::DTypeMismatch { .. }
            | Self::OutOfMemory { .. }
            | Self::InvalidArgument { .. }
            | Self::NotContiguous
            | Self::ReadOnly { .. }
            | Self::Backend(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::broadcast(&[2], &[3]).kind(), ErrorKind::Shape);
        assert_eq!(
            Error::IndexOutOfBounds {
                index: 4,
                axis: 0,
                size: 4
            }
            .kind(),
            ErrorKind::Bounds
        );
        assert_eq!(
            Error::unsupported_selector("float array").kind(),
            ErrorKind::TypeKind
        );
        assert_eq!(
            Error::Internal("too few indices".into()).kind(),
            ErrorKind::InternalInvariant
        );
    }

    #[test]
    fn test_bounds_message() {
        let err = Error::IndexOutOfBounds {
            index: -5,
            axis: 1,
            size: 4,
        };
        assert_eq!(
            err.to_string(),
            "index -5 is out of bounds for axis 1 with size 4"
        );
    }
}
