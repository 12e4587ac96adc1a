//! Classification of normalized keys

use super::key::Selector;
use crate::runtime::Runtime;

/// Which indexing engine serves a normalized key
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DispatchCode {
    /// Only integers, slices and new axes
    Basic,
    /// At least one integer position array
    Advanced,
    /// Nothing can serve the key (boolean masks, stray ellipsis)
    Unsupported,
}

/// Classify normalized entries by selector kind
pub fn classify<R: Runtime>(entries: &[Selector<R>]) -> DispatchCode {
    let mut code = DispatchCode::Basic;
    for entry in entries {
        match entry {
            Selector::Ellipsis => return DispatchCode::Unsupported,
            Selector::Array(a) if a.dtype().is_bool() => return DispatchCode::Unsupported,
            Selector::Array(_) => code = DispatchCode::Advanced,
            Selector::Int(_) | Selector::Slice(_) | Selector::NewAxis => {}
        }
    }
    code
}
