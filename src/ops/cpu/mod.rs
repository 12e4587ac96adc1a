//! CPU implementations of the operation traits
//!
//! Each file implements one trait for `CpuClient` by forwarding to the
//! helpers in `runtime::cpu::helpers`.

mod binary;
mod indexing;
mod shape;
mod type_conversion;
mod utility;
