//! Runtime backends for tensor computation
//!
//! This module defines the `Runtime` trait and the CPU backend that
//! implements it.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity, raw memory primitives)
//! ├── Device (identifies a specific compute unit / context)
//! └── Client (dispatches operations, carries parallelism config)
//! ```

pub mod helpers;
mod traits;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use helpers::ensure_contiguous;
pub use traits::{Device, Runtime, RuntimeClient};
