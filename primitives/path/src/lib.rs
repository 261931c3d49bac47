// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Resource naming for generated provider registries.
//!
//! This module provides the naming convention shared by the processor that writes
//! registry resources and the runtime lookup that reads them, and the mapping of
//! resource names onto an output directory.

pub mod path_utils;

// Re-export for convenience
pub use path_utils::*;
