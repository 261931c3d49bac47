#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Processing pipeline that turns marked declarations into persisted
//! service registries.
//!
//! ## Module Organization
//!
//! - `filer` - Resource access for registry files (`FsFiler`, `MemoryFiler`)
//! - `merger` - Merging accumulated entries into existing registry resources
//! - `processor` - Per-pass entry point owning the accumulated registry
//! - `orchestration` - Driving a whole compilation through all of its passes

pub mod filer;
pub mod merger;
pub mod orchestration;
pub mod processor;

pub use analysis::{ProcessorError, Result};
pub use filer::{Filer, FsFiler};
#[cfg(feature = "test-utils")]
pub use filer::MemoryFiler;
pub use merger::{MergeReport, RegistryFileMerger};
pub use orchestration::{run_compilation, CompilationReport};
pub use processor::{AutoServiceProcessor, ProcessingEnv};
