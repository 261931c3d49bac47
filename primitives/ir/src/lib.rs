#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! AutoService symbol model
//!
//! This crate defines the boundary between the registry processor and the host
//! compiler's front end. The processor never walks source code itself: it asks a
//! [`SymbolModel`] which declarations carry the registration marker, what the
//! marker's argument says, how type references resolve and whether one type is a
//! subtype of another.
//!
//! [`SymbolTable`] is a serializable implementation of that interface. It is what
//! the command-line driver loads from JSON, and what tests use in place of a real
//! compiler.

pub mod symbol_model;
pub mod symbol_table;

pub use symbol_model::*;
pub use symbol_table::SymbolTable;
