//! Conformance Validation
//!
//! Optionally checks that a registered implementer really is a subtype of the
//! provider interface it claims. The check is off by default so that a type can
//! be marked before its contract is implemented; ordinary type checking catches
//! the mismatch elsewhere.

use ir::{DeclId, SymbolModel, SymbolResult};

/// Conformance validator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConformanceValidator {
    enabled: bool,
}

impl ConformanceValidator {
    /// Create a validator; a disabled validator accepts every pair
    pub fn new(enabled: bool) -> Self { Self { enabled } }

    /// Whether the subtype check runs
    pub fn is_enabled(&self) -> bool { self.enabled }

    /// Whether the pair `(implementer, interface)` may be registered.
    pub fn accepts<M: SymbolModel + ?Sized>(
        &self,
        model: &M,
        implementer: &DeclId,
        interface: &DeclId,
    ) -> SymbolResult<bool> {
        if !self.enabled {
            return Ok(true);
        }
        model.is_subtype(implementer, interface)
    }
}
