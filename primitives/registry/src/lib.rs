#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Provider Registry: the in-memory accumulator behind generated service files.
//!
//! This crate provides the multimap from provider interface to implementers that
//! is filled while a compilation runs, plus the plain-text format the accumulated
//! entries are persisted in. It's designed for build-time usage: entries only
//! ever accumulate, and iteration order is always sorted so that anything derived
//! from the registry is diff-stable.

pub mod services_file;

use std::collections::{BTreeMap, BTreeSet};

/// A registry of provider interfaces and the implementers registered against them.
///
/// Both interface and implementer names are canonical binary names.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProviderRegistry {
    /// Map from provider interface name to implementer names
    providers: BTreeMap<String, BTreeSet<String>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self { Self::default() }

    /// Register `implementer` against `interface`.
    ///
    /// Returns `true` if the pair was not present before. Adding the same pair
    /// again has no effect.
    pub fn add(&mut self, interface: impl Into<String>, implementer: impl Into<String>) -> bool {
        self.providers.entry(interface.into()).or_default().insert(implementer.into())
    }
}

/// Read-only interface to the `ProviderRegistry`.
///
/// Provides a clean API for querying accumulated registrations without
/// exposing mutation capabilities.
pub trait ProviderRegistryReader {
    /// Get all provider interface names, sorted.
    fn interfaces(&self) -> Vec<&str>;

    /// Get the implementers registered against `interface`.
    ///
    /// Returns `None` if nothing was registered against it.
    fn implementers(&self, interface: &str) -> Option<&BTreeSet<String>>;

    /// Get the number of distinct provider interfaces.
    fn interface_count(&self) -> usize;

    /// Get the total number of (interface, implementer) pairs.
    fn entry_count(&self) -> usize;

    /// Whether nothing has been registered yet.
    fn is_empty(&self) -> bool { self.interface_count() == 0 }
}

/// Implement the interface for `ProviderRegistry`.
impl ProviderRegistryReader for ProviderRegistry {
    fn interfaces(&self) -> Vec<&str> { self.providers.keys().map(|s| s.as_str()).collect() }

    fn implementers(&self, interface: &str) -> Option<&BTreeSet<String>> {
        self.providers.get(interface)
    }

    fn interface_count(&self) -> usize { self.providers.len() }

    fn entry_count(&self) -> usize { self.providers.values().map(BTreeSet::len).sum() }
}

pub use services_file::{check_services, read_services, write_services};
