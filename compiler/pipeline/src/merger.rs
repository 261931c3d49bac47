//! Registry File Merger
//!
//! Runs once at the end of a compilation. For every provider interface in the
//! accumulated registry it reads the existing registry resource, if any, and
//! rewrites it with the sorted union of the old and new entries. A resource is
//! left untouched when it already lists every new entry, so repeated builds
//! with nothing new produce no file churn.

use std::collections::BTreeSet;
use std::io;

use analysis::{Diagnostic, DiagnosticSink, ProcessorError, Result};
use registry::{check_services, read_services, write_services, ProviderRegistryReader};
use tracing::{debug, warn};

use crate::filer::Filer;

/// Outcome of one merge
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Interfaces whose resource was (re)written
    pub written: Vec<String>,
    /// Interfaces whose resource already listed every entry
    pub unchanged: Vec<String>,
}

impl MergeReport {
    /// Number of resources written
    pub fn write_count(&self) -> usize { self.written.len() }
}

/// Merges accumulated registrations into persisted registry resources
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryFileMerger {
    debug: bool,
}

impl RegistryFileMerger {
    /// Create a merger; `debug` turns on note diagnostics
    pub fn new(debug: bool) -> Self { Self { debug } }

    /// Merge every interface of `registry` into its resource, in sorted interface order.
    ///
    /// A resource that cannot be read is treated as empty. The first write
    /// failure stops the merge: interfaces already written keep their new
    /// contents and the remaining ones are not touched. An interface name that
    /// cannot name a resource, or an entry that would not read back unchanged,
    /// counts as a write failure and is detected before the resource is opened.
    pub fn merge<R: ProviderRegistryReader + ?Sized>(
        &self,
        registry: &R,
        filer: &mut dyn Filer,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<MergeReport> {
        let mut report = MergeReport::default();

        for interface in registry.interfaces() {
            let Some(new_entries) = registry.implementers(interface) else { continue };
            let resource = path::services_resource_name(interface);
            path::validate_interface_name(interface).map_err(|message| {
                ProcessorError::ResourceWrite {
                    resource: resource.clone(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, message),
                }
            })?;
            self.log(sink, format!("Working on resource file: {}", resource));

            let old_entries = self.read_existing(&*filer, &resource, sink);
            if new_entries.is_subset(&old_entries) {
                self.log(sink, "No new service entries being added.".to_string());
                report.unchanged.push(interface.to_string());
                continue;
            }

            let merged: BTreeSet<&str> =
                old_entries.iter().chain(new_entries.iter()).map(String::as_str).collect();
            self.log(sink, format!("New service file contents: {:?}", merged));

            write_resource(filer, &resource, &merged)
                .map_err(|source| ProcessorError::ResourceWrite { resource: resource.clone(), source })?;
            self.log(sink, format!("Wrote to: {}", filer.describe(&resource)));
            report.written.push(interface.to_string());
        }

        Ok(report)
    }

    fn read_existing(
        &self,
        filer: &dyn Filer,
        resource: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> BTreeSet<String> {
        self.log(sink, format!("Looking for existing resource file at {}", filer.describe(resource)));
        match filer.open_resource(resource).and_then(|reader| read_services(reader)) {
            Ok(entries) => {
                self.log(sink, format!("Existing service entries: {:?}", entries));
                entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.log(sink, "Resource file did not already exist.".to_string());
                BTreeSet::new()
            }
            Err(source) => {
                let error = ProcessorError::ResourceRead { resource: resource.to_string(), source };
                warn!("{}; treating it as empty", error);
                sink.report(Diagnostic::warning(error.to_string()));
                BTreeSet::new()
            }
        }
    }

    fn log(&self, sink: &mut dyn DiagnosticSink, message: String) {
        debug!("{}", message);
        if self.debug {
            sink.report(Diagnostic::note(message));
        }
    }
}

fn write_resource(filer: &mut dyn Filer, resource: &str, entries: &BTreeSet<&str>) -> io::Result<()> {
    let entries: Vec<&str> = entries.iter().copied().collect();
    // Creating the resource truncates it, so reject bad entries first
    check_services(&entries)?;
    let writer = filer.create_resource(resource)?;
    write_services(entries, writer)
}

#[cfg(test)]
mod tests {
    use analysis::{Diagnostics, Severity};
    use registry::ProviderRegistry;

    use super::*;
    use crate::filer::MemoryFiler;

    const GREETER: &str = "META-INF/services/svc.Greeter";

    fn registry(pairs: &[(&str, &str)]) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for (interface, implementer) in pairs {
            registry.add(*interface, *implementer);
        }
        registry
    }

    #[test]
    fn test_writes_new_resource() {
        let mut filer = MemoryFiler::new();
        let mut diagnostics = Diagnostics::new();
        let report = RegistryFileMerger::default()
            .merge(&registry(&[("svc.Greeter", "impl.EnglishGreeter")]), &mut filer, &mut diagnostics)
            .expect("merge succeeds");

        assert_eq!(report.written, vec!["svc.Greeter"]);
        assert_eq!(filer.contents(GREETER).as_deref(), Some("impl.EnglishGreeter\n"));
        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn test_unreadable_resource_is_treated_as_empty() {
        let mut filer = MemoryFiler::new().with_resource(GREETER, "impl.Lost\n");
        filer.fail_reads_of(GREETER);
        let mut diagnostics = Diagnostics::new();

        let report = RegistryFileMerger::default()
            .merge(&registry(&[("svc.Greeter", "impl.B")]), &mut filer, &mut diagnostics)
            .expect("read failures are not fatal");

        assert_eq!(report.write_count(), 1);
        assert_eq!(filer.contents(GREETER).as_deref(), Some("impl.B\n"));
        assert_eq!(diagnostics.with_severity(Severity::Warning).count(), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_debug_notes() {
        let mut filer = MemoryFiler::new();
        let mut diagnostics = Diagnostics::new();
        RegistryFileMerger::new(true)
            .merge(&registry(&[("svc.Greeter", "impl.A")]), &mut filer, &mut diagnostics)
            .expect("merge succeeds");

        let notes: Vec<&str> =
            diagnostics.with_severity(Severity::Note).map(|d| d.message.as_str()).collect();
        assert!(notes.contains(&"Resource file did not already exist."));
        assert!(notes.contains(&"Wrote to: memory:META-INF/services/svc.Greeter"));
    }
}
