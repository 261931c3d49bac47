//! Marker Scanning
//!
//! For one processing pass, walks the declarations carrying the registration
//! marker, reads the provider interfaces from the marker argument and records
//! each accepted `(interface, implementer)` pair in the registry.

use ir::{Round, SymbolModel, SymbolResult};
use registry::ProviderRegistry;
use tracing::debug;

use crate::binary_name::{binary_name, qualified_name};
use crate::validator::ConformanceValidator;
use crate::{Diagnostic, DiagnosticSink, ProcessorError};

/// What one scan did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Marked declarations seen
    pub declarations: usize,
    /// Pairs handed to the registry (including pairs it already held)
    pub registered: usize,
    /// Declarations whose marker named no interface
    pub missing_providers: usize,
    /// Pairs rejected by the conformance validator
    pub not_implemented: usize,
}

/// Scanner for marked declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerScanner {
    validator: ConformanceValidator,
    debug: bool,
}

impl MarkerScanner {
    /// Create a scanner; `debug` turns on note diagnostics for every registration
    pub fn new(validator: ConformanceValidator, debug: bool) -> Self { Self { validator, debug } }

    /// Scan the marked declarations of `round` into `registry`.
    ///
    /// Missing or non-conforming providers are reported to `sink` and skipped.
    /// Symbol model failures abort the scan; pairs recorded before the failure
    /// stay in the registry.
    pub fn scan<M: SymbolModel + ?Sized>(
        &self,
        model: &M,
        round: &Round,
        registry: &mut ProviderRegistry,
        sink: &mut dyn DiagnosticSink,
    ) -> SymbolResult<ScanSummary> {
        let mut summary = ScanSummary::default();
        let elements = model.marked_declarations(round);
        self.log(sink, format!("Round {}: marked declarations {:?}", round.index, elements));

        for element in &elements {
            summary.declarations += 1;
            let provider_refs = model.marker_argument(element)?.provider_refs();

            if provider_refs.is_empty() {
                let error =
                    ProcessorError::MissingProvider { element: qualified_name(model, element)? };
                sink.report(Diagnostic::error_at(&error, element));
                summary.missing_providers += 1;
                continue;
            }

            let implementer = binary_name(model, element)?;
            for provider_ref in provider_refs {
                let provider = model.resolve(provider_ref)?;
                self.log(sink, format!("provider interface: {}", qualified_name(model, &provider.id)?));
                self.log(sink, format!("provider implementer: {}", qualified_name(model, element)?));

                if self.validator.accepts(model, element, &provider.id)? {
                    registry.add(binary_name(model, &provider.id)?, implementer.clone());
                    summary.registered += 1;
                } else {
                    let error = ProcessorError::NotImplemented {
                        implementer: qualified_name(model, element)?,
                        interface: qualified_name(model, &provider.id)?,
                    };
                    sink.report(Diagnostic::error_at(&error, element));
                    summary.not_implemented += 1;
                }
            }
        }

        Ok(summary)
    }

    fn log(&self, sink: &mut dyn DiagnosticSink, message: String) {
        debug!("{}", message);
        if self.debug {
            sink.report(Diagnostic::note(message));
        }
    }
}
