#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! AutoService Analysis
//!
//! This crate provides the per-pass analysis of the registry processor: naming
//! declarations, scanning marked declarations, and optionally checking that each
//! implementer conforms to the interfaces it claims. It also defines the
//! diagnostics the processor reports and the error taxonomy behind them.

use std::fmt;

use ir::{DeclId, SymbolError};
use thiserror::Error;

pub mod binary_name;
pub mod scanner;
pub mod validator;

pub use binary_name::{binary_name, qualified_name};
pub use scanner::{MarkerScanner, ScanSummary};
pub use validator::ConformanceValidator;

/// Name of the marker attribute that registers a declaration.
pub const MARKER_NAME: &str = "AutoService";

/// Message reported when a marker names no provider interface.
pub const MISSING_SERVICES_ERROR: &str = "No service interfaces provided for element!";

#[derive(Debug, Error)]
/// Errors the processor can report. Only resource writes and internal failures are fatal.
pub enum ProcessorError {
    /// The marker's argument resolves to zero interfaces.
    #[error("No service interfaces provided for element!")]
    MissingProvider {
        /// Qualified name of the offending declaration
        element: String,
    },
    /// Verification is enabled and the implementer is not a subtype of the interface.
    #[error(
        "ServiceProviders must implement their service provider interface. {implementer} does not implement {interface}"
    )]
    NotImplemented {
        /// Qualified name of the implementer
        implementer: String,
        /// Qualified name of the provider interface
        interface: String,
    },
    /// An existing registry resource could not be read.
    #[error("Unable to read {resource}: {source}")]
    ResourceRead {
        /// Resource name
        resource: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// A registry resource could not be written.
    #[error("Unable to create {resource}, {source}")]
    ResourceWrite {
        /// Resource name
        resource: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// The symbol model failed while scanning.
    #[error("{0}")]
    Internal(#[from] SymbolError),
}

/// Result alias for processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational output, only produced in debug mode
    Note,
    /// Something suspicious that does not stop registration
    Warning,
    /// A failure; the compilation should not be considered successful
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => f.write_str("note"),
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A message for the host's diagnostic output, optionally attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the message is
    pub severity: Severity,
    /// Human-readable text
    pub message: String,
    /// Declaration the message is about
    pub element: Option<DeclId>,
    /// Whether the message points at the declaration's marker rather than the declaration
    pub on_marker: bool,
}

impl Diagnostic {
    /// An unattributed note.
    pub fn note(message: impl Into<String>) -> Self {
        Self { severity: Severity::Note, message: message.into(), element: None, on_marker: false }
    }

    /// An unattributed warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, ..Self::note(message) }
    }

    /// An error attached to `element`'s marker.
    pub fn error_at(error: &ProcessorError, element: &DeclId) -> Self {
        Self {
            severity: Severity::Error,
            message: error.to_string(),
            element: Some(element.clone()),
            on_marker: true,
        }
    }

    /// An unattributed fatal error.
    pub fn fatal(error: &ProcessorError) -> Self {
        Self {
            severity: Severity::Error,
            message: format!("FATAL ERROR: {}", error),
            element: None,
            on_marker: false,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) if self.on_marker =>
                write!(f, "{}: {} (@{} on {})", self.severity, self.message, MARKER_NAME, element),
            Some(element) => write!(f, "{}: {} ({})", self.severity, self.message, element),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Receiver of processor diagnostics
pub trait DiagnosticSink {
    /// Report one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Diagnostic sink that keeps everything it receives
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self { Self::default() }

    /// All diagnostics in report order
    pub fn entries(&self) -> &[Diagnostic] { &self.entries }

    /// Diagnostics of the given severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.severity == severity)
    }

    /// Number of error diagnostics
    pub fn error_count(&self) -> usize { self.with_severity(Severity::Error).count() }

    /// Whether any error was reported
    pub fn has_errors(&self) -> bool { self.error_count() > 0 }

    /// Merge another set of diagnostics into this one
    pub fn merge(&mut self, other: &Diagnostics) { self.entries.extend(other.entries.iter().cloned()); }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) { self.entries.push(diagnostic); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_error_messages() {
        let err = ProcessorError::MissingProvider { element: "impl.Foo".to_string() };
        assert_eq!(err.to_string(), MISSING_SERVICES_ERROR);

        let err = ProcessorError::NotImplemented {
            implementer: "impl.Foo".to_string(),
            interface: "svc.Bar".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ServiceProviders must implement their service provider interface. impl.Foo does not implement svc.Bar"
        );

        let err = ProcessorError::ResourceWrite {
            resource: "META-INF/services/svc.Bar".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(err.to_string(), "Unable to create META-INF/services/svc.Bar, read-only");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_diagnostic_constructors() {
        let err = ProcessorError::MissingProvider { element: "impl.Foo".to_string() };
        let diagnostic = Diagnostic::error_at(&err, &DeclId::new("impl.Foo"));
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic.on_marker);
        assert_eq!(
            diagnostic.to_string(),
            "error: No service interfaces provided for element! (@AutoService on impl.Foo)"
        );

        let fatal = Diagnostic::fatal(&ProcessorError::Internal(SymbolError::UnknownDeclaration(
            DeclId::new("x.Y"),
        )));
        assert_eq!(fatal.element, None);
        assert_eq!(fatal.to_string(), "error: FATAL ERROR: unknown declaration `x.Y`");

        assert_eq!(Diagnostic::warning("careful").to_string(), "warning: careful");
        assert_eq!(Diagnostic::note("hello").severity, Severity::Note);
    }

    #[test]
    fn test_diagnostics_sink() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());

        diagnostics.report(Diagnostic::note("one"));
        diagnostics.report(Diagnostic::warning("two"));
        assert!(!diagnostics.has_errors());

        let mut other = Diagnostics::new();
        other.report(Diagnostic::fatal(&ProcessorError::MissingProvider {
            element: "impl.Foo".to_string(),
        }));
        diagnostics.merge(&other);

        assert_eq!(diagnostics.entries().len(), 3);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.with_severity(Severity::Note).count(), 1);
    }
}
