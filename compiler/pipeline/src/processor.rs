//! Processor entry point.
//!
//! The host drives an [`AutoServiceProcessor`] once per processing pass. Regular
//! passes scan marked declarations into the processor's registry, which lives
//! as long as the processor so entries from earlier passes are never lost. The
//! final pass merges the registry into the registry resources.

use analysis::{
    ConformanceValidator, Diagnostic, DiagnosticSink, MarkerScanner, Result, ScanSummary,
};
use config::{ProcessorOptions, DEBUG_OPTION, VERIFY_OPTION};
use ir::{Round, SymbolModel};
use registry::ProviderRegistry;
use tracing::{error, info, warn};

use crate::filer::Filer;
use crate::merger::{MergeReport, RegistryFileMerger};

/// Capabilities the host hands to the processor for one pass
pub struct ProcessingEnv<'a> {
    /// Symbol model of the program being compiled
    pub model: &'a dyn SymbolModel,
    /// Output location for registry resources
    pub filer: &'a mut dyn Filer,
    /// Receiver of diagnostics
    pub sink: &'a mut dyn DiagnosticSink,
}

/// Processor that accumulates registrations across passes and writes them at the end
#[derive(Debug, Default)]
pub struct AutoServiceProcessor {
    options: ProcessorOptions,
    registry: ProviderRegistry,
    scans: Vec<ScanSummary>,
    merge: Option<MergeReport>,
    finalized: bool,
}

impl AutoServiceProcessor {
    /// Create a processor with the given options
    pub fn new(options: ProcessorOptions) -> Self { Self { options, ..Self::default() } }

    /// Option keys the processor understands
    pub fn supported_options() -> [&'static str; 2] { [VERIFY_OPTION, DEBUG_OPTION] }

    /// Active options
    pub fn options(&self) -> &ProcessorOptions { &self.options }

    /// Registrations accumulated so far
    pub fn registry(&self) -> &ProviderRegistry { &self.registry }

    /// Summaries of the scans performed so far, one per regular pass
    pub fn scans(&self) -> &[ScanSummary] { &self.scans }

    /// Result of the final merge, once it has succeeded
    pub fn merge_report(&self) -> Option<&MergeReport> { self.merge.as_ref() }

    /// Whether the final pass has run
    pub fn is_finalized(&self) -> bool { self.finalized }

    /// Handle one processing pass.
    ///
    /// Failures are reported to the sink as fatal diagnostics instead of being
    /// returned; the pass always counts as handled.
    pub fn process(&mut self, env: &mut ProcessingEnv<'_>, round: &Round) -> bool {
        if let Err(e) = self.try_process(env, round) {
            error!("{:?}", e);
            env.sink.report(Diagnostic::fatal(&e));
        }
        true
    }

    fn try_process(&mut self, env: &mut ProcessingEnv<'_>, round: &Round) -> Result<()> {
        if round.processing_over {
            self.finalize(env)
        } else {
            self.scan(env, round)
        }
    }

    fn scan(&mut self, env: &mut ProcessingEnv<'_>, round: &Round) -> Result<()> {
        let scanner =
            MarkerScanner::new(ConformanceValidator::new(self.options.verify), self.options.debug);
        let summary = scanner.scan(env.model, round, &mut self.registry, &mut *env.sink)?;
        info!(
            "Round {}: {} marked declarations, {} registrations",
            round.index, summary.declarations, summary.registered
        );
        self.scans.push(summary);
        Ok(())
    }

    fn finalize(&mut self, env: &mut ProcessingEnv<'_>) -> Result<()> {
        if self.finalized {
            warn!("Registry files were already generated; ignoring repeated final pass");
            env.sink.report(Diagnostic::warning(
                "Registry files were already generated; ignoring repeated final pass",
            ));
            return Ok(());
        }
        self.finalized = true;

        let merger = RegistryFileMerger::new(self.options.debug);
        let report = merger.merge(&self.registry, &mut *env.filer, &mut *env.sink)?;
        info!("Wrote {} registry files, {} unchanged", report.written.len(), report.unchanged.len());
        self.merge = Some(report);
        Ok(())
    }
}
