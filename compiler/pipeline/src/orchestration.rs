//! Compilation orchestration.
//!
//! Plays the part of the host toolchain: drives a processor through every
//! regular pass of a compilation followed by the final pass.

use analysis::{DiagnosticSink, ScanSummary};
use config::ProcessorOptions;
use ir::{Round, SymbolModel};
use registry::ProviderRegistry;
use tracing::info;

use crate::filer::Filer;
use crate::merger::MergeReport;
use crate::processor::{AutoServiceProcessor, ProcessingEnv};

/// What a whole compilation did
#[derive(Debug, Default, Clone)]
pub struct CompilationReport {
    /// Number of regular passes run
    pub rounds: usize,
    /// One summary per regular pass that scanned successfully
    pub scans: Vec<ScanSummary>,
    /// Final merge outcome; `None` when the merge failed
    pub merge: Option<MergeReport>,
    /// Registrations accumulated over all passes
    pub registry: ProviderRegistry,
}

impl CompilationReport {
    /// Registry files written by the final merge
    pub fn written(&self) -> &[String] {
        self.merge.as_ref().map(|merge| merge.written.as_slice()).unwrap_or_default()
    }
}

/// Run `rounds` regular passes over `model` followed by the final pass.
///
/// At least one regular pass always runs. Diagnostics go to `sink`; whether the
/// compilation succeeded is up to the caller to judge from them.
pub fn run_compilation(
    model: &dyn SymbolModel,
    rounds: usize,
    filer: &mut dyn Filer,
    sink: &mut dyn DiagnosticSink,
    options: ProcessorOptions,
) -> CompilationReport {
    let rounds = rounds.max(1);
    let mut processor = AutoServiceProcessor::new(options);
    let mut env = ProcessingEnv { model, filer, sink };

    for index in 0..rounds {
        processor.process(&mut env, &Round::new(index));
    }
    processor.process(&mut env, &Round::last(rounds));

    info!("Compilation finished after {} rounds", rounds);
    CompilationReport {
        rounds,
        scans: processor.scans().to_vec(),
        merge: processor.merge_report().cloned(),
        registry: processor.registry().clone(),
    }
}
