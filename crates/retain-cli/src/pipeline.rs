//! Snapshot loading, option resolution and the host pass loop.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use retain_core::config::{CONFIG_FILE_NAME, apply_option_str, keys};
use retain_core::{Classifier, PassController, PassInput, TypeHierarchy, load_options};
use retain_model::{
    Artifact, Classification, DiagnosticReport, ProcessorOptions, SymbolSnapshot, TypeRef,
};
use retain_output::{GeneratedFile, render, write_files};
use serde::Serialize;
use tracing::{debug, info, info_span};

/// Where processor options come from, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct OptionSources {
    /// Explicit config file; otherwise `retain.toml` next to the snapshot.
    pub config: Option<PathBuf>,
    /// Host-style `key=value` options.
    pub overrides: Vec<String>,
    pub package: Option<String>,
    pub dependency: bool,
    pub no_runtime: bool,
}

pub fn load_snapshot(path: &Path) -> Result<SymbolSnapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let snapshot: SymbolSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    debug!(
        classes = snapshot.classes.len(),
        libraries = snapshot.libraries.len(),
        markers = snapshot.markers.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Defaults, then the config file, then `key=value` options, then flags.
pub fn resolve_options(snapshot: &Path, sources: &OptionSources) -> Result<ProcessorOptions> {
    let config = match &sources.config {
        Some(path) => Some(path.clone()),
        None => snapshot
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file()),
    };
    let mut options = match &config {
        Some(path) => load_options(path).context("load processor options")?,
        None => ProcessorOptions::default(),
    };
    for input in &sources.overrides {
        apply_option_str(&mut options, input).context("apply processor option")?;
    }
    if let Some(package) = &sources.package {
        apply_option_str(&mut options, &format!("{}={package}", keys::PACKAGE))
            .context("apply --package")?;
    }
    if sources.dependency {
        options.is_dependency = true;
    }
    if sources.no_runtime {
        options.emit_runtime = false;
    }
    Ok(options)
}

/// What the passes produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassRun {
    pub passes: u32,
    pub artifacts: Vec<Artifact>,
    pub diagnostics: DiagnosticReport,
}

impl PassRun {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Drives the controller the way a host compiler would.
///
/// Each pass sees the snapshot classes plus everything generated so far and
/// gets the symbols deferred by the previous pass. Stops once nothing is
/// deferred or `max_passes` is reached, then lets the controller finish.
pub fn run_passes(snapshot: &SymbolSnapshot, options: &ProcessorOptions) -> PassRun {
    let mut hierarchy = TypeHierarchy::with_platform();
    hierarchy.extend(snapshot.visible_classes().cloned());
    let mut controller = PassController::new(options.clone());
    let mut symbols = snapshot.annotated_symbols();
    let mut run = PassRun::default();

    for _ in 0..options.max_passes {
        let outcome =
            controller.process(PassInput::new(&hierarchy, &symbols).with_markers(&snapshot.markers));
        run.artifacts.extend(outcome.artifacts);
        run.diagnostics.extend(outcome.diagnostics);
        hierarchy.extend(outcome.generated_classes);
        if outcome.deferred.is_empty() {
            break;
        }
        symbols = outcome.deferred;
    }

    let outcome = controller.finish(&hierarchy);
    run.artifacts.extend(outcome.artifacts);
    run.diagnostics.extend(outcome.diagnostics);
    run.passes = controller.passes();
    run
}

/// Result of one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub options: ProcessorOptions,
    pub run: PassRun,
    pub files: Vec<GeneratedFile>,
    pub out_dir: PathBuf,
    /// Paths actually written; empty on a dry run.
    pub written: Vec<PathBuf>,
}

impl GenerationResult {
    pub fn has_errors(&self) -> bool {
        self.run.has_errors()
    }
}

/// Loads the snapshot, runs the passes, renders and writes the sources.
pub fn generate(
    snapshot_path: &Path,
    options: ProcessorOptions,
    out_dir: &Path,
    dry_run: bool,
) -> Result<GenerationResult> {
    let span = info_span!("generate", snapshot = %snapshot_path.display());
    let _guard = span.enter();

    let snapshot = load_snapshot(snapshot_path)?;
    let run = run_passes(&snapshot, &options);
    let files: Vec<GeneratedFile> = run.artifacts.iter().flat_map(render).collect();
    let written = if dry_run {
        info!(files = files.len(), "dry run, nothing written");
        Vec::new()
    } else {
        write_files(out_dir, &files)?
    };
    Ok(GenerationResult {
        options,
        run,
        files,
        out_dir: out_dir.to_path_buf(),
        written,
    })
}

/// Writes the artifacts and diagnostics of `run` as pretty JSON.
pub fn write_plan_json(path: &Path, run: &PassRun) -> Result<()> {
    let json = serde_json::to_string_pretty(run).context("serialize plan")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Classifies each type against the platform classes plus `snapshot`.
pub fn classify_types(
    inputs: &[String],
    snapshot: Option<&SymbolSnapshot>,
) -> Result<Vec<(TypeRef, Classification)>> {
    let mut hierarchy = TypeHierarchy::with_platform();
    if let Some(snapshot) = snapshot {
        hierarchy.extend(snapshot.visible_classes().cloned());
    }
    let mut classifier = Classifier::new(&hierarchy);
    inputs
        .iter()
        .map(|input| {
            let ty = TypeRef::parse(input).with_context(|| format!("parse type {input:?}"))?;
            let classification = classifier.classify(&ty);
            Ok((ty, classification))
        })
        .collect()
}
