//! Multi-pass driver.
//!
//! The host calls [`PassController::process`] once per compiler pass. A pass
//! either defers (some component could not be decided because its base type
//! is not visible yet) or emits everything accepted so far, exactly once.
//! Deferral is a return value: the host feeds the generated classes back
//! into its hierarchy and presents the deferred symbols again.

use std::collections::BTreeSet;
use std::fmt;

use retain_model::diagnostics::codes;
use retain_model::names;
use retain_model::{
    AnnotatedSymbol, Artifact, ClassDecl, ClassKind, ComponentDeclarations, DependencyMarker,
    Diagnostic, ProcessorOptions, RuntimePlan, Severity,
};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::collect::{RecognizedBases, collect, merge_accepted};
use crate::dependency::{build_marker, marker_symbols};
use crate::emit::plan_saver;
use crate::hierarchy::TypeHierarchy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassState {
    /// Collecting; nothing generated yet.
    Scan,
    /// Every declaration is decided and generation is running.
    Emit,
    /// Generation happened; later passes only warn.
    Done,
}

impl PassState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassState::Scan => "scan",
            PassState::Emit => "emit",
            PassState::Done => "done",
        }
    }
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host presents to one pass.
#[derive(Debug, Clone, Copy)]
pub struct PassInput<'a> {
    pub hierarchy: &'a TypeHierarchy,
    pub symbols: &'a [AnnotatedSymbol],
    /// Dependency markers visible on the classpath.
    pub markers: &'a [DependencyMarker],
}

impl<'a> PassInput<'a> {
    pub fn new(hierarchy: &'a TypeHierarchy, symbols: &'a [AnnotatedSymbol]) -> Self {
        Self {
            hierarchy,
            symbols,
            markers: &[],
        }
    }

    #[must_use]
    pub fn with_markers(mut self, markers: &'a [DependencyMarker]) -> Self {
        self.markers = markers;
        self
    }
}

/// Result of one pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassOutcome {
    pub pass: u32,
    /// Symbols to present again next pass.
    pub deferred: Vec<AnnotatedSymbol>,
    pub artifacts: Vec<Artifact>,
    /// Declarations of generated classes, to be made visible next pass.
    pub generated_classes: Vec<ClassDecl>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PassOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Scan/Emit/Done state machine over host passes.
#[derive(Debug)]
pub struct PassController {
    options: ProcessorOptions,
    bases: RecognizedBases,
    state: PassState,
    pass: u32,
    accepted: Vec<ComponentDeclarations>,
    deferred: Vec<AnnotatedSymbol>,
    declared_packages: BTreeSet<String>,
    taken_markers: BTreeSet<String>,
}

impl PassController {
    pub fn new(options: ProcessorOptions) -> Self {
        let bases = RecognizedBases::from_options(&options);
        Self {
            options,
            bases,
            state: PassState::Scan,
            pass: 0,
            accepted: Vec::new(),
            deferred: Vec::new(),
            declared_packages: BTreeSet::new(),
            taken_markers: BTreeSet::new(),
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Number of passes processed so far.
    pub fn passes(&self) -> u32 {
        self.pass
    }

    pub fn accepted(&self) -> &[ComponentDeclarations] {
        &self.accepted
    }

    /// Symbols deferred by the latest pass.
    pub fn deferred(&self) -> &[AnnotatedSymbol] {
        &self.deferred
    }

    pub fn process(&mut self, input: PassInput<'_>) -> PassOutcome {
        self.pass += 1;
        let span = info_span!("pass", pass = self.pass, state = %self.state);
        let _guard = span.enter();

        let mut outcome = PassOutcome {
            pass: self.pass,
            ..PassOutcome::default()
        };
        for marker in input.markers {
            self.declared_packages.extend(marker.dotted_packages());
            self.taken_markers.insert(marker.file_property.clone());
        }

        if self.state == PassState::Done {
            self.report_late(&input, &mut outcome);
            return outcome;
        }

        if self.pass == 1 {
            self.emit_runtime(input.hierarchy, &mut outcome);
        }

        let mut symbols = input.symbols.to_vec();
        if self.pass == 1 && !self.options.is_dependency {
            symbols.extend(marker_symbols(input.markers, input.hierarchy));
        }

        let collection = collect(&symbols, input.hierarchy, &self.bases);
        outcome.diagnostics.extend(collection.diagnostics());
        merge_accepted(&mut self.accepted, collection.accepted);
        self.deferred = collection.deferred;

        if !self.deferred.is_empty() {
            info!(deferred = self.deferred.len(), "deferring to next pass");
            outcome.deferred = self.deferred.clone();
            return outcome;
        }

        self.generate(input.hierarchy, &mut outcome);
        outcome
    }

    /// Ends processing once the host has no more passes.
    ///
    /// Declarations still deferred are reported; the accepted ones are
    /// generated if no pass did so yet.
    pub fn finish(&mut self, hierarchy: &TypeHierarchy) -> PassOutcome {
        let span = info_span!("finish", passes = self.pass, state = %self.state);
        let _guard = span.enter();

        let mut outcome = PassOutcome {
            pass: self.pass,
            ..PassOutcome::default()
        };
        if self.state == PassState::Done {
            return outcome;
        }
        for symbol in self.deferred.drain(..) {
            warn!(symbol = %symbol.display_name(), "component never resolved");
            outcome.diagnostics.push(
                Diagnostic::error(
                    codes::UNRESOLVED_AT_EXHAUSTION,
                    format!(
                        "Could not decide whether the class of {} extends {} or {} after {} passes",
                        symbol.display_name(),
                        self.bases.activity,
                        self.bases.fragment,
                        self.pass
                    ),
                )
                .with_symbol(symbol.display_name()),
            );
        }
        self.generate(hierarchy, &mut outcome);
        outcome
    }

    fn generate(&mut self, hierarchy: &TypeHierarchy, outcome: &mut PassOutcome) {
        self.state = PassState::Emit;
        if self.options.is_dependency {
            if let Some(marker) = build_marker(
                &self.accepted,
                &self.declared_packages,
                &self.taken_markers,
                &self.options,
            ) {
                outcome.artifacts.push(Artifact::DependencyMarker(marker));
            }
        } else {
            let output = plan_saver(&self.options.package, &self.accepted, hierarchy);
            if output.plan.components.is_empty() {
                outcome.diagnostics.push(Diagnostic {
                    severity: Severity::Info,
                    ..Diagnostic::warning(
                        codes::NO_RETAINED_STATE,
                        "No component retains state; generating an empty saver",
                    )
                });
            }
            outcome.diagnostics.extend(output.diagnostics);
            outcome.generated_classes.push(
                ClassDecl::new(self.options.qualify(names::GENERATED_STATE_SAVER))
                    .with_supertype(self.options.qualify(names::STATE_SAVER)),
            );
            outcome.artifacts.push(Artifact::Saver(output.plan));
        }
        self.state = PassState::Done;
        info!(artifacts = outcome.artifacts.len(), "generation complete");
    }

    fn emit_runtime(&self, hierarchy: &TypeHierarchy, outcome: &mut PassOutcome) {
        if !self.options.emit_runtime
            || self.options.activity_base.is_some()
            || self.options.fragment_base.is_some()
        {
            return;
        }
        if hierarchy.contains(&self.bases.activity) || hierarchy.contains(&self.bases.fragment) {
            debug!("runtime base components already visible");
            return;
        }
        info!(package = %self.options.package, "emitting runtime base components");
        outcome.artifacts.push(Artifact::Runtime(RuntimePlan {
            package: self.options.package.clone(),
            activity_superclass: names::ANDROIDX_APPCOMPAT_ACTIVITY.to_string(),
            fragment_superclass: names::ANDROIDX_FRAGMENT.to_string(),
        }));
        outcome.generated_classes.extend(runtime_classes(&self.options));
    }

    fn report_late(&self, input: &PassInput<'_>, outcome: &mut PassOutcome) {
        let collection = collect(input.symbols, input.hierarchy, &self.bases);
        let late = collection
            .accepted
            .iter()
            .flat_map(|group| group.declarations.iter())
            .filter(|declaration| {
                !self.accepted.iter().any(|group| {
                    group
                        .declarations
                        .iter()
                        .any(|known| known.component == declaration.component && known.name == declaration.name)
                })
            })
            .map(|declaration| format!("{}#{}", declaration.component, declaration.name))
            .chain(collection.deferred.iter().map(AnnotatedSymbol::display_name));
        for symbol in late {
            warn!(%symbol, "declaration discovered after generation");
            outcome.diagnostics.push(
                Diagnostic::warning(
                    codes::LATE_DECLARATION,
                    format!("{symbol} was discovered after the state saver was generated and is not retained"),
                )
                .with_symbol(symbol),
            );
        }
    }
}

/// Declarations of the runtime sources, as the next pass sees them.
pub fn runtime_classes(options: &ProcessorOptions) -> Vec<ClassDecl> {
    let state_saver = options.qualify(names::STATE_SAVER);
    let state_holder = options.qualify(names::STATE_HOLDER);
    vec![
        ClassDecl::new(state_saver.clone()).with_kind(ClassKind::Interface),
        ClassDecl::new(options.qualify(names::EMPTY_STATE_SAVER)).with_supertype(state_saver),
        ClassDecl::new(state_holder.clone()).with_kind(ClassKind::Interface),
        ClassDecl::new(options.qualify(names::EMPTY_STATE_HOLDER)).with_supertype(state_holder),
        ClassDecl::new(options.qualify(names::IDENTIFICATION_STRATEGY))
            .with_kind(ClassKind::Enum)
            .with_supertype(names::KOTLIN_ENUM),
        ClassDecl::new(options.activity_base()).with_supertype(names::ANDROIDX_APPCOMPAT_ACTIVITY),
        ClassDecl::new(options.fragment_base()).with_supertype(names::ANDROIDX_FRAGMENT),
    ]
}
