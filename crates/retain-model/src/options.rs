use serde::{Deserialize, Serialize};

use crate::names;

/// Package the runtime and the generated saver live in unless configured.
pub const DEFAULT_PACKAGE: &str = "dev.retain";

/// Upper bound on host passes before deferred declarations are reported.
pub const DEFAULT_MAX_PASSES: u32 = 8;

/// Processor configuration.
///
/// Loaded from `retain.toml`, from host `key=value` options, or built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorOptions {
    /// Package of the generated saver, holders and runtime base components.
    pub package: String,
    /// Library build: write a dependency marker instead of a saver.
    pub is_dependency: bool,
    /// Raise processor logging to debug.
    pub debug_logging: bool,
    /// Emit the runtime base components on the first pass when they are not
    /// already visible.
    pub emit_runtime: bool,
    /// Qualified name of the single-instance base component.
    pub activity_base: Option<String>,
    /// Qualified name of the repeatable base component.
    pub fragment_base: Option<String>,
    pub max_passes: u32,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            is_dependency: false,
            debug_logging: false,
            emit_runtime: true,
            activity_base: None,
            fragment_base: None,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl ProcessorOptions {
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, enable: bool) -> Self {
        self.is_dependency = enable;
        self
    }

    #[must_use]
    pub fn with_emit_runtime(mut self, enable: bool) -> Self {
        self.emit_runtime = enable;
        self
    }

    #[must_use]
    pub fn with_bases(mut self, activity: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.activity_base = Some(activity.into());
        self.fragment_base = Some(fragment.into());
        self
    }

    pub fn activity_base(&self) -> String {
        self.activity_base
            .clone()
            .unwrap_or_else(|| self.qualify(names::STATE_SAVING_ACTIVITY))
    }

    pub fn fragment_base(&self) -> String {
        self.fragment_base
            .clone()
            .unwrap_or_else(|| self.qualify(names::STATE_SAVING_FRAGMENT))
    }

    /// Package holding dependency markers.
    pub fn dependency_package(&self) -> String {
        self.qualify("dependencies")
    }

    /// `simple` placed in the configured package.
    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{simple}", self.package)
        }
    }
}
