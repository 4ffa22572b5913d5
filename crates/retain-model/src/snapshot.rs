//! Symbol snapshot: a serialized capture of what the host compiler exposes.

use serde::{Deserialize, Serialize};

use crate::plan::DependencyMarker;
use crate::symbols::{AnnotatedSymbol, ClassDecl};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    /// Classes compiled in this module. Their `@Retain` properties are the
    /// annotated symbols of the first pass.
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    /// Classes visible on the classpath (other modules, platform extras).
    #[serde(default)]
    pub libraries: Vec<ClassDecl>,
    /// Annotation sites that are not class properties (top-level, local,
    /// misplaced on classes or functions).
    #[serde(default)]
    pub symbols: Vec<AnnotatedSymbol>,
    /// Dependency markers left by library builds.
    #[serde(default)]
    pub markers: Vec<DependencyMarker>,
}

impl SymbolSnapshot {
    /// All annotation sites of this module, class properties first.
    pub fn annotated_symbols(&self) -> Vec<AnnotatedSymbol> {
        self.classes
            .iter()
            .flat_map(ClassDecl::retained_symbols)
            .chain(self.symbols.iter().cloned())
            .collect()
    }

    /// Every class the module can see.
    pub fn visible_classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.libraries.iter().chain(self.classes.iter())
    }
}
