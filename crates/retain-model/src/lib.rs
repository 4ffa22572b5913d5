pub mod classification;
pub mod declaration;
pub mod diagnostics;
pub mod error;
pub mod names;
pub mod options;
pub mod plan;
pub mod policy;
pub mod snapshot;
pub mod symbols;
pub mod types;

pub use classification::{Classification, TypeCategory};
pub use declaration::{Component, ComponentDeclarations, RetainedDeclaration};
pub use diagnostics::{Diagnostic, DiagnosticReport, Severity};
pub use error::{ModelError, Result, TypeParseError};
pub use options::ProcessorOptions;
pub use plan::{
    Artifact, BundleField, BundleKey, ComponentHolder, ComponentPlan, DependencyMarker,
    HolderField, HolderSet, HolderSlot, HolderStorage, InstanceKeys, MarkerPlan, MemoryField,
    RestoreMode, RuntimePlan, SaverPlan, SlotKind, TopLevelHolder, ZeroValue,
};
pub use policy::{ComponentKind, IdentificationStrategy, RetentionPolicy};
pub use snapshot::SymbolSnapshot;
pub use symbols::{
    AnnotatedSymbol, ClassDecl, ClassKind, Parent, PropertyDecl, PropertySymbol,
    RetainAnnotation, SymbolTarget,
};
pub use types::{TypeArg, TypeRef, Variance};
