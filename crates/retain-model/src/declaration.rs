use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::policy::{ComponentKind, RetentionPolicy};
use crate::symbols::{package_name, simple_name};
use crate::types::TypeRef;

/// A UI-owning class that declares at least one accepted `@Retain` property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    pub qualified_name: String,
    pub kind: ComponentKind,
}

impl Component {
    pub fn new(qualified_name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn package_name(&self) -> &str {
        package_name(&self.qualified_name)
    }
}

/// An accepted `@Retain` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedDeclaration {
    pub component: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub across: BTreeSet<RetentionPolicy>,
    pub lateinit: bool,
}

impl RetainedDeclaration {
    pub fn retains(&self, policy: RetentionPolicy) -> bool {
        self.across.contains(&policy)
    }

    /// True when only the recomposition tier was requested.
    pub fn is_transient_only(&self) -> bool {
        !self.across.iter().any(RetentionPolicy::is_generated)
    }
}

/// Accepted declarations of one component, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDeclarations {
    pub component: Component,
    pub declarations: Vec<RetainedDeclaration>,
}

impl ComponentDeclarations {
    pub fn retaining(&self, policy: RetentionPolicy) -> impl Iterator<Item = &RetainedDeclaration> {
        self.declarations
            .iter()
            .filter(move |declaration| declaration.retains(policy))
    }
}
