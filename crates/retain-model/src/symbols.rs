//! Host declarations: classes, their properties and `@Retain` annotation sites.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::policy::RetentionPolicy;
use crate::types::TypeRef;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    Enum,
}

/// A class as visible to one compiler pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub qualified_name: String,
    #[serde(default)]
    pub kind: ClassKind,
    /// Qualified names of the direct supertypes.
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Declared inside a function body.
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
}

impl ClassDecl {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind: ClassKind::Class,
            supertypes: Vec::new(),
            is_local: false,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    /// Everything before the last `.`; empty for the default package.
    pub fn package_name(&self) -> &str {
        package_name(&self.qualified_name)
    }

    /// `@Retain` sites declared directly on this class.
    pub fn retained_symbols(&self) -> impl Iterator<Item = AnnotatedSymbol> + '_ {
        self.properties.iter().filter_map(|property| {
            let retain = property.retain.as_ref()?;
            Some(AnnotatedSymbol {
                target: SymbolTarget::Property(PropertySymbol {
                    name: property.name.clone(),
                    ty: property.ty.clone(),
                    parent: Some(Parent::Class {
                        qualified_name: self.qualified_name.clone(),
                    }),
                    mutable: property.mutable,
                    lateinit: property.lateinit,
                }),
                across: retain.across.clone(),
            })
        })
    }
}

pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name.rsplit('.').next().unwrap_or(qualified_name)
}

pub fn package_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or("", |(package, _)| package)
}

/// A property declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "default_true")]
    pub mutable: bool,
    #[serde(default)]
    pub lateinit: bool,
    #[serde(default)]
    pub retain: Option<RetainAnnotation>,
}

fn default_true() -> bool {
    true
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: true,
            lateinit: false,
            retain: None,
        }
    }

    #[must_use]
    pub fn retained(mut self, across: impl IntoIterator<Item = RetentionPolicy>) -> Self {
        self.retain = Some(RetainAnnotation::new(across));
        self
    }

    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    #[must_use]
    pub fn lateinit(mut self) -> Self {
        self.lateinit = true;
        self
    }
}

/// Arguments of one `@Retain(across = [...])` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainAnnotation {
    pub across: BTreeSet<RetentionPolicy>,
}

impl RetainAnnotation {
    pub fn new(across: impl IntoIterator<Item = RetentionPolicy>) -> Self {
        Self {
            across: across.into_iter().collect(),
        }
    }
}

/// The declaration that syntactically encloses an annotated property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Parent {
    Class { qualified_name: String },
    Function { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub parent: Option<Parent>,
    #[serde(default = "default_true")]
    pub mutable: bool,
    #[serde(default)]
    pub lateinit: bool,
}

/// What an annotation was attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolTarget {
    Property(PropertySymbol),
    Class { qualified_name: String },
    Function { name: String },
}

/// One `@Retain` annotation site reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSymbol {
    pub target: SymbolTarget,
    #[serde(default)]
    pub across: BTreeSet<RetentionPolicy>,
}

impl AnnotatedSymbol {
    pub fn property(symbol: PropertySymbol, across: impl IntoIterator<Item = RetentionPolicy>) -> Self {
        Self {
            target: SymbolTarget::Property(symbol),
            across: across.into_iter().collect(),
        }
    }

    /// Human-readable location used in diagnostics, e.g. `com.example.MainActivity#counter`.
    pub fn display_name(&self) -> String {
        match &self.target {
            SymbolTarget::Property(property) => match &property.parent {
                Some(Parent::Class { qualified_name }) => {
                    format!("{qualified_name}#{}", property.name)
                }
                Some(Parent::Function { name }) => format!("{name}()#{}", property.name),
                None => property.name.clone(),
            },
            SymbolTarget::Class { qualified_name } => qualified_name.clone(),
            SymbolTarget::Function { name } => format!("{name}()"),
        }
    }
}

impl PropertySymbol {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            parent: None,
            mutable: true,
            lateinit: false,
        }
    }

    #[must_use]
    pub fn in_class(mut self, qualified_name: impl Into<String>) -> Self {
        self.parent = Some(Parent::Class {
            qualified_name: qualified_name.into(),
        });
        self
    }

    #[must_use]
    pub fn in_function(mut self, name: impl Into<String>) -> Self {
        self.parent = Some(Parent::Function { name: name.into() });
        self
    }
}
