//! Placement validation and grouping of `@Retain` sites.

use retain_model::diagnostics::codes;
use retain_model::{
    AnnotatedSymbol, Component, ComponentDeclarations, ComponentKind, Diagnostic, Parent,
    ProcessorOptions, RetainedDeclaration, SymbolTarget,
};
use tracing::{debug, trace};

use crate::hierarchy::{Subtype, TypeHierarchy};

/// Why an annotation site was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("@Retain can only be applied to properties")]
    NotAProperty,

    #[error("State marked with @Retain must be mutable")]
    NotMutable,

    #[error("@Retain cannot be applied to top-level properties")]
    TopLevel,

    #[error("@Retain can only be applied to properties declared in a class")]
    ParentNotClass,

    #[error("@Retain cannot be applied to properties of local classes")]
    LocalParent,

    #[error("{class} must extend {activity} or {fragment} to retain state")]
    NotAComponent {
        class: String,
        activity: String,
        fragment: String,
    },
}

impl PlacementError {
    pub fn code(&self) -> &'static str {
        match self {
            PlacementError::NotAProperty => codes::NOT_A_PROPERTY,
            PlacementError::NotMutable => codes::NOT_MUTABLE,
            PlacementError::TopLevel => codes::TOP_LEVEL,
            PlacementError::ParentNotClass => codes::PARENT_NOT_CLASS,
            PlacementError::LocalParent => codes::LOCAL_PARENT,
            PlacementError::NotAComponent { .. } => codes::NOT_A_COMPONENT,
        }
    }
}

/// Qualified names of the two recognized base components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedBases {
    pub activity: String,
    pub fragment: String,
}

impl RecognizedBases {
    pub fn new(activity: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            fragment: fragment.into(),
        }
    }

    pub fn from_options(options: &ProcessorOptions) -> Self {
        Self::new(options.activity_base(), options.fragment_base())
    }

    /// Which base `class` extends. The activity base is checked first.
    pub fn component_kind(&self, hierarchy: &TypeHierarchy, class: &str) -> BaseMatch {
        let activity = hierarchy.resolve_subtype(class, &self.activity);
        if activity == Subtype::Yes {
            return BaseMatch::Component(ComponentKind::SingleInstance);
        }
        let fragment = hierarchy.resolve_subtype(class, &self.fragment);
        if fragment == Subtype::Yes {
            return BaseMatch::Component(ComponentKind::Repeatable);
        }
        if activity == Subtype::No && fragment == Subtype::No {
            BaseMatch::NotAComponent
        } else {
            BaseMatch::Unresolved
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseMatch {
    Component(ComponentKind),
    NotAComponent,
    Unresolved,
}

/// Result of collecting one batch of annotation sites.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Grouped by component, in discovery order.
    pub accepted: Vec<ComponentDeclarations>,
    pub rejected: Vec<(AnnotatedSymbol, PlacementError)>,
    /// Sites whose component could not be decided yet.
    pub deferred: Vec<AnnotatedSymbol>,
}

impl Collection {
    pub fn accepted_count(&self) -> usize {
        self.accepted
            .iter()
            .map(|group| group.declarations.len())
            .sum()
    }

    /// One error per rejected site.
    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic> + '_ {
        self.rejected.iter().map(|(symbol, error)| {
            Diagnostic::error(error.code(), error.to_string()).with_symbol(symbol.display_name())
        })
    }
}

/// Adds `declaration` to its component group, ignoring a repeat of the same property.
pub fn push_accepted(
    groups: &mut Vec<ComponentDeclarations>,
    component: Component,
    declaration: RetainedDeclaration,
) {
    let group = match groups
        .iter()
        .position(|group| group.component.qualified_name == component.qualified_name)
    {
        Some(index) => &mut groups[index],
        None => {
            groups.push(ComponentDeclarations {
                component,
                declarations: Vec::new(),
            });
            let last = groups.len() - 1;
            &mut groups[last]
        }
    };
    if group
        .declarations
        .iter()
        .any(|existing| existing.name == declaration.name)
    {
        trace!(
            component = %group.component.qualified_name,
            property = %declaration.name,
            "duplicate declaration ignored"
        );
        return;
    }
    group.declarations.push(declaration);
}

/// Merges `from` into `into`, keeping first-seen order.
pub fn merge_accepted(into: &mut Vec<ComponentDeclarations>, from: Vec<ComponentDeclarations>) {
    for group in from {
        for declaration in group.declarations {
            push_accepted(into, group.component.clone(), declaration);
        }
    }
}

enum Verdict {
    Accept(Component, RetainedDeclaration),
    Reject(PlacementError),
    Defer,
}

/// Validates every site against the placement rules, first failure wins.
pub fn collect(
    symbols: &[AnnotatedSymbol],
    hierarchy: &TypeHierarchy,
    bases: &RecognizedBases,
) -> Collection {
    let mut collection = Collection::default();
    for symbol in symbols {
        match judge(symbol, hierarchy, bases) {
            Verdict::Accept(component, declaration) => {
                debug!(
                    symbol = %symbol.display_name(),
                    kind = %component.kind,
                    "accepted retained declaration"
                );
                push_accepted(&mut collection.accepted, component, declaration);
            }
            Verdict::Reject(error) => {
                debug!(symbol = %symbol.display_name(), %error, "rejected retained declaration");
                collection.rejected.push((symbol.clone(), error));
            }
            Verdict::Defer => {
                debug!(symbol = %symbol.display_name(), "deferred retained declaration");
                collection.deferred.push(symbol.clone());
            }
        }
    }
    collection
}

fn judge(symbol: &AnnotatedSymbol, hierarchy: &TypeHierarchy, bases: &RecognizedBases) -> Verdict {
    let SymbolTarget::Property(property) = &symbol.target else {
        return Verdict::Reject(PlacementError::NotAProperty);
    };
    if !property.mutable {
        return Verdict::Reject(PlacementError::NotMutable);
    }
    let Some(parent) = &property.parent else {
        return Verdict::Reject(PlacementError::TopLevel);
    };
    let Parent::Class { qualified_name } = parent else {
        return Verdict::Reject(PlacementError::ParentNotClass);
    };
    let Some(class) = hierarchy.get(qualified_name) else {
        return Verdict::Defer;
    };
    if class.is_local {
        return Verdict::Reject(PlacementError::LocalParent);
    }
    let kind = match bases.component_kind(hierarchy, qualified_name) {
        BaseMatch::Component(kind) => kind,
        BaseMatch::NotAComponent => {
            return Verdict::Reject(PlacementError::NotAComponent {
                class: qualified_name.clone(),
                activity: bases.activity.clone(),
                fragment: bases.fragment.clone(),
            });
        }
        BaseMatch::Unresolved => return Verdict::Defer,
    };
    Verdict::Accept(
        Component::new(qualified_name.clone(), kind),
        RetainedDeclaration {
            component: qualified_name.clone(),
            name: property.name.clone(),
            ty: property.ty.clone(),
            across: symbol.across.clone(),
            lateinit: property.lateinit,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_model::{ClassDecl, PropertySymbol, RetentionPolicy, TypeRef, names};

    const ACTIVITY: &str = "dev.retain.StateSavingActivity";
    const FRAGMENT: &str = "dev.retain.StateSavingFragment";

    fn bases() -> RecognizedBases {
        RecognizedBases::new(ACTIVITY, FRAGMENT)
    }

    fn runtime_hierarchy() -> TypeHierarchy {
        let mut hierarchy = TypeHierarchy::with_platform();
        hierarchy.insert(ClassDecl::new(ACTIVITY).with_supertype(names::ANDROIDX_APPCOMPAT_ACTIVITY));
        hierarchy.insert(ClassDecl::new(FRAGMENT).with_supertype(names::ANDROIDX_FRAGMENT));
        hierarchy
    }

    fn site(property: PropertySymbol) -> AnnotatedSymbol {
        AnnotatedSymbol::property(property, [RetentionPolicy::ConfigurationChange])
    }

    fn int(name: &str) -> PropertySymbol {
        PropertySymbol::new(name, TypeRef::new(names::KOTLIN_INT))
    }

    #[test]
    fn accepts_activity_and_fragment_properties() {
        let mut hierarchy = runtime_hierarchy();
        hierarchy.insert(ClassDecl::new("com.example.Main").with_supertype(ACTIVITY));
        hierarchy.insert(ClassDecl::new("com.example.Detail").with_supertype(FRAGMENT));
        let symbols = [
            site(int("count").in_class("com.example.Main")),
            site(int("page").in_class("com.example.Detail")),
            site(int("offset").in_class("com.example.Main")),
        ];

        let collection = collect(&symbols, &hierarchy, &bases());

        assert_eq!(collection.accepted.len(), 2);
        assert_eq!(collection.accepted_count(), 3);
        let main = &collection.accepted[0];
        assert_eq!(main.component.kind, ComponentKind::SingleInstance);
        let names: Vec<_> = main.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["count", "offset"]);
        assert_eq!(collection.accepted[1].component.kind, ComponentKind::Repeatable);
    }

    #[test]
    fn rules_apply_in_order() {
        let mut hierarchy = runtime_hierarchy();
        hierarchy.insert(ClassDecl::new("com.example.Local").with_supertype(ACTIVITY).local());
        hierarchy.insert(ClassDecl::new("com.example.Plain"));
        let immutable = PropertySymbol {
            mutable: false,
            ..int("fixed")
        };
        let symbols = [
            AnnotatedSymbol {
                target: SymbolTarget::Class {
                    qualified_name: "com.example.Plain".to_string(),
                },
                across: Default::default(),
            },
            site(immutable),
            site(int("loose")),
            site(int("inner").in_function("onCreate")),
            site(int("local").in_class("com.example.Local")),
            site(int("plain").in_class("com.example.Plain")),
        ];

        let collection = collect(&symbols, &hierarchy, &bases());
        let found: Vec<_> = collection.rejected.iter().map(|(_, e)| e.code()).collect();

        assert_eq!(
            found,
            [
                codes::NOT_A_PROPERTY,
                codes::NOT_MUTABLE,
                codes::TOP_LEVEL,
                codes::PARENT_NOT_CLASS,
                codes::LOCAL_PARENT,
                codes::NOT_A_COMPONENT,
            ]
        );
        assert_eq!(collection.diagnostics().count(), 6);
        assert!(collection.accepted.is_empty());
    }

    #[test]
    fn immutable_message_names_the_rule() {
        let symbols = [site(PropertySymbol {
            mutable: false,
            ..int("fixed").in_class("com.example.Main")
        })];
        let collection = collect(&symbols, &runtime_hierarchy(), &bases());
        let diagnostic = collection.diagnostics().next().unwrap();
        assert_eq!(diagnostic.message, "State marked with @Retain must be mutable");
        assert_eq!(diagnostic.symbol.as_deref(), Some("com.example.Main#fixed"));
    }

    #[test]
    fn missing_base_defers() {
        let mut hierarchy = TypeHierarchy::with_platform();
        hierarchy.insert(ClassDecl::new("com.example.Main").with_supertype(ACTIVITY));
        let symbols = [site(int("count").in_class("com.example.Main"))];

        let collection = collect(&symbols, &hierarchy, &bases());

        assert!(collection.accepted.is_empty());
        assert!(collection.rejected.is_empty());
        assert_eq!(collection.deferred.len(), 1);
    }

    #[test]
    fn merge_ignores_duplicates() {
        let component = Component::new("com.example.Main", ComponentKind::SingleInstance);
        let declaration = RetainedDeclaration {
            component: component.qualified_name.clone(),
            name: "count".to_string(),
            ty: TypeRef::new(names::KOTLIN_INT),
            across: [RetentionPolicy::ConfigurationChange].into(),
            lateinit: false,
        };
        let mut groups = Vec::new();
        push_accepted(&mut groups, component.clone(), declaration.clone());
        merge_accepted(
            &mut groups,
            vec![ComponentDeclarations {
                component,
                declarations: vec![declaration],
            }],
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].declarations.len(), 1);
    }
}
