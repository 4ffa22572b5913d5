//! Saver planning: the four dispatch functions as a [`SaverPlan`].
//!
//! Every accepted component becomes one dispatch arm shared by
//! save-to-memory, restore-from-memory, save-to-container and
//! restore-from-container. Arms are ordered most-derived first so a component
//! extending another retained component is matched before its parent.

use retain_model::diagnostics::codes;
use retain_model::{
    BundleField, ComponentDeclarations, ComponentHolder, ComponentKind, ComponentPlan,
    Diagnostic, HolderStorage, InstanceKeys, MemoryField, RestoreMode, RetainedDeclaration, RetentionPolicy,
    SaverPlan, TypeCategory,
};
use tracing::{debug, info};

use crate::classify::Classifier;
use crate::hierarchy::TypeHierarchy;
use crate::holders::{storage_for, synthesize};
use crate::keys::KeyAllocator;

/// A planned saver plus the generation-time diagnostics it raised.
#[derive(Debug, Clone)]
pub struct SaverOutput {
    pub plan: SaverPlan,
    pub diagnostics: Vec<Diagnostic>,
}

/// Components with at least one declaration handled by generated code.
///
/// Declarations retained only across recomposition are dropped.
pub fn generated_components(accepted: &[ComponentDeclarations]) -> Vec<ComponentDeclarations> {
    accepted
        .iter()
        .filter_map(|group| {
            let declarations: Vec<_> = group
                .declarations
                .iter()
                .filter(|declaration| !declaration.is_transient_only())
                .cloned()
                .collect();
            if declarations.is_empty() {
                debug!(
                    component = %group.component.qualified_name,
                    "component retains nothing beyond recomposition"
                );
                return None;
            }
            Some(ComponentDeclarations {
                component: group.component.clone(),
                declarations,
            })
        })
        .collect()
}

/// Sorts components so subclasses come before the components they extend.
pub fn order_most_derived(groups: &mut [ComponentDeclarations], hierarchy: &TypeHierarchy) {
    let names: Vec<String> = groups
        .iter()
        .map(|group| group.component.qualified_name.clone())
        .collect();
    let ancestors = |name: &str| {
        names
            .iter()
            .filter(|other| other.as_str() != name && hierarchy.is_subtype_of(name, other))
            .count()
    };
    groups.sort_by_cached_key(|group| std::cmp::Reverse(ancestors(&group.component.qualified_name)));
}

pub fn plan_saver(
    package: &str,
    accepted: &[ComponentDeclarations],
    hierarchy: &TypeHierarchy,
) -> SaverOutput {
    let mut groups = generated_components(accepted);
    order_most_derived(&mut groups, hierarchy);

    let holders = synthesize(&groups);
    let mut classifier = Classifier::new(hierarchy);
    let mut keys = KeyAllocator::default();
    let mut diagnostics = Vec::new();
    let mut components = Vec::with_capacity(groups.len());

    for (group, holder) in groups.iter().zip(&holders.components) {
        let memory = group
            .retaining(RetentionPolicy::ConfigurationChange)
            .map(memory_field)
            .collect();

        let mut bundle = Vec::new();
        let mut skipped = Vec::new();
        for declaration in group.retaining(RetentionPolicy::ProcessDeath) {
            let accessor = classifier.classify(&declaration.ty);
            if !accessor.is_supported() {
                diagnostics.push(unsupported_type(declaration));
                skipped.push(declaration.name.clone());
                continue;
            }
            let restore = match accessor.category {
                TypeCategory::NonNullPrimitive => RestoreMode::Assign,
                _ => presence_rule(declaration),
            };
            bundle.push(BundleField {
                property: declaration.name.clone(),
                declared: declaration.ty.clone(),
                key: keys.property(holder, &declaration.name),
                accessor,
                lateinit: declaration.lateinit,
                restore,
            });
        }

        components.push(ComponentPlan {
            component: holder.component.clone(),
            kind: holder.kind,
            holder: holder.name.clone(),
            memory,
            bundle,
            instance_keys: instance_keys(&mut keys, holder),
            skipped,
        });
    }

    info!(
        components = components.len(),
        errors = diagnostics.len(),
        classified = classifier.cached(),
        "planned state saver"
    );
    SaverOutput {
        plan: SaverPlan {
            package: package.to_string(),
            holders,
            components,
            keys: keys.into_keys(),
        },
        diagnostics,
    }
}

fn memory_field(declaration: &RetainedDeclaration) -> MemoryField {
    let restore = match storage_for(declaration) {
        HolderStorage::Direct { .. } => RestoreMode::Assign,
        HolderStorage::Optional => presence_rule(declaration),
    };
    MemoryField {
        property: declaration.name.clone(),
        lateinit: declaration.lateinit,
        restore,
    }
}

/// Nullable targets take the stored value as is; non-null ones only a present value.
fn presence_rule(declaration: &RetainedDeclaration) -> RestoreMode {
    if declaration.ty.is_nullable() {
        RestoreMode::Assign
    } else {
        RestoreMode::AssignIfPresent
    }
}

fn instance_keys(
    keys: &mut KeyAllocator,
    holder: &ComponentHolder,
) -> Option<InstanceKeys> {
    match holder.kind {
        ComponentKind::SingleInstance => None,
        ComponentKind::Repeatable => Some(keys.instance(holder)),
    }
}

fn unsupported_type(declaration: &RetainedDeclaration) -> Diagnostic {
    let symbol = format!("{}#{}", declaration.component, declaration.name);
    Diagnostic::error(
        codes::UNSUPPORTED_BUNDLE_TYPE,
        format!(
            "State {symbol} is marked to be retained across {} but {} is not a type supported by Bundle",
            RetentionPolicy::ProcessDeath,
            declaration.ty
        ),
    )
    .with_symbol(symbol)
}
