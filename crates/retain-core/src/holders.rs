//! Holder type synthesis.

use std::collections::BTreeSet;

use retain_model::names;
use retain_model::{
    ComponentDeclarations, ComponentHolder, ComponentKind, HolderField, HolderSet, HolderSlot,
    HolderStorage, RetainedDeclaration, RetentionPolicy, SlotKind, TopLevelHolder, ZeroValue,
};

/// Storage of a holder field for one declared property.
pub fn storage_for(declaration: &RetainedDeclaration) -> HolderStorage {
    if declaration.lateinit {
        return HolderStorage::Optional;
    }
    match ZeroValue::for_type(&declaration.ty) {
        Some(zero) => HolderStorage::Direct { zero },
        None => HolderStorage::Optional,
    }
}

/// Unique holder class names; compared by slot spelling so slots never clash.
#[derive(Debug, Default)]
struct HolderNames {
    taken: BTreeSet<String>,
}

impl HolderNames {
    fn claim(&mut self, name: &str) -> bool {
        self.taken.insert(lower_first(name))
    }

    fn allocate(&mut self, simple: &str, qualified: &str) -> String {
        let preferred = format!("{simple}State");
        if self.claim(&preferred) {
            return preferred;
        }
        let stem = qualified.replace('.', "_");
        let mut candidate = format!("{stem}State");
        let mut counter = 2;
        while !self.claim(&candidate) {
            candidate = format!("{stem}{counter}State");
            counter += 1;
        }
        candidate
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds one holder per component and the top-level aggregate.
pub fn synthesize(accepted: &[ComponentDeclarations]) -> HolderSet {
    let mut allocator = HolderNames::default();
    let mut components = Vec::with_capacity(accepted.len());
    let mut slots = Vec::new();

    for group in accepted {
        let component = &group.component;
        let name = allocator.allocate(component.simple_name(), &component.qualified_name);
        let fields = group
            .retaining(RetentionPolicy::ConfigurationChange)
            .map(|declaration| HolderField {
                name: declaration.name.clone(),
                declared: declaration.ty.clone(),
                storage: storage_for(declaration),
            })
            .collect();
        let holder = ComponentHolder {
            component: component.qualified_name.clone(),
            kind: component.kind,
            name,
            fields,
        };

        let slot = |suffix: &str, kind: SlotKind| HolderSlot {
            name: format!("{}{suffix}", holder.slot_name()),
            component: holder.component.clone(),
            holder: holder.name.clone(),
            kind,
        };
        match component.kind {
            ComponentKind::SingleInstance => slots.push(slot("", SlotKind::Single)),
            ComponentKind::Repeatable => slots.extend([
                slot("ByClass", SlotKind::ByClass),
                slot("ByTag", SlotKind::ByTag),
                slot("ById", SlotKind::ById),
            ]),
        }
        components.push(holder);
    }

    HolderSet {
        components,
        top_level: TopLevelHolder {
            name: names::GENERATED_STATE_HOLDER.to_string(),
            slots,
        },
    }
}
