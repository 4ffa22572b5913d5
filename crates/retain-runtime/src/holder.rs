//! In-memory holders handed across a configuration change.

use std::collections::BTreeMap;

use retain_model::{ComponentHolder, HolderStorage, SlotKind, TopLevelHolder};

use crate::value::Value;

/// One per-component holder instance.
#[derive(Debug, Clone, PartialEq)]
pub struct HolderState {
    holder: String,
    fields: BTreeMap<String, Option<Value>>,
}

impl HolderState {
    /// Fresh holder with every field at its initial value.
    pub fn new(holder: &ComponentHolder) -> Self {
        let fields = holder
            .fields
            .iter()
            .map(|field| {
                let initial = match field.storage {
                    HolderStorage::Direct { zero } => Some(Value::from(zero)),
                    HolderStorage::Optional => None,
                };
                (field.name.clone(), initial)
            })
            .collect();
        Self {
            holder: holder.name.clone(),
            fields,
        }
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    pub fn set(&mut self, field: &str, value: Option<Value>) {
        self.fields.insert(field.to_string(), value);
    }
}

/// Contents of one top-level slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Single(Option<HolderState>),
    ByTag(BTreeMap<String, HolderState>),
    ById(BTreeMap<i32, HolderState>),
}

/// The aggregate holder the generated saver creates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStateHolder {
    slots: BTreeMap<String, Slot>,
}

impl GeneratedStateHolder {
    pub fn new(top_level: &TopLevelHolder) -> Self {
        let slots = top_level
            .slots
            .iter()
            .map(|slot| {
                let empty = match slot.kind {
                    SlotKind::Single | SlotKind::ByClass => Slot::Single(None),
                    SlotKind::ByTag => Slot::ByTag(BTreeMap::new()),
                    SlotKind::ById => Slot::ById(BTreeMap::new()),
                };
                (slot.name.clone(), empty)
            })
            .collect();
        Self { slots }
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.get_mut(name)
    }

    /// Number of per-component holders currently stored.
    pub fn stored(&self) -> usize {
        self.slots
            .values()
            .map(|slot| match slot {
                Slot::Single(state) => usize::from(state.is_some()),
                Slot::ByTag(map) => map.len(),
                Slot::ById(map) => map.len(),
            })
            .sum()
    }
}

/// What crosses the transient channel.
#[derive(Debug, Clone, PartialEq)]
pub enum StateHolder {
    /// Returned by the fallback saver.
    Empty,
    Generated(GeneratedStateHolder),
}

impl StateHolder {
    pub fn as_generated(&self) -> Option<&GeneratedStateHolder> {
        match self {
            StateHolder::Generated(holder) => Some(holder),
            StateHolder::Empty => None,
        }
    }
}
