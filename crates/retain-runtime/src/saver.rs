//! The saver contract and the plan-driven implementation of it.

use retain_core::TypeHierarchy;
use retain_model::{
    ComponentKind, ComponentPlan, InstanceKeys, RestoreMode, SaverPlan, SlotKind, TypeCategory,
};
use tracing::{debug, trace};

use crate::bundle::Bundle;
use crate::component::ComponentInstance;
use crate::error::{Result, SaverError};
use crate::holder::{GeneratedStateHolder, HolderState, Slot, StateHolder};
use crate::value::Value;

/// What the runtime base components call at each lifecycle point.
pub trait StateSaver {
    /// Copies configuration-change state into `holder`, creating one if absent.
    fn save_state_config_change(
        &self,
        component: &ComponentInstance,
        holder: Option<StateHolder>,
    ) -> Result<StateHolder>;

    fn restore_state_config_change(
        &self,
        component: &mut ComponentInstance,
        holder: &mut StateHolder,
    ) -> Result<()>;

    fn save_state_bundle(&self, component: &ComponentInstance, bundle: &mut Bundle) -> Result<()>;

    fn restore_state_bundle(&self, component: &mut ComponentInstance, bundle: &Bundle) -> Result<()>;
}

/// Saver used when no generated saver is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStateSaver;

impl StateSaver for EmptyStateSaver {
    fn save_state_config_change(
        &self,
        _component: &ComponentInstance,
        holder: Option<StateHolder>,
    ) -> Result<StateHolder> {
        Ok(holder.unwrap_or(StateHolder::Empty))
    }

    fn restore_state_config_change(
        &self,
        _component: &mut ComponentInstance,
        _holder: &mut StateHolder,
    ) -> Result<()> {
        Ok(())
    }

    fn save_state_bundle(&self, _component: &ComponentInstance, _bundle: &mut Bundle) -> Result<()> {
        Ok(())
    }

    fn restore_state_bundle(&self, _component: &mut ComponentInstance, _bundle: &Bundle) -> Result<()> {
        Ok(())
    }
}

/// The generated saver, executing a [`SaverPlan`] instead of compiled code.
///
/// Dispatch picks the first arm whose component the live instance is a
/// subtype of; arms are ordered most-derived first.
#[derive(Debug, Clone)]
pub struct GeneratedStateSaver {
    plan: SaverPlan,
    hierarchy: TypeHierarchy,
}

impl GeneratedStateSaver {
    pub fn new(plan: SaverPlan, hierarchy: TypeHierarchy) -> Self {
        Self { plan, hierarchy }
    }

    pub fn plan(&self) -> &SaverPlan {
        &self.plan
    }

    fn arm(&self, component: &ComponentInstance) -> Option<&ComponentPlan> {
        let arm = self.plan.components.iter().find(|arm| {
            arm.component == component.class()
                || self.hierarchy.is_subtype_of(component.class(), &arm.component)
        });
        if arm.is_none() {
            trace!(class = component.class(), "no dispatch arm");
        }
        arm
    }

    fn slot_name(&self, arm: &ComponentPlan, kind: SlotKind) -> Option<&str> {
        self.plan
            .holders
            .top_level
            .slot(&arm.component, kind)
            .map(|slot| slot.name.as_str())
    }

    fn slot_kind(arm: &ComponentPlan, component: &ComponentInstance) -> SlotKind {
        match arm.kind {
            ComponentKind::SingleInstance => SlotKind::Single,
            ComponentKind::Repeatable => SlotKind::for_strategy(component.strategy()),
        }
    }
}

fn required_tag(component: &ComponentInstance) -> Result<&str> {
    component.tag().ok_or_else(|| SaverError::MissingTag {
        component: component.describe(),
    })
}

fn instance_key(keys: &InstanceKeys, component: &ComponentInstance) -> Result<String> {
    keys.key_for(component.strategy(), component.tag(), component.id())
        .ok_or_else(|| SaverError::MissingTag {
            component: component.describe(),
        })
}

fn write_back(
    component: &mut ComponentInstance,
    property: &str,
    restore: RestoreMode,
    value: Option<Value>,
) -> Result<()> {
    match (restore, value) {
        (RestoreMode::Assign, value) => component.assign(property, value),
        (RestoreMode::AssignIfPresent, Some(value)) => component.assign(property, Some(value)),
        (RestoreMode::AssignIfPresent, None) => Ok(()),
    }
}

impl StateSaver for GeneratedStateSaver {
    fn save_state_config_change(
        &self,
        component: &ComponentInstance,
        holder: Option<StateHolder>,
    ) -> Result<StateHolder> {
        let mut top = match holder {
            Some(StateHolder::Generated(top)) => top,
            _ => GeneratedStateHolder::new(&self.plan.holders.top_level),
        };
        let Some(arm) = self.arm(component) else {
            return Ok(StateHolder::Generated(top));
        };
        let Some(definition) = self.plan.holders.holder_for(&arm.component) else {
            return Ok(StateHolder::Generated(top));
        };

        let mut state = HolderState::new(definition);
        for field in &arm.memory {
            if field.lateinit && !component.is_initialized(&field.property) {
                continue;
            }
            state.set(&field.property, component.read(&field.property)?.cloned());
        }

        let kind = Self::slot_kind(arm, component);
        let slot = self
            .slot_name(arm, kind)
            .and_then(|name| top.slot_mut(name));
        match slot {
            Some(Slot::Single(stored)) => *stored = Some(state),
            Some(Slot::ByTag(map)) => {
                map.insert(required_tag(component)?.to_string(), state);
            }
            Some(Slot::ById(map)) => {
                map.insert(component.id(), state);
            }
            None => {}
        }
        debug!(component = %component.describe(), stored = top.stored(), "saved to memory");
        Ok(StateHolder::Generated(top))
    }

    fn restore_state_config_change(
        &self,
        component: &mut ComponentInstance,
        holder: &mut StateHolder,
    ) -> Result<()> {
        let StateHolder::Generated(top) = holder else {
            return Ok(());
        };
        let Some(arm) = self.arm(component) else {
            return Ok(());
        };
        let kind = Self::slot_kind(arm, component);
        let Some(slot) = self.slot_name(arm, kind).and_then(|name| top.slot_mut(name)) else {
            return Ok(());
        };

        let state = match (arm.kind, slot) {
            (ComponentKind::SingleInstance, Slot::Single(stored)) => stored.clone(),
            (ComponentKind::Repeatable, Slot::Single(stored)) => stored.take(),
            (_, Slot::ByTag(map)) => map.remove(required_tag(component)?),
            (_, Slot::ById(map)) => map.remove(&component.id()),
        };
        let Some(state) = state else {
            return Ok(());
        };

        for field in &arm.memory {
            let value = state.get(&field.property).cloned();
            write_back(component, &field.property, field.restore, value)?;
        }
        debug!(component = %component.describe(), "restored from memory");
        Ok(())
    }

    fn save_state_bundle(&self, component: &ComponentInstance, bundle: &mut Bundle) -> Result<()> {
        let Some(arm) = self.arm(component) else {
            return Ok(());
        };
        let mut nested = Bundle::new();
        let target = if arm.instance_keys.is_some() {
            &mut nested
        } else {
            &mut *bundle
        };
        for field in &arm.bundle {
            if field.lateinit && !component.is_initialized(&field.property) {
                continue;
            }
            let value = component.read(&field.property)?.cloned();
            target.put(field.suffix(), field.key.value.clone(), value);
        }
        if let Some(keys) = &arm.instance_keys {
            bundle.put_bundle(instance_key(keys, component)?, nested);
        }
        debug!(component = %component.describe(), "saved to bundle");
        Ok(())
    }

    fn restore_state_bundle(&self, component: &mut ComponentInstance, bundle: &Bundle) -> Result<()> {
        let Some(arm) = self.arm(component) else {
            return Ok(());
        };
        let source = match &arm.instance_keys {
            None => bundle,
            Some(keys) => match bundle.get_bundle(&instance_key(keys, component)?) {
                Some(nested) => nested,
                None => return Ok(()),
            },
        };

        for field in &arm.bundle {
            let suffix = field.suffix();
            let read = match field.accessor.category {
                TypeCategory::NonNullPrimitive => source.get_primitive(suffix, &field.key.value),
                _ => source.get(suffix, &field.key.value).cloned(),
            };
            let read = match &field.accessor.class_token {
                Some(token) => read.filter(|value| value.conforms_to(token, &self.hierarchy)),
                None => read,
            };
            write_back(component, &field.property, field.restore, read)?;
        }
        debug!(component = %component.describe(), "restored from bundle");
        Ok(())
    }
}

/// The generated saver when a plan exists, else the empty one.
pub fn provide_state_saver(plan: Option<SaverPlan>, hierarchy: TypeHierarchy) -> Box<dyn StateSaver> {
    match plan {
        Some(plan) => Box::new(GeneratedStateSaver::new(plan, hierarchy)),
        None => {
            debug!("no generated saver, falling back to the empty saver");
            Box::new(EmptyStateSaver)
        }
    }
}
