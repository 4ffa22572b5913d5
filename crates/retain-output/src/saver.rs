//! `GeneratedStateSaver.kt`: holders, the aggregate holder and the saver.

use retain_model::names;
use retain_model::{
    BundleField, ComponentHolder, ComponentKind, ComponentPlan, HolderStorage, InstanceKeys,
    MemoryField, RestoreMode, SaverPlan, SlotKind, TopLevelHolder,
};

use crate::writer::KotlinWriter;

const STRATEGY: &str = names::IDENTIFICATION_STRATEGY;

pub fn render_saver(plan: &SaverPlan) -> String {
    let mut w = KotlinWriter::new();
    if !plan.package.is_empty() {
        w.line(format!("package {}", plan.package));
        w.blank();
    }
    w.line("import android.os.Bundle");
    w.blank();

    for holder in &plan.holders.components {
        render_holder(&mut w, holder);
        w.blank();
    }
    render_top_level(&mut w, &plan.holders.top_level);
    w.blank();

    w.block(
        format!(
            "class {} : {}",
            names::GENERATED_STATE_SAVER,
            names::STATE_SAVER
        ),
        |w| {
            if !plan.keys.is_empty() {
                w.block("companion object", |w| {
                    for key in &plan.keys {
                        w.line(format!("const val {} = {}", key.name, quoted(&key.value)));
                    }
                });
                w.blank();
            }
            render_save_memory(w, plan);
            w.blank();
            render_restore_memory(w, plan);
            w.blank();
            render_save_bundle(w, plan);
            w.blank();
            render_restore_bundle(w, plan);
        },
    );
    w.finish()
}

fn render_holder(w: &mut KotlinWriter, holder: &ComponentHolder) {
    if holder.fields.is_empty() {
        w.line(format!("class {}", holder.name));
        return;
    }
    w.block(format!("class {}", holder.name), |w| {
        for field in &holder.fields {
            let initial = match field.storage {
                HolderStorage::Direct { zero } => zero.kotlin_literal(),
                HolderStorage::Optional => "null",
            };
            w.line(format!("var {}: {} = {initial}", field.name, field.holder_type()));
        }
    });
}

fn render_top_level(w: &mut KotlinWriter, top: &TopLevelHolder) {
    w.block(format!("class {} : {}", top.name, names::STATE_HOLDER), |w| {
        for slot in &top.slots {
            match slot.kind {
                SlotKind::Single | SlotKind::ByClass => {
                    w.line(format!("var {}: {}? = null", slot.name, slot.holder));
                }
                SlotKind::ByTag => w.line(format!(
                    "val {}: MutableMap<String, {}> = mutableMapOf()",
                    slot.name, slot.holder
                )),
                SlotKind::ById => w.line(format!(
                    "val {}: MutableMap<Int, {}> = mutableMapOf()",
                    slot.name, slot.holder
                )),
            }
        }
    });
}

fn render_save_memory(w: &mut KotlinWriter, plan: &SaverPlan) {
    let top = &plan.holders.top_level;
    w.open(format!(
        "override fun saveStateConfigChange(component: Any, stateHolder: {}?): {}",
        names::STATE_HOLDER,
        names::STATE_HOLDER
    ));
    w.line(format!(
        "val holder = stateHolder as? {name} ?: {name}()",
        name = top.name
    ));
    dispatch(w, plan, |w, component| {
        w.line(format!("val state = {}()", component.holder));
        for field in &component.memory {
            let statement = format!("state.{0} = component.{0}", field.property);
            guarded(w, field.lateinit, &field.property, &statement);
        }
        match component.kind {
            ComponentKind::SingleInstance => {
                if let Some(slot) = top.slot(&component.component, SlotKind::Single) {
                    w.line(format!("holder.{} = state", slot.name));
                }
            }
            ComponentKind::Repeatable => {
                let slots = RepeatableSlots::new(top, component);
                w.block("when (component.identificationStrategy)", |w| {
                    w.line(format!("{STRATEGY}.CLASS -> holder.{} = state", slots.by_class));
                    w.line(format!(
                        "{STRATEGY}.TAG -> holder.{}[{}] = state",
                        slots.by_tag,
                        required_tag()
                    ));
                    w.line(format!("{STRATEGY}.ID -> holder.{}[component.id] = state", slots.by_id));
                });
            }
        }
    });
    w.line("return holder");
    w.close();
}

fn render_restore_memory(w: &mut KotlinWriter, plan: &SaverPlan) {
    let top = &plan.holders.top_level;
    w.open(format!(
        "override fun restoreStateConfigChange(component: Any, stateHolder: {})",
        names::STATE_HOLDER
    ));
    w.line(format!("val holder = stateHolder as? {} ?: return", top.name));
    dispatch(w, plan, |w, component| {
        match component.kind {
            ComponentKind::SingleInstance => {
                if let Some(slot) = top.slot(&component.component, SlotKind::Single) {
                    w.line(format!("val state = holder.{} ?: return", slot.name));
                }
            }
            ComponentKind::Repeatable => {
                let slots = RepeatableSlots::new(top, component);
                w.open("val state = when (component.identificationStrategy)");
                w.line(format!(
                    "{STRATEGY}.CLASS -> holder.{0}.also {{ holder.{0} = null }}",
                    slots.by_class
                ));
                w.line(format!(
                    "{STRATEGY}.TAG -> holder.{}.remove({})",
                    slots.by_tag,
                    required_tag()
                ));
                w.line(format!("{STRATEGY}.ID -> holder.{}.remove(component.id)", slots.by_id));
                w.close_with("} ?: return");
            }
        }
        for field in &component.memory {
            restore_from_holder(w, field);
        }
    });
    w.close();
}

fn restore_from_holder(w: &mut KotlinWriter, field: &MemoryField) {
    let property = &field.property;
    match field.restore {
        RestoreMode::Assign => w.line(format!("component.{property} = state.{property}")),
        RestoreMode::AssignIfPresent => {
            w.line(format!("state.{property}?.let {{ component.{property} = it }}"));
        }
    }
}

fn render_save_bundle(w: &mut KotlinWriter, plan: &SaverPlan) {
    w.open("override fun saveStateBundle(component: Any, bundle: Bundle)");
    dispatch(w, plan, |w, component| {
        let target = match component.kind {
            ComponentKind::SingleInstance => "bundle",
            ComponentKind::Repeatable => {
                w.line("val fragBundle = Bundle()");
                "fragBundle"
            }
        };
        for field in &component.bundle {
            let statement = format!(
                "{target}.put{}({}, component.{})",
                field.suffix(),
                field.key.name,
                field.property
            );
            guarded(w, field.lateinit, &field.property, &statement);
        }
        if let Some(keys) = &component.instance_keys {
            instance_key(w, keys);
            w.line("bundle.putBundle(fragKey, fragBundle)");
        }
    });
    w.close();
}

fn render_restore_bundle(w: &mut KotlinWriter, plan: &SaverPlan) {
    w.open("override fun restoreStateBundle(component: Any, bundle: Bundle)");
    dispatch(w, plan, |w, component| {
        let source = match &component.instance_keys {
            None => "bundle",
            Some(keys) => {
                instance_key(w, keys);
                w.line("val fragBundle = bundle.getBundle(fragKey) ?: return");
                "fragBundle"
            }
        };
        for field in &component.bundle {
            restore_from_bundle(w, source, field);
        }
    });
    w.close();
}

fn restore_from_bundle(w: &mut KotlinWriter, source: &str, field: &BundleField) {
    let read = match &field.accessor.class_token {
        Some(token) => format!(
            "{source}.get{}({}, {token}::class.java)",
            field.suffix(),
            field.key.name
        ),
        None => format!("{source}.get{}({})", field.suffix(), field.key.name),
    };
    let property = &field.property;
    match field.restore {
        RestoreMode::Assign => w.line(format!("component.{property} = {read}")),
        RestoreMode::AssignIfPresent => w.line(format!("{read}?.let {{ component.{property} = it }}")),
    }
}

/// `val fragKey = ...` for the instance's identification strategy.
fn instance_key(w: &mut KotlinWriter, keys: &InstanceKeys) {
    w.block("val fragKey = when (component.identificationStrategy)", |w| {
        w.line(format!("{STRATEGY}.CLASS -> {}", keys.class.name));
        w.line(format!("{STRATEGY}.TAG -> {} + {}", keys.tag_prefix.name, required_tag()));
        w.line(format!("{STRATEGY}.ID -> {} + component.id", keys.id_prefix.name));
    });
}

/// `when (component)` with one arm per component, most-derived first.
fn dispatch(
    w: &mut KotlinWriter,
    plan: &SaverPlan,
    mut arm: impl FnMut(&mut KotlinWriter, &ComponentPlan),
) {
    if plan.components.is_empty() {
        return;
    }
    w.block("when (component)", |w| {
        for component in &plan.components {
            w.block(format!("is {} ->", component.component), |w| arm(w, component));
        }
    });
}

/// Emits `statement`, behind an initialization check for `lateinit` properties.
fn guarded(w: &mut KotlinWriter, lateinit: bool, property: &str, statement: &str) {
    if !lateinit {
        w.line(statement);
        return;
    }
    w.block("run", |w| {
        w.open("val isInitialized = try");
        w.line(format!("component.{property}"));
        w.line("true");
        w.reopen("} catch (ex: UninitializedPropertyAccessException) {");
        w.line("false");
        w.close();
        w.block("if (isInitialized)", |w| w.line(statement));
    });
}

/// The instance's tag, or the fatal precondition failure when it has none.
fn required_tag() -> &'static str {
    concat!(
        "(component.tag ?: throw RuntimeException(",
        "\"identificationStrategy for Fragment@${Integer.toHexString(System.identityHashCode(component))} ",
        "of type ${component::class.java.simpleName} is TAG but Fragment's tag field is null\"))"
    )
}

struct RepeatableSlots<'a> {
    by_class: &'a str,
    by_tag: &'a str,
    by_id: &'a str,
}

impl<'a> RepeatableSlots<'a> {
    fn new(top: &'a TopLevelHolder, component: &ComponentPlan) -> Self {
        let name = move |kind| {
            top.slot(&component.component, kind)
                .map_or("", |slot| slot.name.as_str())
        };
        Self {
            by_class: name(SlotKind::ByClass),
            by_tag: name(SlotKind::ByTag),
            by_id: name(SlotKind::ById),
        }
    }
}

fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
