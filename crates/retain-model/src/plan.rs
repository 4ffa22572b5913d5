//! Generation IR shared by the renderer and the reference runtime.
//!
//! A [`SaverPlan`] describes every holder type and every dispatch arm of the
//! four generated saver functions. The Kotlin renderer prints it; the runtime
//! crate executes it directly, which is how generated behavior is verified.

use serde::{Deserialize, Serialize};

use crate::classification::Classification;
use crate::names;
use crate::policy::{ComponentKind, IdentificationStrategy};
use crate::types::TypeRef;

/// Canonical initial value of a holder field whose type has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroValue {
    Boolean,
    String,
    Int,
    Long,
    Float,
    Double,
    Byte,
    Short,
    Char,
    Number,
}

impl ZeroValue {
    /// Zero value for a non-null, non-generic built-in; `None` otherwise.
    pub fn for_type(ty: &TypeRef) -> Option<Self> {
        if ty.is_nullable() || ty.is_generic() {
            return None;
        }
        match ty.name() {
            names::KOTLIN_BOOLEAN => Some(ZeroValue::Boolean),
            names::KOTLIN_STRING => Some(ZeroValue::String),
            names::KOTLIN_INT => Some(ZeroValue::Int),
            names::KOTLIN_LONG => Some(ZeroValue::Long),
            names::KOTLIN_FLOAT => Some(ZeroValue::Float),
            names::KOTLIN_DOUBLE => Some(ZeroValue::Double),
            names::KOTLIN_BYTE => Some(ZeroValue::Byte),
            names::KOTLIN_SHORT => Some(ZeroValue::Short),
            names::KOTLIN_CHAR => Some(ZeroValue::Char),
            names::KOTLIN_NUMBER => Some(ZeroValue::Number),
            _ => None,
        }
    }

    pub fn kotlin_literal(&self) -> &'static str {
        match self {
            ZeroValue::Boolean => "false",
            ZeroValue::String => "\"\"",
            ZeroValue::Long => "0L",
            ZeroValue::Float => "0.0F",
            ZeroValue::Double => "0.0",
            ZeroValue::Char => "'\\u0000'",
            ZeroValue::Int | ZeroValue::Byte | ZeroValue::Short | ZeroValue::Number => "0",
        }
    }
}

/// How a holder field stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "storage", rename_all = "snake_case")]
pub enum HolderStorage {
    /// Declared type, initialized to its zero value.
    Direct { zero: ZeroValue },
    /// Nullable form of the declared type, initialized absent.
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderField {
    pub name: String,
    pub declared: TypeRef,
    pub storage: HolderStorage,
}

impl HolderField {
    /// Type of the field as written in the holder class.
    pub fn holder_type(&self) -> TypeRef {
        match self.storage {
            HolderStorage::Direct { .. } => self.declared.clone(),
            HolderStorage::Optional => self.declared.make_nullable(),
        }
    }
}

/// Per-component holder type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHolder {
    pub component: String,
    pub kind: ComponentKind,
    /// Simple class name, always ending in `State`.
    pub name: String,
    pub fields: Vec<HolderField>,
}

impl ComponentHolder {
    /// Holder name without its `State` suffix; the stem of every key name.
    pub fn key_base(&self) -> &str {
        self.name.strip_suffix("State").unwrap_or(&self.name)
    }

    /// Holder name with a lowercase first letter.
    pub fn slot_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&HolderField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Optional holder of a single-instance component.
    Single,
    /// Optional holder shared by all instances of a repeatable component.
    ByClass,
    /// Tag to holder map.
    ByTag,
    /// Id to holder map.
    ById,
}

impl SlotKind {
    pub fn for_strategy(strategy: IdentificationStrategy) -> Self {
        match strategy {
            IdentificationStrategy::Tag => SlotKind::ByTag,
            IdentificationStrategy::Id => SlotKind::ById,
            IdentificationStrategy::Class => SlotKind::ByClass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSlot {
    pub name: String,
    pub component: String,
    pub holder: String,
    pub kind: SlotKind,
}

/// The aggregate object handed across recreation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelHolder {
    pub name: String,
    pub slots: Vec<HolderSlot>,
}

impl TopLevelHolder {
    pub fn slot(&self, component: &str, kind: SlotKind) -> Option<&HolderSlot> {
        self.slots
            .iter()
            .find(|slot| slot.component == component && slot.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSet {
    pub components: Vec<ComponentHolder>,
    pub top_level: TopLevelHolder,
}

impl HolderSet {
    pub fn holder_for(&self, component: &str) -> Option<&ComponentHolder> {
        self.components
            .iter()
            .find(|holder| holder.component == component)
    }
}

/// Named string constant used as a persisted-container key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleKey {
    pub name: String,
    pub value: String,
}

/// How a restored value is written back onto the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Unconditional assignment.
    Assign,
    /// Assign only when a value is present.
    AssignIfPresent,
}

/// One field copied to and from the per-component holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryField {
    pub property: String,
    pub lateinit: bool,
    pub restore: RestoreMode,
}

/// One field written to and read from the persisted container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleField {
    pub property: String,
    pub declared: TypeRef,
    pub key: BundleKey,
    pub accessor: Classification,
    pub lateinit: bool,
    pub restore: RestoreMode,
}

impl BundleField {
    pub fn suffix(&self) -> &str {
        self.accessor.suffix().unwrap_or_default()
    }
}

/// Keys of the nested per-instance container of a repeatable component.
///
/// Tag and id keys are prefixes completed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceKeys {
    pub tag_prefix: BundleKey,
    pub id_prefix: BundleKey,
    pub class: BundleKey,
}

impl InstanceKeys {
    /// Concrete key for one instance; `None` when the tag strategy has no tag.
    pub fn key_for(
        &self,
        strategy: IdentificationStrategy,
        tag: Option<&str>,
        id: i32,
    ) -> Option<String> {
        match strategy {
            IdentificationStrategy::Tag => tag.map(|tag| format!("{}{tag}", self.tag_prefix.value)),
            IdentificationStrategy::Id => Some(format!("{}{id}", self.id_prefix.value)),
            IdentificationStrategy::Class => Some(self.class.value.clone()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BundleKey> {
        [&self.tag_prefix, &self.id_prefix, &self.class].into_iter()
    }
}

/// One dispatch arm, shared by all four saver functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPlan {
    pub component: String,
    pub kind: ComponentKind,
    /// Name of the per-component holder type.
    pub holder: String,
    pub memory: Vec<MemoryField>,
    pub bundle: Vec<BundleField>,
    /// Present for repeatable components.
    pub instance_keys: Option<InstanceKeys>,
    /// Process-death properties left out because their type is unsupported.
    pub skipped: Vec<String>,
}

/// Everything needed to render or execute `GeneratedStateSaver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaverPlan {
    pub package: String,
    pub holders: HolderSet,
    /// Dispatch arms, most-derived components first.
    pub components: Vec<ComponentPlan>,
    /// Every key constant, in declaration order.
    pub keys: Vec<BundleKey>,
}

impl SaverPlan {
    pub fn component(&self, qualified_name: &str) -> Option<&ComponentPlan> {
        self.components
            .iter()
            .find(|plan| plan.component == qualified_name)
    }
}

/// Runtime base components emitted on the first pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimePlan {
    pub package: String,
    pub activity_superclass: String,
    pub fragment_superclass: String,
}

/// Marker a library leaves for the application build.
///
/// `packages` hold package names with `.` replaced by `_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyMarker {
    pub file_property: String,
    #[serde(default)]
    pub packages: Vec<String>,
}

impl DependencyMarker {
    /// Packages in dotted form.
    pub fn dotted_packages(&self) -> impl Iterator<Item = String> + '_ {
        self.packages.iter().map(|package| package.replace('_', "."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPlan {
    pub package: String,
    pub marker: DependencyMarker,
}

/// Output of one emitting pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "artifact", rename_all = "snake_case")]
pub enum Artifact {
    Saver(SaverPlan),
    Runtime(RuntimePlan),
    DependencyMarker(MarkerPlan),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_only_for_non_null_builtins() {
        assert_eq!(
            ZeroValue::for_type(&TypeRef::new(names::KOTLIN_CHAR)),
            Some(ZeroValue::Char)
        );
        assert_eq!(
            ZeroValue::for_type(&TypeRef::new(names::KOTLIN_INT).make_nullable()),
            None
        );
        assert_eq!(ZeroValue::for_type(&TypeRef::new(names::ANDROID_BUNDLE)), None);
        assert_eq!(ZeroValue::Char.kotlin_literal(), "'\\u0000'");
        assert_eq!(ZeroValue::Float.kotlin_literal(), "0.0F");
    }

    #[test]
    fn holder_names_derive_slot_and_key_base() {
        let holder = ComponentHolder {
            component: "com.example.MainActivity".to_string(),
            kind: ComponentKind::SingleInstance,
            name: "MainActivityState".to_string(),
            fields: Vec::new(),
        };
        assert_eq!(holder.slot_name(), "mainActivityState");
        assert_eq!(holder.key_base(), "MainActivity");
    }

    #[test]
    fn instance_key_requires_tag_for_tag_strategy() {
        let key = |name: &str, value: &str| BundleKey {
            name: name.to_string(),
            value: value.to_string(),
        };
        let keys = InstanceKeys {
            tag_prefix: key("kt_Frag", "com.example.Frag@tag:"),
            id_prefix: key("ki_Frag", "com.example.Frag@id:"),
            class: key("kl_Frag", "com.example.Frag@class"),
        };
        assert_eq!(keys.key_for(IdentificationStrategy::Tag, None, 3), None);
        assert_eq!(
            keys.key_for(IdentificationStrategy::Tag, Some("top"), 3).as_deref(),
            Some("com.example.Frag@tag:top")
        );
        assert_eq!(
            keys.key_for(IdentificationStrategy::Id, None, 3).as_deref(),
            Some("com.example.Frag@id:3")
        );
        assert_eq!(
            keys.key_for(IdentificationStrategy::Class, None, 3).as_deref(),
            Some("com.example.Frag@class")
        );
    }
}
