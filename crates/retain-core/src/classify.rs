//! Wire-format classification of declared types.
//!
//! Decides which persisted-container accessor family (`put<Suffix>` /
//! `get<Suffix>`) a declared type maps to. The function is total and pure:
//! every type gets a category, and the same type classified against the same
//! hierarchy always yields the same answer.

use std::collections::HashMap;

use retain_model::names;
use retain_model::{Classification, TypeCategory, TypeRef};
use tracing::debug;

use crate::hierarchy::TypeHierarchy;

/// Non-null built-ins backed by JVM primitives.
const PRIMITIVES: [(&str, &str); 8] = [
    (names::KOTLIN_INT, "Int"),
    (names::KOTLIN_BOOLEAN, "Boolean"),
    (names::KOTLIN_DOUBLE, "Double"),
    (names::KOTLIN_LONG, "Long"),
    (names::KOTLIN_CHAR, "Char"),
    (names::KOTLIN_BYTE, "Byte"),
    (names::KOTLIN_SHORT, "Short"),
    (names::KOTLIN_FLOAT, "Float"),
];

/// Reference types the container supports natively, keyed by erased spelling.
const KNOWN_TYPES: [(&str, &str); 17] = [
    ("kotlin.String", "String"),
    ("kotlin.ByteArray", "ByteArray"),
    ("kotlin.CharArray", "CharArray"),
    ("kotlin.CharSequence", "CharSequence"),
    (
        "kotlin.collections.ArrayList<kotlin.CharSequence>",
        "CharSequenceArrayList",
    ),
    ("kotlin.ShortArray", "ShortArray"),
    ("kotlin.IntArray", "IntArray"),
    ("kotlin.LongArray", "LongArray"),
    ("kotlin.FloatArray", "FloatArray"),
    ("kotlin.DoubleArray", "DoubleArray"),
    ("kotlin.BooleanArray", "BooleanArray"),
    ("kotlin.collections.ArrayList<kotlin.Int>", "IntegerArrayList"),
    ("kotlin.collections.ArrayList<kotlin.String>", "StringArrayList"),
    ("android.os.Bundle", "Bundle"),
    ("android.util.Size", "Size"),
    ("android.util.SizeF", "SizeF"),
    ("android.os.IBinder", "Binder"),
];

pub fn primitive_suffix(qualified_name: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(name, _)| *name == qualified_name)
        .map(|(_, suffix)| *suffix)
}

pub fn known_type_suffix(erased: &str) -> Option<&'static str> {
    KNOWN_TYPES
        .iter()
        .find(|(name, _)| *name == erased)
        .map(|(_, suffix)| *suffix)
}

/// Classify one declared type.
pub fn classify(ty: &TypeRef, hierarchy: &TypeHierarchy) -> Classification {
    if !ty.is_nullable()
        && !ty.is_generic()
        && let Some(suffix) = primitive_suffix(ty.name())
    {
        return Classification::new(TypeCategory::NonNullPrimitive, suffix);
    }
    if let Some(suffix) = known_type_suffix(&ty.erased_key()) {
        return Classification::new(TypeCategory::NullableKnownType, suffix);
    }
    if ty.is_generic() {
        return classify_container(ty, hierarchy);
    }
    let name = ty.name();
    if !hierarchy.contains(name) {
        debug!(%ty, "no class declaration for type");
        return Classification::unsupported();
    }
    // Arrays are Serializable too; containers were settled above.
    if hierarchy.is_subtype_of(name, names::JAVA_SERIALIZABLE) {
        return Classification::new(TypeCategory::SerializableOrTransferable, "Serializable")
            .with_class_token(name);
    }
    // Bundle is Parcelable but matched the known-type table first.
    if hierarchy.is_subtype_of(name, names::ANDROID_PARCELABLE) {
        return Classification::new(TypeCategory::SerializableOrTransferable, "Parcelable")
            .with_class_token(name);
    }
    Classification::unsupported()
}

fn classify_container(ty: &TypeRef, hierarchy: &TypeHierarchy) -> Classification {
    let [argument] = ty.args() else {
        debug!(%ty, "generic type with more than one argument");
        return Classification::unsupported();
    };
    let Some(element) = argument
        .ty()
        .map(TypeRef::name)
        .filter(|name| hierarchy.contains(name))
    else {
        debug!(%ty, "generic type with unresolvable argument");
        return Classification::unsupported();
    };
    match ty.name() {
        names::KOTLIN_ARRAY | names::KOTLIN_ARRAY_LIST => {
            let is_list = ty.name() == names::KOTLIN_ARRAY_LIST;
            let pick = |array: &str, list: &str| if is_list { list } else { array }.to_string();
            if hierarchy.is_subtype_of(element, names::KOTLIN_STRING) {
                Classification::new(
                    TypeCategory::NullableKnownType,
                    pick("StringArray", "StringArrayList"),
                )
            } else if hierarchy.is_subtype_of(element, names::ANDROID_PARCELABLE) {
                Classification::new(
                    TypeCategory::CovariantArray,
                    pick("ParcelableArray", "ParcelableArrayList"),
                )
                .with_class_token(element)
            } else if hierarchy.is_subtype_of(element, names::KOTLIN_CHAR_SEQUENCE) {
                Classification::new(
                    TypeCategory::NullableKnownType,
                    pick("CharSequenceArray", "CharSequenceArrayList"),
                )
            } else {
                debug!(%ty, "array element is not String, Parcelable or CharSequence");
                Classification::unsupported()
            }
        }
        names::ANDROID_SPARSE_ARRAY => {
            if hierarchy.is_subtype_of(element, names::ANDROID_PARCELABLE) {
                Classification::new(TypeCategory::CovariantArray, "SparseParcelableArray")
                    .with_class_token(element)
            } else {
                debug!(%ty, "sparse array element is not Parcelable");
                Classification::unsupported()
            }
        }
        _ => {
            debug!(%ty, "unsupported generic container");
            Classification::unsupported()
        }
    }
}

/// Memoizing classifier bound to one pass's hierarchy.
pub struct Classifier<'h> {
    hierarchy: &'h TypeHierarchy,
    cache: HashMap<TypeRef, Classification>,
}

impl<'h> Classifier<'h> {
    pub fn new(hierarchy: &'h TypeHierarchy) -> Self {
        Self {
            hierarchy,
            cache: HashMap::new(),
        }
    }

    pub fn classify(&mut self, ty: &TypeRef) -> Classification {
        if let Some(hit) = self.cache.get(ty) {
            return hit.clone();
        }
        let classification = classify(ty, self.hierarchy);
        self.cache.insert(ty.clone(), classification.clone());
        classification
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
