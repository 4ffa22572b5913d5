use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire-format category of a type with respect to the persisted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Unsupported,
    /// Non-null JVM primitive. Reads return the container default when absent.
    NonNullPrimitive,
    /// Closed set of natively supported reference types.
    NullableKnownType,
    /// Generic container whose single element type selects the accessor.
    CovariantArray,
    /// Any class implementing `java.io.Serializable` or `android.os.Parcelable`.
    SerializableOrTransferable,
}

impl TypeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Unsupported => "unsupported",
            TypeCategory::NonNullPrimitive => "non-null primitive",
            TypeCategory::NullableKnownType => "known type",
            TypeCategory::CovariantArray => "covariant array",
            TypeCategory::SerializableOrTransferable => "serializable/parcelable",
        }
    }

    /// Reads in this category need a class token argument.
    pub fn needs_class_token(&self) -> bool {
        matches!(
            self,
            TypeCategory::CovariantArray | TypeCategory::SerializableOrTransferable
        )
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub category: TypeCategory,
    /// Accessor suffix, e.g. `Int` for `putInt`/`getInt`.
    pub suffix: Option<String>,
    /// Qualified class passed to class-token reads.
    pub class_token: Option<String>,
}

impl Classification {
    pub fn unsupported() -> Self {
        Self {
            category: TypeCategory::Unsupported,
            suffix: None,
            class_token: None,
        }
    }

    pub fn new(category: TypeCategory, suffix: impl Into<String>) -> Self {
        Self {
            category,
            suffix: Some(suffix.into()),
            class_token: None,
        }
    }

    #[must_use]
    pub fn with_class_token(mut self, token: impl Into<String>) -> Self {
        self.class_token = Some(token.into());
        self
    }

    pub fn is_supported(&self) -> bool {
        self.category != TypeCategory::Unsupported
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }
}
