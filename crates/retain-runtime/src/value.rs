//! Values held by component properties and persisted containers.

use retain_core::TypeHierarchy;
use retain_model::ZeroValue;

use crate::bundle::Bundle;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    /// Arrays, array lists and sparse arrays.
    List(Vec<Value>),
    Bundle(Bundle),
    /// Opaque instance of a platform or user class.
    Object { class: String, state: String },
}

impl Value {
    pub fn object(class: impl Into<String>, state: impl Into<String>) -> Self {
        Value::Object {
            class: class.into(),
            state: state.into(),
        }
    }

    /// What a primitive getter returns for a missing key.
    pub fn primitive_default(suffix: &str) -> Option<Self> {
        let value = match suffix {
            "Boolean" => Value::Boolean(false),
            "Byte" => Value::Byte(0),
            "Short" => Value::Short(0),
            "Int" => Value::Int(0),
            "Long" => Value::Long(0),
            "Float" => Value::Float(0.0),
            "Double" => Value::Double(0.0),
            "Char" => Value::Char('\0'),
            _ => return None,
        };
        Some(value)
    }

    /// Whether a class-token read of this value succeeds for `token`.
    ///
    /// Objects must be instances of the token class; lists must hold only
    /// such objects.
    pub fn conforms_to(&self, token: &str, hierarchy: &TypeHierarchy) -> bool {
        match self {
            Value::Object { class, .. } => class == token || hierarchy.is_subtype_of(class, token),
            Value::List(items) => items.iter().all(|item| item.conforms_to(token, hierarchy)),
            _ => true,
        }
    }
}

impl From<ZeroValue> for Value {
    fn from(zero: ZeroValue) -> Self {
        match zero {
            ZeroValue::Boolean => Value::Boolean(false),
            ZeroValue::String => Value::String(String::new()),
            ZeroValue::Int | ZeroValue::Number => Value::Int(0),
            ZeroValue::Long => Value::Long(0),
            ZeroValue::Float => Value::Float(0.0),
            ZeroValue::Double => Value::Double(0.0),
            ZeroValue::Byte => Value::Byte(0),
            ZeroValue::Short => Value::Short(0),
            ZeroValue::Char => Value::Char('\0'),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
