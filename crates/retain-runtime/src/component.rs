//! Live component instances the saver reads from and writes to.

use std::collections::BTreeMap;

use retain_model::IdentificationStrategy;

use crate::error::{Result, SaverError};
use crate::value::Value;

/// State of one property on a live instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSlot {
    /// A `lateinit` property that has not been assigned.
    Uninitialized,
    Null,
    Value(Value),
}

impl From<Option<Value>> for FieldSlot {
    fn from(value: Option<Value>) -> Self {
        value.map_or(FieldSlot::Null, FieldSlot::Value)
    }
}

/// An instance of an activity-like or fragment-like class.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
    class: String,
    strategy: IdentificationStrategy,
    tag: Option<String>,
    id: i32,
    fields: BTreeMap<String, FieldSlot>,
}

impl ComponentInstance {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            strategy: IdentificationStrategy::default(),
            tag: None,
            id: 0,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), FieldSlot::Value(value.into()));
        self
    }

    #[must_use]
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldSlot::Null);
        self
    }

    #[must_use]
    pub fn with_lateinit(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldSlot::Uninitialized);
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: IdentificationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn strategy(&self) -> IdentificationStrategy {
        self.strategy
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn field(&self, name: &str) -> Option<&FieldSlot> {
        self.fields.get(name)
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        !matches!(self.fields.get(name), Some(FieldSlot::Uninitialized) | None)
    }

    /// Current value; `None` for null.
    pub fn read(&self, name: &str) -> Result<Option<&Value>> {
        match self.fields.get(name) {
            Some(FieldSlot::Value(value)) => Ok(Some(value)),
            Some(FieldSlot::Null) => Ok(None),
            Some(FieldSlot::Uninitialized) => Err(SaverError::Uninitialized {
                component: self.class.clone(),
                field: name.to_string(),
            }),
            None => Err(self.unknown(name)),
        }
    }

    pub fn assign(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        match self.fields.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(self.unknown(name)),
        }
    }

    fn unknown(&self, name: &str) -> SaverError {
        SaverError::UnknownField {
            component: self.class.clone(),
            field: name.to_string(),
        }
    }

    /// Display form used in error messages, `Class@tag` or `Class#id`.
    pub fn describe(&self) -> String {
        match (&self.tag, self.strategy) {
            (Some(tag), _) => format!("{}@{tag}", self.class),
            (None, IdentificationStrategy::Id) => format!("{}#{}", self.class, self.id),
            (None, _) => self.class.clone(),
        }
    }
}
