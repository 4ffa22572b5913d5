use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Lifecycle event a retained field must survive.
///
/// Ordered from the shortest-lived tier to the longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionPolicy {
    /// Recomposition-scoped memoization. Handled by the reactive helpers,
    /// never by generated code.
    Recomposition,
    /// Activity/fragment recreation after a configuration change.
    ConfigurationChange,
    /// Process death followed by state restoration from the persisted container.
    ProcessDeath,
}

impl RetentionPolicy {
    pub const ALL: [RetentionPolicy; 3] = [
        RetentionPolicy::Recomposition,
        RetentionPolicy::ConfigurationChange,
        RetentionPolicy::ProcessDeath,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPolicy::Recomposition => "RECOMPOSITION",
            RetentionPolicy::ConfigurationChange => "CONFIGURATION_CHANGE",
            RetentionPolicy::ProcessDeath => "PROCESS_DEATH",
        }
    }

    /// True when generated glue is responsible for this tier.
    pub fn is_generated(&self) -> bool {
        !matches!(self, RetentionPolicy::Recomposition)
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetentionPolicy {
    type Err = ModelError;

    /// Accepts the annotation constant spelling as well as kebab/lowercase forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        match normalized.as_str() {
            "RECOMPOSITION" => Ok(RetentionPolicy::Recomposition),
            "CONFIGURATION_CHANGE" | "CONFIG_CHANGE" => Ok(RetentionPolicy::ConfigurationChange),
            "PROCESS_DEATH" => Ok(RetentionPolicy::ProcessDeath),
            _ => Err(ModelError::UnknownPolicy(s.to_string())),
        }
    }
}

/// How a repeatable component instance is told apart from its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentificationStrategy {
    /// By the instance's tag. A missing tag is a fatal precondition failure.
    #[default]
    Tag,
    /// By the instance's integer id.
    Id,
    /// One shared slot for every instance of the class.
    Class,
}

impl IdentificationStrategy {
    pub const ALL: [IdentificationStrategy; 3] = [
        IdentificationStrategy::Tag,
        IdentificationStrategy::Id,
        IdentificationStrategy::Class,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentificationStrategy::Tag => "TAG",
            IdentificationStrategy::Id => "ID",
            IdentificationStrategy::Class => "CLASS",
        }
    }
}

impl fmt::Display for IdentificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentificationStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TAG" => Ok(IdentificationStrategy::Tag),
            "ID" => Ok(IdentificationStrategy::Id),
            "CLASS" => Ok(IdentificationStrategy::Class),
            _ => Err(ModelError::UnknownStrategy(s.to_string())),
        }
    }
}

/// The two kinds of UI-owning component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Activity-like: at most one live instance per class.
    SingleInstance,
    /// Fragment-like: many instances, told apart by an identification strategy.
    Repeatable,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::SingleInstance => "single-instance",
            ComponentKind::Repeatable => "repeatable",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
