//! Analysis and planning for `@Retain` state retention.
//!
//! Given the classes a compiler pass can see and the `@Retain` sites it
//! reports, this crate decides which declarations are valid, how each type
//! maps onto the persisted container, and produces the [`SaverPlan`] the
//! renderer prints.
//!
//! [`SaverPlan`]: retain_model::SaverPlan

pub mod classify;
pub mod collect;
pub mod config;
pub mod dependency;
pub mod emit;
pub mod hierarchy;
pub mod holders;
mod keys;
pub mod pass;
mod platform;

pub use classify::{Classifier, classify};
pub use collect::{BaseMatch, Collection, PlacementError, RecognizedBases, collect};
pub use config::{ConfigError, load_options};
pub use emit::{SaverOutput, plan_saver};
pub use hierarchy::{MAX_SUPERTYPE_DEPTH, Subtype, TypeHierarchy};
pub use holders::synthesize;
pub use pass::{PassController, PassInput, PassOutcome, PassState, runtime_classes};
pub use platform::platform_classes;
