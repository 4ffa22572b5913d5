//! Reference runtime for generated state savers.
//!
//! Models the persisted container, the transient channel and live component
//! instances, and runs a [`SaverPlan`] the way the generated Kotlin saver
//! runs on a device. Used to check round trips without a mobile toolchain.
//!
//! [`SaverPlan`]: retain_model::SaverPlan

pub mod bundle;
pub mod channel;
pub mod component;
pub mod error;
pub mod holder;
pub mod host;
pub mod saver;
pub mod value;

pub use bundle::Bundle;
pub use channel::TransientChannel;
pub use component::{ComponentInstance, FieldSlot};
pub use error::{Result, SaverError};
pub use holder::{GeneratedStateHolder, HolderState, Slot, StateHolder};
pub use host::StateSavingHost;
pub use saver::{EmptyStateSaver, GeneratedStateSaver, StateSaver, provide_state_saver};
pub use value::Value;
