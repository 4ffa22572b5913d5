//! Kotlin rendering of generator artifacts.
//!
//! Every artifact a pass produces becomes one or more source files: the
//! saver with its holders, the runtime base components, or a dependency
//! marker.

pub mod files;
pub mod marker;
pub mod runtime;
pub mod saver;
mod writer;

pub use files::{GeneratedFile, render, write_files};
pub use marker::render_marker;
pub use saver::render_saver;
