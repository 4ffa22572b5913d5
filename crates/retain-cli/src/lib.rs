//! Library side of the `retain-gen` command line tool.

pub mod logging;
pub mod pipeline;
