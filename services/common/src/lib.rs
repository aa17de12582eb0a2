//! Common constants, configuration and logging setup shared by the
//! trade index crates

pub mod config;
pub mod constants;
pub mod logging;

pub use crate::config::*;
pub use crate::constants::*;
pub use crate::logging::*;
