//! System-level modules
//!
//! - Logging initialization (console / file / rotation)

pub mod logging;

pub use logging::init_logging;
