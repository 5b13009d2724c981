//! Configuration management
//!
//! Static configuration is read once at startup (file + environment) and then
//! handed to the components that need it. Nothing here is global.

mod structs;
pub mod validators;

pub use structs::*;
pub use validators::validate_dataset_paths;
