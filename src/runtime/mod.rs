//! Application lifecycle
//!
//! - `lifetime`: startup preparation and shutdown signal handling
//! - `server`: HTTP server assembly and run loop

pub mod lifetime;
pub mod server;

pub use server::run_server;
