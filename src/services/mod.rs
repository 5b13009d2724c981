//! Service layer for business logic
//!
//! Lookup logic lives here, independent of the HTTP layer.

pub mod geoip;

pub use geoip::{GeoLookupEngine, GeoRecord};
