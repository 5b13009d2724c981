//! GeoLookup - IP geolocation over HTTP
//!
//! Answers `GET /api/v1/geoiplookup/{ip}` with ASN, city and country data read
//! from MaxMind GeoLite2 databases, and exposes Prometheus metrics.
//!
//! # Architecture
//! - `api`: HTTP routes, handlers, middleware and the JSON envelope
//! - `services`: private-range classification and the MaxMind lookup engine
//! - `metrics`: Prometheus registry and the injectable `MetricsRecorder`
//! - `config`: TOML / environment configuration
//! - `runtime`: startup, server loop and shutdown
//! - `system`: logging initialization

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod runtime;
pub mod services;
pub mod system;
