//! Prometheus metrics module
//!
//! Provides metrics collection and export for monitoring.

mod registry;
mod traits;

pub use registry::Metrics;
pub use traits::MetricsRecorder;
