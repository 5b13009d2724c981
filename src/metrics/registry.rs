//! Metrics registry
//!
//! Defines all Prometheus metrics used in the application. The registry is
//! built once at startup and shared by reference; there is no global instance.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

use crate::errors::{GeoLookupError, Result};

/// Latency buckets in seconds, tuned for sub-millisecond dataset hits.
const LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Application metrics container
pub struct Metrics {
    /// Internal Prometheus registry
    registry: Registry,

    // ===== Lookup metrics =====
    /// Every lookup request, successful or not
    pub searches_total: IntCounter,
    /// Lookup requests that ended in an error envelope
    pub searches_failed_total: IntCounter,
    /// Lookup handler duration
    pub search_latency_seconds: Histogram,

    // ===== HTTP metrics =====
    /// Request duration by method, endpoint and status
    pub http_request_duration_seconds: HistogramVec,
    /// Requests by method, endpoint and status
    pub http_requests_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let searches_total =
            IntCounter::new("searches_total", "The total number of geo search events")?;

        let searches_failed_total =
            IntCounter::new("searches_failed_total", "The total number of geo events failed")?;

        let search_latency_seconds = Histogram::with_opts(
            HistogramOpts::new("search_latency_seconds", "Database Search in Seconds")
                .buckets(LATENCY_BUCKETS.to_vec()),
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "endpoint", "status"],
        )?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "endpoint", "status"],
        )?;

        registry.register(Box::new(searches_total.clone()))?;
        registry.register(Box::new(searches_failed_total.clone()))?;
        registry.register(Box::new(search_latency_seconds.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            registry,
            searches_total,
            searches_failed_total,
            search_latency_seconds,
            http_request_duration_seconds,
            http_requests_total,
        })
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            GeoLookupError::metrics(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
