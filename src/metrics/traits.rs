//! MetricsRecorder trait for dependency injection
//!
//! Handlers and middleware take an `Arc<dyn MetricsRecorder>`; the server
//! hands them the shared `Metrics` registry.

use super::Metrics;

/// Trait for recording application metrics.
///
/// All methods are no-op by default, allowing partial implementation.
/// Implementations must be thread-safe (Send + Sync).
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync {
    // ===== Lookup =====

    /// Record one lookup request
    fn inc_search(&self) {}

    /// Record one failed lookup request
    fn inc_search_failed(&self) {}

    /// Observe lookup handler duration
    fn observe_search_latency(&self, duration_secs: f64) {}

    // ===== HTTP (timing middleware) =====

    /// Observe HTTP request duration
    fn observe_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status: &str,
        duration_secs: f64,
    ) {
    }

    /// Record HTTP request
    fn inc_http_request(&self, method: &str, endpoint: &str, status: &str) {}
}

impl MetricsRecorder for Metrics {
    fn inc_search(&self) {
        self.searches_total.inc();
    }

    fn inc_search_failed(&self) {
        self.searches_failed_total.inc();
    }

    fn observe_search_latency(&self, duration_secs: f64) {
        self.search_latency_seconds.observe(duration_secs);
    }

    fn observe_http_request(&self, method: &str, endpoint: &str, status: &str, duration_secs: f64) {
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint, status])
            .observe(duration_secs);
    }

    fn inc_http_request(&self, method: &str, endpoint: &str, status: &str) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, status])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Silent;
    impl MetricsRecorder for Silent {}

    #[test]
    fn test_default_methods_are_noops() {
        let recorder: Arc<dyn MetricsRecorder> = Arc::new(Silent);
        recorder.inc_search();
        recorder.inc_search_failed();
        recorder.observe_search_latency(0.01);
        recorder.observe_http_request("GET", "geoiplookup", "200", 0.01);
        recorder.inc_http_request("GET", "health", "200");
    }

    #[test]
    fn test_prometheus_recorder_updates_collectors() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let recorder: Arc<dyn MetricsRecorder> = metrics.clone();

        recorder.inc_search();
        recorder.inc_search();
        recorder.inc_search_failed();
        recorder.observe_search_latency(0.003);
        recorder.inc_http_request("GET", "home", "200");
        recorder.observe_http_request("GET", "home", "200", 0.001);

        assert_eq!(metrics.searches_total.get(), 2);
        assert_eq!(metrics.searches_failed_total.get(), 1);
        assert_eq!(metrics.search_latency_seconds.get_sample_count(), 1);
        assert_eq!(
            metrics
                .http_requests_total
                .with_label_values(&["GET", "home", "200"])
                .get(),
            1
        );
    }
}
