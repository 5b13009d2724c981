pub mod geolookup;
pub mod health;
pub mod metrics;

use actix_web::web;

pub use geolookup::{GeoLookupService, geolookup_routes};
pub use health::{HealthService, health_routes};
pub use metrics::{MetricsService, metrics_routes};

/// Register every route of the service.
///
/// Handlers expect `web::Data<Arc<GeoLookupEngine>>`,
/// `web::Data<Arc<dyn MetricsRecorder>>` and `web::Data<Arc<Metrics>>`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health_routes)
        .configure(metrics_routes)
        .service(geolookup_routes());
}
