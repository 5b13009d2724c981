//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus text format at `/metrics`.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::error;

use crate::metrics::Metrics;

/// Metrics service handler
pub struct MetricsService;

impl MetricsService {
    /// Handle metrics export request
    pub async fn metrics(metrics: web::Data<Arc<Metrics>>) -> impl Responder {
        match metrics.export() {
            Ok(output) => HttpResponse::Ok()
                .content_type("text/plain; version=0.0.4; charset=utf-8")
                .body(output),
            Err(e) => {
                error!("Failed to export metrics: {}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain")
                    .body("Failed to export metrics")
            }
        }
    }
}

/// Metrics 路由配置
pub fn metrics_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        crate::api::constants::METRICS_PATH,
        web::get().to(MetricsService::metrics),
    );
}
