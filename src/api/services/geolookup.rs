use std::sync::Arc;
use std::time::Instant;

use actix_web::{HttpResponse, Responder, web};
use tracing::{error, trace};

use crate::api::response::ResponseEnvelope;
use crate::errors::GeoLookupError;
use crate::metrics::MetricsRecorder;
use crate::services::GeoLookupEngine;

pub struct GeoLookupService;

impl GeoLookupService {
    /// `GET /api/v1/geoiplookup/{ip}`
    ///
    /// Always answers 200. Failures are only visible through `is_error` and
    /// the generic message; the cause is logged, never returned.
    pub async fn lookup(
        path: web::Path<String>,
        engine: web::Data<Arc<GeoLookupEngine>>,
        metrics: web::Data<Arc<dyn MetricsRecorder>>,
    ) -> impl Responder {
        let start = Instant::now();
        let ip_addr = path.into_inner();
        trace!("Received geo lookup request for {}", ip_addr);

        let engine = Arc::clone(engine.get_ref());
        let query = ip_addr.clone();
        // 数据库文件读取是阻塞操作，放到 blocking 线程池
        let outcome = web::block(move || engine.geo_search(&query))
            .await
            .unwrap_or_else(|e| Err(GeoLookupError::lookup(format!("lookup task failed: {}", e))));

        let envelope = match outcome {
            Ok(record) => ResponseEnvelope::success(record),
            Err(e) => {
                error!(
                    service = "apihandler",
                    error = %e,
                    ip = %ip_addr,
                    "Error searching for City using IP {}", ip_addr
                );
                metrics.inc_search_failed();
                ResponseEnvelope::failure()
            }
        };

        metrics.inc_search();
        metrics.observe_search_latency(start.elapsed().as_secs_f64());

        HttpResponse::Ok().json(envelope)
    }
}

/// Lookup 路由配置
pub fn geolookup_routes() -> actix_web::Scope {
    web::scope(crate::api::constants::LOOKUP_PREFIX)
        .route("/{ip}", web::get().to(GeoLookupService::lookup))
}
