use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::api::constants::{HEALTH_CHECK_BODY, HEALTH_CHECK_PATH, HOME_BANNER};

pub struct HealthService;

impl HealthService {
    // 首页，只返回服务名称
    pub async fn home() -> impl Responder {
        trace!("Received home page request");

        HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(HOME_BANNER)
    }

    // 健康检查，进程能响应即视为健康
    pub async fn health_check() -> impl Responder {
        trace!("Received health check request");

        HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(HEALTH_CHECK_BODY)
    }
}

/// Home + health 路由配置
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(HealthService::home))
        .route(HEALTH_CHECK_PATH, web::get().to(HealthService::health_check));
}
