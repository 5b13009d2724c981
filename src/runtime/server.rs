//! Server mode
//!
//! Assembles the actix-web application and runs it until a shutdown signal
//! arrives, then drains in-flight requests.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::configure_routes;
use crate::api::middleware::{AccessLogMiddleware, TimingMiddleware};
use crate::config::StaticConfig;
use crate::metrics::MetricsRecorder;
use crate::runtime::lifetime::{shutdown, startup::StartupContext};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig, startup: StartupContext) -> Result<()> {
    let engine = startup.engine;
    let metrics = startup.metrics;
    let recorder: Arc<dyn MetricsRecorder> = metrics.clone();

    let server_config = &config.server;
    let cpu_count = server_config.cpu_count.max(1);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware::new(recorder.clone()))
            .wrap(AccessLogMiddleware) // 最外层，生成 request_id 并输出访问日志
            .app_data(web::Data::new(engine.clone()))
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .configure(configure_routes)
    })
    .workers(cpu_count)
    .client_request_timeout(Duration::from_secs(server_config.read_timeout_secs))
    .client_disconnect_timeout(Duration::from_secs(server_config.write_timeout_secs))
    .shutdown_timeout(server_config.graceful_timeout_secs)
    .disable_signals()
    .bind((server_config.host.as_str(), server_config.port))
    .with_context(|| {
        format!(
            "Failed to bind {}:{}",
            server_config.host, server_config.port
        )
    })?
    .run();

    info!(
        service = "main",
        "Starting server at http://{}:{}", server_config.host, server_config.port
    );

    let handle = server.handle();
    let graceful_timeout = server_config.graceful_timeout_secs;
    tokio::spawn(async move {
        shutdown::listen_for_shutdown().await;
        info!(
            service = "main",
            "Waiting up to {}s for in-flight requests", graceful_timeout
        );
        handle.stop(true).await;
    });

    server.await.context("HTTP server terminated with error")?;
    info!(service = "main", "Server stopped");
    Ok(())
}
