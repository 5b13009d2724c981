use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{StaticConfig, validate_dataset_paths};
use crate::metrics::Metrics;
use crate::services::GeoLookupEngine;

/// Everything the HTTP workers share, built once before binding.
pub struct StartupContext {
    pub engine: Arc<GeoLookupEngine>,
    pub metrics: Arc<Metrics>,
}

/// 准备服务器启动的上下文
///
/// 检查数据库文件、创建 Prometheus registry 和查询引擎。
/// Any failure here aborts startup before the listener is bound.
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    validate_dataset_paths(&config.geoip).context("GeoIP database check failed")?;

    let metrics = Arc::new(Metrics::new().context("Failed to create metrics registry")?);
    debug!("Metrics registry initialized");

    let engine = Arc::new(GeoLookupEngine::new(&config.geoip));

    info!(
        service = "main",
        "Pre-startup processing completed in {:.2?}",
        start_time.elapsed()
    );

    Ok(StartupContext { engine, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeoIpConfig;

    #[test]
    fn test_missing_databases_abort_startup() {
        let dir = tempfile::tempdir().unwrap();
        let config = StaticConfig {
            geoip: GeoIpConfig {
                asn_db: dir.path().join("asn.mmdb").to_string_lossy().into_owned(),
                city_db: dir.path().join("city.mmdb").to_string_lossy().into_owned(),
            },
            ..StaticConfig::default()
        };

        let err = prepare_server_startup(&config).err().unwrap();
        assert!(err.to_string().contains("GeoIP database check failed"));
    }

    #[test]
    fn test_startup_with_present_files() {
        let dir = tempfile::tempdir().unwrap();
        let asn = dir.path().join("asn.mmdb");
        let city = dir.path().join("city.mmdb");
        std::fs::write(&asn, b"").unwrap();
        std::fs::write(&city, b"").unwrap();

        let config = StaticConfig {
            geoip: GeoIpConfig {
                asn_db: asn.to_string_lossy().into_owned(),
                city_db: city.to_string_lossy().into_owned(),
            },
            ..StaticConfig::default()
        };

        // Files are only opened per lookup, so startup succeeds here.
        let ctx = prepare_server_startup(&config).unwrap();
        assert_eq!(ctx.engine.config(), &config.geoip);
        assert_eq!(ctx.metrics.searches_total.get(), 0);
    }
}
