//! 启动前配置验证
//!
//! The service refuses to start when either MaxMind database is missing.

use std::path::Path;

use tracing::{error, info};

use super::GeoIpConfig;
use crate::errors::{GeoLookupError, Result};

/// Check that both configured database files exist on disk.
pub fn validate_dataset_paths(config: &GeoIpConfig) -> Result<()> {
    check_dataset("ASN", &config.asn_db)?;
    check_dataset("city", &config.city_db)?;
    Ok(())
}

fn check_dataset(kind: &str, path: &str) -> Result<()> {
    info!(service = "main", "Checking for {} database: {}", kind, path);

    match std::fs::metadata(Path::new(path)) {
        Ok(meta) if meta.is_file() => {
            info!(service = "main", "{} database: {} found!", kind, path);
            Ok(())
        }
        Ok(_) => {
            error!(service = "main", "{} database path is not a file: {}", kind, path);
            Err(GeoLookupError::file_operation(format!(
                "{} database path is not a file: {}",
                kind, path
            )))
        }
        Err(e) => {
            error!(
                service = "main",
                error = %e,
                "Could not stat {} database: {}", kind, path
            );
            Err(GeoLookupError::file_operation(format!(
                "Could not stat {} database: {}: {}",
                kind, path, e
            )))
        }
    }
}
