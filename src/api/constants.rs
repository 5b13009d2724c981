//! API 模块常量定义

/// Banner returned by `/`
pub const HOME_BANNER: &str = "GeoIP Lookup API";

/// Health check path
pub const HEALTH_CHECK_PATH: &str = "/healthcheck957873";

/// Body returned by the health check
pub const HEALTH_CHECK_BODY: &str = "healthy";

/// Prefix of the lookup endpoint, followed by `/{ip}`
pub const LOOKUP_PREFIX: &str = "/api/v1/geoiplookup";

/// Prometheus exposition path
pub const METRICS_PATH: &str = "/metrics";

/// Message placed in every failed lookup envelope. The real cause only goes to the log.
pub const LOOKUP_FAILED_MESSAGE: &str =
    "Could not determine variable from url parameter /api/v1/geoiplookup/{ip}";

/// Request id response header
pub const REQUEST_ID_HEADER: &str = "x-request-id";
