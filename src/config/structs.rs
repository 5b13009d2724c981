use serde::{Deserialize, Serialize};

use crate::errors::{GeoLookupError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Legacy environment variable holding the ASN database path.
pub const ENV_ASN_DB: &str = "GEO_IP_ASN_DB";
/// Legacy environment variable holding the city database path.
pub const ENV_CITY_DB: &str = "GEO_IP_CITY_DB";

/// 静态配置（启动时加载一次，之后只读）
///
/// - server: 监听地址、端口、worker 数量、超时
/// - geoip: MaxMind 数据库路径
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset paths explicitly set through the legacy `GEO_IP_*` variables.
///
/// These take precedence over every other configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetOverrides {
    pub asn_db: Option<String>,
    pub city_db: Option<String>,
}

impl DatasetOverrides {
    pub fn from_env() -> Self {
        Self {
            asn_db: std::env::var(ENV_ASN_DB).ok().filter(|v| !v.is_empty()),
            city_db: std::env::var(ENV_CITY_DB).ok().filter(|v| !v.is_empty()),
        }
    }
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：GEO_IP_* > GEOLOOKUP__* > 配置文件 > 默认值
    /// 示例：GEOLOOKUP__SERVER__PORT=9999
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with(path, DatasetOverrides::from_env())
    }

    pub fn load_with(path: &str, overrides: DatasetOverrides) -> Result<Self> {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("GEOLOOKUP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("geoip.asn_db", overrides.asn_db)?
            .set_override_option("geoip.city_db", overrides.city_db)?;

        let settings = builder.build()?;
        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that can never produce a working server.
    pub fn validate(&self) -> Result<()> {
        if self.geoip.asn_db.trim().is_empty() {
            return Err(GeoLookupError::config("geoip.asn_db must not be empty"));
        }
        if self.geoip.city_db.trim().is_empty() {
            return Err(GeoLookupError::config("geoip.city_db must not be empty"));
        }
        if self.server.cpu_count == 0 {
            return Err(GeoLookupError::config("server.cpu_count must be at least 1"));
        }
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(GeoLookupError::config(format!(
                "Invalid logging.format: '{}'. Valid: text, json",
                other
            ))),
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub write_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub graceful_timeout_secs: u64,
}

/// Locations of the MaxMind databases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeoIpConfig {
    /// GeoLite2-ASN.mmdb
    #[serde(default = "default_asn_db")]
    pub asn_db: String,
    /// GeoLite2-City.mmdb
    #[serde(default = "default_city_db")]
    pub city_db: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    4990
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_asn_db() -> String {
    "db/GeoLite2-ASN.mmdb".to_string()
}

fn default_city_db() -> String {
    "db/GeoLite2-City.mmdb".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            read_timeout_secs: default_timeout_secs(),
            write_timeout_secs: default_timeout_secs(),
            graceful_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            asn_db: default_asn_db(),
            city_db: default_city_db(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn missing_file() -> String {
        let dir = tempfile::tempdir().unwrap();
        dir.path().join("absent.toml").display().to_string()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = StaticConfig::load_with(&missing_file(), DatasetOverrides::default()).unwrap();
        assert_eq!(config.server.port, 4990);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.graceful_timeout_secs, 15);
        assert_eq!(config.geoip.asn_db, "db/GeoLite2-ASN.mmdb");
        assert_eq!(config.geoip.city_db, "db/GeoLite2-City.mmdb");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\n\n[geoip]\nasn_db = \"/data/asn.mmdb\"\n\
             city_db = \"/data/city.mmdb\"\n"
        )
        .unwrap();

        let path = file.path().display().to_string();
        let config = StaticConfig::load_with(&path, DatasetOverrides::default()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.geoip.asn_db, "/data/asn.mmdb");
        assert_eq!(config.geoip.city_db, "/data/city.mmdb");
    }

    #[test]
    fn test_legacy_overrides_win_over_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[geoip]\nasn_db = \"/file/asn.mmdb\"\n").unwrap();

        let overrides = DatasetOverrides {
            asn_db: Some("/env/asn.mmdb".to_string()),
            city_db: Some("/env/city.mmdb".to_string()),
        };
        let path = file.path().display().to_string();
        let config = StaticConfig::load_with(&path, overrides).unwrap();
        assert_eq!(config.geoip.asn_db, "/env/asn.mmdb");
        assert_eq!(config.geoip.city_db, "/env/city.mmdb");
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GeoLookupError::Config(_)));
    }

    #[test]
    fn test_empty_dataset_path_rejected() {
        let mut config = StaticConfig::default();
        config.geoip.city_db = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_mentions_sections() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[geoip]"));
        assert!(sample.contains("asn_db = \"db/GeoLite2-ASN.mmdb\""));
    }
}
