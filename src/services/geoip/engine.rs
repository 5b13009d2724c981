//! Geo lookup engine
//!
//! Classifies the input address and, for public addresses, queries the ASN
//! and city databases. Each database is opened for the duration of one
//! lookup and closed again on every exit path.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{error, info};

use super::classifier::is_private_subnet;
use super::dataset::DatasetOpener;
use super::maxmind::MaxMindOpener;
use super::record::GeoRecord;
use crate::config::GeoIpConfig;
use crate::errors::{GeoLookupError, Result};

const SERVICE: &str = "apihandler";

/// Shared lookup context: database paths plus the opener used to read them.
pub struct GeoLookupEngine {
    config: GeoIpConfig,
    opener: Arc<dyn DatasetOpener>,
}

impl GeoLookupEngine {
    /// Engine backed by the MaxMind databases named in `config`.
    pub fn new(config: &GeoIpConfig) -> Self {
        Self::with_opener(config, Arc::new(MaxMindOpener))
    }

    pub fn with_opener(config: &GeoIpConfig, opener: Arc<dyn DatasetOpener>) -> Self {
        info!(
            service = "main",
            "GeoIP: Using {} databases (asn: {}, city: {})",
            opener.name(),
            config.asn_db,
            config.city_db
        );
        Self {
            config: config.clone(),
            opener,
        }
    }

    pub fn config(&self) -> &GeoIpConfig {
        &self.config
    }

    /// Look up one address given as text.
    ///
    /// Blocking: opens and reads database files. Run it off the async executor.
    pub fn geo_search(&self, ip_address: &str) -> Result<GeoRecord> {
        if ip_address == "::1" || ip_address == "127.0.0.1" {
            return Ok(GeoRecord::loopback());
        }

        let ip: IpAddr = ip_address.parse().map_err(|_| {
            GeoLookupError::parse(format!(
                "error converting string [ {} ] to IP Address",
                ip_address
            ))
        })?;

        if is_private_subnet(ip) {
            info!(
                service = SERVICE,
                "Address appears to be from a private subnet for GEO Search: {}", ip_address
            );
            return Ok(GeoRecord::private_placeholder());
        }

        self.search_public(ip)
    }

    fn search_public(&self, ip: IpAddr) -> Result<GeoRecord> {
        let mut record = GeoRecord::default();

        // ASN
        {
            let asn_db = self.opener.open(&self.config.asn_db).inspect_err(|e| {
                error!(
                    service = SERVICE,
                    error = %e,
                    "Could not open ASN Database: {}", self.config.asn_db
                );
            })?;
            let asn = asn_db.asn(ip).inspect_err(|e| {
                error!(
                    service = SERVICE,
                    error = %e,
                    "Could not find record in ASN Database: {}", self.config.asn_db
                );
            })?;
            record.organization = asn.organization;
            record.asn = asn.number.to_string();
        }

        // City
        {
            let city_db = self.opener.open(&self.config.city_db).inspect_err(|e| {
                error!(
                    service = SERVICE,
                    error = %e,
                    "Could not open city database: {}", self.config.city_db
                );
            })?;
            let city = city_db.city(ip).inspect_err(|e| {
                error!(
                    service = SERVICE,
                    error = %e,
                    "Could not find ip: {} in city database: {}", ip, self.config.city_db
                );
            })?;
            record.city = city.city_name;
            record.country_name = city.country_name;
            record.country_iso_code = city.iso_code;
            record.time_zone = city.time_zone;
            record.is_anonymous_proxy = city.is_anonymous_proxy;
            record.is_eu = city.is_in_eu;
        }

        record.ip_address = Some(ip);
        record.found = true;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geoip::dataset::{AsnRecord, CityRecord, Dataset};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ASN_PATH: &str = "fixture/asn.mmdb";
    const CITY_PATH: &str = "fixture/city.mmdb";

    fn fixture_config() -> GeoIpConfig {
        GeoIpConfig {
            asn_db: ASN_PATH.to_string(),
            city_db: CITY_PATH.to_string(),
        }
    }

    /// In-memory databases keyed by path, counting open/close calls.
    #[derive(Default)]
    struct FixtureOpener {
        asn: HashMap<IpAddr, AsnRecord>,
        city: HashMap<IpAddr, CityRecord>,
        missing_paths: Vec<String>,
        opened: Arc<Mutex<Vec<String>>>,
        live_handles: Arc<AtomicUsize>,
    }

    struct FixtureDataset {
        asn: HashMap<IpAddr, AsnRecord>,
        city: HashMap<IpAddr, CityRecord>,
        live_handles: Arc<AtomicUsize>,
    }

    impl Drop for FixtureDataset {
        fn drop(&mut self) {
            self.live_handles.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl Dataset for FixtureDataset {
        fn asn(&self, ip: IpAddr) -> Result<AsnRecord> {
            self.asn
                .get(&ip)
                .cloned()
                .ok_or_else(|| GeoLookupError::lookup(format!("no ASN record for {}", ip)))
        }

        fn city(&self, ip: IpAddr) -> Result<CityRecord> {
            self.city
                .get(&ip)
                .cloned()
                .ok_or_else(|| GeoLookupError::lookup(format!("no city record for {}", ip)))
        }
    }

    impl DatasetOpener for FixtureOpener {
        fn open(&self, path: &str) -> Result<Box<dyn Dataset>> {
            self.opened.lock().unwrap().push(path.to_string());
            if self.missing_paths.iter().any(|p| p == path) {
                return Err(GeoLookupError::database_open(path));
            }
            self.live_handles.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FixtureDataset {
                asn: self.asn.clone(),
                city: self.city.clone(),
                live_handles: Arc::clone(&self.live_handles),
            }))
        }

        fn name(&self) -> &'static str {
            "Fixture"
        }
    }

    fn testville() -> FixtureOpener {
        let ip: IpAddr = "203.0.113.5".parse().unwrap();
        let mut opener = FixtureOpener::default();
        opener.asn.insert(
            ip,
            AsnRecord {
                organization: "Example Org".to_string(),
                number: 64500,
            },
        );
        opener.city.insert(
            ip,
            CityRecord {
                city_name: "Testville".to_string(),
                country_name: "Testland".to_string(),
                iso_code: "TL".to_string(),
                is_in_eu: true,
                time_zone: "Etc/UTC".to_string(),
                is_anonymous_proxy: false,
            },
        );
        opener
    }

    type OpenLog = Arc<Mutex<Vec<String>>>;

    fn engine(opener: FixtureOpener) -> (GeoLookupEngine, OpenLog, Arc<AtomicUsize>) {
        let opened = Arc::clone(&opener.opened);
        let live = Arc::clone(&opener.live_handles);
        (
            GeoLookupEngine::with_opener(&fixture_config(), Arc::new(opener)),
            opened,
            live,
        )
    }

    #[test]
    fn test_loopback_skips_datasets() {
        let (engine, opened, _) = engine(testville());
        for input in ["::1", "127.0.0.1"] {
            let record = engine.geo_search(input).unwrap();
            assert_eq!(record, GeoRecord::loopback());
            assert!(!record.found);
        }
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_input_is_parse_error() {
        let (engine, opened, _) = engine(testville());
        let err = engine.geo_search("not-an-ip").unwrap_err();
        assert!(matches!(err, GeoLookupError::Parse(_)));
        assert!(err.message().contains("not-an-ip"));
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_private_address_uses_placeholder() {
        let (engine, opened, _) = engine(testville());
        let record = engine.geo_search("192.168.1.1").unwrap();
        assert!(record.is_private);
        assert_eq!(record, GeoRecord::private_placeholder());
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_other_loopback_forms_are_not_short_circuited() {
        // only the two literal strings are special; 127.0.0.2 goes to the datasets
        let (engine, opened, _) = engine(testville());
        let err = engine.geo_search("127.0.0.2").unwrap_err();
        assert!(matches!(err, GeoLookupError::Lookup(_)));
        assert_eq!(opened.lock().unwrap().as_slice(), [ASN_PATH]);
    }

    #[test]
    fn test_public_lookup_fills_every_field() {
        let (engine, opened, live) = engine(testville());
        let record = engine.geo_search("203.0.113.5").unwrap();

        assert!(record.found);
        assert!(!record.is_private);
        assert_eq!(record.ip_address, Some("203.0.113.5".parse().unwrap()));
        assert_eq!(record.city, "Testville");
        assert_eq!(record.country_name, "Testland");
        assert_eq!(record.country_iso_code, "TL");
        assert_eq!(record.time_zone, "Etc/UTC");
        assert!(record.is_eu);
        assert!(!record.is_anonymous_proxy);
        assert_eq!(record.asn, "64500");
        assert_eq!(record.organization, "Example Org");
        assert!(record.network.is_empty());

        assert_eq!(opened.lock().unwrap().as_slice(), [ASN_PATH, CITY_PATH]);
        assert_eq!(live.load(Ordering::SeqCst), 0, "handles must be released");
    }

    #[test]
    fn test_asn_miss_aborts_before_city() {
        let (engine, opened, live) = engine(testville());
        let err = engine.geo_search("198.51.100.7").unwrap_err();
        assert!(matches!(err, GeoLookupError::Lookup(_)));
        assert_eq!(opened.lock().unwrap().as_slice(), [ASN_PATH]);
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_city_miss_is_lookup_error() {
        let mut opener = testville();
        opener.city.clear();
        let (engine, _, live) = engine(opener);
        let err = engine.geo_search("203.0.113.5").unwrap_err();
        assert!(matches!(err, GeoLookupError::Lookup(_)));
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_configured_asn_path_is_used() {
        let mut opener = testville();
        opener.missing_paths.push(ASN_PATH.to_string());
        let (engine, opened, _) = engine(opener);
        let err = engine.geo_search("203.0.113.5").unwrap_err();
        assert!(matches!(err, GeoLookupError::DatabaseOpen(_)));
        assert_eq!(opened.lock().unwrap().as_slice(), [ASN_PATH]);
    }

    #[test]
    fn test_missing_city_database_is_open_error() {
        let mut opener = testville();
        opener.missing_paths.push(CITY_PATH.to_string());
        let (engine, _, live) = engine(opener);
        let err = engine.geo_search("203.0.113.5").unwrap_err();
        assert!(matches!(err, GeoLookupError::DatabaseOpen(_)));
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engine_keeps_config() {
        let (engine, _, _) = engine(testville());
        assert_eq!(engine.config(), &fixture_config());
    }
}
