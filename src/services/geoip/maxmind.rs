//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 GeoLite2-ASN.mmdb / GeoLite2-City.mmdb 文件进行查询

use std::net::IpAddr;

use maxminddb::{Reader, geoip2};
use serde::Deserialize;
use tracing::trace;

use super::dataset::{AsnRecord, CityRecord, Dataset, DatasetOpener};
use crate::errors::{GeoLookupError, Result};

/// Opens `.mmdb` files with `maxminddb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxMindOpener;

impl DatasetOpener for MaxMindOpener {
    fn open(&self, path: &str) -> Result<Box<dyn Dataset>> {
        let reader = Reader::open_readfile(path).map_err(|e| {
            GeoLookupError::database_open(format!(
                "Could not open database file: {} with error: {}",
                path, e
            ))
        })?;
        trace!("Opened MaxMind database at {}", path);
        Ok(Box::new(MaxMindDataset {
            reader,
            path: path.to_string(),
        }))
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

/// One open MaxMind database. The file contents are released on drop.
pub struct MaxMindDataset {
    reader: Reader<Vec<u8>>,
    path: String,
}

impl MaxMindDataset {
    fn lookup_error(&self, ip: IpAddr, detail: impl std::fmt::Display) -> GeoLookupError {
        GeoLookupError::lookup(format!(
            "error finding ip: {} in database: {}: {}",
            ip, self.path, detail
        ))
    }
}

impl Dataset for MaxMindDataset {
    fn asn(&self, ip: IpAddr) -> Result<AsnRecord> {
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| self.lookup_error(ip, e))?;
        let asn: geoip2::Asn = result
            .decode()
            .map_err(|e| self.lookup_error(ip, e))?
            .ok_or_else(|| self.lookup_error(ip, "no ASN record"))?;

        let record = asn_record(&asn);
        trace!(
            "MaxMind ASN lookup for {}: asn={}, org={}",
            ip, record.number, record.organization
        );
        Ok(record)
    }

    fn city(&self, ip: IpAddr) -> Result<CityRecord> {
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| self.lookup_error(ip, e))?;
        let doc: CityDoc = result
            .decode()
            .map_err(|e| self.lookup_error(ip, e))?
            .ok_or_else(|| self.lookup_error(ip, "no city record"))?;

        let record = city_record(&doc);
        trace!(
            "MaxMind city lookup for {}: country={}, city={}",
            ip, record.iso_code, record.city_name
        );
        Ok(record)
    }
}

// ============================================================
// City 文档结构
// ============================================================
//
// `geoip2::City` 的 traits 不包含 `is_anonymous_proxy`，
// 这里只解码需要的字段。

#[derive(Debug, Default, Deserialize)]
struct CityDoc<'a> {
    #[serde(borrow, default)]
    city: NamedPlace<'a>,
    #[serde(borrow, default)]
    country: CountryDoc<'a>,
    #[serde(borrow, default)]
    location: LocationDoc<'a>,
    #[serde(default)]
    traits: TraitsDoc,
}

#[derive(Debug, Default, Deserialize)]
struct NamedPlace<'a> {
    #[serde(borrow, default)]
    names: Names<'a>,
}

/// Only the English name is ever read.
#[derive(Debug, Default, Deserialize)]
struct Names<'a> {
    #[serde(borrow, rename = "en", default)]
    english: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct CountryDoc<'a> {
    #[serde(borrow, default)]
    names: Names<'a>,
    #[serde(borrow, default)]
    iso_code: Option<&'a str>,
    #[serde(default)]
    is_in_european_union: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct LocationDoc<'a> {
    #[serde(borrow, default)]
    time_zone: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct TraitsDoc {
    #[serde(default)]
    is_anonymous_proxy: Option<bool>,
}

fn asn_record(asn: &geoip2::Asn<'_>) -> AsnRecord {
    AsnRecord {
        organization: asn
            .autonomous_system_organization
            .unwrap_or_default()
            .to_string(),
        number: asn.autonomous_system_number.unwrap_or_default(),
    }
}

// 固定使用英文名称，缺失字段取零值
fn city_record(doc: &CityDoc<'_>) -> CityRecord {
    CityRecord {
        city_name: doc.city.names.english.unwrap_or_default().to_string(),
        country_name: doc.country.names.english.unwrap_or_default().to_string(),
        iso_code: doc.country.iso_code.unwrap_or_default().to_string(),
        is_in_eu: doc.country.is_in_european_union.unwrap_or(false),
        time_zone: doc.location.time_zone.unwrap_or_default().to_string(),
        is_anonymous_proxy: doc.traits.is_anonymous_proxy.unwrap_or(false),
    }
}
