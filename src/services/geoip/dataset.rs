//! Dataset 抽象层
//!
//! 查询引擎只通过这里的 trait 访问地理数据库：
//! 1. `DatasetOpener::open` 按路径打开数据库
//! 2. `Dataset::asn` / `Dataset::city` 按 IP 查询
//! 3. handle 在 drop 时释放

use std::net::IpAddr;

use crate::errors::Result;

/// Network owner of an address block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnRecord {
    pub organization: String,
    pub number: u32,
}

/// Location data for an address. Names are in the fixed English locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityRecord {
    pub city_name: String,
    pub country_name: String,
    pub iso_code: String,
    pub is_in_eu: bool,
    pub time_zone: String,
    pub is_anonymous_proxy: bool,
}

/// An open database handle.
///
/// A miss is reported as `GeoLookupError::Lookup`, same as an internal fault.
pub trait Dataset {
    fn asn(&self, ip: IpAddr) -> Result<AsnRecord>;

    fn city(&self, ip: IpAddr) -> Result<CityRecord>;
}

/// Opens database files by path.
pub trait DatasetOpener: Send + Sync {
    /// Failure is reported as `GeoLookupError::DatabaseOpen`.
    fn open(&self, path: &str) -> Result<Box<dyn Dataset>>;

    /// 获取实现名称（用于日志）
    fn name(&self) -> &'static str;
}
