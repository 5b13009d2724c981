//! GeoIP 服务模块
//!
//! - `classifier`: 私有网段判断
//! - `dataset`: 数据库访问抽象
//! - `maxmind`: MaxMind GeoLite2 本地数据库实现
//! - `engine`: 查询流程编排

pub mod classifier;
pub mod dataset;
pub mod engine;
mod maxmind;
pub mod record;

pub use classifier::{IpRange, PRIVATE_RANGES, is_private_subnet};
pub use dataset::{AsnRecord, CityRecord, Dataset, DatasetOpener};
pub use engine::GeoLookupEngine;
pub use maxmind::{MaxMindDataset, MaxMindOpener};
pub use record::{GeoRecord, LOOPBACK_MARKER, PRIVATE_PLACEHOLDER};
