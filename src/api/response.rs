//! Lookup response envelope

use serde::{Deserialize, Serialize};

use crate::api::constants::LOOKUP_FAILED_MESSAGE;
use crate::services::GeoRecord;

/// Body of every `/api/v1/geoiplookup/{ip}` response, success or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub message: String,
    pub is_error: bool,
    pub geo_location: GeoRecord,
}

impl ResponseEnvelope {
    pub fn success(record: GeoRecord) -> Self {
        Self {
            message: String::new(),
            is_error: false,
            geo_location: record,
        }
    }

    /// Generic failure: fixed message, zero-valued record.
    pub fn failure() -> Self {
        Self {
            message: LOOKUP_FAILED_MESSAGE.to_string(),
            is_error: true,
            geo_location: GeoRecord::default(),
        }
    }
}
