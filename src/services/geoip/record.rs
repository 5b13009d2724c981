//! Lookup result types

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Result of a single geo lookup. Built per request, never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    #[serde(rename = "is_found")]
    pub found: bool,
    pub is_private: bool,
    #[serde(rename = "ip_addr", with = "ip_text")]
    pub ip_address: Option<IpAddr>,
    pub city: String,
    pub country_name: String,
    pub country_iso_code: String,
    pub time_zone: String,
    #[serde(rename = "is_proxy")]
    pub is_anonymous_proxy: bool,
    pub is_eu: bool,
    pub asn: String,
    pub organization: String,
    /// Reserved, always empty.
    pub network: String,
}

/// Stand-in answer for addresses inside a reserved block.
///
/// The dataset is never consulted for these; the values are fixed.
pub const PRIVATE_PLACEHOLDER: PrivatePlaceholder = PrivatePlaceholder {
    ip_address: Ipv4Addr::LOCALHOST,
    city: "Boise",
    country_name: "Merica",
    country_iso_code: "US",
};

#[derive(Debug, Clone, Copy)]
pub struct PrivatePlaceholder {
    pub ip_address: Ipv4Addr,
    pub city: &'static str,
    pub country_name: &'static str,
    pub country_iso_code: &'static str,
}

/// Value used for `asn` and `organization` on loopback input.
pub const LOOPBACK_MARKER: &str = "None";

impl GeoRecord {
    /// Answer for `::1` / `127.0.0.1`.
    pub fn loopback() -> Self {
        Self {
            organization: LOOPBACK_MARKER.to_string(),
            asn: LOOPBACK_MARKER.to_string(),
            ..Self::default()
        }
    }

    /// Answer for an address inside [`PRIVATE_RANGES`](super::PRIVATE_RANGES).
    pub fn private_placeholder() -> Self {
        let p = PRIVATE_PLACEHOLDER;
        Self {
            is_private: true,
            ip_address: Some(IpAddr::V4(p.ip_address)),
            city: p.city.to_string(),
            country_name: p.country_name.to_string(),
            country_iso_code: p.country_iso_code.to_string(),
            is_eu: false,
            ..Self::default()
        }
    }
}

/// `Option<IpAddr>` as text, with `""` standing for "no address".
mod ip_text {
    use std::net::IpAddr;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ip: &Option<IpAddr>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ip {
            Some(ip) => serializer.collect_str(ip),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<IpAddr>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_wire_shape() {
        let value = serde_json::to_value(GeoRecord::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "is_found": false,
                "is_private": false,
                "ip_addr": "",
                "city": "",
                "country_name": "",
                "country_iso_code": "",
                "time_zone": "",
                "is_proxy": false,
                "is_eu": false,
                "asn": "",
                "organization": "",
                "network": ""
            })
        );
    }

    #[test]
    fn test_private_placeholder_values() {
        let record = GeoRecord::private_placeholder();
        assert!(record.is_private);
        assert!(!record.found);
        assert!(!record.is_eu);
        assert_eq!(record.ip_address, Some("127.0.0.1".parse().unwrap()));
        assert_eq!(record.city, "Boise");
        assert_eq!(record.country_name, "Merica");
        assert_eq!(record.country_iso_code, "US");
        assert!(record.asn.is_empty());
    }

    #[test]
    fn test_loopback_record() {
        let record = GeoRecord::loopback();
        assert_eq!(record.asn, "None");
        assert_eq!(record.organization, "None");
        assert_eq!(
            GeoRecord {
                asn: String::new(),
                organization: String::new(),
                ..record
            },
            GeoRecord::default()
        );
    }

    #[test]
    fn test_ip_addr_text_roundtrip() {
        let record = GeoRecord {
            ip_address: Some("2001:db8::1".parse().unwrap()),
            ..GeoRecord::default()
        };
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.contains("\"ip_addr\":\"2001:db8::1\""));
        let back: GeoRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
