//! 私有网段判断
//!
//! Only IPv4 (and IPv4-mapped IPv6) addresses are classified. Every other
//! IPv6 address is reported as public.

use std::net::{IpAddr, Ipv4Addr};

/// A reserved IPv4 block, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl IpRange {
    pub const fn new(start: Ipv4Addr, end: Ipv4Addr) -> Self {
        Self { start, end }
    }

    /// Byte-wise comparison: `start <= ip < end`.
    #[inline]
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let octets = ip.octets();
        octets >= self.start.octets() && octets < self.end.octets()
    }
}

/// Reserved blocks checked in order. The end address of each block is
/// itself outside the block.
pub const PRIVATE_RANGES: [IpRange; 6] = [
    IpRange::new(Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(10, 255, 255, 255)),
    IpRange::new(
        Ipv4Addr::new(100, 64, 0, 0),
        Ipv4Addr::new(100, 127, 255, 255),
    ),
    IpRange::new(
        Ipv4Addr::new(172, 16, 0, 0),
        Ipv4Addr::new(172, 31, 255, 255),
    ),
    IpRange::new(Ipv4Addr::new(192, 0, 0, 0), Ipv4Addr::new(192, 0, 0, 255)),
    IpRange::new(
        Ipv4Addr::new(192, 168, 0, 0),
        Ipv4Addr::new(192, 168, 255, 255),
    ),
    IpRange::new(
        Ipv4Addr::new(198, 18, 0, 0),
        Ipv4Addr::new(198, 19, 255, 255),
    ),
];

/// Reduce an address to its 4-byte form, if it has one.
#[inline]
pub fn to_ipv4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// 检查 IP 是否位于私有网段
pub fn is_private_subnet(ip: IpAddr) -> bool {
    match to_ipv4(ip) {
        Some(v4) => PRIVATE_RANGES.iter().any(|range| range.contains(v4)),
        None => false,
    }
}
