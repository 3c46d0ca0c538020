//! IPv4 subnet calculator
//!
//! Validates an IPv4 address and a CIDR prefix length given as text and
//! derives everything a subnetting worksheet asks for:
//! - Network and broadcast address
//! - Dotted-decimal subnet mask
//! - First and last usable host
//! - Number of usable hosts
//!
//! # Examples
//!
//! ```
//! use nettool_subnet::{calculate, HostCount};
//!
//! let result = calculate("192.168.1.10", "24").unwrap();
//! assert_eq!(result.network_address.to_string(), "192.168.1.0");
//! assert_eq!(result.broadcast_address.to_string(), "192.168.1.255");
//! assert_eq!(result.subnet_mask.to_string(), "255.255.255.0");
//! assert_eq!(result.total_hosts, HostCount::Count(254));
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Smallest accepted prefix length
pub const MIN_PREFIX_LEN: u8 = 1;
/// Largest accepted prefix length
pub const MAX_PREFIX_LEN: u8 = 32;

/// Subnet validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Address is not four dot-separated octets in 0-255
    #[error("Invalid IP address or CIDR notation (e.g., 192.168.1.1 and 24)")]
    InvalidAddress(String),

    /// Prefix is not an integer in 1-32
    #[error("Invalid IP address or CIDR notation (e.g., 192.168.1.1 and 24)")]
    InvalidPrefix(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Network mask with the top `prefix_len` bits set
///
/// `prefix_len` must already be within 1-32.
///
/// ```
/// assert_eq!(nettool_subnet::mask(24), 0xFFFFFF00);
/// assert_eq!(nettool_subnet::mask(32), 0xFFFFFFFF);
/// ```
pub fn mask(prefix_len: u8) -> u32 {
    debug_assert!((MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&prefix_len));
    u32::MAX << (MAX_PREFIX_LEN - prefix_len)
}

/// Validated calculator input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubnetInput {
    address: Ipv4Addr,
    prefix_len: u8,
}

impl SubnetInput {
    /// Create input from an already-parsed address
    ///
    /// # Arguments
    ///
    /// * `address` - Any IPv4 address inside the subnet
    /// * `prefix_len` - Prefix length (1-32)
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Result<Self> {
        if !(MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&prefix_len) {
            return Err(ValidationError::InvalidPrefix(prefix_len.to_string()));
        }
        Ok(Self {
            address,
            prefix_len,
        })
    }

    /// Validate address and prefix text
    ///
    /// The address is checked first, so input that is wrong in both
    /// places reports the address.
    pub fn parse(address_text: &str, prefix_text: &str) -> Result<Self> {
        let address = parse_address(address_text)?;
        let prefix_len = parse_prefix(prefix_text)?;
        Ok(Self {
            address,
            prefix_len,
        })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Run the subnet arithmetic
    pub fn calculate(&self) -> SubnetResult {
        let addr = u32::from(self.address);
        let mask = mask(self.prefix_len);
        let network = addr & mask;
        let broadcast = network | !mask;

        // A /32 at either end of the address space wraps, like 32-bit integer math would.
        let first_host = network.wrapping_add(1);
        let last_host = broadcast.wrapping_sub(1);

        let total_hosts = HostCount::for_prefix(self.prefix_len);

        tracing::debug!(
            address = %self.address,
            prefix_len = self.prefix_len,
            network = %Ipv4Addr::from(network),
            "calculated subnet"
        );

        SubnetResult {
            address: self.address,
            prefix_len: self.prefix_len,
            network_address: Ipv4Addr::from(network),
            broadcast_address: Ipv4Addr::from(broadcast),
            subnet_mask: Ipv4Addr::from(mask),
            first_host: Ipv4Addr::from(first_host),
            last_host: Ipv4Addr::from(last_host),
            total_hosts,
        }
    }
}

impl FromStr for SubnetInput {
    type Err = ValidationError;

    /// Parse `a.b.c.d/p` notation
    fn from_str(s: &str) -> Result<Self> {
        let (address, prefix) = s
            .split_once('/')
            .ok_or_else(|| ValidationError::InvalidPrefix(String::new()))?;
        Self::parse(address, prefix)
    }
}

impl fmt::Display for SubnetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

/// Validate and calculate in one step
///
/// # Examples
///
/// ```
/// use nettool_subnet::calculate;
///
/// assert!(calculate("256.1.1.1", "24").is_err());
/// assert!(calculate("192.168.1.1", "0").is_err());
/// ```
pub fn calculate(address_text: &str, prefix_text: &str) -> Result<SubnetResult> {
    SubnetInput::parse(address_text, prefix_text).map(|input| input.calculate())
}

/// Number of usable hosts in a subnet
///
/// `2^(32 - prefix) - 2` is negative only for a /32, which reports
/// [`HostCount::NotApplicable`]. A /31 reports zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCount {
    Count(u64),
    NotApplicable,
}

impl HostCount {
    /// `prefix_len` must already be within 1-32.
    pub fn for_prefix(prefix_len: u8) -> Self {
        let total = (1i64 << (MAX_PREFIX_LEN - prefix_len)) - 2;
        if total >= 0 {
            HostCount::Count(total as u64)
        } else {
            HostCount::NotApplicable
        }
    }

    pub fn count(&self) -> Option<u64> {
        match self {
            HostCount::Count(n) => Some(*n),
            HostCount::NotApplicable => None,
        }
    }
}

impl fmt::Display for HostCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCount::Count(n) => write!(f, "{}", n),
            HostCount::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for HostCount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            HostCount::Count(n) => serializer.serialize_u64(*n),
            HostCount::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

/// Everything derived from one address and prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetResult {
    /// Address as entered
    pub address: Ipv4Addr,
    /// Prefix length as entered
    pub prefix_len: u8,
    /// Address with all host bits cleared
    pub network_address: Ipv4Addr,
    /// Address with all host bits set
    pub broadcast_address: Ipv4Addr,
    /// Dotted-decimal form of the prefix
    pub subnet_mask: Ipv4Addr,
    /// Network address + 1
    pub first_host: Ipv4Addr,
    /// Broadcast address - 1
    pub last_host: Ipv4Addr,
    /// Usable host count
    pub total_hosts: HostCount,
}

impl SubnetResult {
    /// CIDR notation of the network, e.g. `192.168.1.0/24`
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network_address, self.prefix_len)
    }
}

/// Exactly four groups of 1-3 digits, each 0-255
fn parse_address(text: &str) -> Result<Ipv4Addr> {
    let invalid = || ValidationError::InvalidAddress(text.to_string());

    let groups: Vec<&str> = text.split('.').collect();
    if groups.len() != 4 {
        return Err(invalid());
    }

    let mut octets = [0u8; 4];
    for (octet, group) in octets.iter_mut().zip(groups) {
        if group.is_empty() || group.len() > 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *octet = group.parse().map_err(|_| invalid())?;
    }

    Ok(Ipv4Addr::from(octets))
}

/// 1-32 written without sign, whitespace or leading zero
fn parse_prefix(text: &str) -> Result<u8> {
    let invalid = || ValidationError::InvalidPrefix(text.to_string());

    if text.is_empty()
        || text.len() > 2
        || text.starts_with('0')
        || !text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let prefix_len: u8 = text.parse().map_err(|_| invalid())?;
    if prefix_len > MAX_PREFIX_LEN {
        return Err(invalid());
    }
    Ok(prefix_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(1), 0x80000000);
        assert_eq!(mask(8), 0xFF000000);
        assert_eq!(mask(16), 0xFFFF0000);
        assert_eq!(mask(24), 0xFFFFFF00);
        assert_eq!(mask(31), 0xFFFFFFFE);
        assert_eq!(mask(32), 0xFFFFFFFF);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("192.168.1.10").unwrap(),
            Ipv4Addr::new(192, 168, 1, 10)
        );
        assert_eq!(parse_address("0.0.0.0").unwrap(), Ipv4Addr::UNSPECIFIED);
        assert_eq!(
            parse_address("010.001.0.9").unwrap(),
            Ipv4Addr::new(10, 1, 0, 9)
        );
    }

    #[test]
    fn test_parse_invalid_address() {
        for text in [
            "",
            "256.1.1.1",
            "1.2.3",
            "1.2.3.4.5",
            "1..3.4",
            "1.2.3.4 ",
            " 1.2.3.4",
            "+1.2.3.4",
            "0001.2.3.4",
            "a.b.c.d",
            "1.2.3.-4",
        ] {
            assert_eq!(
                parse_address(text),
                Err(ValidationError::InvalidAddress(text.to_string())),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_prefix("1").unwrap(), 1);
        assert_eq!(parse_prefix("24").unwrap(), 24);
        assert_eq!(parse_prefix("32").unwrap(), 32);
    }

    #[test]
    fn test_parse_invalid_prefix() {
        for text in ["", "0", "33", "99", "08", "024", "-1", "+8", "abc", "2 4", "1.5"] {
            assert!(parse_prefix(text).is_err(), "{:?} should be rejected", text);
        }
    }

    #[test]
    fn test_address_error_reported_first() {
        assert!(matches!(
            SubnetInput::parse("300.0.0.1", "40"),
            Err(ValidationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_input_new() {
        let input = SubnetInput::new(Ipv4Addr::new(10, 0, 0, 5), 8).unwrap();
        assert_eq!(input.prefix_len(), 8);
        assert!(SubnetInput::new(Ipv4Addr::new(10, 0, 0, 5), 0).is_err());
        assert!(SubnetInput::new(Ipv4Addr::new(10, 0, 0, 5), 33).is_err());
    }

    #[test]
    fn test_input_from_str() {
        let input: SubnetInput = "172.16.5.4/20".parse().unwrap();
        assert_eq!(input.address(), Ipv4Addr::new(172, 16, 5, 4));
        assert_eq!(input.prefix_len(), 20);
        assert_eq!(input.to_string(), "172.16.5.4/20");

        assert!("172.16.5.4".parse::<SubnetInput>().is_err());
        assert!("172.16.5.4/".parse::<SubnetInput>().is_err());
    }

    #[test]
    fn test_class_c() {
        let result = calculate("192.168.1.10", "24").unwrap();
        assert_eq!(result.network_address, Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(result.broadcast_address, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(result.subnet_mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(result.first_host, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(result.last_host, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(result.total_hosts, HostCount::Count(254));
        assert_eq!(result.cidr(), "192.168.1.0/24");
    }

    #[test]
    fn test_slash_31_has_zero_hosts() {
        let result = calculate("10.0.0.7", "31").unwrap();
        assert_eq!(result.network_address, Ipv4Addr::new(10, 0, 0, 6));
        assert_eq!(result.broadcast_address, Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(result.first_host, Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(result.last_host, Ipv4Addr::new(10, 0, 0, 6));
        assert_eq!(result.total_hosts, HostCount::Count(0));
    }

    #[test]
    fn test_slash_32_wraps_at_edges() {
        let top = calculate("255.255.255.255", "32").unwrap();
        assert_eq!(top.first_host, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(top.last_host, Ipv4Addr::new(255, 255, 255, 254));

        let bottom = calculate("0.0.0.0", "32").unwrap();
        assert_eq!(bottom.first_host, Ipv4Addr::new(0, 0, 0, 1));
        assert_eq!(bottom.last_host, Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn test_slash_1() {
        let result = calculate("200.1.2.3", "1").unwrap();
        assert_eq!(result.network_address, Ipv4Addr::new(128, 0, 0, 0));
        assert_eq!(result.broadcast_address, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(result.subnet_mask, Ipv4Addr::new(128, 0, 0, 0));
        assert_eq!(result.total_hosts, HostCount::Count(2_147_483_646));
    }

    #[test]
    fn test_host_count() {
        assert_eq!(HostCount::for_prefix(30), HostCount::Count(2));
        assert_eq!(HostCount::for_prefix(31), HostCount::Count(0));
        assert_eq!(HostCount::for_prefix(32), HostCount::NotApplicable);
        assert_eq!(HostCount::NotApplicable.to_string(), "N/A");
        assert_eq!(HostCount::Count(254).count(), Some(254));
        assert_eq!(HostCount::NotApplicable.count(), None);
    }

    #[test]
    fn test_error_display() {
        let err = calculate("256.1.1.1", "24").unwrap_err();
        assert_eq!(err, ValidationError::InvalidAddress("256.1.1.1".to_string()));
        assert_eq!(
            err.to_string(),
            "Invalid IP address or CIDR notation (e.g., 192.168.1.1 and 24)"
        );

        let err = calculate("192.168.1.1", "0").unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrefix("0".to_string()));
        assert_eq!(err.to_string(), ValidationError::InvalidAddress(String::new()).to_string());
    }

    #[test]
    fn test_result_serialization() {
        let result = calculate("192.168.1.10", "24").unwrap();
        let json = serde_json::to_value(&result).expect("serialization failed");
        assert_eq!(json["network_address"], "192.168.1.0");
        assert_eq!(json["subnet_mask"], "255.255.255.0");
        assert_eq!(json["total_hosts"], 254);

        let host_route = calculate("192.168.1.10", "32").unwrap();
        let json = serde_json::to_value(&host_route).expect("serialization failed");
        assert_eq!(json["total_hosts"], "N/A");
    }
}
