//! Shared value types.
use std::net::IpAddr;

use strum::{Display, EnumString};

/// Address family of a neighbor binding.
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Whether the given address belongs to this family.
    pub fn contains(&self, addr: IpAddr) -> bool {
        match self {
            AddressFamily::Ipv4 => addr.is_ipv4(),
            AddressFamily::Ipv6 => addr.is_ipv6(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_family_membership() {
        let v4: IpAddr = "192.168.1.42".parse().unwrap();
        let v6: IpAddr = "fe80::1".parse().unwrap();
        assert!(AddressFamily::Ipv4.contains(v4));
        assert!(!AddressFamily::Ipv4.contains(v6));
        assert!(AddressFamily::Ipv6.contains(v6));
        assert!(!AddressFamily::Ipv6.contains(v4));
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!(AddressFamily::from_str("ipv4").unwrap(), AddressFamily::Ipv4);
        assert_eq!(AddressFamily::from_str("ipv6").unwrap(), AddressFamily::Ipv6);
        assert!(AddressFamily::from_str("ipx").is_err());
    }
}
