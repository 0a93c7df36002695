//! Lookup of link-layer bindings in the OS neighbor table.
//!
//! # Examples
//!
//! ```no_run
//! use anyhow::{Context, Result};
//! use mac2ip::models::AddressFamily;
//! use mac2ip::neighbors::{NeighborTable, DEFAULT_IP_BINARY};
//!
//! fn main() -> Result<()> {
//!     let table = NeighborTable::from_ip_binary(DEFAULT_IP_BINARY)?;
//!     let addr = table
//!         .find("aa:bb:cc:dd:ee:ff", AddressFamily::Ipv4)
//!         .context("binding not cached")?;
//!
//!     println!("{}", addr);
//!     Ok(())
//! }
//! ```
use std::net::IpAddr;
use std::process::Command;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::models::AddressFamily;

/// Path to the ip binary.
pub const DEFAULT_IP_BINARY: &str = "ip";

/// State reported by the kernel for a recently confirmed binding.
pub const REACHABLE_STATE: &str = "REACHABLE";

/// A snapshot of the OS neighbor table.
///
/// The kernel already maintains this table as a cache of address-resolution
/// traffic, so a fresh snapshot is taken for every lookup rather than
/// retaining one.
pub struct NeighborTable {
    entries: Vec<NeighborEntry>,
}

impl NeighborTable {
    pub fn new(entries: Vec<NeighborEntry>) -> Self {
        Self { entries }
    }

    /// Build a snapshot by running `ip neigh show`.
    pub fn from_ip_binary(path: &str) -> Result<Self> {
        let result = Command::new(path)
            .args(["neigh", "show"])
            .output()
            .with_context(|| format!("failed to run {} neigh show", path))?;
        if !result.status.success() {
            bail!("{} neigh show exited with {}", path, result.status);
        }
        let output = String::from_utf8(result.stdout)?;
        Ok(Self::from_ip_output(&output))
    }

    /// Build a snapshot from captured `ip neigh show` output.
    /// Malformed or incomplete rows are skipped, not reported.
    pub fn from_ip_output(output: &str) -> Self {
        let entries = output.lines().flat_map(NeighborEntry::from_line).collect();
        Self::new(entries)
    }

    /// Return the first address of the given family bound to the given MAC
    /// and currently reachable, in table order.
    ///
    /// The MAC must be lower-cased; the kernel prints link-layer addresses
    /// in lower case.
    pub fn find(&self, mac: &str, family: AddressFamily) -> Option<IpAddr> {
        self.entries
            .iter()
            .find(|entry| {
                entry.lladdr == mac
                    && entry.state == REACHABLE_STATE
                    && family.contains(entry.addr)
            })
            .map(|entry| entry.addr)
    }

    pub fn all(&self) -> &[NeighborEntry] {
        &self.entries
    }
}

/// A row of the neighbor table.
#[derive(Debug)]
pub struct NeighborEntry {
    pub addr: IpAddr,
    pub device: String,
    pub lladdr: String,
    pub state: String,
}

impl NeighborEntry {
    /// Parse a row such as
    /// `192.168.1.42 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE`.
    ///
    /// Rows without a link-layer address (e.g. FAILED entries) have fewer
    /// than six fields and are rejected.
    pub fn from_line(line: &str) -> Result<Self> {
        let elems: Vec<&str> = line.split_whitespace().collect();
        if elems.len() < 6 {
            bail!("invalid entry")
        }
        Ok(Self {
            addr: IpAddr::from_str(elems[0])?,
            device: elems[2].to_string(),
            lladdr: elems[4].to_string(),
            state: elems[5].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: &str = "aa:bb:cc:dd:ee:ff";

    const OUTPUT: &str = "\
192.168.1.1 dev eth0 lladdr 11:22:33:44:55:66 REACHABLE
192.168.1.7 dev eth0 lladdr aa:bb:cc:dd:ee:ff STALE
192.168.1.42 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE
192.168.1.254 dev eth0  FAILED
fe80::1 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE
192.168.1.43 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE
";

    #[test]
    fn test_find_first_reachable_v4() {
        let table = NeighborTable::from_ip_output(OUTPUT);
        let addr = table.find(MAC, AddressFamily::Ipv4).unwrap();
        assert_eq!(addr, "192.168.1.42".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_find_v6() {
        let table = NeighborTable::from_ip_output(OUTPUT);
        let addr = table.find(MAC, AddressFamily::Ipv6).unwrap();
        assert_eq!(addr, "fe80::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_stale_entries_ignored() {
        let output = "192.168.1.7 dev eth0 lladdr aa:bb:cc:dd:ee:ff STALE\n";
        let table = NeighborTable::from_ip_output(output);
        assert!(table.find(MAC, AddressFamily::Ipv4).is_none());
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let table = NeighborTable::from_ip_output(OUTPUT);
        assert!(table.find("00:00:00:00:00:01", AddressFamily::Ipv4).is_none());
    }

    #[test]
    fn test_short_lines_skipped() {
        let table = NeighborTable::from_ip_output("192.168.1.254 dev eth0 FAILED\n\n");
        assert!(table.all().is_empty());
    }

    #[test]
    fn test_entry_fields() {
        let entry =
            NeighborEntry::from_line("192.168.1.42 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE")
                .unwrap();
        assert_eq!(entry.addr, "192.168.1.42".parse::<IpAddr>().unwrap());
        assert_eq!(entry.device, "eth0");
        assert_eq!(entry.lladdr, MAC);
        assert_eq!(entry.state, REACHABLE_STATE);
    }
}
