//! End-to-end resolution of a MAC address to an IP address.
//!
//! # Examples
//!
//! ```no_run
//! use anyhow::{Context, Result};
//! use mac2ip::models::AddressFamily;
//! use mac2ip::resolver::{Query, Resolver};
//!
//! fn main() -> Result<()> {
//!     let resolver = Resolver::default();
//!     let query = Query::new("aa:bb:cc:dd:ee:ff", "eth0", None, AddressFamily::Ipv4);
//!     let addr = resolver.resolve(&query)?.context("address not found")?;
//!
//!     println!("{}", addr);
//!     Ok(())
//! }
//! ```
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

use anyhow::{Context, Result};
use ip_network::Ipv4Network;
use log::{debug, warn};
use strum::Display as EnumDisplay;

use crate::interface;
use crate::models::AddressFamily;
use crate::neighbors::{NeighborTable, DEFAULT_IP_BINARY};
use crate::probe;
use crate::probe::{DEFAULT_NMAP_BINARY, DEFAULT_PING6_BINARY};

/// A resolution request.
#[derive(Debug)]
pub struct Query {
    /// Hardware address to resolve, lower-cased.
    pub mac: String,
    /// Interface whose segment is probed when the binding is not cached.
    pub interface: String,
    /// Explicit IPv4 probe target; resolved from the interface when absent.
    pub network: Option<Ipv4Network>,
    /// Address family of the wanted binding.
    pub family: AddressFamily,
}

impl Query {
    pub fn new(
        mac: &str,
        interface: &str,
        network: Option<Ipv4Network>,
        family: AddressFamily,
    ) -> Self {
        Self {
            mac: mac.to_ascii_lowercase(),
            interface: interface.to_string(),
            network,
            family,
        }
    }
}

/// Step of the resolution pipeline in which an external command failed.
///
/// The probe step is absent: its failures are logged and discarded.
#[derive(Copy, Clone, Debug, EnumDisplay, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    InitialLookup,
    NetworkResolution,
    RetryLookup,
}

/// An external-command failure, tagged with the pipeline step that ran it.
#[derive(Debug)]
pub struct ResolveError {
    pub phase: Phase,
    pub source: anyhow::Error,
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.phase, self.source)
    }
}

impl std::error::Error for ResolveError {}

/// Resolves MAC addresses by querying, and if needed refreshing, the OS
/// neighbor table.
///
/// The binary paths are overridable so that tests can substitute stub
/// executables.
pub struct Resolver {
    /// Binary used for the neighbor-table and interface-address queries.
    pub ip_binary: String,
    /// Binary used for the IPv4 ping sweep.
    pub nmap_binary: String,
    /// Binary used for the IPv6 all-nodes echo.
    pub ping6_binary: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            ip_binary: DEFAULT_IP_BINARY.to_string(),
            nmap_binary: DEFAULT_NMAP_BINARY.to_string(),
            ping6_binary: DEFAULT_PING6_BINARY.to_string(),
        }
    }
}

impl Resolver {
    /// Resolve the query, probing the segment when the binding is not cached.
    ///
    /// Returns `Ok(None)` when the address is not on the segment or did not
    /// answer the probe.
    pub fn resolve(&self, query: &Query) -> Result<Option<IpAddr>, ResolveError> {
        let cached = self
            .lookup(query)
            .map_err(|source| ResolveError { phase: Phase::InitialLookup, source })?;
        if let Some(addr) = cached {
            debug!("{} found in neighbor table: {}", query.mac, addr);
            return Ok(Some(addr));
        }

        match query.family {
            AddressFamily::Ipv4 => {
                let network = match query.network {
                    Some(network) => network,
                    None => self
                        .resolve_network(query)
                        .map_err(|source| ResolveError { phase: Phase::NetworkResolution, source })?,
                };
                debug!("sweeping {} for {}", network, query.mac);
                if let Err(error) = probe::ping_sweep(&self.nmap_binary, network) {
                    warn!("ping sweep failed: {:#}", error);
                }
            }
            AddressFamily::Ipv6 => {
                debug!("pinging all nodes on {} for {}", query.interface, query.mac);
                if let Err(error) = probe::ping_all_nodes(&self.ping6_binary, &query.interface) {
                    warn!("all-nodes ping failed: {:#}", error);
                }
            }
        }

        self.lookup(query)
            .map_err(|source| ResolveError { phase: Phase::RetryLookup, source })
    }

    fn lookup(&self, query: &Query) -> Result<Option<IpAddr>> {
        let table = NeighborTable::from_ip_binary(&self.ip_binary)?;
        Ok(table.find(&query.mac, query.family))
    }

    fn resolve_network(&self, query: &Query) -> Result<Ipv4Network> {
        interface::ipv4_network_from_ip_binary(&self.ip_binary, &query.interface)?
            .with_context(|| format!("no global IPv4 address on {}", query.interface))
    }
}
