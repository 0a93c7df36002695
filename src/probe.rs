//! Active probes that refresh the OS neighbor table.
//!
//! Both probes are side effects: their output is discarded, and the
//! orchestrator is allowed to discard their result as well, since a failed
//! or partial probe may still have refreshed the wanted entry.
use std::process::Command;

use anyhow::{bail, Context, Result};
use ip_network::Ipv4Network;

/// Path to the nmap binary.
pub const DEFAULT_NMAP_BINARY: &str = "nmap";
/// Path to the ping6 binary.
pub const DEFAULT_PING6_BINARY: &str = "ping6";

/// All-nodes link-local multicast group, answered by every IPv6 host on the link.
const ALL_NODES_MULTICAST: &str = "ff02::1";
/// Number of echo requests sent to the all-nodes group.
const ALL_NODES_COUNT: &str = "3";

/// Ping-scan the network so the kernel learns its IPv4 neighbors.
pub fn ping_sweep(path: &str, network: Ipv4Network) -> Result<()> {
    let result = Command::new(path)
        .args(["-sP", &network.to_string()])
        .output()
        .with_context(|| format!("failed to run {}", path))?;
    if !result.status.success() {
        bail!("{} exited with {}", path, result.status);
    }
    Ok(())
}

/// Ping the all-nodes multicast group on the interface to elicit neighbor
/// advertisements from every IPv6 host on the link.
pub fn ping_all_nodes(path: &str, interface: &str) -> Result<()> {
    let result = Command::new(path)
        .args(["-I", interface, "-c", ALL_NODES_COUNT, ALL_NODES_MULTICAST])
        .output()
        .with_context(|| format!("failed to run {}", path))?;
    if !result.status.success() {
        bail!("{} exited with {}", path, result.status);
    }
    Ok(())
}
