//! Resolution of the IPv4 network attached to a local interface.
use std::net::Ipv4Addr;
use std::process::Command;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use ip_network::Ipv4Network;

/// Return the first global-scope IPv4 network configured on the interface,
/// by running `ip address show`.
///
/// Returns `None` when the interface carries no global IPv4 address; callers
/// must not feed an absent network to the prober.
pub fn ipv4_network_from_ip_binary(path: &str, interface: &str) -> Result<Option<Ipv4Network>> {
    let result = Command::new(path)
        .args(["address", "show", "dev", interface, "scope", "global"])
        .output()
        .with_context(|| format!("failed to run {} address show", path))?;
    if !result.status.success() {
        bail!("{} address show exited with {}", path, result.status);
    }
    let output = String::from_utf8(result.stdout)?;
    Ok(ipv4_network_from_ip_output(&output))
}

/// Return the network of the first `inet` line of captured
/// `ip address show` output, if any.
/// Malformed or incomplete lines are skipped, not reported.
pub fn ipv4_network_from_ip_output(output: &str) -> Option<Ipv4Network> {
    for line in output.lines() {
        let elems: Vec<&str> = line.split_whitespace().collect();
        if elems.len() < 2 {
            continue;
        }
        if elems[0] == "inet" {
            if let Ok(network) = parse_network(elems[1]) {
                return Some(network);
            }
        }
    }
    None
}

/// Parse an `address/prefix` string into its enclosing network.
///
/// Host bits are truncated, so the `inet` value of an interface
/// (e.g. `10.0.0.5/24`) yields the network to scan (`10.0.0.0/24`).
/// A bare address is treated as a /32.
pub fn parse_network(value: &str) -> Result<Ipv4Network> {
    let elems: Vec<&str> = value.split('/').collect();
    if elems.len() > 2 {
        bail!("invalid network: {}", value);
    }
    let addr = Ipv4Addr::from_str(elems[0])?;
    let prefix: u8 = if elems.len() == 2 { elems[1].parse()? } else { 32 };
    Ok(Ipv4Network::new_truncate(addr, prefix)?)
}
