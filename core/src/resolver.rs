//! Turns a raw target string into a connectable host and, when possible, an IPv4 address.

use std::net::{IpAddr, Ipv4Addr};

use gordo_common::network::target::{Candidate, InvalidTarget, Target};
use tokio::net::lookup_host;
use tracing::debug;

/// Resolves `raw` into a [`Target`].
///
/// Only classification can fail. A DNS failure leaves [`Target::ip`] unset, since the
/// connect probes resolve the host themselves and only the capture filter needs the address.
pub async fn resolve(raw: &str) -> Result<Target, InvalidTarget> {
    let candidate: Candidate = raw.parse()?;
    let host: String = candidate.host();

    let ip: Option<Ipv4Addr> = match candidate {
        Candidate::Literal(IpAddr::V4(addr)) => Some(addr),
        Candidate::Literal(IpAddr::V6(_)) => None,
        Candidate::Named(name) => lookup_ipv4(&name).await,
    };

    Ok(Target {
        raw: raw.to_string(),
        host,
        ip,
    })
}

/// Looks up `host` and returns the first IPv4 address in resolution order.
pub async fn lookup_ipv4(host: &str) -> Option<Ipv4Addr> {
    match lookup_host((host, 0)).await {
        Ok(addrs) => first_ipv4(addrs.map(|addr| addr.ip())),
        Err(e) => {
            debug!("DNS lookup for {host} failed: {e}");
            None
        }
    }
}

fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
