//! # Scan Target Model
//!
//! Defines what the user may pass as a scan target and how it is classified before any
//! DNS work happens. A target can be:
//! * A literal IPv4 or IPv6 address (e.g. `127.0.0.1`, `::1`).
//! * A URL with a scheme (e.g. `http://example.test`).
//! * The keyword `localhost`.
//! * A bare hostname (e.g. `example.test`), tried as if it carried `http://`.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use thiserror::Error;
use url::{Host, Url};

const HTTP_PREFIX: &str = "http://";
const LOCALHOST: &str = "localhost";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no valid IP or URI given, invalid target candidate: {0}")]
pub struct InvalidTarget(pub String);

/// A classified target string, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Already an address; nothing to look up.
    Literal(IpAddr),
    /// A host name that still has to go through DNS.
    Named(String),
}

impl FromStr for Candidate {
    type Err = InvalidTarget;

    /// Classifies a raw target string.
    ///
    /// Checks run in priority order: literal address, URL with scheme, the `localhost`
    /// keyword, then the input again with `http://` prepended.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(candidate) = parse_literal(s) {
            return Ok(candidate);
        }

        if let Some(candidate) = parse_uri(s) {
            return Ok(candidate);
        }

        if s == LOCALHOST {
            return Ok(Candidate::Named(LOCALHOST.to_string()));
        }

        if let Some(candidate) = parse_uri(&format!("{HTTP_PREFIX}{s}")) {
            return Ok(candidate);
        }

        Err(InvalidTarget(s.to_string()))
    }
}

impl Candidate {
    /// The string handed to connection attempts.
    pub fn host(&self) -> String {
        match self {
            Candidate::Literal(addr) => addr.to_string(),
            Candidate::Named(name) => name.clone(),
        }
    }
}

fn parse_literal(s: &str) -> Option<Candidate> {
    s.parse::<IpAddr>().ok().map(Candidate::Literal)
}

fn parse_uri(s: &str) -> Option<Candidate> {
    let url = Url::parse(s).ok()?;
    match url.host()? {
        Host::Domain(name) if !name.is_empty() => Some(Candidate::Named(name.to_string())),
        Host::Domain(_) => None,
        Host::Ipv4(addr) => Some(Candidate::Literal(IpAddr::V4(addr))),
        Host::Ipv6(addr) => Some(Candidate::Literal(IpAddr::V6(addr))),
    }
}

/// A resolved scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// The input exactly as the user typed it.
    pub raw: String,
    /// Host name or literal address used for connection attempts. Never empty.
    pub host: String,
    /// IPv4 address of the host, used to build the capture filter.
    pub ip: Option<Ipv4Addr>,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            Some(ip) if ip.to_string() != self.host => write!(f, "{} ({ip})", self.host),
            _ => write!(f, "{}", self.host),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
