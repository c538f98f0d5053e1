//! Merges the connect scan and the capture tally into one report.
//!
//! The two are kept as independent views; nothing is unioned.

use gordo_common::services;

use crate::capture::SynTally;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub port: u16,
    pub service: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntry {
    pub port: u16,
    pub count: u64,
    pub service: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Ports a handshake completed on, ascending.
    pub open: Vec<PortEntry>,
    /// Ports with at least one post-handshake segment. Only present in SYN mode.
    pub syn: Option<Vec<TallyEntry>>,
}

impl ScanReport {
    pub fn open_ports(&self) -> Vec<u16> {
        self.open.iter().map(|entry| entry.port).collect()
    }
}

/// Builds a report from the frozen scan outputs.
///
/// Open ports are sorted numerically. Tally entries are sorted by the port's decimal text
/// (so `443` comes before `80`) and zero counts are dropped.
pub fn reconcile(open_ports: &[u16], tally: Option<&SynTally>) -> ScanReport {
    let mut ports: Vec<u16> = open_ports.to_vec();
    ports.sort_unstable();
    ports.dedup();

    let open: Vec<PortEntry> = ports
        .into_iter()
        .map(|port| PortEntry {
            port,
            service: services::label(port),
        })
        .collect();

    let syn: Option<Vec<TallyEntry>> = tally.map(|tally| {
        let mut entries: Vec<TallyEntry> = tally
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(port, count)| TallyEntry {
                port,
                count,
                service: services::label(port),
            })
            .collect();
        entries.sort_by_cached_key(|entry| entry.port.to_string());
        entries
    });

    ScanReport { open, syn }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
