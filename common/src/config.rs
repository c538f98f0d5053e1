use std::time::Duration;

use crate::network::range::PortRange;

pub const DEFAULT_WORKERS: usize = 100;
pub const DEFAULT_WARMUP: Duration = Duration::from_millis(1_000);
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(2_000);

/// Everything a scan run needs, built once at startup and passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Raw target specifier as given by the user.
    pub target: String,
    /// Ports to probe.
    pub ports: PortRange,
    /// Capture interface. Enables SYN correlation when set.
    pub syn_iface: Option<String>,
    /// Maximum number of connection attempts in flight at once. Always at least one.
    pub workers: usize,
    /// Talkative output.
    pub verbose: bool,
    /// How long the capture gets to attach before probing starts.
    pub warmup: Duration,
    /// How long the capture keeps running after the last probe finished.
    pub settle: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: "localhost".to_string(),
            ports: PortRange::WELL_KNOWN,
            syn_iface: None,
            workers: DEFAULT_WORKERS,
            verbose: false,
            warmup: DEFAULT_WARMUP,
            settle: DEFAULT_SETTLE,
        }
    }
}

impl ScanConfig {
    pub fn is_syn_scan(&self) -> bool {
        self.syn_iface.is_some()
    }
}

/// Maps a user supplied worker count to a usable concurrency bound.
///
/// Non-positive values fall back to [`DEFAULT_WORKERS`].
pub fn concurrency_bound(requested: i64) -> usize {
    match usize::try_from(requested) {
        Ok(0) | Err(_) => DEFAULT_WORKERS,
        Ok(workers) => workers,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_worker_counts_fall_back() {
        assert_eq!(concurrency_bound(0), DEFAULT_WORKERS);
        assert_eq!(concurrency_bound(-5), DEFAULT_WORKERS);
        assert_eq!(concurrency_bound(1), 1);
        assert_eq!(concurrency_bound(1000), 1000);
    }

    #[test]
    fn default_config_is_a_plain_connect_scan() {
        let cfg = ScanConfig::default();
        assert!(!cfg.is_syn_scan());
        assert_eq!(cfg.ports, PortRange::WELL_KNOWN);
        assert_eq!(cfg.workers, 100);
        assert_eq!(cfg.warmup, Duration::from_secs(1));
        assert_eq!(cfg.settle, Duration::from_secs(2));
    }
}
