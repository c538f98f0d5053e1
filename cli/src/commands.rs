pub mod scan;

use std::time::Duration;

use clap::Parser;
use gordo_common::config::{self, ScanConfig};
use gordo_common::network::range::PortRange;

#[derive(Parser, Debug)]
#[command(name = "gordo", version)]
#[command(about = "A concurrent TCP port scanner with passive SYN-protection detection.")]
pub struct CommandLine {
    /// Target IP, hostname or URL
    #[arg(short, long, default_value = "localhost")]
    pub target: String,

    /// Scan all 65535 ports instead of the well-known 1-1023
    #[arg(short, long)]
    pub all: bool,

    /// Capture on this interface to detect ports hidden behind SYN protection (needs root)
    #[arg(long, value_name = "IFACE")]
    pub syn: Option<String>,

    /// Talkative output
    #[arg(short, long)]
    pub verbose: bool,

    /// Concurrent connection attempts; values below 1 fall back to 100
    #[arg(short, long, default_value_t = 100, allow_negative_numbers = true)]
    pub workers: i64,

    /// Time the capture gets to attach before probing starts
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    pub warmup_ms: u64,

    /// Time the capture keeps running after the last probe
    #[arg(long, value_name = "MS", default_value_t = 2_000)]
    pub settle_ms: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> ScanConfig {
        ScanConfig {
            target: self.target.clone(),
            ports: PortRange::from_all_ports(self.all),
            syn_iface: self.syn.clone().filter(|iface| !iface.is_empty()),
            workers: config::concurrency_bound(self.workers),
            verbose: self.verbose,
            warmup: Duration::from_millis(self.warmup_ms),
            settle: Duration::from_millis(self.settle_ms),
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
