//! The bounded **connect scanner**.
//!
//! One task is spawned per port. Each task has to take a slot from a counting semaphore
//! before it may probe, and gives the slot back as soon as the probe resolves, so at most
//! `bound` connection attempts are ever in flight no matter how many ports are scheduled.
//! The result set is only read after every task has been joined.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use gordo_common::network::range::PortRange;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

mod connect;

pub use connect::TcpConnectProber;

/// Called once after every finished probe.
///
/// Probes finish in any order, so the callback only signals a step and carries no count.
pub type ProgressCallback = Arc<dyn Fn() + Send + Sync>;

/// Decides whether a single port is open.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns `true` when a connection to `port` could be established.
    ///
    /// Failures of any kind count as closed.
    async fn probe(&self, port: u16) -> bool;
}

/// Ports found open during a scan.
///
/// Written concurrently by the probe tasks, read once after they have all joined.
#[derive(Debug, Default)]
pub struct OpenPortSet {
    ports: Mutex<BTreeSet<u16>>,
}

impl OpenPortSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, port: u16) {
        self.ports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(port);
    }

    /// Consumes the set, yielding its ports in ascending order.
    pub fn into_sorted(self) -> Vec<u16> {
        self.ports
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .collect()
    }
}

/// Probes every port in `range` with at most `bound` probes in flight.
///
/// Returns the open ports in ascending order.
pub async fn scan_ports<P>(
    prober: Arc<P>,
    range: PortRange,
    bound: usize,
    on_probe: Option<ProgressCallback>,
) -> anyhow::Result<Vec<u16>>
where
    P: Prober + 'static,
{
    let semaphore = Arc::new(Semaphore::new(bound.clamp(1, Semaphore::MAX_PERMITS)));
    let open_ports = Arc::new(OpenPortSet::new());
    let mut tasks: JoinSet<()> = JoinSet::new();

    for port in range.to_iter() {
        let prober = prober.clone();
        let semaphore = semaphore.clone();
        let open_ports = open_ports.clone();
        let on_probe = on_probe.clone();

        tasks.spawn(async move {
            let is_open = {
                let Ok(_slot) = semaphore.acquire().await else {
                    return;
                };
                prober.probe(port).await
            };

            if is_open {
                open_ports.insert(port);
            }

            if let Some(step) = &on_probe {
                step();
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.context("probe task aborted")?;
    }

    let open_ports = Arc::try_unwrap(open_ports)
        .map_err(|_| anyhow::anyhow!("open port set still shared after all probes joined"))?;

    Ok(open_ports.into_sorted())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
