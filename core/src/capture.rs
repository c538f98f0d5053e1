//! The **passive correlator**.
//!
//! Watches live traffic on a capture interface and counts, per source port, the
//! post-handshake segments the target sends (see [`filter`]). Capture runs on its own OS
//! thread that blocks on the next frame. The thread is started before probing, is never
//! joined, and is abandoned when the process exits.

use std::io;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};
use thiserror::Error;
use tracing::debug;

pub mod channel;
pub mod filter;
pub mod tally;

pub use filter::{CaptureFilter, Framing};
pub use tally::SynTally;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no network interface named '{0}'")]
    UnknownInterface(String),
    #[error("opening capture on {interface}")]
    Open {
        interface: String,
        #[source]
        source: io::Error,
    },
    #[error("non-ethernet channel for {0}")]
    UnsupportedChannel(String),
    #[error("target {0} has no IPv4 address to build a capture filter for")]
    NoTargetAddress(String),
    #[error("spawning the capture thread")]
    Spawn(#[source] io::Error),
}

type SharedTally = Arc<Mutex<SynTally>>;

/// Handle to a running capture.
pub struct PassiveCorrelator {
    interface: String,
    filter: CaptureFilter,
    tally: SharedTally,
}

impl PassiveCorrelator {
    /// Opens `iface` and starts tallying segments sent by `source`.
    pub fn start(iface: &str, source: Ipv4Addr) -> Result<Self, CaptureError> {
        let intf: NetworkInterface = channel::find_interface(iface)?;
        Self::start_with(&intf, source, datalink::channel)
    }

    /// Like [`start`](Self::start), with the channel opener supplied by the caller.
    pub fn start_with<F>(
        intf: &NetworkInterface,
        source: Ipv4Addr,
        channel_opener: F,
    ) -> Result<Self, CaptureError>
    where
        F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
    {
        let filter = CaptureFilter::new(source, Framing::of(intf));
        let rx = channel::open_receiver(intf, channel::capture_config(), channel_opener)?;
        let tally: SharedTally = Arc::new(Mutex::new(SynTally::default()));

        let worker_tally = tally.clone();
        // Detached on purpose: the handle is dropped and the thread outlives this call.
        std::thread::Builder::new()
            .name(format!("capture-{}", intf.name))
            .spawn(move || capture_loop(rx, filter, worker_tally))
            .map_err(CaptureError::Spawn)?;

        Ok(Self {
            interface: intf.name.clone(),
            filter,
            tally,
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn filter(&self) -> &CaptureFilter {
        &self.filter
    }

    /// A copy of the tally as it stands right now.
    pub fn snapshot(&self) -> SynTally {
        lock(&self.tally).clone()
    }
}

fn capture_loop(mut rx: Box<dyn DataLinkReceiver>, filter: CaptureFilter, tally: SharedTally) {
    loop {
        match rx.next() {
            Ok(frame) => {
                if let Some(port) = filter.source_port(frame) {
                    lock(&tally).record(port);
                }
            }
            Err(e) if is_transient(&e) => continue,
            Err(e) => {
                debug!("capture stopped: {e}");
                break;
            }
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

fn lock(tally: &Mutex<SynTally>) -> MutexGuard<'_, SynTally> {
    tally.lock().unwrap_or_else(PoisonError::into_inner)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
