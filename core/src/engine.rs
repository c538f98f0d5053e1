//! Runs a complete scan in the required order.
//!
//! 1. Start the passive correlator (SYN mode only) and give it the warm-up delay.
//! 2. Run the connect scan and join every probe.
//! 3. Let the correlator settle, then snapshot its tally.
//! 4. Reconcile both into a [`ScanReport`].

use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Context;
use gordo_common::config::ScanConfig;
use gordo_common::network::target::Target;
use tokio::time::sleep;
use tracing::debug;

use crate::capture::{CaptureError, PassiveCorrelator, SynTally};
use crate::report::{self, ScanReport};
use crate::scanner::{self, ProgressCallback, Prober, TcpConnectProber};

/// Scans `target` with the settings in `cfg`.
///
/// Capture setup failures abort before any probe is sent.
pub async fn perform_scan(
    target: &Target,
    cfg: &ScanConfig,
    on_probe: Option<ProgressCallback>,
) -> anyhow::Result<ScanReport> {
    let prober = Arc::new(TcpConnectProber::new(target.host.clone()));
    debug!("Connect probes go to {}", prober.host());
    perform_scan_with(target, cfg, prober, PassiveCorrelator::start, on_probe).await
}

/// Like [`perform_scan`], with the prober and the capture opener supplied by the caller.
///
/// `open_capture` is only called in SYN mode, with the interface name and the target's
/// IPv4 address.
pub async fn perform_scan_with<P, C>(
    target: &Target,
    cfg: &ScanConfig,
    prober: Arc<P>,
    open_capture: C,
    on_probe: Option<ProgressCallback>,
) -> anyhow::Result<ScanReport>
where
    P: Prober + 'static,
    C: FnOnce(&str, Ipv4Addr) -> Result<PassiveCorrelator, CaptureError>,
{
    let correlator: Option<PassiveCorrelator> = match &cfg.syn_iface {
        Some(iface) => Some(start_correlator(iface, target, cfg, open_capture).await?),
        None => None,
    };

    debug!("Scanning port {} to port {}", cfg.ports.min, cfg.ports.max);
    let open_ports: Vec<u16> = scanner::scan_ports(prober, cfg.ports, cfg.workers, on_probe)
        .await
        .context("connect scan failed")?;
    debug!("{} open port(s) after connect scan", open_ports.len());

    let tally: Option<SynTally> = match &correlator {
        Some(correlator) => {
            sleep(cfg.settle).await;
            let tally = correlator.snapshot();
            debug!("{} port(s) answered after the handshake", tally.len());
            Some(tally)
        }
        None => None,
    };

    Ok(report::reconcile(&open_ports, tally.as_ref()))
}

async fn start_correlator<C>(
    iface: &str,
    target: &Target,
    cfg: &ScanConfig,
    open_capture: C,
) -> anyhow::Result<PassiveCorrelator>
where
    C: FnOnce(&str, Ipv4Addr) -> Result<PassiveCorrelator, CaptureError>,
{
    let source = target
        .ip
        .ok_or_else(|| CaptureError::NoTargetAddress(target.host.clone()))?;

    let correlator = open_capture(iface, source)
        .with_context(|| format!("starting capture on {iface}"))?;
    debug!(
        "Capture attached to {} with filter: {}",
        correlator.interface(),
        correlator.filter().expression()
    );

    sleep(cfg.warmup).await;
    Ok(correlator)
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
    use crate::capture::filter::flags;
    use crate::capture::filter::tests::{TARGET, tcp_frame};
    use async_trait::async_trait;
    use gordo_common::network::range::PortRange;
    use pnet::datalink::dummy;
    use std::io;
    use std::sync::mpsc::Sender;
    use std::sync::{Mutex, OnceLock};
    use std::time::{Duration, Instant};
    use tokio::net::TcpListener;

    /// Plays the target's side of the conversation into the capture while probing.
    struct ReplayingProber {
        open: Vec<u16>,
        injector: Mutex<Sender<io::Result<Box<[u8]>>>>,
        first_probe: OnceLock<Instant>,
    }

    impl ReplayingProber {
        fn new(open: &[u16], injector: Sender<io::Result<Box<[u8]>>>) -> Self {
            Self {
                open: open.to_vec(),
                injector: Mutex::new(injector),
                first_probe: OnceLock::new(),
            }
        }
    }

    #[async_trait]
    impl Prober for ReplayingProber {
        async fn probe(&self, port: u16) -> bool {
            self.first_probe.get_or_init(Instant::now);
            let replay: Vec<Vec<u8>> = match port {
                443 => vec![tcp_frame(TARGET, 443, flags::ACK); 3],
                80 => vec![tcp_frame(TARGET, 80, flags::PSH_ACK)],
                22 => vec![tcp_frame(TARGET, 22, 0x02); 5],
                _ => Vec::new(),
            };
            let injector = self.injector.lock().unwrap();
            for frame in replay {
                injector.send(Ok(frame.into_boxed_slice())).unwrap();
            }
            self.open.contains(&port)
        }
    }

    fn loopback() -> Target {
        Target {
            raw: "127.0.0.1".into(),
            host: "127.0.0.1".into(),
            ip: Some(Ipv4Addr::LOCALHOST),
        }
    }

    #[tokio::test]
    async fn connect_only_scan_reports_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let cfg = ScanConfig {
            ports: PortRange::new(port.saturating_sub(5).max(1), port.saturating_add(5)).unwrap(),
            workers: 4,
            ..ScanConfig::default()
        };

        let report = perform_scan(&loopback(), &cfg, None).await.unwrap();
        assert!(report.open_ports().contains(&port));
        assert!(report.syn.is_none());
    }

    #[tokio::test]
    async fn syn_mode_warms_up_then_tallies_traffic_seen_while_probing() {
        let mut dummy_cfg = dummy::Config::default();
        let injector = dummy_cfg.inject_handle().expect("inject handle");
        let intf = dummy::dummy_interface(0);
        let prober = Arc::new(ReplayingProber::new(&[22, 80], injector));

        let target = Target {
            raw: TARGET.to_string(),
            host: TARGET.to_string(),
            ip: Some(TARGET),
        };
        let cfg = ScanConfig {
            ports: PortRange::new(20, 450).unwrap(),
            syn_iface: Some(intf.name.clone()),
            workers: 16,
            warmup: Duration::from_millis(150),
            settle: Duration::from_millis(300),
            ..ScanConfig::default()
        };

        let mut attached: Option<Instant> = None;
        let report = perform_scan_with(
            &target,
            &cfg,
            prober.clone(),
            |iface, source| {
                assert_eq!(iface, "eth0");
                assert_eq!(source, TARGET);
                attached = Some(Instant::now());
                PassiveCorrelator::start_with(&intf, source, move |i, _| {
                    dummy::channel(i, dummy_cfg)
                })
            },
            None,
        )
        .await
        .unwrap();

        let attached = attached.expect("capture attached");
        let first_probe = *prober.first_probe.get().expect("probes ran");
        assert!(
            first_probe.duration_since(attached) >= cfg.warmup,
            "probing began {:?} after capture attached",
            first_probe.duration_since(attached)
        );

        assert_eq!(report.open_ports(), vec![22, 80]);
        let syn = report.syn.expect("tally present in SYN mode");
        let tallied: Vec<(u16, u64)> = syn.iter().map(|entry| (entry.port, entry.count)).collect();
        assert_eq!(tallied, vec![(443, 3), (80, 1)]);
        assert!(syn.iter().all(|entry| entry.count > 0));
        assert_eq!(syn[0].service, "HTTPS");
    }

    #[tokio::test]
    async fn capture_opener_is_not_used_without_syn_mode() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let cfg = ScanConfig {
            ports: PortRange::new(port, port).unwrap(),
            ..ScanConfig::default()
        };

        let prober = Arc::new(TcpConnectProber::new("127.0.0.1"));
        let report = perform_scan_with(
            &loopback(),
            &cfg,
            prober,
            |_, _| panic!("capture opened outside SYN mode"),
            None,
        )
        .await
        .unwrap();
        assert_eq!(report.open_ports(), vec![port]);
        assert!(report.syn.is_none());
    }

    #[tokio::test]
    async fn syn_mode_without_ipv4_fails_before_scanning() {
        let target = Target {
            raw: "::1".into(),
            host: "::1".into(),
            ip: None,
        };
        let cfg = ScanConfig {
            syn_iface: Some("lo".into()),
            warmup: Duration::ZERO,
            settle: Duration::ZERO,
            ..ScanConfig::default()
        };

        let err = perform_scan(&target, &cfg, None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::NoTargetAddress(_))
        ));
    }

    #[tokio::test]
    async fn syn_mode_with_unknown_interface_is_fatal() {
        let cfg = ScanConfig {
            syn_iface: Some("gordo-missing0".into()),
            warmup: Duration::ZERO,
            settle: Duration::ZERO,
            ..ScanConfig::default()
        };

        let err = perform_scan(&loopback(), &cfg, None).await.unwrap_err();
        assert!(err.to_string().contains("starting capture on gordo-missing0"));
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::UnknownInterface(_))
        ));
    }
}
