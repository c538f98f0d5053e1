#![cfg(test)]
use async_trait::async_trait;
use gordo_common::config::ScanConfig;
use gordo_common::network::range::PortRange;
use gordo_common::network::target::Target;
use gordo_core::scanner::{self, Prober};
use gordo_core::{engine, resolver};
use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

async fn listeners(count: usize) -> (Vec<TcpListener>, Vec<u16>) {
    let mut sockets = Vec::new();
    let mut ports = Vec::new();
    for _ in 0..count {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        ports.push(listener.local_addr().unwrap().port());
        sockets.push(listener);
    }
    ports.sort_unstable();
    (sockets, ports)
}

fn span_of(ports: &[u16]) -> PortRange {
    let min = ports.iter().min().copied().unwrap();
    let max = ports.iter().max().copied().unwrap();
    PortRange::new(min, max).unwrap()
}

/// The scanner should report every listening port exactly once, in order, no matter
/// how many probes it is allowed to run at the same time.
#[tokio::test]
async fn open_ports_are_complete_for_every_bound() {
    let (_sockets, ports) = listeners(3).await;
    let target = resolver::resolve("127.0.0.1").await.unwrap();

    for workers in [1, 10, 1000] {
        let cfg = ScanConfig {
            target: target.raw.clone(),
            ports: span_of(&ports),
            workers,
            ..ScanConfig::default()
        };
        let report = engine::perform_scan(&target, &cfg, None).await.unwrap();
        let found: Vec<u16> = report
            .open_ports()
            .into_iter()
            .filter(|port| ports.contains(port))
            .collect();

        assert_eq!(found, ports, "workers = {workers}");
        assert!(report.open_ports().windows(2).all(|w| w[0] < w[1]));
    }
}

#[tokio::test]
async fn closed_port_is_not_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let target = resolver::resolve("127.0.0.1").await.unwrap();
    let cfg = ScanConfig {
        ports: PortRange::new(port, port).unwrap(),
        ..ScanConfig::default()
    };
    let report = engine::perform_scan(&target, &cfg, None).await.unwrap();
    assert!(report.open.is_empty());
}

/// Well-known mode on 127.0.0.1 with listeners on 22 and 8080: only 22 is in range.
#[tokio::test]
async fn well_known_scan_ignores_ports_above_1023() {
    let _ssh = match TcpListener::bind("127.0.0.1:22").await {
        Ok(listener) => Some(listener),
        // Something already serves port 22, which is just as good.
        Err(e) if e.kind() == ErrorKind::AddrInUse => None,
        Err(e) => {
            eprintln!("Skipping well-known scenario: cannot bind port 22 ({e})");
            return;
        }
    };
    let _http_alt = TcpListener::bind("127.0.0.1:8080").await.ok();

    let target: Target = resolver::resolve("127.0.0.1").await.unwrap();
    let cfg = ScanConfig {
        target: "127.0.0.1".into(),
        workers: 50,
        ..ScanConfig::default()
    };
    assert_eq!(cfg.ports, PortRange::WELL_KNOWN);

    let report = engine::perform_scan(&target, &cfg, None).await.unwrap();
    let open = report.open_ports();
    assert!(open.contains(&22), "port 22 missing from {open:?}");
    assert!(!open.contains(&8080));
    assert!(open.iter().all(|port| (1..=1023).contains(port)));
    assert_eq!(report.open[0].port, open[0]);
}

#[tokio::test]
async fn localhost_target_reaches_loopback_listener() {
    let (_sockets, ports) = listeners(1).await;
    let target = resolver::resolve("localhost").await.unwrap();
    assert_eq!(target.host, "localhost");

    let cfg = ScanConfig {
        target: "localhost".into(),
        ports: span_of(&ports),
        ..ScanConfig::default()
    };
    let report = engine::perform_scan(&target, &cfg, None).await.unwrap();
    assert_eq!(report.open_ports(), ports);
}

#[tokio::test]
async fn unresolvable_target_is_rejected_up_front() {
    let err = resolver::resolve("not a valid target!!").await.unwrap_err();
    assert!(err.to_string().contains("not a valid target!!"));
}

#[tokio::test]
async fn syn_mode_on_missing_interface_aborts_the_run() {
    let (_sockets, ports) = listeners(1).await;
    let target = resolver::resolve("127.0.0.1").await.unwrap();
    let cfg = ScanConfig {
        ports: span_of(&ports),
        syn_iface: Some("gordo-missing0".into()),
        warmup: Duration::ZERO,
        settle: Duration::ZERO,
        ..ScanConfig::default()
    };
    assert!(engine::perform_scan(&target, &cfg, None).await.is_err());
}

/// Counts how many probes overlap in time.
struct OverlapProber {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Prober for OverlapProber {
    async fn probe(&self, _port: u16) -> bool {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        false
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_bound_holds_under_load() {
    let prober = Arc::new(OverlapProber {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let open = scanner::scan_ports(prober.clone(), PortRange::WELL_KNOWN, 25, None)
        .await
        .unwrap();

    assert!(open.is_empty());
    let peak = prober.peak.load(Ordering::SeqCst);
    assert!(peak <= 25, "peak {peak} exceeded the bound");
}
