use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use indicatif::ProgressBar;
use tracing::{Instrument, debug, info_span, warn};

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};
use gordo_common::config::ScanConfig;
use gordo_common::network::target::Target;
use gordo_core::report::ScanReport;
use gordo_core::scanner::ProgressCallback;
use gordo_core::{engine, resolver};

pub async fn scan(cfg: &ScanConfig) -> anyhow::Result<()> {
    let target: Target = resolver::resolve(&cfg.target).await?;
    describe_run(&target, cfg);

    if let Some(iface) = &cfg.syn_iface
        && !is_root::is_root()
    {
        warn!("Capturing on {iface} usually requires root privileges");
    }

    let start_time: Instant = Instant::now();
    let bar = spinner::start_scan_bar(cfg.ports.len(), format!("Probing {}", target.host));

    let result = engine::perform_scan(&target, cfg, Some(advance_on_probe(bar)))
        .instrument(info_span!("scan", target = %target.host))
        .await;
    spinner::finish_scan_bar();
    let report: ScanReport = result?;

    scan_ends(&report, &target, start_time.elapsed());
    Ok(())
}

/// Moves `bar` one step per finished probe.
fn advance_on_probe(bar: ProgressBar) -> ProgressCallback {
    Arc::new(move || bar.inc(1))
}

fn describe_run(target: &Target, cfg: &ScanConfig) {
    debug!("Scan target: {}", target.host);
    match target.ip {
        Some(ip) => debug!("Target IP: {ip}"),
        None => debug!("Target IP: unresolved"),
    }
    debug!("Worker count: {}", cfg.workers);
    if let Some(iface) = &cfg.syn_iface {
        debug!(
            "SYN correlation on {iface}, warm-up {}ms, settle {}ms",
            cfg.warmup.as_millis(),
            cfg.settle.as_millis()
        );
    }
}

fn scan_ends(report: &ScanReport, target: &Target, total_time: Duration) {
    if report.open.is_empty() {
        print::header("zero open ports");
        print::no_results();
    } else {
        print::header("open ports");
        format::port_table(&report.open);
    }

    if let Some(syn) = &report.syn {
        mprint!();
        print::header("synscan");
        format::syn_table(syn);
    }

    debug!("Scan duration: {:?}", total_time);
    print_summary(report.open.len(), target, total_time);
}

fn print_summary(open_len: usize, target: &Target, total_time: Duration) {
    let unit: &str = if open_len == 1 { "open port" } else { "open ports" };
    let open_ports: ColoredString = format!("{open_len} {unit}").bold().green();
    let host: ColoredString = target.to_string().color(colors::PRIMARY);
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString =
        &format!("Scan Complete: {open_ports} on {host} in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(output);
    print::end_of_program();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
