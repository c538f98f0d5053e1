use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static SCAN_BAR: OnceLock<ProgressBar> = OnceLock::new();

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Shows the scan progress bar for `total` probes and returns a handle to it.
pub fn start_scan_bar(total: usize, msg: String) -> ProgressBar {
    let pb = SCAN_BAR.get_or_init(|| {
        let style = ProgressStyle::with_template(
            "{spinner:.blue} {msg} {bar:32.green/bright_black} {pos}/{len}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
        .progress_chars("━╸ ");
        ProgressBar::new(0).with_style(style)
    });

    pb.set_length(total as u64);
    pb.set_position(0);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.clone()
}

pub fn finish_scan_bar() {
    if let Some(pb) = SCAN_BAR.get() {
        pb.finish_and_clear();
    }
}

/// Log sink that prints above the progress bar while it is visible.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Some(pb) = SCAN_BAR.get()
            && !pb.is_finished()
            && !pb.is_hidden()
        {
            let msg = String::from_utf8_lossy(buf);
            pb.println(msg.trim_end());
            return Ok(buf.len());
        }
        std::io::stdout().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}
