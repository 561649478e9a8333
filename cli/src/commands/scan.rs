use std::time::Duration;

use colored::*;
use tracing::{Instrument, Span, info_span, warn};

use crate::terminal::{colors, print, progress};
use alpho_common::config::ScanConfig;
use alpho_core::scanner::{self, ScanSummary};
use alpho_core::signal::StopSignal;

pub async fn scan(cfg: ScanConfig, quiet: u8) -> anyhow::Result<()> {
    let stop: StopSignal = StopSignal::new();
    watch_for_interrupt(stop.clone());

    let (span, on_dispatch) = if quiet < 2 {
        let span: Span = info_span!("scan", indicatif.pb_show = true);
        let hook = progress::dispatch_hook(span.clone());
        (span, Some(hook))
    } else {
        (info_span!("scan"), None)
    };

    let summary: ScanSummary = scanner::perform_scan(cfg, progress::console_writer(), on_dispatch, stop)
        .instrument(span)
        .await?;

    scan_ends(&summary, quiet);
    Ok(())
}

/// First Ctrl-C stops dispatch and lets in-flight probes finish, a second one exits.
fn watch_for_interrupt(stop: StopSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, waiting for in-flight probes (Ctrl-C again to abort)");
        stop.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

fn scan_ends(summary: &ScanSummary, quiet: u8) {
    if summary.interrupted {
        warn!(
            "Scan interrupted after dispatching {} of {} targets",
            summary.dispatched, summary.total
        );
    }
    if summary.write_failures > 0 {
        warn!("{} result lines could not be written to the output file", summary.write_failures);
    }

    if quiet > 0 {
        return;
    }

    if summary.reachable == 0 {
        print::header("zero hosts responded", quiet);
    } else {
        print::header("scan summary", quiet);
    }

    print::aligned_line("Targets", summary.total);
    print::aligned_line("Dispatched", summary.dispatched);
    print::aligned_line("Probed", summary.probed);
    print::aligned_line("Unreachable", summary.unreachable);
    print::aligned_line("Peak workers", summary.peak_in_flight);

    print_summary(summary.reachable, summary.elapsed);
}

fn print_summary(reachable: usize, total_time: Duration) {
    let responsive: ColoredString = format!("{reachable} responsive hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!("Scan Complete: {responsive} found in {total_time}")
        .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}
