use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alpho_common::config::ScanConfig;
use alpho_core::network::http::HttpProber;
use alpho_core::scanner::{self, ScanSummary, Scanner};
use alpho_core::signal::StopSignal;
use alpho_core::sink::{OutputFile, ResultSink};
use alpho_core::source::TargetSource;

use crate::support::{self, Concurrency};

const PROBE_TIMEOUT: Duration = Duration::from_millis(400);

fn config(input: &str, output: Option<&str>, workers: usize) -> ScanConfig {
    ScanConfig {
        input: support::temp_path(input),
        rate: 1_000,
        workers,
        timeout: PROBE_TIMEOUT,
        output: output.map(support::temp_path),
        no_proxy: true,
    }
}

/// Two answering hosts, one silent host, one refused port, a blank line and a comment.
async fn mixed_input() -> (String, Vec<String>) {
    let ok = support::http_server("200 OK").await;
    let missing = support::http_server("404 Not Found").await;
    let silent = support::silent_server().await;
    let closed = support::closed_port().await;

    let input = format!(
        "127.0.0.1:{}\nhttp://127.0.0.1:{}\n\n# unreachable below\n127.0.0.1:{}\nhttps://127.0.0.1:{}\n",
        ok.port(),
        missing.port(),
        silent.port(),
        closed.port(),
    );
    let mut expected = vec![
        format!("127.0.0.1:{} 200 OK", ok.port()),
        format!("127.0.0.1:{} 404 Not Found", missing.port()),
    ];
    expected.sort();
    (input, expected)
}

#[tokio::test]
async fn scan_reports_only_responsive_hosts() {
    let (input, expected) = mixed_input().await;
    let cfg = config("mixed.txt", Some("mixed-out.txt"), 3);
    tokio::fs::write(&cfg.input, input).await.unwrap();
    let output = cfg.output.clone().unwrap();

    let (console, lines) = support::capture();
    let started = Instant::now();
    let summary: ScanSummary = scanner::perform_scan(cfg.clone(), console, None, StopSignal::new())
        .await
        .unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.dispatched, 4);
    assert_eq!(summary.probed, 4);
    assert_eq!(summary.reachable, 2);
    assert_eq!(summary.unreachable, 2);
    assert_eq!(summary.write_failures, 0);
    assert!(!summary.interrupted);

    // the silent host costs one timeout, not a stalled scan
    assert!(started.elapsed() < PROBE_TIMEOUT * 5, "took {:?}", started.elapsed());

    let mut console_lines = lines.lock().unwrap().clone();
    console_lines.sort();
    assert_eq!(console_lines, expected);

    let written = tokio::fs::read_to_string(&output).await.unwrap();
    assert_eq!(support::sorted_lines(&written), expected);

    let _ = tokio::fs::remove_file(&cfg.input).await;
    let _ = tokio::fs::remove_file(&output).await;
}

#[tokio::test]
async fn rerun_yields_same_hosts_without_duplicates() {
    let (input, expected) = mixed_input().await;
    let cfg = config("rerun.txt", Some("rerun-out.txt"), 2);
    tokio::fs::write(&cfg.input, input).await.unwrap();
    let output = cfg.output.clone().unwrap();

    for _ in 0..2 {
        let (console, _) = support::capture();
        scanner::perform_scan(cfg.clone(), console, None, StopSignal::new())
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(support::sorted_lines(&written), expected);
    }

    let _ = tokio::fs::remove_file(&cfg.input).await;
    let _ = tokio::fs::remove_file(&output).await;
}

#[tokio::test]
async fn in_flight_requests_never_exceed_worker_count() {
    let seen = Arc::new(Concurrency::default());
    let server = support::slow_server(Duration::from_millis(60), seen.clone()).await;

    let input: String = (0..12)
        .map(|i| format!("http://127.0.0.1:{}/{i}\n", server.port()))
        .collect();
    let cfg = config("bounded.txt", None, 3);
    tokio::fs::write(&cfg.input, input).await.unwrap();

    let (console, lines) = support::capture();
    let summary = scanner::perform_scan(cfg.clone(), console, None, StopSignal::new())
        .await
        .unwrap();

    assert_eq!(summary.reachable, 12);
    assert!(summary.peak_in_flight <= 3, "engine peak {}", summary.peak_in_flight);
    let server_peak = seen.peak.load(Ordering::SeqCst);
    assert!((1..=3).contains(&server_peak), "server peak {server_peak}");
    assert_eq!(lines.lock().unwrap().len(), 12);

    let _ = tokio::fs::remove_file(&cfg.input).await;
}

#[tokio::test]
async fn stopped_scan_still_flushes_output() {
    let server = support::http_server("200 OK").await;
    let input: String = (0..40)
        .map(|i| format!("127.0.0.1:{}/{i}\n", server.port()))
        .collect();

    let cfg = ScanConfig {
        rate: 50,
        ..config("stopped.txt", Some("stopped-out.txt"), 2)
    };
    tokio::fs::write(&cfg.input, input).await.unwrap();
    let output = cfg.output.clone().unwrap();

    let source = TargetSource::open(&cfg.input).await.unwrap();
    let sink = ResultSink::new(support::capture().0).with_file(OutputFile::create(&output).await.unwrap());
    let prober = Arc::new(HttpProber::new(&cfg).unwrap());

    let scanner = Scanner::new(cfg.clone(), prober).unwrap();
    let stop = scanner.stop_signal();
    let summary = scanner
        .on_dispatch(move |dispatched, _| {
            if dispatched == 3 {
                stop.trigger();
            }
        })
        .run(source, sink)
        .await;

    assert!(summary.interrupted);
    assert_eq!(summary.total, 40);
    assert_eq!(summary.dispatched, 3);
    assert!(summary.probed <= 3);

    let written = tokio::fs::read_to_string(&output).await.unwrap();
    assert_eq!(written.lines().count(), summary.reachable);
    assert!(written.lines().all(|line| line.ends_with(" 200 OK")));

    let _ = tokio::fs::remove_file(&cfg.input).await;
    let _ = tokio::fs::remove_file(&output).await;
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn failing_output_device_does_not_stop_the_scan() {
    let (input, expected) = mixed_input().await;
    let cfg = ScanConfig {
        output: Some(std::path::PathBuf::from("/dev/full")),
        ..config("full-device.txt", None, 2)
    };
    tokio::fs::write(&cfg.input, input).await.unwrap();

    let (console, lines) = support::capture();
    let summary = scanner::perform_scan(cfg.clone(), console, None, StopSignal::new())
        .await
        .unwrap();

    assert_eq!(summary.probed, 4);
    assert_eq!(summary.reachable, 2);
    assert_eq!(summary.write_failures, 2);

    let mut console_lines = lines.lock().unwrap().clone();
    console_lines.sort();
    assert_eq!(console_lines, expected);

    let _ = tokio::fs::remove_file(&cfg.input).await;
}

#[tokio::test]
async fn missing_input_aborts_before_scanning() {
    let cfg = config("does-not-exist.txt", Some("never-created.txt"), 2);
    let output = cfg.output.clone().unwrap();

    let (console, _) = support::capture();
    let result = scanner::perform_scan(cfg, console, None, StopSignal::new()).await;

    assert!(result.is_err());
    assert!(!output.exists(), "output file must not be created when input is missing");
}
