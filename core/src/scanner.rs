//! The scanning engine.
//!
//! Wires the pieces of a scan together:
//!
//! ```text
//! TargetSource -> dispatch (paced) -> queue -> WorkerPool -> Prober -> ResultSink
//! ```
//!
//! The pool is started before the first target is dispatched. A scan is
//! finished once the dispatcher has closed the queue, every worker has drained
//! it and exited, and the sink has flushed the last outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alpho_common::config::ScanConfig;
use alpho_common::network::{outcome::ScanOutcome, target::Target};
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::ScanError;
use crate::network::{Prober, http::HttpProber};
use crate::signal::StopSignal;
use crate::sink::{ConsoleWriter, OutputFile, ResultSink, SinkReport};
use crate::source::TargetSource;

pub mod dispatch;
pub mod pool;

use dispatch::{Pacer, ProgressHook};
use pool::{PoolReport, WorkerPool};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Targets found in the input.
    pub total: usize,
    pub dispatched: usize,
    pub probed: usize,
    pub reachable: usize,
    pub unreachable: usize,
    pub write_failures: usize,
    pub peak_in_flight: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

pub struct Scanner<P: ?Sized> {
    cfg: ScanConfig,
    prober: Arc<P>,
    on_dispatch: Option<ProgressHook>,
    stop: StopSignal,
}

impl<P> Scanner<P>
where
    P: Prober + ?Sized + 'static,
{
    /// Fails on an invalid configuration, before anything is started.
    pub fn new(cfg: ScanConfig, prober: Arc<P>) -> Result<Self, ScanError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            prober,
            on_dispatch: None,
            stop: StopSignal::new(),
        })
    }

    pub fn on_dispatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_dispatch = Some(Box::new(hook));
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub async fn run<R>(self, mut source: TargetSource<R>, sink: ResultSink) -> ScanSummary
    where
        R: AsyncBufRead + Unpin,
    {
        let started: Instant = Instant::now();
        let workers: usize = self.cfg.workers;

        let (queue_tx, queue_rx) = mpsc::channel::<Target>(workers);
        let (results_tx, results_rx) = mpsc::channel::<ScanOutcome>(workers);

        let sink_task = tokio::spawn(sink.drain(results_rx));
        let pool: WorkerPool = WorkerPool::start(
            workers,
            queue_rx,
            self.prober.clone(),
            results_tx,
            self.stop.clone(),
        );

        let pacer: Pacer = Pacer::new(self.cfg.dispatch_interval());
        let dispatched: usize = dispatch::dispatch(
            &mut source,
            queue_tx,
            &pacer,
            self.on_dispatch.as_ref(),
            &self.stop,
        )
        .await;

        let pool_report: PoolReport = pool.join().await;
        let sink_report: SinkReport = match sink_task.await {
            Ok(report) => report,
            Err(e) => {
                error!("Result sink terminated abnormally: {e}");
                SinkReport::default()
            }
        };

        ScanSummary {
            total: source.total(),
            dispatched,
            probed: pool_report.probed,
            reachable: sink_report.reachable,
            unreachable: sink_report.unreachable,
            write_failures: sink_report.write_failures,
            peak_in_flight: pool_report.peak_in_flight,
            interrupted: self.stop.is_triggered(),
            elapsed: started.elapsed(),
        }
    }
}

/// Runs a complete HTTP scan described by `cfg`.
///
/// Every fatal condition (bad configuration, unreadable input, HTTP client
/// setup, uncreatable output file) is checked before the first worker starts.
pub async fn perform_scan(
    cfg: ScanConfig,
    console: ConsoleWriter,
    on_dispatch: Option<ProgressHook>,
    stop: StopSignal,
) -> Result<ScanSummary, ScanError> {
    scan_with(cfg, console, on_dispatch, stop, HttpProber::new).await
}

/// The output file is truncated last, so a run that fails at startup leaves
/// the previous results untouched.
async fn scan_with<P, F>(
    cfg: ScanConfig,
    console: ConsoleWriter,
    on_dispatch: Option<ProgressHook>,
    stop: StopSignal,
    build_prober: F,
) -> Result<ScanSummary, ScanError>
where
    P: Prober + 'static,
    F: FnOnce(&ScanConfig) -> Result<P, ScanError>,
{
    cfg.validate()?;

    let source = TargetSource::open(&cfg.input).await?;
    info!("Loaded {} targets from {}", source.total(), cfg.input.display());

    let prober: Arc<P> = Arc::new(build_prober(&cfg)?);

    let mut sink: ResultSink = ResultSink::new(console);
    if let Some(path) = &cfg.output {
        sink = sink.with_file(OutputFile::create(path).await?);
        info!("Writing responsive hosts to {}", path.display());
    }

    let mut scanner = Scanner::new(cfg, prober)?.with_stop_signal(stop);
    scanner.on_dispatch = on_dispatch;

    Ok(scanner.run(source, sink).await)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
