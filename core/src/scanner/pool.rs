//! A fixed set of workers draining the shared target queue.
//!
//! Each worker probes synchronously inside its own loop and only dequeues
//! again once the previous probe has finished. This is what bounds the number
//! of probes in flight to the number of workers. Nothing is spawned per target.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use alpho_common::network::{outcome::ScanOutcome, target::Target};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::network::Prober;
use crate::signal::StopSignal;

type SharedQueue = Arc<Mutex<mpsc::Receiver<Target>>>;

/// Counts probes currently running and remembers the highest count seen.
#[derive(Debug, Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    pub fn enter(&self) -> InFlightGuard<'_> {
        let now: usize = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard { tracker: self }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Marks one probe as running until dropped.
pub struct InFlightGuard<'a> {
    tracker: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.tracker.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    pub probed: usize,
    pub peak_in_flight: usize,
}

pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
    in_flight: Arc<InFlight>,
}

impl WorkerPool {
    /// Starts `workers` executors. They run until the queue is closed and
    /// empty, or until `stop` is triggered.
    ///
    /// Every worker owns a clone of `results`, so the results channel closes
    /// once the last worker exits.
    pub fn start<P>(
        workers: usize,
        queue: mpsc::Receiver<Target>,
        prober: Arc<P>,
        results: mpsc::Sender<ScanOutcome>,
        stop: StopSignal,
    ) -> Self
    where
        P: Prober + ?Sized + 'static,
    {
        let queue: SharedQueue = Arc::new(Mutex::new(queue));
        let in_flight: Arc<InFlight> = Arc::new(InFlight::default());

        let handles = (0..workers)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    queue.clone(),
                    prober.clone(),
                    results.clone(),
                    in_flight.clone(),
                    stop.clone(),
                ))
            })
            .collect();

        Self { handles, in_flight }
    }

    /// Waits for every worker to exit.
    pub async fn join(self) -> PoolReport {
        let mut probed: usize = 0;
        for handle in self.handles {
            match handle.await {
                Ok(count) => probed += count,
                Err(e) => error!("Worker terminated abnormally: {e}"),
            }
        }

        PoolReport {
            probed,
            peak_in_flight: self.in_flight.peak(),
        }
    }
}

async fn worker<P>(
    id: usize,
    queue: SharedQueue,
    prober: Arc<P>,
    results: mpsc::Sender<ScanOutcome>,
    in_flight: Arc<InFlight>,
    stop: StopSignal,
) -> usize
where
    P: Prober + ?Sized,
{
    let mut probed: usize = 0;

    loop {
        let next: Option<Target> = tokio::select! {
            biased;
            _ = stop.triggered() => None,
            target = next_target(&queue) => target,
        };

        let Some(target) = next else {
            break;
        };

        let outcome: ScanOutcome = {
            let _running = in_flight.enter();
            prober.probe(&target).await
        };
        probed += 1;

        if results.send(outcome).await.is_err() {
            warn!(worker = id, "Result sink closed, dropping remaining work");
            break;
        }
    }

    debug!(worker = id, probed, "worker finished");
    probed
}

/// The lock is only held while waiting for the next target, never during a probe.
async fn next_target(queue: &Mutex<mpsc::Receiver<Target>>) -> Option<Target> {
    queue.lock().await.recv().await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
