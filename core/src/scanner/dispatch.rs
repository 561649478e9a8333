//! Rate-paced producer feeding the worker queue.

use std::time::Duration;

use alpho_common::network::target::Target;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::signal::StopSignal;
use crate::source::TargetSource;

/// Called after every enqueue with `(dispatched, total)`.
pub type ProgressHook = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Fixed-interval pacer.
///
/// Waits a constant gap between two enqueues. There is no burst allowance, and
/// time spent blocked on a full queue is not paid back.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Feeds every target of `source` into `queue`, in input order, one per
/// `pacer` interval.
///
/// Consumes the sender, so the queue is closed when this returns. Returns how
/// many targets were enqueued.
pub async fn dispatch<R>(
    source: &mut TargetSource<R>,
    queue: mpsc::Sender<Target>,
    pacer: &Pacer,
    on_dispatch: Option<&ProgressHook>,
    stop: &StopSignal,
) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let total: usize = source.total();
    let mut dispatched: usize = 0;

    loop {
        if stop.is_triggered() {
            debug!(dispatched, "dispatch stopped on request");
            break;
        }

        let target: Target = match source.next_target().await {
            Ok(Some(target)) => target,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read next target, ending dispatch early: {e}");
                break;
            }
        };

        if dispatched > 0 {
            tokio::select! {
                biased;
                _ = stop.triggered() => break,
                _ = pacer.pause() => {}
            }
        }

        let sent: bool = tokio::select! {
            biased;
            _ = stop.triggered() => false,
            res = queue.send(target) => res.is_ok(),
        };
        if !sent {
            break;
        }

        dispatched += 1;
        if let Some(hook) = on_dispatch {
            hook(dispatched, total);
        }
    }

    dispatched
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
