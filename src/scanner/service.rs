//! Background scan worker
//!
//! The tracer hands finished call trees to a bounded queue and returns
//! immediately; a Tokio task drains the queue and scans each tree. Trees are
//! scanned in submission order. Nothing is reported back to the submitter.
//!
//! The worker stops once every [`ScanQueue`] handle has been dropped and the
//! queue is drained.

use std::sync::Arc;

use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tracing::{debug, trace};

use super::TreeScanner;
use crate::{errors::ScanError, types::CallRecord};

/// A finished call tree waiting to be scanned
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub root: Arc<CallRecord>,
    /// Deepest execution depth observed while tracing
    pub max_depth: usize,
}

impl ScanJob {
    /// Only trees in which at least one nested call executed are scanned
    pub fn is_scannable(&self) -> bool {
        self.max_depth > 1
    }
}

/// Submitting side of the scan queue
#[derive(Debug, Clone)]
pub struct ScanQueue {
    sender: mpsc::Sender<ScanJob>,
}

impl ScanQueue {
    /// Queues a job without waiting
    ///
    /// # Errors
    /// * `ScanError::QueueFull` - The worker is behind; the job is dropped
    /// * `ScanError::QueueClosed` - The worker has stopped
    pub fn submit(&self, job: ScanJob) -> Result<(), ScanError> {
        self.sender.try_send(job).map_err(|error| match error {
            mpsc::error::TrySendError::Full(_) => ScanError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ScanError::QueueClosed,
        })
    }
}

/// Counters of a finished scan worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Jobs taken off the queue
    pub received: usize,
    /// Jobs skipped because no nested call executed
    pub skipped: usize,
    /// Jobs scanned
    pub scanned: usize,
    /// Matches reported across all scanned jobs
    pub matches: usize,
}

/// Handle to a running scan worker
#[derive(Debug)]
pub struct ScanService {
    queue: ScanQueue,
    handle: JoinHandle<ScanStats>,
}

impl ScanService {
    /// Spawns the worker on the current Tokio runtime
    ///
    /// # Errors
    /// * `ScanError::NoRuntime` - Called outside a Tokio runtime
    pub fn spawn(scanner: TreeScanner, capacity: usize) -> Result<Self, ScanError> {
        let runtime = Handle::try_current().map_err(|_| ScanError::NoRuntime)?;
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = runtime.spawn(run_worker(scanner, receiver));
        debug!(target: "safe_trace::scanner", capacity, "Scan worker started");
        Ok(Self {
            queue: ScanQueue { sender },
            handle,
        })
    }

    /// A new submitting handle for this worker
    pub fn queue(&self) -> ScanQueue {
        self.queue.clone()
    }

    /// Waits for the worker to drain the queue and stop
    ///
    /// Only completes once every other [`ScanQueue`] handle (including the
    /// ones held by tracers) has been dropped.
    pub async fn join(self) -> Result<ScanStats, ScanError> {
        drop(self.queue);
        self.handle
            .await
            .map_err(|error| ScanError::WorkerFailed(error.to_string()))
    }
}

async fn run_worker(scanner: TreeScanner, mut receiver: mpsc::Receiver<ScanJob>) -> ScanStats {
    let mut stats = ScanStats::default();
    while let Some(job) = receiver.recv().await {
        stats.received += 1;
        if !job.is_scannable() {
            stats.skipped += 1;
            trace!(target: "safe_trace::scanner", max_depth = job.max_depth, "Skipping flat call tree");
            continue;
        }
        stats.scanned += 1;
        stats.matches += scanner.scan(&job.root);
    }
    debug!(
        target: "safe_trace::scanner",
        received = stats.received,
        scanned = stats.scanned,
        matches = stats.matches,
        "Scan worker stopped"
    );
    stats
}
