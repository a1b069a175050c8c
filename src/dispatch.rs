//! Routing one decoded record to every applicable sink.
//!
//! Each sink gets its own worker task fed by a bounded queue, so a slow or
//! hung store only delays its own backlog. Records are enqueued in delivery
//! order from the single decode/route stage, which preserves per-sink
//! ordering; no ordering is guaranteed across sinks for the same record.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::record::DecodedRecord;
use crate::sink::{EventSink, SinkError, SinkOutcome};

pub const DEFAULT_QUEUE_DEPTH: usize = 64;

struct Job {
    record: Arc<DecodedRecord>,
    reply: oneshot::Sender<SinkOutcome>,
}

struct Route {
    name: &'static str,
    sink: Arc<dyn EventSink>,
    queue: mpsc::Sender<Job>,
}

/// Fans decoded records out to the registered sinks.
///
/// A failure in one sink's write never prevents, rolls back or delays the
/// others; each sink's result is caught at its boundary and recorded in the
/// [`DispatchOutcome`]. There is no cross-sink transaction.
pub struct Dispatcher {
    routes: Vec<Route>,
}

impl Dispatcher {
    /// Spawns one worker task per sink. Must be called from within a tokio
    /// runtime. A full queue back-pressures `route` rather than dropping.
    pub fn new(sinks: Vec<Arc<dyn EventSink>>, queue_depth: usize) -> Self {
        let routes = sinks
            .into_iter()
            .map(|sink| {
                let (tx, rx) = mpsc::channel(queue_depth.max(1));
                let name = sink.name();
                tokio::spawn(run_worker(Arc::clone(&sink), rx));
                Route {
                    name,
                    sink,
                    queue: tx,
                }
            })
            .collect();
        Self { routes }
    }

    /// Evaluate routing for every sink and enqueue the record to the
    /// applicable ones. Skips are decided here, without touching any store.
    pub async fn route(&self, record: Arc<DecodedRecord>) -> PendingDispatch {
        let mut slots = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            let slot = match route.sink.route(&record) {
                Err(reason) => Slot::Ready(SinkOutcome::Skipped(reason)),
                Ok(()) => {
                    let (reply, rx) = oneshot::channel();
                    let job = Job {
                        record: Arc::clone(&record),
                        reply,
                    };
                    match route.queue.send(job).await {
                        Ok(()) => Slot::Waiting(rx),
                        Err(_) => Slot::Ready(SinkOutcome::Failed(SinkError::Store(
                            "sink worker stopped".into(),
                        ))),
                    }
                }
            };
            slots.push((route.name, slot));
        }
        PendingDispatch { slots }
    }

    /// Route and wait for every sink's individual result.
    pub async fn dispatch(&self, record: Arc<DecodedRecord>) -> DispatchOutcome {
        self.route(record).await.outcome().await
    }
}

async fn run_worker(sink: Arc<dyn EventSink>, mut rx: mpsc::Receiver<Job>) {
    while let Some(job) = rx.recv().await {
        let outcome = match sink.write(&job.record).await {
            Ok(()) => SinkOutcome::Written,
            Err(SinkError::Skip(reason)) => SinkOutcome::Skipped(reason),
            Err(err) => SinkOutcome::Failed(err),
        };
        // The caller may have stopped listening; the write already happened
        // either way.
        let _ = job.reply.send(outcome);
    }
}

enum Slot {
    Ready(SinkOutcome),
    Waiting(oneshot::Receiver<SinkOutcome>),
}

/// A dispatch whose writes are still in flight on the sink workers.
pub struct PendingDispatch {
    slots: Vec<(&'static str, Slot)>,
}

impl PendingDispatch {
    pub async fn outcome(self) -> DispatchOutcome {
        let mut results = Vec::with_capacity(self.slots.len());
        for (name, slot) in self.slots {
            let outcome = match slot {
                Slot::Ready(outcome) => outcome,
                Slot::Waiting(rx) => rx.await.unwrap_or(SinkOutcome::Failed(
                    SinkError::Store("sink worker stopped".into()),
                )),
            };
            results.push((name, outcome));
        }
        DispatchOutcome { results }
    }
}

/// Per-sink results of one dispatch, in sink registration order.
#[derive(Debug)]
pub struct DispatchOutcome {
    results: Vec<(&'static str, SinkOutcome)>,
}

impl DispatchOutcome {
    pub fn get(&self, sink: &str) -> Option<&SinkOutcome> {
        self.results
            .iter()
            .find(|(name, _)| *name == sink)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SinkOutcome)> {
        self.results.iter().map(|(name, outcome)| (*name, outcome))
    }

    pub fn has_failure(&self) -> bool {
        self.results.iter().any(|(_, o)| o.is_failed())
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, outcome) in &self.results {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={outcome}")?;
            first = false;
        }
        Ok(())
    }
}
