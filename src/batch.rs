//! Batch execution: drive every lookup of a batch to completion.
//!
//! Each identifier gets its own task, released at its slot in the rate
//! limiter's schedule. Tasks never wait on each other. Every task writes
//! exactly one outcome into its own index of a pre-sized result container,
//! so the aggregate keeps input order no matter which lookups finish first.
//!
//! Per-identifier errors never escape this module: they become
//! [`Outcome::Failure`]. Only the final sink write can fail a batch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{self, JoinError, JoinSet};
use tokio::time::{Instant, sleep_until};

use crate::lookup::LookupClient;
use crate::model::{BatchResult, Identifier, Outcome};
use crate::normalize::normalize;
use crate::rate::RateLimiter;
use crate::sink::{self, ResultSink};

/// Reason recorded for a slot whose lookup task died before reporting.
const ABORTED: &str = "lookup task aborted";

/// Fixed-length, write-once-per-index outcome container.
type Slots = Arc<Mutex<Vec<Option<Outcome>>>>;

/// Runs batches of lookups under a rate limit.
pub struct BatchRunner {
    client: Arc<dyn LookupClient>,
    limiter: RateLimiter,
    incremental: bool,
}

impl BatchRunner {
    pub fn new(client: Arc<dyn LookupClient>, limiter: RateLimiter) -> Self {
        Self {
            client,
            limiter,
            incremental: false,
        }
    }

    /// Also hand the sink a snapshot of resolved outcomes after every completion.
    ///
    /// Snapshots are written while holding the result container's lock, so
    /// they are serialized. A failed snapshot is logged and the batch goes on.
    #[must_use]
    pub fn incremental(mut self, enabled: bool) -> Self {
        self.incremental = enabled;
        self
    }

    /// Run the batch and emit the complete result to `sink` once.
    ///
    /// Returns after every lookup has resolved and the final document has
    /// been written.
    pub async fn run(
        &self,
        identifiers: &[Identifier],
        sink: Arc<dyn ResultSink>,
    ) -> sink::Result<BatchResult> {
        let snapshots = self.incremental.then(|| Arc::clone(&sink));
        let result = self.collect(identifiers, snapshots).await;
        sink.write(result.outcomes())?;
        Ok(result)
    }

    /// Resolve every identifier and assemble the ordered result.
    pub async fn collect(
        &self,
        identifiers: &[Identifier],
        snapshots: Option<Arc<dyn ResultSink>>,
    ) -> BatchResult {
        let slots: Slots = Arc::new(Mutex::new(vec![None; identifiers.len()]));
        let start = Instant::now();
        let mut tasks = JoinSet::new();
        let mut indices: HashMap<task::Id, usize> = HashMap::with_capacity(identifiers.len());

        for (index, identifier) in identifiers.iter().enumerate() {
            let dispatch_at = start + self.limiter.schedule(index);
            let client = Arc::clone(&self.client);
            let slots = Arc::clone(&slots);
            let snapshots = snapshots.clone();
            let identifier = identifier.clone();

            let handle = tasks.spawn(async move {
                sleep_until(dispatch_at).await;
                let outcome = resolve(client.as_ref(), index, identifier).await;
                record(&slots, index, outcome, snapshots.as_deref());
            });
            indices.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next().await {
            let Err(e) = joined else {
                continue;
            };
            let index = indices.get(&e.id()).copied();
            let reason = abort_reason(e);
            tracing::error!(?index, %reason, "lookup task aborted");

            if let Some(index) = index {
                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                if slots[index].is_none() {
                    slots[index] = Some(Outcome::failure(reason, identifiers[index].clone()));
                }
            }
        }

        let resolved = {
            let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *slots)
        };
        let outcomes: Vec<Outcome> = resolved
            .into_iter()
            .zip(identifiers)
            .map(|(slot, identifier)| {
                slot.unwrap_or_else(|| Outcome::failure(ABORTED, identifier.clone()))
            })
            .collect();

        let result = BatchResult::new(outcomes);
        tracing::info!(
            total = result.len(),
            succeeded = result.succeeded(),
            failed = result.failed(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "batch complete"
        );
        result
    }
}

/// Perform one lookup and turn whatever happens into an outcome.
async fn resolve(client: &dyn LookupClient, index: usize, identifier: Identifier) -> Outcome {
    let kind = identifier.kind();
    tracing::info!(index, %kind, identifier = identifier.value(), "looking up");

    match client.lookup(kind, identifier.value()).await {
        Ok(response) => Outcome::Success(normalize(kind, identifier.value(), &response)),
        Err(e) => {
            tracing::warn!(
                index,
                %kind,
                identifier = identifier.value(),
                error = %e,
                "lookup failed"
            );
            Outcome::failure(e.to_string(), identifier)
        }
    }
}

/// Failure reason for a task that died, carrying the panic message when there is one.
fn abort_reason(error: JoinError) -> String {
    if !error.is_panic() {
        return ABORTED.to_string();
    }
    let payload = error.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());
    match detail {
        Some(detail) => format!("{ABORTED}: {detail}"),
        None => ABORTED.to_string(),
    }
}

/// Store an outcome in its slot, then flush a snapshot if asked to.
fn record(
    slots: &Mutex<Vec<Option<Outcome>>>,
    index: usize,
    outcome: Outcome,
    snapshots: Option<&dyn ResultSink>,
) {
    let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
    debug_assert!(slots[index].is_none(), "slot {index} written twice");
    slots[index] = Some(outcome);

    let Some(sink) = snapshots else {
        return;
    };
    let resolved: Vec<Outcome> = slots.iter().flatten().cloned().collect();
    if let Err(e) = sink.write(&resolved) {
        tracing::warn!(error = %e, resolved = resolved.len(), "incremental flush failed");
    }
}
