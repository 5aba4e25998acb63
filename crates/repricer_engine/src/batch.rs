use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use repricer_core::{partition_well_formed, DocumentRef, PendingBatch, UpdateInstruction};

use crate::store::TableStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was due.
    Idle,
    Written { cells: usize, dropped: usize },
    /// The store rejected the batch; its cells are gone for this run.
    Failed { cells: usize, dropped: usize },
}

/// Buffers cell writes and commits them in bulk.
///
/// Delivery is at-most-once and best-effort: a batch the store rejects is
/// logged and dropped, never retried or requeued.
pub struct BatchAccumulator {
    store: Arc<dyn TableStore>,
    document: DocumentRef,
    pending: PendingBatch,
    last_error: Option<String>,
}

impl BatchAccumulator {
    pub fn new(store: Arc<dyn TableStore>, document: DocumentRef, threshold: usize) -> Self {
        Self {
            store,
            document,
            pending: PendingBatch::with_threshold(threshold),
            last_error: None,
        }
    }

    /// Message of the most recent failed flush.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn add(&mut self, instruction: UpdateInstruction) {
        self.pending.push(instruction);
    }

    /// Writes the buffer if it reached the threshold.
    pub async fn maybe_flush(&mut self) -> FlushOutcome {
        match self.pending.take_full() {
            Some(batch) => self.write(batch).await,
            None => FlushOutcome::Idle,
        }
    }

    /// Writes whatever is left; called once when the run completes.
    pub async fn flush_remaining(&mut self) -> FlushOutcome {
        match self.pending.take_remaining() {
            Some(batch) => self.write(batch).await,
            None => FlushOutcome::Idle,
        }
    }

    /// Drops the buffer without writing; returns the number of lost cells.
    pub fn discard(&mut self) -> usize {
        self.pending.discard()
    }

    async fn write(&mut self, batch: Vec<UpdateInstruction>) -> FlushOutcome {
        let (valid, malformed) = partition_well_formed(batch);
        for instruction in &malformed {
            engine_warn!(
                "Dropping malformed update address={:?} value={:?}",
                instruction.address.as_str(),
                instruction.value
            );
        }
        let dropped = malformed.len();
        if valid.is_empty() {
            return FlushOutcome::Written { cells: 0, dropped };
        }

        let cells = valid.len();
        match self.store.batch_update(&self.document, &valid).await {
            Ok(()) => {
                engine_info!("Updated {} cells in {}", cells, self.document.name);
                FlushOutcome::Written { cells, dropped }
            }
            Err(err) => {
                engine_warn!(
                    "Batch update of {} cells in {} failed, dropping batch: {}",
                    cells,
                    self.document.name,
                    err
                );
                self.last_error = Some(err.to_string());
                FlushOutcome::Failed { cells, dropped }
            }
        }
    }
}
