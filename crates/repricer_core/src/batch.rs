use crate::UpdateInstruction;

/// Number of pending cells that triggers a bulk write (20 rows, 2 cells each).
pub const DEFAULT_BATCH_THRESHOLD: usize = 40;

/// Append-only buffer of instructions waiting for the next bulk write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBatch {
    threshold: usize,
    pending: Vec<UpdateInstruction>,
}

impl Default for PendingBatch {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_BATCH_THRESHOLD)
    }
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A threshold of zero is treated as one.
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            pending: Vec::new(),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn push(&mut self, instruction: UpdateInstruction) {
        self.pending.push(instruction);
    }

    /// Drains the buffer once it holds at least `threshold` instructions.
    pub fn take_full(&mut self) -> Option<Vec<UpdateInstruction>> {
        if self.pending.len() >= self.threshold {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    /// Drains whatever is buffered, if anything.
    pub fn take_remaining(&mut self) -> Option<Vec<UpdateInstruction>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    /// Throws away buffered instructions and returns how many were lost.
    pub fn discard(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

/// Splits a batch into instructions fit to send and the malformed rest.
pub fn partition_well_formed(
    batch: Vec<UpdateInstruction>,
) -> (Vec<UpdateInstruction>, Vec<UpdateInstruction>) {
    batch.into_iter().partition(UpdateInstruction::is_well_formed)
}
