use serde::Serialize;

/// Counters for one run, owned and updated by the orchestrator alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferProgress {
    pub batches_attempted: u64,
    pub batches_committed: u64,
    pub batches_failed: u64,
    pub rows_transferred: u64,
    pub rows_failed: u64,
}

impl TransferProgress {
    /// Marks a new batch as attempted and returns its 1-based number.
    pub fn begin_batch(&mut self) -> u64 {
        self.batches_attempted += 1;
        self.batches_attempted
    }

    pub fn record_commit(&mut self, rows: usize) {
        self.batches_committed += 1;
        self.rows_transferred += rows as u64;
    }

    pub fn record_failure(&mut self, rows: usize) {
        self.batches_failed += 1;
        self.rows_failed += rows as u64;
    }

    pub fn has_failures(&self) -> bool {
        self.batches_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::TransferProgress;

    #[test]
    fn test_counters() {
        let mut progress = TransferProgress::default();
        assert_eq!(progress.begin_batch(), 1);
        progress.record_commit(500);
        assert_eq!(progress.begin_batch(), 2);
        progress.record_failure(3);

        assert_eq!(progress.batches_attempted, 2);
        assert_eq!(progress.batches_committed, 1);
        assert_eq!(progress.rows_transferred, 500);
        assert_eq!(progress.rows_failed, 3);
        assert!(progress.has_failures());
    }
}
