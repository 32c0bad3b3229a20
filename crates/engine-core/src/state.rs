use serde::Serialize;
use std::fmt;

/// Lifecycle of one transfer run.
///
/// `Streaming(n)` carries the 1-based number of the batch being worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "batch", rename_all = "snake_case")]
pub enum TransferState {
    Initializing,
    Introspecting,
    Streaming(u64),
    Completed,
    CompletedWithErrors,
    /// Connection or column discovery failed before any batch.
    AbortedOnSetup,
    /// The source stream failed mid-run.
    AbortedOnRead,
    /// A batch failed under the abort policy.
    AbortedOnWrite,
}

impl TransferState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Initializing => "Initializing",
            TransferState::Introspecting => "Introspecting",
            TransferState::Streaming(_) => "Streaming",
            TransferState::Completed => "Completed",
            TransferState::CompletedWithErrors => "CompletedWithErrors",
            TransferState::AbortedOnSetup => "AbortedOnSetup",
            TransferState::AbortedOnRead => "AbortedOnRead",
            TransferState::AbortedOnWrite => "AbortedOnWrite",
        }
    }

    /// Terminal states that count as a successful run.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TransferState::Completed | TransferState::CompletedWithErrors
        )
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Streaming(n) => write!(f, "Streaming({n})"),
            other => f.write_str(other.as_str()),
        }
    }
}
