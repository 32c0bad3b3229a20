use engine_core::state::TransferState;

/// Exit codes for the CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
    InvalidConfig = 2,
    AbortedOnError = 3,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_state(state: TransferState) -> Self {
        match state {
            state if state.is_success() => ExitCode::Success,
            TransferState::AbortedOnWrite => ExitCode::AbortedOnError,
            _ => ExitCode::Failure,
        }
    }
}
