use std::{os::unix::process::ExitStatusExt, process::ExitStatus};

/// Status reported for a stage whose command could not be resolved.
pub const NOT_FOUND: i32 = 127;
/// Status reported when an executable was found but could not be run.
pub const NOT_EXECUTABLE: i32 = 126;

/// How one pipeline stage finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Process(ExitStatus),
    Builtin(BuiltinExitStatus),
    NotFound,
    /// The stage never ran (bad redirection target, spawn failure).
    Aborted(i32),
}

impl From<ExitStatus> for StageStatus {
    fn from(value: ExitStatus) -> Self {
        Self::Process(value)
    }
}

impl From<BuiltinExitStatus> for StageStatus {
    fn from(value: BuiltinExitStatus) -> Self {
        Self::Builtin(value)
    }
}

impl StageStatus {
    pub fn code(&self) -> i32 {
        match self {
            Self::Process(status) => status
                .code()
                .or_else(|| status.signal().map(|sig| 128 + sig))
                .unwrap_or(1),
            Self::Builtin(status) => status.code(),
            Self::NotFound => NOT_FOUND,
            Self::Aborted(code) => *code,
        }
    }

    pub fn success(&self) -> bool {
        self.code() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinExitStatus(i32);

impl BuiltinExitStatus {
    pub fn new_success() -> Self {
        Self(0)
    }

    pub fn new_failure() -> Self {
        Self(1)
    }

    pub fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub fn success(&self) -> bool {
        self.0 == 0
    }

    pub fn failure(&self) -> bool {
        !self.success()
    }

    pub fn code(&self) -> i32 {
        self.0
    }
}

/// Outcome of running a whole input line, taken from its final stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: i32,
    pub not_found: bool,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self {
            status: 0,
            not_found: false,
        }
    }

    pub fn failure(status: i32) -> Self {
        Self {
            status,
            not_found: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0 && !self.not_found
    }
}

impl From<StageStatus> for ExecutionResult {
    fn from(value: StageStatus) -> Self {
        Self {
            status: value.code(),
            not_found: matches!(value, StageStatus::NotFound),
        }
    }
}
