use tokio::process::Child;

use super::status::StageStatus;

/// A launched stage that the orchestrator still has to wait on.
pub enum StageChild {
    Process(Child),
    /// Builtins and stages that never started are finished at launch time.
    Finished(StageStatus),
}

impl From<Child> for StageChild {
    fn from(value: Child) -> Self {
        Self::Process(value)
    }
}

impl From<StageStatus> for StageChild {
    fn from(value: StageStatus) -> Self {
        Self::Finished(value)
    }
}

impl StageChild {
    pub async fn wait(self) -> StageStatus {
        match self {
            Self::Process(mut process) => match process.wait().await {
                Ok(status) => status.into(),
                Err(err) => {
                    error!("failed to wait for child: {err}");
                    StageStatus::Aborted(1)
                }
            },
            Self::Finished(status) => status,
        }
    }
}
