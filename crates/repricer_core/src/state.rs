use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    /// Stop was requested; the job has not yet left its loop.
    Cancelled,
}

/// Start rejections, worded for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Parsing is already running.")]
    AlreadyRunning,
    #[error("Parsing is still stopping, try again in a moment.")]
    Stopping,
    #[error("No document selected. Use /setdoc to choose a document.")]
    NoDocumentSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The running job was told to stop.
    Signalled,
    /// A stop was already pending.
    AlreadyStopping,
    NotRunning,
}

/// Single-job lifecycle: `Idle -> Running -> {Idle, Cancelled -> Idle}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobLifecycle {
    state: JobState,
}

impl JobLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != JobState::Idle
    }

    /// Whether [`begin`](Self::begin) would succeed right now.
    pub fn check_can_begin(&self) -> Result<(), StateError> {
        match self.state {
            JobState::Idle => Ok(()),
            JobState::Running => Err(StateError::AlreadyRunning),
            JobState::Cancelled => Err(StateError::Stopping),
        }
    }

    /// Moves to `Running`. Leaves the state untouched on rejection.
    pub fn begin(&mut self) -> Result<(), StateError> {
        self.check_can_begin()?;
        self.state = JobState::Running;
        Ok(())
    }

    pub fn cancel(&mut self) -> StopOutcome {
        match self.state {
            JobState::Running => {
                self.state = JobState::Cancelled;
                StopOutcome::Signalled
            }
            JobState::Cancelled => StopOutcome::AlreadyStopping,
            JobState::Idle => StopOutcome::NotRunning,
        }
    }

    /// Called by the job when its loop ends, however it ended.
    pub fn finish(&mut self) {
        self.state = JobState::Idle;
    }
}
