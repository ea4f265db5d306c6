use thiserror::Error;

/// Failure of one reporter cycle
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Bugzilla search failed: {0:#}")]
    Search(anyhow::Error),

    #[error("Reporter state could not be persisted: {0:#}")]
    State(anyhow::Error),

    #[error("Cycle cancelled")]
    Cancelled,
}

impl SyncError {
    /// Event reason under which the failure is recorded
    pub fn reason(&self) -> &'static str {
        match self {
            SyncError::Search(_) => "BugSearchFailed",
            SyncError::State(_) => "StateFailed",
            SyncError::Cancelled => "Cancelled",
        }
    }
}
