//! Processing coordinator
//!
//! Triggers server-side detection for one cell test and tracks a single
//! in-flight/idle/failed/succeeded status.

use std::sync::Mutex;

use crate::TRACING_TARGET_COORDINATOR;
use crate::api::ApiService;
use crate::error::{Error, Result};
use crate::types::{ProcessAck, ProcessingRun, ProcessingStatus};

/// Coordinates detection runs for one cell test.
///
/// At most one run may be in flight at a time; a second trigger while one is
/// in flight is rejected rather than queued. A new trigger after a terminal
/// state starts a fresh run. The run state sits behind a mutex so shared
/// handles observe the in-flight status.
#[derive(Debug)]
pub struct ProcessingCoordinator {
    api: ApiService,
    cell_test_id: String,
    run: Mutex<ProcessingRun>,
}

impl ProcessingCoordinator {
    /// Creates an idle coordinator for a cell test.
    pub fn new(api: ApiService, cell_test_id: impl Into<String>) -> Self {
        let cell_test_id = cell_test_id.into();
        let run = Mutex::new(ProcessingRun::idle(cell_test_id.as_str()));
        Self {
            api,
            cell_test_id,
            run,
        }
    }

    /// The cell test this coordinator targets.
    pub fn cell_test_id(&self) -> &str {
        &self.cell_test_id
    }

    /// Current run status.
    pub fn status(&self) -> ProcessingStatus {
        self.lock().status
    }

    /// Snapshot of the current run.
    pub fn current_run(&self) -> ProcessingRun {
        self.lock().clone()
    }

    /// Triggers a detection run.
    ///
    /// Rejected without a network call when the cell test identifier is
    /// empty or a run is already in flight. The call resolves when the
    /// server acknowledges the run or the request fails; the coordinator
    /// never polls for completion.
    pub async fn trigger(&self) -> Result<ProcessAck> {
        if self.cell_test_id.is_empty() {
            return Err(Error::validation(
                "cell_test_id",
                "missing cell test identifier",
            ));
        }

        {
            let mut run = self.lock();
            if run.status.is_processing() {
                return Err(Error::state(
                    "process",
                    "a processing run is already in flight",
                ));
            }
            *run = ProcessingRun::started(self.cell_test_id.as_str());
        }

        match self.api.trigger_processing(&self.cell_test_id).await {
            Ok(ack) => {
                let mut run = self.lock();
                run.status = ProcessingStatus::Succeeded;
                run.ack = Some(ack.clone());
                Ok(ack)
            }
            Err(err) => {
                let mut run = self.lock();
                run.status = ProcessingStatus::Failed;
                run.message = Some(err.user_message());
                tracing::warn!(
                    target: TRACING_TARGET_COORDINATOR,
                    cell_test_id = %self.cell_test_id,
                    error = %err,
                    "Processing run failed"
                );
                Err(err)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProcessingRun> {
        self.run.lock().expect("processing run lock poisoned")
    }
}
