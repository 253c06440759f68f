//! Processing runs: one detection invocation per cell test.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by the processing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessAck {
    /// Identifier of the accepted run.
    pub id: String,
    /// Opaque result handle returned by the server.
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Status of a processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// No run triggered yet, or the previous run's state was cleared.
    Idle,
    /// A trigger is in flight; further triggers are rejected.
    Processing,
    /// The server accepted the run and returned an acknowledgement.
    Succeeded,
    /// The trigger failed; a new trigger is permitted.
    Failed,
}

impl ProcessingStatus {
    /// Returns whether a trigger is currently in flight.
    pub fn is_processing(&self) -> bool {
        matches!(self, ProcessingStatus::Processing)
    }

    /// Returns whether the run reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Succeeded | ProcessingStatus::Failed)
    }
}

/// One detection invocation for a cell test.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingRun {
    /// The target of the run.
    pub cell_test_id: String,
    /// Current status.
    pub status: ProcessingStatus,
    /// Human-readable failure message, set when the run fails.
    pub message: Option<String>,
    /// Server acknowledgement, set when the run succeeds.
    pub ack: Option<ProcessAck>,
}

impl ProcessingRun {
    /// Creates an idle run for a cell test.
    pub fn idle(cell_test_id: impl Into<String>) -> Self {
        Self {
            cell_test_id: cell_test_id.into(),
            status: ProcessingStatus::Idle,
            message: None,
            ack: None,
        }
    }

    /// Creates a fresh run that is already in flight.
    ///
    /// Used on re-trigger after a terminal state; the previous run's message
    /// and acknowledgement do not carry over.
    pub fn started(cell_test_id: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::Processing,
            ..Self::idle(cell_test_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_run_clears_previous_outcome() {
        let run = ProcessingRun::started("ct1");
        assert!(run.status.is_processing());
        assert!(run.message.is_none());
        assert!(run.ack.is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProcessingStatus::Succeeded.is_terminal());
        assert!(ProcessingStatus::Failed.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(!ProcessingStatus::Idle.is_terminal());
    }

    #[test]
    fn test_ack_wire_shape() {
        let ack: ProcessAck = serde_json::from_str(r#"{"id":"run1","result":"ok"}"#).unwrap();
        assert_eq!(ack.id, "run1");
        assert_eq!(ack.result, serde_json::json!("ok"));
    }
}
