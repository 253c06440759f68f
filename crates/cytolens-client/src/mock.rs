//! Scriptable mock API provider for testing.
//!
//! The mock records every call and replays scripted responses, letting
//! coordinator behavior be exercised without a live server. Handles share
//! state, so a clone kept by the test observes calls made through the
//! [`ApiService`] wrapping another clone.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{ApiService, CellTestApi};
use crate::error::{Error, Result};
use crate::types::{CellTest, ImageFile, ImageRecord, ProcessAck};

/// Number of calls observed per API operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallLog {
    /// Calls to `upload_data_images`.
    pub upload: usize,
    /// Calls to `list_data_images`.
    pub list_images: usize,
    /// Calls to `delete_data_image`.
    pub delete: usize,
    /// Calls to `trigger_processing`.
    pub process: usize,
    /// Calls to `list_cell_tests`.
    pub list_cell_tests: usize,
}

enum Scripted<T> {
    Ok(T),
    Err { status: u16, message: String },
}

impl<T> Scripted<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::Err { status, message } => Err(Error::api(status, message)),
        }
    }
}

#[derive(Default)]
struct MockState {
    upload_responses: VecDeque<Scripted<Vec<ImageRecord>>>,
    delete_responses: VecDeque<Scripted<()>>,
    process_responses: VecDeque<Scripted<ProcessAck>>,
    data_images: Vec<ImageRecord>,
    cell_tests: HashMap<String, Vec<CellTest>>,
    deleted: Vec<String>,
    calls: CallLog,
}

/// Mock cell-test API provider.
///
/// Unscripted deletes succeed and unscripted processing triggers return a
/// generated acknowledgement; uploads must always be scripted.
#[derive(Clone, Default)]
pub struct MockCellTestApi {
    state: Arc<Mutex<MockState>>,
    process_delay: Option<Duration>,
}

impl MockCellTestApi {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds each processing trigger for `delay` before responding, so tests
    /// can observe the in-flight state.
    pub fn with_process_delay(mut self, delay: Duration) -> Self {
        self.process_delay = Some(delay);
        self
    }

    /// Wraps a clone of this mock in an [`ApiService`].
    pub fn service(&self) -> ApiService {
        ApiService::new(self.clone())
    }

    /// Scripts the next upload to succeed with the given records.
    pub fn queue_upload_success(&self, records: Vec<ImageRecord>) {
        self.lock().upload_responses.push_back(Scripted::Ok(records));
    }

    /// Scripts the next upload to fail.
    pub fn queue_upload_failure(&self, status: u16, message: impl Into<String>) {
        self.lock().upload_responses.push_back(Scripted::Err {
            status,
            message: message.into(),
        });
    }

    /// Scripts the next delete to fail.
    pub fn queue_delete_failure(&self, status: u16, message: impl Into<String>) {
        self.lock().delete_responses.push_back(Scripted::Err {
            status,
            message: message.into(),
        });
    }

    /// Scripts the next processing trigger to succeed with the given
    /// acknowledgement.
    pub fn queue_process_success(&self, ack: ProcessAck) {
        self.lock().process_responses.push_back(Scripted::Ok(ack));
    }

    /// Scripts the next processing trigger to fail.
    pub fn queue_process_failure(&self, status: u16, message: impl Into<String>) {
        self.lock().process_responses.push_back(Scripted::Err {
            status,
            message: message.into(),
        });
    }

    /// Sets the records returned by `list_data_images`.
    pub fn set_data_images(&self, records: Vec<ImageRecord>) {
        self.lock().data_images = records;
    }

    /// Sets the cell tests returned by `list_cell_tests` for a patient.
    pub fn set_cell_tests(&self, patient_id: impl Into<String>, tests: Vec<CellTest>) {
        self.lock().cell_tests.insert(patient_id.into(), tests);
    }

    /// Calls observed so far.
    pub fn calls(&self) -> CallLog {
        self.lock().calls
    }

    /// Image identifiers deleted so far, in call order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock poisoned")
    }
}

#[async_trait::async_trait]
impl CellTestApi for MockCellTestApi {
    async fn upload_data_images(
        &self,
        _patient_id: &str,
        _cell_test_id: &str,
        _files: &[ImageFile],
    ) -> Result<Vec<ImageRecord>> {
        let scripted = {
            let mut state = self.lock();
            state.calls.upload += 1;
            state.upload_responses.pop_front()
        };
        match scripted {
            Some(response) => response.into_result(),
            None => Err(Error::api(500, "no scripted upload response")),
        }
    }

    async fn list_data_images(
        &self,
        _patient_id: &str,
        _cell_test_id: &str,
    ) -> Result<Vec<ImageRecord>> {
        let mut state = self.lock();
        state.calls.list_images += 1;
        Ok(state.data_images.clone())
    }

    async fn delete_data_image(
        &self,
        _patient_id: &str,
        _cell_test_id: &str,
        image_id: &str,
    ) -> Result<()> {
        let scripted = {
            let mut state = self.lock();
            state.calls.delete += 1;
            state.delete_responses.pop_front()
        };
        match scripted {
            Some(response) => response.into_result(),
            None => {
                self.lock().deleted.push(image_id.to_string());
                Ok(())
            }
        }
    }

    async fn trigger_processing(&self, cell_test_id: &str) -> Result<ProcessAck> {
        let run_number = {
            let mut state = self.lock();
            state.calls.process += 1;
            state.calls.process
        };

        if let Some(delay) = self.process_delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.lock().process_responses.pop_front();
        match scripted {
            Some(response) => response.into_result(),
            None => Ok(ProcessAck {
                id: format!("run-{}-{}", cell_test_id, run_number),
                result: serde_json::Value::Null,
            }),
        }
    }

    async fn list_cell_tests(&self, patient_id: &str) -> Result<Vec<CellTest>> {
        let mut state = self.lock();
        state.calls.list_cell_tests += 1;
        Ok(state.cell_tests.get(patient_id).cloned().unwrap_or_default())
    }
}
