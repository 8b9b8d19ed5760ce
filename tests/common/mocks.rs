use async_trait::async_trait;
use fieldsync::{DispatchError, DrainReport, RecordInserter, RecordKind, RecordPayload, SyncEventEmitter};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::{Notify, Semaphore};

/// Label used by the mocks to identify a payload: its `tag` field.
pub fn tag_of(payload: &RecordPayload) -> String {
    payload.as_json()["tag"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

/// Succeeds unless a failure has been scripted for the payload's tag.
#[derive(Default)]
pub struct ScriptedInserter {
    remaining_failures: Mutex<HashMap<String, u32>>,
    always_fail: Mutex<Vec<String>>,
    calls: Mutex<Vec<(RecordKind, String)>>,
}

impl ScriptedInserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_times(&self, tag: &str, times: u32) {
        self.remaining_failures
            .lock()
            .unwrap()
            .insert(tag.to_string(), times);
    }

    pub fn fail_always(&self, tag: &str) {
        self.always_fail.lock().unwrap().push(tag.to_string());
    }

    pub fn calls(&self) -> Vec<(RecordKind, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_tags(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, tag)| tag).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordInserter for ScriptedInserter {
    async fn insert(&self, kind: &RecordKind, payload: &RecordPayload) -> Result<(), DispatchError> {
        let tag = tag_of(payload);
        self.calls.lock().unwrap().push((kind.clone(), tag.clone()));

        if self.always_fail.lock().unwrap().contains(&tag) {
            return Err(DispatchError::Rejected(format!("{tag} always rejected")));
        }

        let mut remaining = self.remaining_failures.lock().unwrap();
        if let Some(count) = remaining.get_mut(&tag) {
            if *count > 0 {
                *count -= 1;
                return Err(DispatchError::Network(format!("{tag} unreachable")));
            }
        }
        Ok(())
    }
}

/// Blocks every insert until [`GatedInserter::release`] is called.
pub struct GatedInserter {
    entered: Notify,
    gate: Semaphore,
    calls: Mutex<usize>,
}

impl GatedInserter {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            gate: Semaphore::new(0),
            calls: Mutex::new(0),
        }
    }

    /// Resolves once an insert is waiting at the gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self, inserts: usize) {
        self.gate.add_permits(inserts);
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RecordInserter for GatedInserter {
    async fn insert(&self, _kind: &RecordKind, _payload: &RecordPayload) -> Result<(), DispatchError> {
        *self.calls.lock().unwrap() += 1;
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| DispatchError::Network("gate closed".into()))?;
        permit.forget();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEmitter {
    pub reports: Mutex<Vec<DrainReport>>,
    pub failures: Mutex<Vec<String>>,
}

impl SyncEventEmitter for RecordingEmitter {
    fn emit_report(&self, report: &DrainReport) -> Result<(), String> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    fn emit_failure(&self, message: &str) -> Result<(), String> {
        self.failures.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
