//! Testdubbletter för lagring och notifieringsvärd

use chrono::NaiveDateTime;
use std::cell::{Cell, RefCell};

use crate::db::{Database, KeyValueStore, KvRepository};
use crate::models::{PermissionStatus, ReminderPayload};
use crate::services::reminders::NotificationHost;
use crate::utils::{AppError, AppResult};

/// Lagring vars skrivningar kan fås att misslyckas
pub struct FailingStore {
    inner: KvRepository,
    fail_writes: Cell<bool>,
}

impl FailingStore {
    /// Tom lagring där alla skrivningar misslyckas
    pub fn new() -> Self {
        Self {
            inner: Database::open_in_memory().unwrap().kv(),
            fail_writes: Cell::new(true),
        }
    }

    /// Fungerande lagring tills `set_failing(true)`
    pub fn working() -> Self {
        let store = Self::new();
        store.set_failing(false);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.set(failing);
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.fail_writes.get() {
            return Err(AppError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }
}

/// Notifieringsvärd som sparar allt i minnet
pub struct RecordingHost {
    pub permission: Cell<PermissionStatus>,
    pub request_answer: Cell<PermissionStatus>,
    pub scheduled: RefCell<Vec<(NaiveDateTime, ReminderPayload)>>,
    pub cancel_calls: Cell<usize>,
    pub permission_requests: Cell<usize>,
    pub fail_day: Cell<Option<u32>>,
    pub fail_cancel: Cell<bool>,
}

impl RecordingHost {
    pub fn granted() -> Self {
        Self {
            permission: Cell::new(PermissionStatus::Granted),
            request_answer: Cell::new(PermissionStatus::Granted),
            scheduled: RefCell::new(Vec::new()),
            cancel_calls: Cell::new(0),
            permission_requests: Cell::new(0),
            fail_day: Cell::new(None),
            fail_cancel: Cell::new(false),
        }
    }

    pub fn denied() -> Self {
        let host = Self::granted();
        host.permission.set(PermissionStatus::Denied);
        host.request_answer.set(PermissionStatus::Denied);
        host
    }

    pub fn scheduled_days(&self) -> Vec<u32> {
        self.scheduled
            .borrow()
            .iter()
            .map(|(_, payload)| payload.data.day)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.scheduled.borrow().len()
    }
}

impl NotificationHost for RecordingHost {
    fn get_permission(&self) -> AppResult<PermissionStatus> {
        Ok(self.permission.get())
    }

    fn request_permission(&self) -> AppResult<PermissionStatus> {
        self.permission_requests.set(self.permission_requests.get() + 1);
        let answer = self.request_answer.get();
        self.permission.set(answer);
        Ok(answer)
    }

    fn cancel_all(&self) -> AppResult<()> {
        if self.fail_cancel.get() {
            return Err(AppError::notification("cancel failed"));
        }
        self.cancel_calls.set(self.cancel_calls.get() + 1);
        self.scheduled.borrow_mut().clear();
        Ok(())
    }

    fn schedule_at(&self, trigger_at: NaiveDateTime, payload: &ReminderPayload) -> AppResult<()> {
        if self.fail_day.get() == Some(payload.data.day) {
            return Err(AppError::notification("schedule failed"));
        }
        self.scheduled
            .borrow_mut()
            .push((trigger_at, payload.clone()));
        Ok(())
    }
}
