//! Concurrency-safe store of active jobs.
//!
//! Every operation is a single critical section on one mutex, which makes
//! `load_and_delete` atomic: two callers can never both take ownership of the
//! same job. Higher-level rules (one job per key) belong to the controller.

use crate::registry::{ActiveJob, RegistryKey};

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

/// Map from [`RegistryKey`] to [`ActiveJob`].
#[derive(Debug, Default)]
pub struct TaskRegistry {
    jobs: Mutex<HashMap<RegistryKey, ActiveJob>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the job stored under `key`.
    pub fn store(&self, key: RegistryKey, job: ActiveJob) {
        self.jobs.lock().insert(key, job);
    }

    /// Insert `job` only if `key` is vacant. Returns whether it was stored.
    pub fn store_if_vacant(&self, key: RegistryKey, job: ActiveJob) -> bool {
        let mut jobs = self.jobs.lock();
        if jobs.contains_key(&key) {
            return false;
        }
        jobs.insert(key, job);
        true
    }

    /// Job stored under `key`, if any.
    pub fn load(&self, key: &RegistryKey) -> Option<ActiveJob> {
        self.jobs.lock().get(key).cloned()
    }

    /// Remove and return the job stored under `key` in one step.
    pub fn load_and_delete(&self, key: &RegistryKey) -> Option<ActiveJob> {
        self.jobs.lock().remove(key)
    }

    /// Remove whatever is stored under `key`.
    pub fn delete(&self, key: &RegistryKey) {
        self.jobs.lock().remove(key);
    }

    /// Remove the entry under `key` only if it still holds job `job_id`.
    ///
    /// Returns whether an entry was removed.
    pub fn delete_job(&self, key: &RegistryKey, job_id: Uuid) -> bool {
        let mut jobs = self.jobs.lock();
        match jobs.get(key) {
            Some(job) if job.id == job_id => {
                jobs.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Copy of every active job at this instant.
    pub fn snapshot(&self) -> Vec<ActiveJob> {
        self.jobs.lock().values().cloned().collect()
    }

    /// Number of active jobs.
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Whether no job is active.
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}
