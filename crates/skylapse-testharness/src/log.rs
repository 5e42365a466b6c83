//! ---
//! sl_section: "09-testing"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Scripted collaborator fakes for session and driver tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

/// Ordered record of every collaborator call, e.g. `wifi.connect GP54321`.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of entries that start with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }

    /// Index of the first entry that starts with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.entries
            .lock()
            .iter()
            .position(|entry| entry.starts_with(prefix))
    }

    pub fn last(&self) -> Option<String> {
        self.entries.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Operations scheduled to fail, keyed by name such as `camera.set_mode`.
#[derive(Debug, Clone, Default)]
pub struct FailurePlan {
    always: Arc<Mutex<HashSet<String>>>,
    remaining: Arc<Mutex<HashMap<String, usize>>>,
    nth: Arc<Mutex<HashMap<String, usize>>>,
    seen: Arc<Mutex<HashMap<String, usize>>>,
}

impl FailurePlan {
    /// Fail every call to `operation`.
    pub fn fail_on(&self, operation: &str) {
        self.always.lock().insert(operation.to_owned());
    }

    /// Fail only the next `times` calls to `operation`.
    pub fn fail_times(&self, operation: &str, times: usize) {
        self.remaining.lock().insert(operation.to_owned(), times);
    }

    /// Fail only the `n`th call (1-based) to `operation`.
    pub fn fail_nth(&self, operation: &str, n: usize) {
        self.nth.lock().insert(operation.to_owned(), n);
    }

    pub fn clear(&self) {
        self.always.lock().clear();
        self.remaining.lock().clear();
        self.nth.lock().clear();
        self.seen.lock().clear();
    }

    /// True when this call to `operation` should fail. Consumes one-shot entries.
    pub fn should_fail(&self, operation: &str) -> bool {
        let call = {
            let mut seen = self.seen.lock();
            let count = seen.entry(operation.to_owned()).or_insert(0);
            *count += 1;
            *count
        };
        if self.nth.lock().get(operation) == Some(&call) {
            return true;
        }
        if self.always.lock().contains(operation) {
            return true;
        }
        let mut remaining = self.remaining.lock();
        match remaining.get_mut(operation) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}
