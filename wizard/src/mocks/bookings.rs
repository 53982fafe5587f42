//! Mock own-bookings reader.

use crate::error::{Result, WizardError};
use crate::mocks::lock_error;
use crate::providers::BookingsReader;
use crate::types::{SlotId, UserId};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory record of slots a user holds per date.
#[derive(Clone, Debug, Default)]
pub struct MockBookings {
    held: Arc<Mutex<HashMap<(UserId, NaiveDate), HashSet<SlotId>>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockBookings {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose reads always fail.
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, Ordering::SeqCst);
        mock
    }

    /// Record that `user` holds `slot` on `date`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn hold(&self, user: UserId, date: NaiveDate, slot: SlotId) {
        self.held
            .lock()
            .unwrap()
            .entry((user, date))
            .or_default()
            .insert(slot);
    }

    /// Number of reads issued.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BookingsReader for MockBookings {
    fn slots_held_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<HashSet<SlotId>>> + Send {
        let this = self.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);

            if this.fail.load(Ordering::SeqCst) {
                return Err(WizardError::Backend {
                    message: "mock bookings failure".to_string(),
                });
            }

            let held = this.held.lock().map_err(|_| lock_error())?;
            Ok(held.get(&(user, date)).cloned().unwrap_or_default())
        }
    }
}
