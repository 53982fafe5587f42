//! Mock availability reader.

use crate::error::{Result, WizardError};
use crate::mocks::lock_error;
use crate::providers::AvailabilityReader;
use crate::types::{ServiceId, Slot, StaffId};
use chrono::NaiveDate;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory slot store.
///
/// Applies the same filters the backend would: service, date, staff, and
/// the availability flag, ordered by start time.
#[derive(Clone, Debug, Default)]
pub struct MockAvailability {
    slots: Arc<Mutex<Vec<Slot>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockAvailability {
    /// Store serving the given slots.
    #[must_use]
    pub fn with_slots(slots: Vec<Slot>) -> Self {
        Self {
            slots: Arc::new(Mutex::new(slots)),
            ..Self::default()
        }
    }

    /// Store whose reads always fail.
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, Ordering::SeqCst);
        mock
    }

    /// Number of reads issued.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AvailabilityReader for MockAvailability {
    fn open_slots(
        &self,
        service: ServiceId,
        date: NaiveDate,
        staff: Option<StaffId>,
    ) -> impl Future<Output = Result<Vec<Slot>>> + Send {
        let this = self.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);

            if this.fail.load(Ordering::SeqCst) {
                return Err(WizardError::Backend {
                    message: "mock availability failure".to_string(),
                });
            }

            let slots = this.slots.lock().map_err(|_| lock_error())?;
            let mut matching: Vec<Slot> = slots
                .iter()
                .filter(|s| {
                    s.service_id == service
                        && s.date == date
                        && s.is_available
                        && staff.map_or(true, |id| s.staff_id == id)
                })
                .cloned()
                .collect();
            matching.sort_by_key(|s| s.start_time);
            Ok(matching)
        }
    }
}
