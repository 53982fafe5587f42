//! Availability reader trait.

use crate::error::Result;
use crate::types::{ServiceId, Slot, StaffId};
use chrono::NaiveDate;
use std::future::Future;

/// Read access to open slots for a service on a date.
///
/// # Contract
///
/// - `date` is the viewer's *local* calendar date; slot rows are keyed by a
///   plain date column and must never be queried with a UTC-shifted date
/// - Only slots with `is_available = true` are returned
/// - Ordered by start time, ascending
/// - Each slot carries the staff display name, resolved by the backend join
/// - An empty result (no slots that day) is valid, not an error
pub trait AvailabilityReader: Send + Sync {
    /// Fetch open slots for the service on the date, optionally restricted
    /// to one staff member.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure. Callers degrade
    /// this to "no slots" rather than surfacing it.
    fn open_slots(
        &self,
        service: ServiceId,
        date: NaiveDate,
        staff: Option<StaffId>,
    ) -> impl Future<Output = Result<Vec<Slot>>> + Send;
}
