//! Own-bookings reader trait (conflict annotations).

use crate::error::Result;
use crate::types::{SlotId, UserId};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::future::Future;

/// Read access to the viewer's own bookings on a date.
///
/// Feeds the conflict filter: slot ids the user already holds with status
/// `confirmed` or `pending`. Purely informational highlighting - it never
/// removes slots from the visible list and never blocks re-selection;
/// double-booking rules are enforced server-side.
pub trait BookingsReader: Send + Sync {
    /// Slot ids of the user's confirmed or pending bookings on the date.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure. Callers degrade
    /// this to "no conflicts" rather than surfacing it.
    fn slots_held_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<HashSet<SlotId>>> + Send;
}
