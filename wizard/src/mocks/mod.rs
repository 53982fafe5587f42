//! In-memory provider doubles for testing.
//!
//! Every mock records its call count so tests can assert that guards (e.g.
//! the impersonation guard) issue no network calls at all.

mod availability;
mod bookings;
mod catalog;
mod checkout;
mod org;

pub use availability::MockAvailability;
pub use bookings::MockBookings;
pub use catalog::MockCatalog;
pub use checkout::MockCheckout;
pub use org::MockOrg;

use crate::error::WizardError;

/// Error used when a mock's lock is poisoned.
pub(crate) fn lock_error() -> WizardError {
    WizardError::Backend {
        message: "mock lock poisoned".to_string(),
    }
}
