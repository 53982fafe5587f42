//! Actions processed by the booking wizard reducer.

use crate::types::{OrgBranding, PaymentMethodChoice, Service, ServiceId, Slot, SlotId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// All inputs to the wizard reducer: user commands and the feedback produced
/// by completed effects.
///
/// Commands come from the UI shell (a tap on a service card, the confirm
/// button). Feedback actions are produced by effects the reducer itself
/// scheduled (fetch results, submission outcomes). The reducer treats both
/// uniformly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WizardAction {
    // ========== Commands ==========
    /// Wizard mounted: load the catalog (and org branding when seeded).
    Start,

    /// User chose a service. Advances to the date step; a *different*
    /// service clears remembered date and slot.
    SelectService {
        /// Chosen service.
        id: ServiceId,
    },

    /// User chose a calendar date. Advances to the time step when the date
    /// is today or later (viewer-local); a *different* date clears the
    /// remembered slot.
    SelectDate {
        /// Chosen date (viewer-local calendar).
        date: NaiveDate,
    },

    /// User chose a time slot. Advances to the confirm step.
    SelectSlot {
        /// Chosen slot.
        id: SlotId,
    },

    /// Explicit back-navigation from the summary panel. Never clears
    /// forward memory.
    GoBack,

    /// Toggle between pay-on-site and pay-online before confirming.
    SetPaymentMethod {
        /// Selected fulfillment path.
        method: PaymentMethodChoice,
    },

    /// Confirm the full selection and dispatch checkout.
    Confirm,

    /// The shell consumed the pending navigation intent.
    NavigationConsumed,

    // ========== Effect feedback ==========
    /// Catalog fetch resolved (possibly degraded to empty).
    CatalogLoaded {
        /// Active services, ordered by name.
        services: Vec<Service>,
    },

    /// Availability fetch resolved for the given epoch.
    SlotsLoaded {
        /// Epoch the fetch was issued under.
        epoch: u64,
        /// Open slots ordered by start time (possibly degraded to empty).
        slots: Vec<Slot>,
    },

    /// Own-bookings fetch resolved for the given epoch.
    OwnBookingsLoaded {
        /// Epoch the fetch was issued under.
        epoch: u64,
        /// Slot ids the viewer already holds on the selected date.
        held: HashSet<SlotId>,
    },

    /// Org branding fetch resolved. `None` when the read failed (silently
    /// ignored; the banner simply does not render).
    OrgLoaded {
        /// Branding record, if resolved.
        branding: Option<OrgBranding>,
    },

    /// Pay-on-site booking was created.
    BookingCreated,

    /// Hosted-checkout session was created.
    CheckoutSessionCreated {
        /// Gateway redirect URL.
        url: String,
    },

    /// A write endpoint rejected the submission.
    SubmissionFailed {
        /// Human-readable message to surface verbatim.
        message: String,
    },
}
