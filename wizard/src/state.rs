//! Booking wizard state types.
//!
//! The wizard step is a tagged union: each variant carries only the data
//! that is valid at that stage, so stale downstream choices cannot exist by
//! construction. A separate [`StepMemory`] remembers forward choices across
//! back-navigation so re-advancing through unchanged selections restores
//! them.

use crate::types::{
    OrgBranding, OrgId, PaymentMethodChoice, Service, ServiceId, Slot, SlotId, StaffId, UserId,
};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ambient viewer context, injected at wizard construction.
///
/// Explicit dependency injection rather than a global: the impersonation
/// guard and the timezone offset are both testable with a constructed
/// session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Authenticated user, if any.
    pub user: Option<UserId>,
    /// Staff previewing another user's view. Disables checkout entirely.
    pub impersonating: bool,
    /// The viewer's UTC offset, used for local-calendar-date math.
    #[serde(with = "crate::types::offset_seconds")]
    pub utc_offset: FixedOffset,
    /// Path of the booking page, used as the login return path.
    pub booking_path: String,
    /// Path of the login page, target of the unauthenticated redirect.
    pub login_path: String,
}

impl SessionContext {
    /// Session for an authenticated, non-impersonating viewer in UTC.
    #[must_use]
    pub fn authenticated(user: UserId) -> Self {
        Self {
            user: Some(user),
            impersonating: false,
            utc_offset: Utc.fix(),
            booking_path: "/booking".to_string(),
            login_path: "/login".to_string(),
        }
    }

    /// Anonymous session in UTC.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user: None,
            ..Self::authenticated(UserId::new())
        }
    }

    /// Replace the UTC offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Mark the session as an impersonation preview.
    #[must_use]
    pub const fn impersonating(mut self) -> Self {
        self.impersonating = true;
        self
    }
}

/// Pre-seeded context from the booking page's URL query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSeed {
    /// Service to preselect once the catalog loads.
    pub service: Option<ServiceId>,
    /// Restrict slot queries to this staff member.
    pub staff: Option<StaffId>,
    /// Organization context for the cosmetic banner.
    pub org: Option<OrgId>,
}

/// Current wizard step.
///
/// Transitions forward by selection, backward by [`crate::actions::WizardAction::GoBack`].
/// The `Confirm` variant's shape guarantees a full selection: the checkout
/// dispatcher cannot run against a partial one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Choosing a service.
    Service,
    /// Choosing a date for the chosen service.
    Date {
        /// Chosen service.
        service: Service,
    },
    /// Choosing a time slot.
    Time {
        /// Chosen service.
        service: Service,
        /// Chosen calendar date.
        date: NaiveDate,
    },
    /// Reviewing the full selection before checkout.
    Confirm {
        /// Chosen service.
        service: Service,
        /// Chosen calendar date.
        date: NaiveDate,
        /// Chosen slot.
        slot: Slot,
    },
}

impl Step {
    /// The service chosen so far, if any.
    #[must_use]
    pub const fn service(&self) -> Option<&Service> {
        match self {
            Self::Service => None,
            Self::Date { service }
            | Self::Time { service, .. }
            | Self::Confirm { service, .. } => Some(service),
        }
    }

    /// The date chosen so far, if any.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Service | Self::Date { .. } => None,
            Self::Time { date, .. } | Self::Confirm { date, .. } => Some(*date),
        }
    }
}

/// Forward choices remembered across back-navigation.
///
/// Back transitions never clear forward state; re-advancing through an
/// unchanged selection restores it. Forward-progressing through a
/// *different* selection clears everything downstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepMemory {
    /// Service remembered after backing out to the service step.
    pub service: Option<Service>,
    /// Date remembered after backing out of the time step.
    pub date: Option<NaiveDate>,
    /// Slot remembered after backing out of the confirm step.
    pub slot: Option<Slot>,
}

/// Where the imperative shell should navigate next.
///
/// The reducer never performs navigation; it records the intent and the
/// shell observes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    /// Redirect to login, preserving the booking page as return path.
    Login {
        /// Login URL including the encoded return path.
        url: String,
    },
    /// Booking completed; go to the success page.
    Success {
        /// Which fulfillment path completed.
        method: PaymentMethodChoice,
    },
    /// Full-page redirect to the payment gateway's hosted checkout.
    ExternalCheckout {
        /// Hosted checkout URL.
        url: String,
    },
}

/// Root state for the booking wizard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// Viewer session, injected at construction.
    pub session: SessionContext,
    /// Current step.
    pub step: Step,
    /// Forward choices surviving back-navigation.
    pub memory: StepMemory,

    /// Active services, ordered by name. Empty until loaded (or on a
    /// degraded read).
    pub catalog: Vec<Service>,
    /// Whether the catalog fetch has resolved (possibly to empty).
    pub catalog_loaded: bool,

    /// Open slots for the current (service, date). Ordered by start time.
    pub slots: Vec<Slot>,
    /// Whether the availability fetch for the current epoch has resolved.
    pub slots_loaded: bool,

    /// Slot ids the viewer already holds on the selected date.
    ///
    /// Additive annotation only: flagged slots stay visible and selectable;
    /// double-booking rules are enforced server-side.
    pub conflicts: HashSet<SlotId>,
    /// Whether the own-bookings fetch for the current epoch has resolved.
    pub conflicts_loaded: bool,

    /// Version stamp for in-flight time-step reads. Responses carrying a
    /// stale epoch are discarded.
    pub fetch_epoch: u64,

    /// Payment-path toggle on the confirm step.
    pub payment_method: PaymentMethodChoice,
    /// Fire-once guard: a submission is in flight.
    pub submitting: bool,
    /// Message for the non-blocking error notification, if any.
    pub last_error: Option<String>,
    /// Pending navigation intent for the shell.
    pub navigation: Option<Navigation>,

    /// URL-seeded context.
    pub seed: Option<WizardSeed>,
    /// The one-shot auto-advance has fired (or been invalidated).
    pub seed_consumed: bool,
    /// Manual service choice happened before the catalog loaded.
    pub manually_chosen: bool,
    /// Staff filter applied to slot queries.
    pub staff_filter: Option<StaffId>,

    /// Branding for the cosmetic org banner, when resolved.
    pub org_banner: Option<OrgBranding>,
}

impl WizardState {
    /// Fresh wizard for the given session, without URL seeding.
    #[must_use]
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            step: Step::Service,
            memory: StepMemory::default(),
            catalog: Vec::new(),
            catalog_loaded: false,
            slots: Vec::new(),
            slots_loaded: false,
            conflicts: HashSet::new(),
            conflicts_loaded: false,
            fetch_epoch: 0,
            payment_method: PaymentMethodChoice::default(),
            submitting: false,
            last_error: None,
            navigation: None,
            seed: None,
            seed_consumed: false,
            manually_chosen: false,
            staff_filter: None,
            org_banner: None,
        }
    }

    /// Fresh wizard with URL-seeded context.
    #[must_use]
    pub fn seeded(session: SessionContext, seed: WizardSeed) -> Self {
        let staff_filter = seed.staff;
        Self {
            seed: Some(seed),
            staff_filter,
            ..Self::new(session)
        }
    }

    /// Reset the selection after a completed booking.
    ///
    /// Keeps the session, catalog, org banner, and any navigation intent;
    /// re-entering the wizard starts from a fresh selection.
    pub fn reset_selection(&mut self) {
        self.step = Step::Service;
        self.memory = StepMemory::default();
        self.slots.clear();
        self.slots_loaded = false;
        self.conflicts.clear();
        self.conflicts_loaded = false;
        self.fetch_epoch += 1;
        self.payment_method = PaymentMethodChoice::default();
        self.submitting = false;
        self.last_error = None;
        // No further auto-advance after a completed flow.
        self.seed_consumed = true;
    }

    /// Returns `true` when the given slot is one the viewer already holds.
    #[must_use]
    pub fn is_conflict(&self, slot: SlotId) -> bool {
        self.conflicts.contains(&slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Money;

    fn service() -> Service {
        Service {
            id: ServiceId::new(),
            name: "Private training".to_string(),
            price: Money::from_minor(7500),
            duration_minutes: 60,
            category: None,
            max_participants: 1,
            active: true,
        }
    }

    #[test]
    fn confirm_variant_requires_full_selection() {
        // The type makes partial confirm unrepresentable; this documents the
        // accessors along the way.
        let svc = service();
        let step = Step::Date {
            service: svc.clone(),
        };
        assert_eq!(step.service().map(|s| s.id), Some(svc.id));
        assert_eq!(step.date(), None);
    }

    #[test]
    fn reset_keeps_catalog_and_session() {
        let mut state = WizardState::new(SessionContext::authenticated(UserId::new()));
        state.catalog = vec![service()];
        state.catalog_loaded = true;
        state.step = Step::Date { service: service() };
        state.last_error = Some("boom".to_string());

        state.reset_selection();

        assert_eq!(state.step, Step::Service);
        assert!(state.catalog_loaded);
        assert_eq!(state.catalog.len(), 1);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn seeded_state_applies_staff_filter() {
        let staff = StaffId::new();
        let state = WizardState::seeded(
            SessionContext::anonymous(),
            WizardSeed {
                service: Some(ServiceId::new()),
                staff: Some(staff),
                org: None,
            },
        );
        assert_eq!(state.staff_filter, Some(staff));
        assert!(!state.seed_consumed);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn session_offset_round_trips_as_seconds() {
        let session = SessionContext::anonymous()
            .with_offset(FixedOffset::west_opt(5 * 3600).unwrap());

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["utc_offset"], serde_json::json!(-18_000));

        let restored: SessionContext = serde_json::from_value(json).unwrap();
        assert_eq!(restored.utc_offset, session.utc_offset);
    }

    #[test]
    fn conflict_lookup() {
        let mut state = WizardState::new(SessionContext::anonymous());
        let slot = SlotId::new();
        state.conflicts.insert(slot);
        assert!(state.is_conflict(slot));
        assert!(!state.is_conflict(SlotId::new()));
    }
}
