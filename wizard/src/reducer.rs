//! The booking wizard reducer.
//!
//! Implements the four-step controller (service → date → time → confirm),
//! the downstream-invalidation rules, the conflict annotations, and the
//! dual-path checkout dispatch. All I/O is described as effects; the
//! reducer itself never awaits.

use crate::actions::WizardAction;
use crate::environment::WizardEnvironment;
use crate::providers::{
    AvailabilityReader, BookingsReader, CatalogReader, CheckoutClient, OrgReader,
};
use crate::state::{Navigation, Step, WizardState};
use crate::types::{local_today, BookingPayload, PaymentMethodChoice, Service};
use bookflow_core::effect::Effect;
use bookflow_core::environment::Clock;
use bookflow_core::reducer::{Effects, Reducer};
use bookflow_core::smallvec;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Reducer for the booking wizard.
///
/// Generic over the provider implementations so the same logic runs against
/// the REST backend in production and mocks in tests.
pub struct WizardReducer<Cat, Avail, Book, Check, Org, Clk> {
    _phantom: PhantomData<fn() -> (Cat, Avail, Book, Check, Org, Clk)>,
}

impl<Cat, Avail, Book, Check, Org, Clk> WizardReducer<Cat, Avail, Book, Check, Org, Clk> {
    /// Create a new wizard reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<Cat, Avail, Book, Check, Org, Clk> Default
    for WizardReducer<Cat, Avail, Book, Check, Org, Clk>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Cat, Avail, Book, Check, Org, Clk> Clone
    for WizardReducer<Cat, Avail, Book, Check, Org, Clk>
{
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<Cat, Avail, Book, Check, Org, Clk> Reducer
    for WizardReducer<Cat, Avail, Book, Check, Org, Clk>
where
    Cat: CatalogReader + Clone + Send + Sync + 'static,
    Avail: AvailabilityReader + Clone + Send + Sync + 'static,
    Book: BookingsReader + Clone + Send + Sync + 'static,
    Check: CheckoutClient + Clone + Send + Sync + 'static,
    Org: OrgReader + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment<Cat, Avail, Book, Check, Org, Clk>;

    #[allow(clippy::too_many_lines)] // one arm per action keeps the flow legible
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            WizardAction::Start => start_effects(state, env),

            WizardAction::CatalogLoaded { services } => {
                state.catalog = services;
                state.catalog_loaded = true;
                apply_seed(state);
                smallvec![Effect::None]
            },

            WizardAction::SelectService { id } => {
                state.manually_chosen = true;
                // A manual choice invalidates any pending auto-advance.
                state.seed_consumed = true;

                let Some(service) = state.catalog.iter().find(|s| s.id == id).cloned() else {
                    tracing::warn!(service = %id, "selected service not in catalog, ignoring");
                    return smallvec![Effect::None];
                };

                let previous = state
                    .step
                    .service()
                    .map(|s| s.id)
                    .or(state.memory.service.as_ref().map(|s| s.id));
                if previous != Some(id) {
                    // Different service invalidates downstream choices.
                    state.memory.date = None;
                    state.memory.slot = None;
                }

                state.memory.service = Some(service.clone());
                leave_time_step(state);
                state.step = Step::Date { service };
                smallvec![Effect::None]
            },

            WizardAction::SelectDate { date } => {
                let service = match &state.step {
                    Step::Date { service } | Step::Time { service, .. } => service.clone(),
                    _ => {
                        tracing::debug!("date selected outside the date step, ignoring");
                        return smallvec![Effect::None];
                    },
                };

                let today = local_today(&env.clock, state.session.utc_offset);
                if date < today {
                    tracing::debug!(%date, %today, "past date selected, ignoring");
                    return smallvec![Effect::None];
                }

                if state.memory.date != Some(date) {
                    // Different date invalidates the remembered slot.
                    state.memory.slot = None;
                }
                state.memory.date = Some(date);

                enter_time_step(state, env, &service, date)
            },

            WizardAction::SelectSlot { id } => {
                let (service, date) = match &state.step {
                    Step::Time { service, date } => (service.clone(), *date),
                    _ => {
                        tracing::debug!("slot selected outside the time step, ignoring");
                        return smallvec![Effect::None];
                    },
                };

                // Conflict-flagged slots stay selectable; double-booking
                // rules are enforced server-side.
                let Some(slot) = state
                    .slots
                    .iter()
                    .find(|s| s.id == id && s.is_available)
                    .cloned()
                else {
                    tracing::warn!(slot = %id, "selected slot not open, ignoring");
                    return smallvec![Effect::None];
                };

                state.memory.slot = Some(slot.clone());
                state.step = Step::Confirm {
                    service,
                    date,
                    slot,
                };
                smallvec![Effect::None]
            },

            WizardAction::GoBack => {
                match state.step.clone() {
                    Step::Confirm {
                        service,
                        date,
                        slot,
                    } => {
                        state.memory.slot = Some(slot);
                        state.step = Step::Time { service, date };
                    },
                    Step::Time { service, date } => {
                        state.memory.date = Some(date);
                        leave_time_step(state);
                        state.step = Step::Date { service };
                    },
                    Step::Date { service } => {
                        state.memory.service = Some(service);
                        state.step = Step::Service;
                    },
                    Step::Service => {},
                }
                smallvec![Effect::None]
            },

            WizardAction::SetPaymentMethod { method } => {
                state.payment_method = method;
                smallvec![Effect::None]
            },

            WizardAction::Confirm => confirm_effects(state, env),

            WizardAction::SlotsLoaded { epoch, slots } => {
                if epoch == state.fetch_epoch {
                    state.slots = slots;
                    state.slots_loaded = true;
                } else {
                    tracing::debug!(epoch, current = state.fetch_epoch, "stale slots discarded");
                }
                smallvec![Effect::None]
            },

            WizardAction::OwnBookingsLoaded { epoch, held } => {
                if epoch == state.fetch_epoch {
                    state.conflicts = held;
                    state.conflicts_loaded = true;
                } else {
                    tracing::debug!(
                        epoch,
                        current = state.fetch_epoch,
                        "stale conflict annotations discarded"
                    );
                }
                smallvec![Effect::None]
            },

            WizardAction::OrgLoaded { branding } => {
                state.org_banner = branding;
                smallvec![Effect::None]
            },

            WizardAction::BookingCreated => {
                state.navigation = Some(Navigation::Success {
                    method: PaymentMethodChoice::OnSite,
                });
                state.reset_selection();
                smallvec![Effect::None]
            },

            WizardAction::CheckoutSessionCreated { url } => {
                state.submitting = false;
                state.navigation = Some(Navigation::ExternalCheckout { url });
                smallvec![Effect::None]
            },

            WizardAction::SubmissionFailed { message } => {
                state.submitting = false;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            WizardAction::NavigationConsumed => {
                state.navigation = None;
                smallvec![Effect::None]
            },
        }
    }
}

/// Effects for wizard mount: catalog fetch, plus org branding when seeded.
fn start_effects<Cat, Avail, Book, Check, Org, Clk>(
    state: &WizardState,
    env: &WizardEnvironment<Cat, Avail, Book, Check, Org, Clk>,
) -> Effects<WizardAction>
where
    Cat: CatalogReader + Clone + Send + Sync + 'static,
    Avail: AvailabilityReader + Clone,
    Book: BookingsReader + Clone,
    Check: CheckoutClient + Clone,
    Org: OrgReader + Clone + Send + Sync + 'static,
    Clk: Clock + Clone,
{
    let catalog = env.catalog.clone();
    let mut effects: Effects<WizardAction> = smallvec![Effect::future(async move {
        match catalog.active_services().await {
            Ok(services) => Some(WizardAction::CatalogLoaded { services }),
            Err(err) => {
                tracing::warn!(error = %err, "catalog fetch failed, degrading to empty");
                Some(WizardAction::CatalogLoaded {
                    services: Vec::new(),
                })
            },
        }
    })];

    if let Some(org_id) = state.seed.as_ref().and_then(|s| s.org) {
        let org = env.org.clone();
        effects.push(Effect::future(async move {
            match org.branding(org_id).await {
                Ok(branding) => Some(WizardAction::OrgLoaded {
                    branding: Some(branding),
                }),
                Err(err) => {
                    // Cosmetic banner only; silently absent on failure.
                    tracing::debug!(error = %err, org = %org_id, "org branding fetch failed");
                    Some(WizardAction::OrgLoaded { branding: None })
                },
            }
        }));
    }

    effects
}

/// Auto-advance from the service step when a seeded service is present.
///
/// Fires at most once, and never after a manual choice.
fn apply_seed(state: &mut WizardState) {
    if state.seed_consumed || state.manually_chosen {
        return;
    }
    if !matches!(state.step, Step::Service) {
        return;
    }
    let Some(seeded) = state.seed.as_ref().and_then(|s| s.service) else {
        return;
    };

    state.seed_consumed = true;
    match state.catalog.iter().find(|s| s.id == seeded).cloned() {
        Some(service) => {
            tracing::debug!(service = %service.id, "auto-advancing from seeded service");
            state.memory.service = Some(service.clone());
            state.step = Step::Date { service };
        },
        None => {
            tracing::warn!(service = %seeded, "seeded service not in catalog");
        },
    }
}

/// Enter the time step: bump the fetch epoch and issue both reads.
fn enter_time_step<Cat, Avail, Book, Check, Org, Clk>(
    state: &mut WizardState,
    env: &WizardEnvironment<Cat, Avail, Book, Check, Org, Clk>,
    service: &Service,
    date: NaiveDate,
) -> Effects<WizardAction>
where
    Cat: CatalogReader + Clone,
    Avail: AvailabilityReader + Clone + Send + Sync + 'static,
    Book: BookingsReader + Clone + Send + Sync + 'static,
    Check: CheckoutClient + Clone,
    Org: OrgReader + Clone,
    Clk: Clock + Clone,
{
    leave_time_step(state);
    state.step = Step::Time {
        service: service.clone(),
        date,
    };

    let epoch = state.fetch_epoch;
    let availability = env.availability.clone();
    let service_id = service.id;
    let staff = state.staff_filter;

    let slots_fetch = Effect::future(async move {
        match availability.open_slots(service_id, date, staff).await {
            Ok(slots) => Some(WizardAction::SlotsLoaded { epoch, slots }),
            Err(err) => {
                tracing::warn!(error = %err, "availability fetch failed, degrading to no slots");
                Some(WizardAction::SlotsLoaded {
                    epoch,
                    slots: Vec::new(),
                })
            },
        }
    });

    let conflicts_fetch = match state.session.user {
        Some(user) => {
            let bookings = env.bookings.clone();
            Effect::future(async move {
                match bookings.slots_held_on(user, date).await {
                    Ok(held) => Some(WizardAction::OwnBookingsLoaded { epoch, held }),
                    Err(err) => {
                        tracing::warn!(error = %err, "own-bookings fetch failed, degrading to no conflicts");
                        Some(WizardAction::OwnBookingsLoaded {
                            epoch,
                            held: HashSet::new(),
                        })
                    },
                }
            })
        },
        None => {
            // Anonymous viewers hold no bookings.
            state.conflicts_loaded = true;
            Effect::None
        },
    };

    // Independent reads; either may resolve first, and slots render before
    // conflict annotations without blocking selection.
    smallvec![Effect::Parallel(vec![slots_fetch, conflicts_fetch])]
}

/// Invalidate in-flight time-step reads and clear their results.
fn leave_time_step(state: &mut WizardState) {
    state.fetch_epoch += 1;
    state.slots.clear();
    state.slots_loaded = false;
    state.conflicts.clear();
    state.conflicts_loaded = false;
}

/// Confirm-time guards and checkout dispatch.
fn confirm_effects<Cat, Avail, Book, Check, Org, Clk>(
    state: &mut WizardState,
    env: &WizardEnvironment<Cat, Avail, Book, Check, Org, Clk>,
) -> Effects<WizardAction>
where
    Cat: CatalogReader + Clone,
    Avail: AvailabilityReader + Clone,
    Book: BookingsReader + Clone,
    Check: CheckoutClient + Clone + Send + Sync + 'static,
    Org: OrgReader + Clone,
    Clk: Clock + Clone,
{
    // Read-only preview mode disables checkout entirely; checked first so
    // no network call is ever issued.
    if state.session.impersonating {
        tracing::debug!("impersonation session, confirm is a no-op");
        return smallvec![Effect::None];
    }

    let Step::Confirm {
        service,
        date,
        slot,
    } = state.step.clone()
    else {
        tracing::debug!("confirm outside the confirm step, ignoring");
        return smallvec![Effect::None];
    };

    if state.session.user.is_none() {
        // The shell navigates to the login page; the in-memory selection is
        // abandoned with the page.
        let url = format!(
            "{}?redirect={}",
            state.session.login_path,
            urlencoding::encode(&state.session.booking_path)
        );
        state.navigation = Some(Navigation::Login { url });
        return smallvec![Effect::None];
    }

    if state.submitting {
        tracing::debug!("submission already in flight, ignoring confirm");
        return smallvec![Effect::None];
    }

    state.submitting = true;
    state.last_error = None;

    let payload = BookingPayload {
        service_id: service.id,
        slot_id: slot.id,
        date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        duration_minutes: service.duration_minutes,
        location: slot.location.clone(),
        coach_id: slot.staff_id,
        org_id: state.seed.as_ref().and_then(|s| s.org),
    };

    let checkout = env.checkout.clone();
    match state.payment_method {
        PaymentMethodChoice::OnSite => smallvec![Effect::future(async move {
            match checkout.create_booking(payload).await {
                Ok(()) => Some(WizardAction::BookingCreated),
                Err(err) => {
                    tracing::warn!(error = %err, "booking creation failed");
                    Some(WizardAction::SubmissionFailed {
                        message: err.user_message(),
                    })
                },
            }
        })],
        PaymentMethodChoice::Online => smallvec![Effect::future(async move {
            match checkout.create_checkout_session(payload).await {
                Ok(session) => Some(WizardAction::CheckoutSessionCreated { url: session.url }),
                Err(err) => {
                    tracing::warn!(error = %err, "checkout session creation failed");
                    Some(WizardAction::SubmissionFailed {
                        message: err.user_message(),
                    })
                },
            }
        })],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mocks::{MockAvailability, MockBookings, MockCatalog, MockCheckout, MockOrg};
    use crate::state::{SessionContext, WizardSeed};
    use crate::types::{Money, ServiceId, Slot, SlotId, StaffId, UserId};
    use bookflow_testing::assertions::{assert_has_future_effect, assert_no_effects};
    use bookflow_testing::{test_clock, FixedClock, ReducerTest};
    use chrono::NaiveTime;

    type TestEnv = WizardEnvironment<
        MockCatalog,
        MockAvailability,
        MockBookings,
        MockCheckout,
        MockOrg,
        FixedClock,
    >;

    type TestReducer = WizardReducer<
        MockCatalog,
        MockAvailability,
        MockBookings,
        MockCheckout,
        MockOrg,
        FixedClock,
    >;

    fn env() -> TestEnv {
        WizardEnvironment::new(
            MockCatalog::default(),
            MockAvailability::default(),
            MockBookings::default(),
            MockCheckout::default(),
            MockOrg::default(),
            test_clock(),
        )
    }

    fn massage() -> Service {
        Service {
            id: ServiceId::new(),
            name: "Deep Tissue Massage".into(),
            price: Money::from_minor(6500),
            duration_minutes: 60,
            category: Some("Wellness".into()),
            max_participants: 1,
            active: true,
        }
    }

    fn slot_for(service: &Service, date: NaiveDate) -> Slot {
        Slot {
            id: SlotId::new(),
            staff_id: StaffId::new(),
            staff_name: "Dana".into(),
            service_id: service.id,
            date,
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            location: "Studio A".into(),
            capacity: 1,
            current_bookings: 0,
            is_available: true,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_confirm(service: Service, day: NaiveDate, slot: Slot) -> WizardState {
        let mut state = WizardState::new(SessionContext::authenticated(UserId::new()));
        state.catalog = vec![service.clone()];
        state.step = Step::Confirm {
            service,
            date: day,
            slot,
        };
        state
    }

    #[test]
    fn start_fetches_catalog() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(WizardState::new(SessionContext::anonymous()))
            .when_action(WizardAction::Start)
            .then_effects(|effects| assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn seeded_service_auto_advances_once() {
        let service = massage();
        let seed = WizardSeed {
            service: Some(service.id),
            staff: None,
            org: None,
        };
        let mut state = WizardState::seeded(SessionContext::anonymous(), seed);

        let reducer = TestReducer::new();
        let env = env();
        reducer.reduce(
            &mut state,
            WizardAction::CatalogLoaded {
                services: vec![service.clone()],
            },
            &env,
        );
        assert!(matches!(&state.step, Step::Date { service: s } if s.id == service.id));
        assert!(state.seed_consumed);

        // A later catalog refresh must not re-advance.
        state.step = Step::Service;
        reducer.reduce(
            &mut state,
            WizardAction::CatalogLoaded {
                services: vec![service],
            },
            &env,
        );
        assert!(matches!(state.step, Step::Service));
    }

    #[test]
    fn seeded_service_missing_from_catalog_stays_on_service_step() {
        let seed = WizardSeed {
            service: Some(ServiceId::new()),
            staff: None,
            org: None,
        };
        let mut state = WizardState::seeded(SessionContext::anonymous(), seed);
        TestReducer::new().reduce(
            &mut state,
            WizardAction::CatalogLoaded {
                services: vec![massage()],
            },
            &env(),
        );
        assert!(matches!(state.step, Step::Service));
        assert!(state.seed_consumed);
    }

    #[test]
    fn manual_choice_beats_seed() {
        let seeded = massage();
        let chosen = massage();
        let seed = WizardSeed {
            service: Some(seeded.id),
            staff: None,
            org: None,
        };
        let mut state = WizardState::seeded(SessionContext::anonymous(), seed);
        state.catalog = vec![seeded, chosen.clone()];

        let reducer = TestReducer::new();
        let env = env();
        reducer.reduce(
            &mut state,
            WizardAction::SelectService { id: chosen.id },
            &env,
        );
        assert!(matches!(&state.step, Step::Date { service } if service.id == chosen.id));
        assert!(state.seed_consumed);
    }

    #[test]
    fn selecting_unknown_service_is_ignored() {
        let mut state = WizardState::new(SessionContext::anonymous());
        state.catalog = vec![massage()];
        TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectService {
                id: ServiceId::new(),
            },
            &env(),
        );
        assert!(matches!(state.step, Step::Service));
    }

    #[test]
    fn different_service_clears_downstream_memory() {
        let first = massage();
        let second = massage();
        let mut state = WizardState::new(SessionContext::anonymous());
        state.catalog = vec![first.clone(), second.clone()];
        state.memory.service = Some(first);
        state.memory.date = Some(date(2026, 3, 10));
        state.memory.slot = Some(slot_for(&second, date(2026, 3, 10)));

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectService { id: second.id },
            &env(),
        );
        assert!(state.memory.date.is_none());
        assert!(state.memory.slot.is_none());
    }

    #[test]
    fn same_service_preserves_downstream_memory() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = WizardState::new(SessionContext::anonymous());
        state.catalog = vec![service.clone()];
        state.step = Step::Date {
            service: service.clone(),
        };
        state.memory.service = Some(service.clone());
        state.memory.date = Some(day);
        state.memory.slot = Some(slot);

        let reducer = TestReducer::new();
        let env = env();
        reducer.reduce(&mut state, WizardAction::GoBack, &env);
        assert!(matches!(state.step, Step::Service));

        reducer.reduce(&mut state, WizardAction::SelectService { id: service.id }, &env);
        assert_eq!(state.memory.date, Some(day));
        assert!(state.memory.slot.is_some());
    }

    #[test]
    fn past_date_is_rejected() {
        let service = massage();
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Date {
            service: service.clone(),
        };

        // Clock is fixed at 2026-03-01T12:00:00Z.
        let effects = TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectDate {
                date: date(2026, 2, 28),
            },
            &env(),
        );
        assert!(matches!(state.step, Step::Date { .. }));
        assert_no_effects(&effects);
    }

    #[test]
    fn today_is_selectable() {
        let service = massage();
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Date { service };

        let effects = TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectDate {
                date: date(2026, 3, 1),
            },
            &env(),
        );
        assert!(matches!(state.step, Step::Time { .. }));
        assert_has_future_effect(&effects);
    }

    #[test]
    fn date_selection_bumps_epoch_and_clears_slots() {
        let service = massage();
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Time {
            service: service.clone(),
            date: date(2026, 3, 10),
        };
        state.slots = vec![slot_for(&service, date(2026, 3, 10))];
        state.slots_loaded = true;
        let epoch_before = state.fetch_epoch;

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectDate {
                date: date(2026, 3, 11),
            },
            &env(),
        );
        assert_eq!(state.fetch_epoch, epoch_before + 1);
        assert!(state.slots.is_empty());
        assert!(!state.slots_loaded);
    }

    #[test]
    fn anonymous_viewer_skips_conflict_fetch() {
        let service = massage();
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Date { service };

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectDate {
                date: date(2026, 3, 10),
            },
            &env(),
        );
        assert!(state.conflicts_loaded);
        assert!(state.conflicts.is_empty());
    }

    #[test]
    fn stale_slots_are_discarded() {
        let service = massage();
        let day = date(2026, 3, 10);
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Time {
            service: service.clone(),
            date: day,
        };
        state.fetch_epoch = 3;

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SlotsLoaded {
                epoch: 2,
                slots: vec![slot_for(&service, day)],
            },
            &env(),
        );
        assert!(state.slots.is_empty());
        assert!(!state.slots_loaded);
    }

    #[test]
    fn current_epoch_slots_are_applied() {
        let service = massage();
        let day = date(2026, 3, 10);
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Time {
            service: service.clone(),
            date: day,
        };
        state.fetch_epoch = 3;

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SlotsLoaded {
                epoch: 3,
                slots: vec![slot_for(&service, day)],
            },
            &env(),
        );
        assert_eq!(state.slots.len(), 1);
        assert!(state.slots_loaded);
    }

    #[test]
    fn conflicting_slot_stays_selectable() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = WizardState::new(SessionContext::authenticated(UserId::new()));
        state.step = Step::Time {
            service,
            date: day,
        };
        state.slots = vec![slot.clone()];
        state.conflicts.insert(slot.id);

        TestReducer::new().reduce(&mut state, WizardAction::SelectSlot { id: slot.id }, &env());
        assert!(matches!(state.step, Step::Confirm { .. }));
    }

    #[test]
    fn unknown_slot_is_ignored() {
        let service = massage();
        let day = date(2026, 3, 10);
        let mut state = WizardState::new(SessionContext::anonymous());
        state.step = Step::Time {
            service,
            date: day,
        };

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SelectSlot { id: SlotId::new() },
            &env(),
        );
        assert!(matches!(state.step, Step::Time { .. }));
    }

    #[test]
    fn go_back_remembers_each_step() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service.clone(), day, slot.clone());

        let reducer = TestReducer::new();
        let env = env();

        reducer.reduce(&mut state, WizardAction::GoBack, &env);
        assert!(matches!(state.step, Step::Time { .. }));
        assert_eq!(state.memory.slot.as_ref().map(|s| s.id), Some(slot.id));

        reducer.reduce(&mut state, WizardAction::GoBack, &env);
        assert!(matches!(state.step, Step::Date { .. }));
        assert_eq!(state.memory.date, Some(day));

        reducer.reduce(&mut state, WizardAction::GoBack, &env);
        assert!(matches!(state.step, Step::Service));
        assert_eq!(state.memory.service.as_ref().map(|s| s.id), Some(service.id));

        // Back on the first step, back is a no-op.
        reducer.reduce(&mut state, WizardAction::GoBack, &env);
        assert!(matches!(state.step, Step::Service));
    }

    #[test]
    fn unauthenticated_confirm_redirects_to_login() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.session = SessionContext::anonymous();

        let effects = TestReducer::new().reduce(&mut state, WizardAction::Confirm, &env());
        assert_no_effects(&effects);
        assert!(!state.submitting);
        match &state.navigation {
            Some(Navigation::Login { url }) => {
                assert_eq!(url, "/login?redirect=%2Fbooking");
            },
            other => panic!("expected login navigation, got {other:?}"),
        }
    }

    #[test]
    fn impersonation_confirm_is_inert() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.session = SessionContext::authenticated(UserId::new()).impersonating();

        let effects = TestReducer::new().reduce(&mut state, WizardAction::Confirm, &env());
        assert_no_effects(&effects);
        assert!(!state.submitting);
        assert!(state.navigation.is_none());
    }

    #[test]
    fn confirm_while_submitting_is_ignored() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.submitting = true;

        let effects = TestReducer::new().reduce(&mut state, WizardAction::Confirm, &env());
        assert_no_effects(&effects);
    }

    #[test]
    fn confirm_dispatches_checkout_and_marks_submitting() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.last_error = Some("old".into());

        let effects = TestReducer::new().reduce(&mut state, WizardAction::Confirm, &env());
        assert_has_future_effect(&effects);
        assert!(state.submitting);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn booking_created_resets_and_navigates() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.submitting = true;

        TestReducer::new().reduce(&mut state, WizardAction::BookingCreated, &env());
        assert!(matches!(
            state.navigation,
            Some(Navigation::Success {
                method: PaymentMethodChoice::OnSite
            })
        ));
        assert!(matches!(state.step, Step::Service));
        assert!(!state.submitting);
        assert!(state.memory.slot.is_none());
        // Catalog survives the reset.
        assert_eq!(state.catalog.len(), 1);
    }

    #[test]
    fn checkout_session_navigates_without_reset() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.submitting = true;

        TestReducer::new().reduce(
            &mut state,
            WizardAction::CheckoutSessionCreated {
                url: "https://checkout.gateway.example/session/123".into(),
            },
            &env(),
        );
        assert!(matches!(
            state.navigation,
            Some(Navigation::ExternalCheckout { .. })
        ));
        // Selection survives in case the hosted page is abandoned.
        assert!(matches!(state.step, Step::Confirm { .. }));
        assert!(!state.submitting);
    }

    #[test]
    fn submission_failure_surfaces_verbatim_message() {
        let service = massage();
        let day = date(2026, 3, 10);
        let slot = slot_for(&service, day);
        let mut state = at_confirm(service, day, slot);
        state.submitting = true;

        TestReducer::new().reduce(
            &mut state,
            WizardAction::SubmissionFailed {
                message: "Slot no longer available".into(),
            },
            &env(),
        );
        assert!(!state.submitting);
        assert_eq!(state.last_error.as_deref(), Some("Slot no longer available"));
        // Stays on the confirm step so the user can retry or go back.
        assert!(matches!(state.step, Step::Confirm { .. }));
    }

    #[test]
    fn navigation_consumed_clears_intent() {
        let mut state = WizardState::new(SessionContext::anonymous());
        state.navigation = Some(Navigation::Success {
            method: PaymentMethodChoice::OnSite,
        });
        TestReducer::new().reduce(&mut state, WizardAction::NavigationConsumed, &env());
        assert!(state.navigation.is_none());
    }
}
