//! End-to-end wizard flows driven through the store runtime.

#![allow(clippy::unwrap_used, clippy::panic)] // test code

use bookflow_runtime::Store;
use bookflow_testing::test_clock;
use bookflow_testing::FixedClock;
use bookflow_wizard::{
    mocks::{MockAvailability, MockBookings, MockCatalog, MockCheckout, MockOrg},
    Money, Navigation, PaymentMethodChoice, Service, ServiceId, SessionContext, Slot, SlotId,
    StaffId, Step, UserId, WizardAction, WizardEnvironment, WizardReducer, WizardState,
};
use chrono::{NaiveDate, NaiveTime};
use std::time::Duration;

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

type TestStore = Store<WizardState, WizardAction, TestEnv, TestReducer>;

const WAIT: Duration = Duration::from_secs(2);

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

fn march_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn afternoon_slot(service: &Service) -> Slot {
    Slot {
        id: SlotId::new(),
        staff_id: StaffId::new(),
        staff_name: "Dana".into(),
        service_id: service.id,
        date: march_10(),
        start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        location: "Studio A".into(),
        capacity: 1,
        current_bookings: 0,
        is_available: true,
    }
}

fn store_with(
    catalog: MockCatalog,
    availability: MockAvailability,
    bookings: MockBookings,
    checkout: MockCheckout,
    session: SessionContext,
) -> TestStore {
    let env = WizardEnvironment::new(
        catalog,
        availability,
        bookings,
        checkout,
        MockOrg::new(),
        test_clock(),
    );
    Store::new(WizardState::new(session), WizardReducer::new(), env)
}

/// Drive the wizard from mount to the confirm step.
async fn advance_to_confirm(store: &TestStore, service: &Service, slot: &Slot) {
    store
        .send(WizardAction::Start)
        .await
        .unwrap()
        .wait()
        .await;
    store
        .send(WizardAction::SelectService { id: service.id })
        .await
        .unwrap()
        .wait()
        .await;
    store
        .send(WizardAction::SelectDate { date: march_10() })
        .await
        .unwrap()
        .wait()
        .await;
    store
        .send(WizardAction::SelectSlot { id: slot.id })
        .await
        .unwrap()
        .wait()
        .await;

    let at_confirm = store
        .state(|s| matches!(s.step, Step::Confirm { .. }))
        .await;
    assert!(at_confirm, "expected wizard to reach the confirm step");
}

#[tokio::test]
async fn on_site_booking_flow() {
    let service = massage();
    let slot = afternoon_slot(&service);
    let checkout = MockCheckout::new();
    let store = store_with(
        MockCatalog::with_services(vec![service.clone()]),
        MockAvailability::with_slots(vec![slot.clone()]),
        MockBookings::new(),
        checkout.clone(),
        SessionContext::authenticated(UserId::new()),
    );

    advance_to_confirm(&store, &service, &slot).await;

    let outcome = store
        .send_and_wait_for(
            WizardAction::Confirm,
            |a| {
                matches!(
                    a,
                    WizardAction::BookingCreated | WizardAction::SubmissionFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, WizardAction::BookingCreated));

    store
        .state(|s| {
            assert!(matches!(
                s.navigation,
                Some(Navigation::Success {
                    method: PaymentMethodChoice::OnSite
                })
            ));
            // Selection resets for the next booking.
            assert!(matches!(s.step, Step::Service));
            assert!(!s.submitting);
        })
        .await;

    let created = checkout.created_bookings();
    assert_eq!(created.len(), 1);
    let payload = &created[0];
    assert_eq!(payload.service_id, service.id);
    assert_eq!(payload.slot_id, slot.id);
    assert_eq!(payload.date, march_10());
    assert_eq!(payload.start_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    assert_eq!(payload.end_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
    assert_eq!(payload.duration_minutes, 60);
    assert_eq!(payload.location, "Studio A");
    assert_eq!(payload.coach_id, slot.staff_id);
    assert!(payload.org_id.is_none());
}

#[tokio::test]
async fn online_checkout_flow() {
    let service = massage();
    let slot = afternoon_slot(&service);
    let checkout = MockCheckout::new();
    let store = store_with(
        MockCatalog::with_services(vec![service.clone()]),
        MockAvailability::with_slots(vec![slot.clone()]),
        MockBookings::new(),
        checkout.clone(),
        SessionContext::authenticated(UserId::new()),
    );

    advance_to_confirm(&store, &service, &slot).await;
    store
        .send(WizardAction::SetPaymentMethod {
            method: PaymentMethodChoice::Online,
        })
        .await
        .unwrap()
        .wait()
        .await;

    let outcome = store
        .send_and_wait_for(
            WizardAction::Confirm,
            |a| matches!(a, WizardAction::CheckoutSessionCreated { .. }),
            WAIT,
        )
        .await
        .unwrap();
    let WizardAction::CheckoutSessionCreated { url } = outcome else {
        panic!("expected a checkout session");
    };
    assert_eq!(url, "https://checkout.gateway.example/session/123");

    store
        .state(|s| {
            assert!(matches!(
                s.navigation,
                Some(Navigation::ExternalCheckout { .. })
            ));
            // Selection is kept in case the hosted page is abandoned.
            assert!(matches!(s.step, Step::Confirm { .. }));
            assert!(!s.submitting);
        })
        .await;

    assert_eq!(checkout.session_payloads().len(), 1);
    assert!(checkout.created_bookings().is_empty());
}

#[tokio::test]
async fn own_booking_is_annotated_but_selectable() {
    let user = UserId::new();
    let service = massage();
    let slot = afternoon_slot(&service);
    let bookings = MockBookings::new();
    bookings.hold(user, march_10(), slot.id);

    let store = store_with(
        MockCatalog::with_services(vec![service.clone()]),
        MockAvailability::with_slots(vec![slot.clone()]),
        bookings,
        MockCheckout::new(),
        SessionContext::authenticated(user),
    );

    store
        .send(WizardAction::Start)
        .await
        .unwrap()
        .wait()
        .await;
    store
        .send(WizardAction::SelectService { id: service.id })
        .await
        .unwrap()
        .wait()
        .await;
    store
        .send(WizardAction::SelectDate { date: march_10() })
        .await
        .unwrap()
        .wait()
        .await;

    store
        .state(|s| {
            assert!(s.slots_loaded);
            assert!(s.conflicts_loaded);
            assert!(s.is_conflict(slot.id));
        })
        .await;

    // Annotated, not blocked: the viewer may still pick it.
    store
        .send(WizardAction::SelectSlot { id: slot.id })
        .await
        .unwrap()
        .wait()
        .await;
    let at_confirm = store
        .state(|s| matches!(s.step, Step::Confirm { .. }))
        .await;
    assert!(at_confirm);
}

#[tokio::test]
async fn failed_reads_degrade_to_empty() {
    let store = store_with(
        MockCatalog::failing(),
        MockAvailability::failing(),
        MockBookings::new(),
        MockCheckout::new(),
        SessionContext::authenticated(UserId::new()),
    );

    store
        .send(WizardAction::Start)
        .await
        .unwrap()
        .wait()
        .await;
    store
        .state(|s| {
            assert!(s.catalog_loaded);
            assert!(s.catalog.is_empty());
        })
        .await;
}
