//! Drives the booking wizard against a live backend from the command line.
//!
//! Reads configuration from `BOOKFLOW_*` environment variables, mounts the
//! wizard, prints the service catalog, and walks the first bookable path it
//! finds up to the confirm step. No booking is submitted.
//!
//! ```sh
//! BOOKFLOW_BACKEND_URL=http://localhost:54321 \
//! BOOKFLOW_BACKEND_API_KEY=anon-key \
//! cargo run --example booking_demo
//! ```

use anyhow::{bail, Context};
use bookflow_core::environment::SystemClock;
use bookflow_runtime::Store;
use bookflow_wizard::providers::rest::RestBackend;
use bookflow_wizard::{
    Config, SessionContext, Step, WizardAction, WizardEnvironment, WizardReducer, WizardState,
};
use chrono::{Duration, Utc};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bookflow_wizard=debug".into()),
        )
        .init();

    let config = Config::from_env();
    let backend = RestBackend::new(&config.backend).context("building REST backend")?;

    let mut session = SessionContext::anonymous();
    session.booking_path = config.pages.booking_path.clone();
    session.login_path = config.pages.login_path.clone();

    let env = WizardEnvironment::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend,
        SystemClock,
    );
    let store = Store::new(WizardState::new(session), WizardReducer::new(), env);

    store.send(WizardAction::Start).await?.wait().await;

    let catalog = store.state(|s| s.catalog.clone()).await;
    if catalog.is_empty() {
        bail!("no active services found at {}", config.backend.base_url);
    }
    println!("Services:");
    for service in &catalog {
        println!(
            "  {} ({} min, {})",
            service.name, service.duration_minutes, service.price
        );
    }

    let first = catalog[0].clone();
    store
        .send(WizardAction::SelectService { id: first.id })
        .await?
        .wait()
        .await;

    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    store
        .send(WizardAction::SelectDate { date: tomorrow })
        .await?
        .wait()
        .await;

    let slots = store.state(|s| s.slots.clone()).await;
    println!("\nOpen slots for {} on {tomorrow}:", first.name);
    for slot in &slots {
        println!(
            "  {} - {} with {} at {}",
            slot.start_time.format("%H:%M"),
            slot.end_time.format("%H:%M"),
            slot.staff_name,
            slot.location
        );
    }

    if let Some(slot) = slots.first() {
        store
            .send(WizardAction::SelectSlot { id: slot.id })
            .await?
            .wait()
            .await;
        let at_confirm = store
            .state(|s| matches!(s.step, Step::Confirm { .. }))
            .await;
        println!("\nReached confirm step: {at_confirm}");
    } else {
        println!("\nNo open slots, stopping at the time step.");
    }

    Ok(())
}
