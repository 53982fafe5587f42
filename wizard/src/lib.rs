//! Booking wizard built on the bookflow reducer/effect architecture.
//!
//! The wizard walks a visitor through service, date, and time selection to a
//! confirm step, then dispatches one of two checkout paths: an immediate
//! pay-on-site booking or a hosted pay-online checkout session.
//!
//! ## Architecture
//!
//! - [`state::WizardState`] holds the step machine, the loaded catalog and
//!   slots, conflict annotations, and the pending navigation intent
//! - [`actions::WizardAction`] covers both user commands and effect feedback
//! - [`reducer::WizardReducer`] is pure; every network read or write is
//!   described as an effect and executed by the store runtime
//! - [`providers`] defines the trait seams; [`providers::rest`] implements
//!   them against the backend's REST surface
//! - [`mocks`] (behind the `test-utils` feature, on by default) provides
//!   in-memory doubles with call counters
//!
//! ## Example
//!
//! ```ignore
//! let env = WizardEnvironment::new(
//!     backend.clone(), backend.clone(), backend.clone(),
//!     backend.clone(), backend, SystemClock,
//! );
//! let store = Store::new(
//!     WizardState::new(session),
//!     WizardReducer::new(),
//!     env,
//! );
//! store.send(WizardAction::Start).await?.wait().await;
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod types;

pub use actions::WizardAction;
pub use config::{BackendConfig, Config, PagesConfig};
pub use environment::WizardEnvironment;
pub use error::{Result, WizardError};
pub use reducer::WizardReducer;
pub use state::{Navigation, SessionContext, Step, StepMemory, WizardSeed, WizardState};
pub use types::{
    BookingPayload, BookingStatus, CheckoutSession, Money, OrgBranding, OrgId,
    PaymentMethodChoice, Service, ServiceId, Slot, SlotId, StaffId, UserId,
};
