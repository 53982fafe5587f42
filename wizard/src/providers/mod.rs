//! Provider traits - the wizard's external collaborators.
//!
//! Every network boundary sits behind a trait so reducers are testable with
//! in-memory doubles. Production implementations live in [`rest`] and talk
//! to the managed backend's REST surface and the internal checkout
//! endpoints.

mod availability;
mod bookings;
mod catalog;
mod checkout;
mod org;
pub mod rest;

pub use availability::AvailabilityReader;
pub use bookings::BookingsReader;
pub use catalog::CatalogReader;
pub use checkout::CheckoutClient;
pub use org::OrgReader;
