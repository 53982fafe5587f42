//! Wizard environment - injected dependencies for the reducer.

use crate::providers::{
    AvailabilityReader, BookingsReader, CatalogReader, CheckoutClient, OrgReader,
};
use bookflow_core::environment::Clock;

/// All external dependencies the wizard reducer needs.
///
/// Every field is a trait implementation, so the same reducer runs against
/// the REST backend in production and in-memory mocks in tests.
///
/// # Type Parameters
///
/// - `Cat`: catalog reader
/// - `Avail`: availability reader
/// - `Book`: own-bookings reader
/// - `Check`: checkout client
/// - `Org`: org branding reader
/// - `Clk`: clock
#[derive(Clone)]
pub struct WizardEnvironment<Cat, Avail, Book, Check, Org, Clk>
where
    Cat: CatalogReader + Clone,
    Avail: AvailabilityReader + Clone,
    Book: BookingsReader + Clone,
    Check: CheckoutClient + Clone,
    Org: OrgReader + Clone,
    Clk: Clock + Clone,
{
    /// Service catalog reads.
    pub catalog: Cat,
    /// Open-slot reads.
    pub availability: Avail,
    /// Own-bookings reads (conflict annotations).
    pub bookings: Book,
    /// The two checkout endpoints.
    pub checkout: Check,
    /// Org branding reads (cosmetic banner).
    pub org: Org,
    /// Time source.
    pub clock: Clk,
}

impl<Cat, Avail, Book, Check, Org, Clk> WizardEnvironment<Cat, Avail, Book, Check, Org, Clk>
where
    Cat: CatalogReader + Clone,
    Avail: AvailabilityReader + Clone,
    Book: BookingsReader + Clone,
    Check: CheckoutClient + Clone,
    Org: OrgReader + Clone,
    Clk: Clock + Clone,
{
    /// Create a new wizard environment.
    #[must_use]
    pub const fn new(
        catalog: Cat,
        availability: Avail,
        bookings: Book,
        checkout: Check,
        org: Org,
        clock: Clk,
    ) -> Self {
        Self {
            catalog,
            availability,
            bookings,
            checkout,
            org,
            clock,
        }
    }
}
