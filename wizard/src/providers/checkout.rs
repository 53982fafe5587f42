//! Checkout client trait - the two fulfillment paths.

use crate::error::Result;
use crate::types::{BookingPayload, CheckoutSession};
use std::future::Future;

/// Client for the two internal checkout endpoints.
///
/// Both calls are dispatched at most once per confirm click; the reducer's
/// `submitting` guard prevents duplicate submissions. Neither is retried
/// automatically.
pub trait CheckoutClient: Send + Sync {
    /// Pay-on-site: create the booking record synchronously.
    ///
    /// On success the acknowledgment is opaque; the caller only needs to
    /// know it worked.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::WizardError::Submission`] with the server's
    /// message when the endpoint rejects the payload (e.g. the slot filled
    /// up), or a transport error.
    fn create_booking(&self, payload: BookingPayload)
        -> impl Future<Output = Result<()>> + Send;

    /// Pay-online: create a hosted-checkout session with the payment
    /// gateway, carrying the booking payload as session metadata.
    ///
    /// The booking record itself is created out-of-band by the gateway's
    /// post-payment callback; only the redirect URL is observed here.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`CheckoutClient::create_booking`].
    fn create_checkout_session(
        &self,
        payload: BookingPayload,
    ) -> impl Future<Output = Result<CheckoutSession>> + Send;
}
