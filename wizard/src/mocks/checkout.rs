//! Mock checkout client.

use crate::error::{Result, WizardError};
use crate::mocks::lock_error;
use crate::providers::CheckoutClient;
use crate::types::{BookingPayload, CheckoutSession};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory checkout endpoints.
///
/// Records every payload it receives so tests can assert the exact wire
/// content, and can be armed to reject submissions with a server message.
#[derive(Clone, Debug)]
pub struct MockCheckout {
    bookings: Arc<Mutex<Vec<BookingPayload>>>,
    sessions: Arc<Mutex<Vec<BookingPayload>>>,
    reject_with: Arc<Mutex<Option<String>>>,
    checkout_url: Arc<Mutex<String>>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockCheckout {
    fn default() -> Self {
        Self {
            bookings: Arc::new(Mutex::new(Vec::new())),
            sessions: Arc::new(Mutex::new(Vec::new())),
            reject_with: Arc::new(Mutex::new(None)),
            checkout_url: Arc::new(Mutex::new(
                "https://checkout.gateway.example/session/123".to_string(),
            )),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockCheckout {
    /// Endpoints that accept everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoints that reject every submission with the given message.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn rejecting(message: impl Into<String>) -> Self {
        let mock = Self::default();
        *mock.reject_with.lock().unwrap() = Some(message.into());
        mock
    }

    /// Clear a previously armed rejection; later submissions succeed.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn accept(&self) {
        *self.reject_with.lock().unwrap() = None;
    }

    /// Set the hosted-checkout URL returned on session creation.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn set_checkout_url(&self, url: impl Into<String>) {
        *self.checkout_url.lock().unwrap() = url.into();
    }

    /// Bookings created through the pay-on-site path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn created_bookings(&self) -> Vec<BookingPayload> {
        self.bookings.lock().unwrap().clone()
    }

    /// Payloads attached to created checkout sessions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn session_payloads(&self) -> Vec<BookingPayload> {
        self.sessions.lock().unwrap().clone()
    }

    /// Total calls across both endpoints.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn rejection(&self) -> Result<Option<WizardError>> {
        let reject = self.reject_with.lock().map_err(|_| lock_error())?;
        Ok(reject.as_ref().map(|message| WizardError::Submission {
            message: message.clone(),
        }))
    }
}

impl CheckoutClient for MockCheckout {
    fn create_booking(
        &self,
        payload: BookingPayload,
    ) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(err) = this.rejection()? {
                return Err(err);
            }

            this.bookings.lock().map_err(|_| lock_error())?.push(payload);
            Ok(())
        }
    }

    fn create_checkout_session(
        &self,
        payload: BookingPayload,
    ) -> impl Future<Output = Result<CheckoutSession>> + Send {
        let this = self.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(err) = this.rejection()? {
                return Err(err);
            }

            this.sessions.lock().map_err(|_| lock_error())?.push(payload);
            let url = this.checkout_url.lock().map_err(|_| lock_error())?.clone();
            Ok(CheckoutSession { url })
        }
    }
}
