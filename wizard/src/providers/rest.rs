//! REST implementations of the provider traits.
//!
//! Talks to the managed backend's row-level-security REST surface (reads)
//! and to the internal checkout endpoints (writes). All row filtering is
//! expressed in query parameters, so row-level security and ordering happen
//! server-side; this client never post-filters.

use crate::config::BackendConfig;
use crate::error::{Result, WizardError};
use crate::providers::{
    AvailabilityReader, BookingsReader, CatalogReader, CheckoutClient, OrgReader,
};
use crate::types::{
    BookingPayload, BookingStatus, CheckoutSession, OrgBranding, OrgId, Service, ServiceId, Slot,
    SlotId, StaffId, UserId,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;

/// REST client for the managed backend and the checkout endpoints.
///
/// Cheap to clone; the inner `reqwest::Client` is an `Arc` internally.
#[derive(Clone, Debug)]
pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bearer: Option<String>,
}

impl RestBackend {
    /// Build a client from backend configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built
    /// (an invalid TLS backend, typically).
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WizardError::Backend {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            bearer: None,
        })
    }

    /// Attach the viewer's access token; row-level security resolves the
    /// current user from it.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    fn get(&self, path_and_query: &str) -> reqwest::RequestBuilder {
        self.decorate(
            self.client
                .get(format!("{}{path_and_query}", self.base_url)),
        )
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.decorate(self.client.post(format!("{}{path}", self.base_url)))
    }

    fn decorate(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("apikey", &self.api_key);
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(&self.api_key),
        }
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<Vec<T>> {
        let response = self.get(path_and_query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WizardError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| WizardError::Decode {
                message: e.to_string(),
            })
    }

    /// Extract the server's error message from a rejected write.
    ///
    /// The endpoints answer failures with `{"error": "..."}`; some proxies
    /// use `{"message": "..."}` instead. Falls back to the HTTP status.
    async fn submission_error(response: reqwest::Response) -> WizardError {
        let status = response.status().as_u16();
        let body: Option<ErrorBody> = response.json().await.ok();

        match body.and_then(|b| b.error.or(b.message)) {
            Some(message) => WizardError::Submission { message },
            None => WizardError::Http { status },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlotIdRow {
    slot_id: SlotId,
}

impl CatalogReader for RestBackend {
    fn active_services(&self) -> impl Future<Output = Result<Vec<Service>>> + Send {
        let this = self.clone();
        async move {
            this.fetch_rows::<Service>("/rest/v1/services?active=eq.true&order=name.asc")
                .await
        }
    }
}

impl AvailabilityReader for RestBackend {
    fn open_slots(
        &self,
        service: ServiceId,
        date: NaiveDate,
        staff: Option<StaffId>,
    ) -> impl Future<Output = Result<Vec<Slot>>> + Send {
        let this = self.clone();
        async move {
            // `open_slots` is a view joining slots with the staff display
            // name; `date` is a plain date column, so the value here must be
            // the viewer's local calendar date.
            let mut query = format!(
                "/rest/v1/open_slots?service_id=eq.{service}&date=eq.{}&is_available=eq.true&order=start_time.asc",
                date.format("%Y-%m-%d"),
            );
            if let Some(staff) = staff {
                query.push_str(&format!("&staff_id=eq.{staff}"));
            }

            this.fetch_rows::<Slot>(&query).await
        }
    }
}

impl BookingsReader for RestBackend {
    fn slots_held_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<HashSet<SlotId>>> + Send {
        let this = self.clone();
        async move {
            let query = format!(
                "/rest/v1/bookings?athlete_id=eq.{user}&date=eq.{}&status=in.({},{})&select=slot_id",
                date.format("%Y-%m-%d"),
                BookingStatus::Confirmed.as_str(),
                BookingStatus::Pending.as_str(),
            );

            let rows = this.fetch_rows::<SlotIdRow>(&query).await?;
            Ok(rows.into_iter().map(|r| r.slot_id).collect())
        }
    }
}

impl CheckoutClient for RestBackend {
    fn create_booking(
        &self,
        payload: BookingPayload,
    ) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        async move {
            let response = this
                .post("/functions/v1/create-booking")
                .json(&payload)
                .send()
                .await?;

            if response.status().is_success() {
                // Opaque acknowledgment; the body is not inspected.
                Ok(())
            } else {
                Err(Self::submission_error(response).await)
            }
        }
    }

    fn create_checkout_session(
        &self,
        payload: BookingPayload,
    ) -> impl Future<Output = Result<CheckoutSession>> + Send {
        let this = self.clone();
        async move {
            let response = this
                .post("/functions/v1/create-checkout-session")
                .json(&payload)
                .send()
                .await?;

            if response.status().is_success() {
                response
                    .json::<CheckoutSession>()
                    .await
                    .map_err(|e| WizardError::Decode {
                        message: e.to_string(),
                    })
            } else {
                Err(Self::submission_error(response).await)
            }
        }
    }
}

impl OrgReader for RestBackend {
    fn branding(&self, org: OrgId) -> impl Future<Output = Result<OrgBranding>> + Send {
        let this = self.clone();
        async move {
            let query = format!(
                "/rest/v1/organizations?id=eq.{org}&select=name,logo_url,primary_color,accent_color,tagline,slug"
            );

            let mut rows = this.fetch_rows::<OrgBranding>(&query).await?;
            if rows.is_empty() {
                Err(WizardError::Http { status: 404 })
            } else {
                Ok(rows.remove(0))
            }
        }
    }
}
