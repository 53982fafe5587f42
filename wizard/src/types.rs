//! Domain types for the booking wizard.
//!
//! Value objects and DTOs consumed or produced by the wizard. Rows live in
//! the managed backend; the wizard treats them as read/write DTOs, not owned
//! objects.

use bookflow_core::environment::Clock;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a bookable service.
    ServiceId
);
id_type!(
    /// Unique identifier for a time slot.
    SlotId
);
id_type!(
    /// Unique identifier for a staff member (coach).
    StaffId
);
id_type!(
    /// Unique identifier for a user (athlete).
    UserId
);
id_type!(
    /// Unique identifier for an organization.
    OrgId
);

// ============================================================================
// Money
// ============================================================================

/// Monetary amount in minor currency units (cents).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

// ============================================================================
// Catalog and availability rows
// ============================================================================

/// A bookable service. Read-only from the wizard's perspective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Price in minor currency units.
    pub price: Money,
    /// Session duration in minutes.
    pub duration_minutes: u32,
    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Maximum simultaneous participants.
    pub max_participants: u32,
    /// Whether the service is bookable at all.
    pub active: bool,
}

/// A bookable unit of staff time on a specific date.
///
/// Read-only here; the backend increments `current_bookings` when a booking
/// is created. The wizard never mutates capacity counts locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier.
    pub id: SlotId,
    /// Owning staff member.
    pub staff_id: StaffId,
    /// Staff display name, resolved by the backend join.
    pub staff_name: String,
    /// Associated service.
    pub service_id: ServiceId,
    /// Calendar date the slot is on (plain date column, no timezone).
    pub date: NaiveDate,
    /// Start time of day.
    #[serde(with = "time_hm")]
    pub start_time: NaiveTime,
    /// End time of day.
    #[serde(with = "time_hm")]
    pub end_time: NaiveTime,
    /// Location label.
    pub location: String,
    /// Capacity of the slot.
    pub capacity: u32,
    /// Current number of bookings.
    pub current_bookings: u32,
    /// Availability flag maintained by the backend.
    pub is_available: bool,
}

/// Booking lifecycle status, as stored by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation (or payment).
    Pending,
    /// Confirmed booking.
    Confirmed,
    /// Session took place.
    Completed,
    /// Booking was cancelled.
    Cancelled,
}

impl BookingStatus {
    /// String form used in backend query filters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

// ============================================================================
// Checkout
// ============================================================================

/// The user's payment-path toggle on the confirm step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodChoice {
    /// Create the booking immediately; payment collected in person.
    #[default]
    OnSite,
    /// Redirect to the payment gateway's hosted checkout.
    Online,
}

impl PaymentMethodChoice {
    /// Tag used in the success-page query string (`method=...`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnSite => "on_site",
            Self::Online => "online",
        }
    }
}

/// Full booking payload sent to both checkout endpoints.
///
/// Field names follow the wire contract of the internal endpoints
/// (camelCase, staff as `coachId`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// Chosen service.
    pub service_id: ServiceId,
    /// Chosen slot.
    pub slot_id: SlotId,
    /// Calendar date, serialized `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Start time of day, serialized `HH:MM`.
    #[serde(with = "time_hm")]
    pub start_time: NaiveTime,
    /// End time of day, serialized `HH:MM`.
    #[serde(with = "time_hm")]
    pub end_time: NaiveTime,
    /// Session duration in minutes.
    pub duration_minutes: u32,
    /// Location label copied from the slot.
    pub location: String,
    /// Staff member owning the slot.
    pub coach_id: StaffId,
    /// Optional organization context.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub org_id: Option<OrgId>,
}

/// Hosted-checkout session returned by the checkout endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Redirect URL to the payment gateway's hosted page.
    pub url: String,
}

// ============================================================================
// Org branding
// ============================================================================

/// Cosmetic branding record for an organization banner.
///
/// Fetched best-effort; absence simply means no banner renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrgBranding {
    /// Organization display name.
    pub name: String,
    /// Logo image URL.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Primary brand color (hex string).
    #[serde(default)]
    pub primary_color: Option<String>,
    /// Accent brand color (hex string).
    #[serde(default)]
    pub accent_color: Option<String>,
    /// Marketing tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// URL slug.
    pub slug: String,
}

// ============================================================================
// Local calendar date
// ============================================================================

/// The viewer's calendar date "today", in their own timezone.
///
/// Slot rows are keyed by a plain date column, so the date sent to
/// availability queries must be the viewer's local calendar date. A naive
/// UTC conversion shifts an 11pm selection in a western timezone onto the
/// wrong day.
#[must_use]
pub fn local_today(clock: &impl Clock, offset: FixedOffset) -> NaiveDate {
    clock.now().with_timezone(&offset).date_naive()
}

/// `HH:MM` time-of-day serialization.
///
/// The backend stores times as `HH:MM:SS`; the checkout wire contract uses
/// `HH:MM`. Serializes the short form and accepts either on input.
pub mod time_hm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes a time as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    /// Deserializes a time from `HH:MM` or `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Fails when the string matches neither form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}

/// UTC offset serialization as signed seconds east of UTC.
///
/// `chrono::FixedOffset` carries no serde impls of its own.
pub mod offset_seconds {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes an offset as seconds east of UTC.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        offset: &FixedOffset,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(offset.local_minus_utc())
    }

    /// Deserializes an offset from seconds east of UTC.
    ///
    /// # Errors
    ///
    /// Fails when the value is outside `-86_400..=86_400`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FixedOffset, D::Error> {
        let seconds = i32::deserialize(deserializer)?;
        FixedOffset::east_opt(seconds)
            .ok_or_else(|| serde::de::Error::custom("UTC offset out of range"))
    }
}
