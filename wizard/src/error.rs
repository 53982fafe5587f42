//! Error types for booking wizard operations.

use thiserror::Error;

/// Result type alias for wizard operations.
pub type Result<T> = std::result::Result<T, WizardError>;

/// Error taxonomy for the booking wizard.
///
/// The wizard distinguishes two handling policies:
///
/// - **Read paths** (catalog, slots, own bookings, org branding) degrade to
///   an empty state. Their errors are logged, never shown.
/// - **Write paths** (booking creation, checkout session) surface a
///   human-readable message and leave the wizard on the confirm step so the
///   user can retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Transport-level failure talking to the managed backend.
    #[error("Backend request failed: {message}")]
    Backend {
        /// Underlying failure description.
        message: String,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// A response body could not be decoded.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Decode failure description.
        message: String,
    },

    /// A write endpoint rejected the submission with a structured error.
    ///
    /// The message is the server's own wording and is shown to the user
    /// verbatim (e.g. "Slot no longer available").
    #[error("{message}")]
    Submission {
        /// Server-provided, human-readable message.
        message: String,
    },

    /// No authenticated user in the session.
    #[error("Not authenticated")]
    Unauthenticated,
}

impl WizardError {
    /// Message suitable for the non-blocking notification on the confirm
    /// step.
    ///
    /// Submission errors pass the server's wording through unchanged; every
    /// other failure collapses to a generic retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Submission { message } => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Returns `true` for failures that read paths swallow into an empty
    /// state instead of surfacing.
    #[must_use]
    pub const fn is_degraded_read(&self) -> bool {
        matches!(
            self,
            Self::Backend { .. } | Self::Http { .. } | Self::Decode { .. }
        )
    }
}

impl From<reqwest::Error> for WizardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Backend {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_message_passes_through_verbatim() {
        let err = WizardError::Submission {
            message: "Slot no longer available".to_string(),
        };
        assert_eq!(err.user_message(), "Slot no longer available");
    }

    #[test]
    fn transport_errors_get_generic_message() {
        let err = WizardError::Http { status: 502 };
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn read_degradation_classification() {
        assert!(WizardError::Backend {
            message: "connection reset".into()
        }
        .is_degraded_read());
        assert!(!WizardError::Submission {
            message: "full".into()
        }
        .is_degraded_read());
    }
}
