//! Org branding reader trait.

use crate::error::Result;
use crate::types::{OrgBranding, OrgId};
use std::future::Future;

/// Read access to organization branding records.
///
/// Purely cosmetic: the banner on the booking page. Failures are silently
/// ignored and the banner does not render.
pub trait OrgReader: Send + Sync {
    /// Fetch the branding record for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure, or when no such
    /// organization exists.
    fn branding(&self, org: OrgId) -> impl Future<Output = Result<OrgBranding>> + Send;
}
