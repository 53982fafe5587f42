//! Catalog reader trait.

use crate::error::Result;
use crate::types::Service;
use std::future::Future;

/// Read access to the service catalog.
///
/// # Contract
///
/// - Only services with `active = true` are returned
/// - Ordered by display name, ascending
/// - An empty list is a valid result, not an error
pub trait CatalogReader: Send + Sync {
    /// Fetch all active services, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure. Callers degrade
    /// this to an empty catalog rather than surfacing it.
    fn active_services(&self) -> impl Future<Output = Result<Vec<Service>>> + Send;
}
