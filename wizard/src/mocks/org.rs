//! Mock org branding reader.

use crate::error::{Result, WizardError};
use crate::mocks::lock_error;
use crate::providers::OrgReader;
use crate::types::{OrgBranding, OrgId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory org branding records.
#[derive(Clone, Debug, Default)]
pub struct MockOrg {
    brandings: Arc<Mutex<HashMap<OrgId, OrgBranding>>>,
    calls: Arc<AtomicUsize>,
}

impl MockOrg {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a branding record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert(&self, org: OrgId, branding: OrgBranding) {
        self.brandings.lock().unwrap().insert(org, branding);
    }

    /// Number of reads issued.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OrgReader for MockOrg {
    fn branding(&self, org: OrgId) -> impl Future<Output = Result<OrgBranding>> + Send {
        let this = self.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);

            let brandings = this.brandings.lock().map_err(|_| lock_error())?;
            brandings
                .get(&org)
                .cloned()
                .ok_or(WizardError::Http { status: 404 })
        }
    }
}
