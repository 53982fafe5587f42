//! Mock catalog reader.

use crate::error::{Result, WizardError};
use crate::mocks::lock_error;
use crate::providers::CatalogReader;
use crate::types::Service;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory catalog of services.
#[derive(Clone, Debug, Default)]
pub struct MockCatalog {
    services: Arc<Mutex<Vec<Service>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockCatalog {
    /// Catalog serving the given services (assumed name-ordered).
    #[must_use]
    pub fn with_services(services: Vec<Service>) -> Self {
        Self {
            services: Arc::new(Mutex::new(services)),
            ..Self::default()
        }
    }

    /// Catalog whose reads always fail.
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, Ordering::SeqCst);
        mock
    }

    /// Number of reads issued.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogReader for MockCatalog {
    fn active_services(&self) -> impl Future<Output = Result<Vec<Service>>> + Send {
        let this = self.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);

            if this.fail.load(Ordering::SeqCst) {
                return Err(WizardError::Backend {
                    message: "mock catalog failure".to_string(),
                });
            }

            let services = this.services.lock().map_err(|_| lock_error())?;
            Ok(services.iter().filter(|s| s.active).cloned().collect())
        }
    }
}
