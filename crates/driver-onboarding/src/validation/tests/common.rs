use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::validation::domain::{ApplicantIdentity, ApplicantPayload, BusinessIdentity};
use crate::validation::reference::ReferenceStore;
use crate::validation::registry::{RegistryError, RegistryLookup, RegistryRecord};
use crate::validation::ValidationCoordinator;

pub(super) const ACTIVE_SIRET: &str = "73282932000074";
/// Checksum-valid but absent from every fake registry's active set.
pub(super) const DORMANT_SIRET: &str = "55210055400013";
pub(super) const REGISTRY_TIMEOUT: Duration = Duration::from_millis(200);

pub(super) fn profile() -> ApplicantIdentity {
    ApplicantIdentity {
        firstname: "Jean".to_string(),
        lastname: "Dupont".to_string(),
        email: "jean.dupont@gmail.com".to_string(),
        phone: "0612345678".to_string(),
        address: "123 Rue de la Paix, 75001 Paris".to_string(),
        date_of_birth: None,
    }
}

pub(super) fn business(siret: &str) -> BusinessIdentity {
    BusinessIdentity::new(
        siret,
        "Jean Dupont Auto-Entrepreneur",
        "123 Rue de la Paix, 75001 Paris",
    )
}

pub(super) fn profile_payload() -> ApplicantPayload {
    ApplicantPayload {
        profile: Some(profile()),
        business_info: None,
    }
}

pub(super) fn full_payload(siret: &str) -> ApplicantPayload {
    ApplicantPayload {
        profile: Some(profile()),
        business_info: Some(business(siret)),
    }
}

pub(super) fn coordinator_with<R>(registry: R) -> (ValidationCoordinator<R>, Arc<R>)
where
    R: RegistryLookup + 'static,
{
    let registry = Arc::new(registry);
    let coordinator = ValidationCoordinator::new(
        Arc::new(ReferenceStore::default()),
        registry.clone(),
        REGISTRY_TIMEOUT,
    );
    (coordinator, registry)
}

/// Registry that knows a fixed set of active establishments and counts inquiries.
#[derive(Default)]
pub(super) struct StaticRegistry {
    active: HashSet<String>,
    calls: AtomicUsize,
    timeouts: Mutex<Vec<Duration>>,
}

impl StaticRegistry {
    pub(super) fn with_active(sirets: &[&str]) -> Self {
        Self {
            active: sirets.iter().map(|siret| siret.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().expect("timeout mutex poisoned").clone()
    }
}

impl RegistryLookup for StaticRegistry {
    fn lookup(&self, siret: &str, timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.timeouts
            .lock()
            .expect("timeout mutex poisoned")
            .push(timeout);

        if self.active.contains(siret) {
            Ok(RegistryRecord {
                siret: siret.to_string(),
                is_active: true,
                company_name: Some("JEAN DUPONT".to_string()),
            })
        } else {
            Err(RegistryError::NotFound)
        }
    }
}

/// Registry that knows every establishment but reports all of them closed.
pub(super) struct ClosedRegistry;

impl RegistryLookup for ClosedRegistry {
    fn lookup(&self, siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        Ok(RegistryRecord {
            siret: siret.to_string(),
            is_active: false,
            company_name: None,
        })
    }
}

pub(super) struct FailingRegistry(pub(super) RegistryError);

impl RegistryLookup for FailingRegistry {
    fn lookup(&self, _siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        Err(self.0.clone())
    }
}

/// Answers "active" but only after sleeping, ignoring the timeout it was handed.
pub(super) struct SlowRegistry(pub(super) Duration);

impl RegistryLookup for SlowRegistry {
    fn lookup(&self, siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        std::thread::sleep(self.0);
        Ok(RegistryRecord {
            siret: siret.to_string(),
            is_active: true,
            company_name: None,
        })
    }
}

/// Answers for a different establishment than the one asked about.
pub(super) struct MismatchedRegistry;

impl RegistryLookup for MismatchedRegistry {
    fn lookup(&self, _siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        Ok(RegistryRecord {
            siret: "44306184100047".to_string(),
            is_active: true,
            company_name: None,
        })
    }
}

pub(super) struct PanickingRegistry;

impl RegistryLookup for PanickingRegistry {
    fn lookup(&self, _siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        panic!("registry client bug")
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
