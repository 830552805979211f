use driver_onboarding::validation::{RegistryError, RegistryLookup, RegistryRecord};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Registry backend seeded from configuration. Establishments it does not know are
/// reported as not found, which the coordinator treats as inactive.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryRegistry {
    active: HashSet<String>,
}

impl InMemoryRegistry {
    pub(crate) fn from_active<I, S>(sirets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let active = sirets
            .into_iter()
            .map(|siret| {
                siret
                    .as_ref()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
            })
            .filter(|siret| !siret.is_empty())
            .collect();
        Self { active }
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }
}

impl RegistryLookup for InMemoryRegistry {
    fn lookup(&self, siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        if self.active.contains(siret) {
            Ok(RegistryRecord {
                siret: siret.to_string(),
                is_active: true,
                company_name: None,
            })
        } else {
            Err(RegistryError::NotFound)
        }
    }
}
