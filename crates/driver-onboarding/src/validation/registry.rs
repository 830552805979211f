use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Synchronous inquiry against the national business registry.
///
/// Implementations must honour `timeout` and report a [`RegistryError`] rather than block
/// past it. The coordinator never retries.
pub trait RegistryLookup: Send + Sync {
    fn lookup(&self, siret: &str, timeout: Duration) -> Result<RegistryRecord, RegistryError>;
}

/// Establishment state as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub siret: String,
    pub is_active: bool,
    pub company_name: Option<String>,
}

/// Registry failures. Every variant degrades to an inactive verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("establishment not found in registry")]
    NotFound,
    #[error("registry lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("registry transport failure: {0}")]
    Transport(String),
    #[error("registry returned an unusable response: {0}")]
    Malformed(String),
}

/// Result of the standalone SIRET inquiry, in the casing existing callers read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    pub is_valid: bool,
    pub is_active: bool,
    pub message: String,
}

impl ActivityReport {
    pub fn verified(&self) -> bool {
        self.is_valid && self.is_active
    }
}
