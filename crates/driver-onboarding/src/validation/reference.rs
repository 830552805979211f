//! Static reject lists consulted by the email and SIRET validators.
//!
//! Reference data is validated once when it is built and never mutated afterwards. The
//! [`ReferenceStore`] hands out whole snapshots and swaps the full set on reload, so a
//! validation call never observes a half-updated list.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Deserialize;
use tracing::info;

use super::siret::SIRET_LENGTH;
use crate::config::ValidationSettings;

const BUILTIN_DISPOSABLE_DOMAINS: [&str; 8] = [
    "10minutemail.com",
    "guerrillamail.com",
    "tempmail.org",
    "mailinator.com",
    "yopmail.com",
    "trashmail.com",
    "throwawaymail.com",
    "temp-mail.org",
];

const BUILTIN_SUSPICIOUS_MARKERS: [&str; 5] = ["fake", "trash", "throwaway", "disposable", "spam"];

const BUILTIN_SIRET_REJECT_LIST: [&str; 3] =
    ["12345678901234", "98765432109876", "11223344556677"];

/// Errors raised while building reference data. Always fatal at start-up.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("{list} reject list is empty")]
    Empty { list: &'static str },
    #[error("malformed disposable email domain '{0}'")]
    MalformedDomain(String),
    #[error("malformed SIRET reject list entry '{0}' (expected 14 digits)")]
    MalformedSiret(String),
    #[error("malformed suspicious domain marker '{0}' (expected a single token)")]
    MalformedMarker(String),
    #[error("failed to read reference list {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid reference CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Only `value` is read; a trailing `note` column is free text for maintainers.
#[derive(Debug, Deserialize)]
struct ReferenceRow {
    value: String,
}

/// Read a `value,note` CSV into its list of values. Blank values are skipped.
pub fn read_reference_csv<R: Read>(reader: R) -> Result<Vec<String>, ReferenceDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut values = Vec::new();
    for row in reader.deserialize::<ReferenceRow>() {
        let row = row?;
        if !row.value.is_empty() {
            values.push(row.value);
        }
    }
    Ok(values)
}

fn read_reference_file(path: &Path) -> Result<Vec<String>, ReferenceDataError> {
    let file = std::fs::File::open(path).map_err(|err| ReferenceDataError::Source {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    })?;
    read_reference_csv(file).map_err(|err| match err {
        ReferenceDataError::Csv(source) => ReferenceDataError::Source {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Disposable-mail domains, suspicious domain markers, and the SIRET reject list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    disposable_domains: BTreeSet<String>,
    suspicious_markers: Vec<String>,
    siret_reject_list: BTreeSet<String>,
}

impl ReferenceData {
    pub fn new<D, S>(
        disposable_domains: D,
        siret_reject_list: S,
    ) -> Result<Self, ReferenceDataError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let disposable_domains = disposable_domains
            .into_iter()
            .map(|domain| canonical_domain(domain.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if disposable_domains.is_empty() {
            return Err(ReferenceDataError::Empty {
                list: "disposable email domain",
            });
        }

        let siret_reject_list = siret_reject_list
            .into_iter()
            .map(|entry| canonical_siret(entry.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if siret_reject_list.is_empty() {
            return Err(ReferenceDataError::Empty { list: "SIRET" });
        }

        Ok(Self {
            disposable_domains,
            suspicious_markers: BUILTIN_SUSPICIOUS_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            siret_reject_list,
        })
    }

    pub fn builtin() -> Self {
        Self {
            disposable_domains: BUILTIN_DISPOSABLE_DOMAINS
                .iter()
                .map(|domain| domain.to_string())
                .collect(),
            suspicious_markers: BUILTIN_SUSPICIOUS_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            siret_reject_list: BUILTIN_SIRET_REJECT_LIST
                .iter()
                .map(|siret| siret.to_string())
                .collect(),
        }
    }

    /// Build from the configured CSV files, falling back to the built-in list for any
    /// source left unset.
    pub fn load(settings: &ValidationSettings) -> Result<Self, ReferenceDataError> {
        let domains = match &settings.disposable_domains_csv {
            Some(path) => read_reference_file(path)?,
            None => BUILTIN_DISPOSABLE_DOMAINS.iter().map(|d| d.to_string()).collect(),
        };
        let sirets = match &settings.siret_reject_list_csv {
            Some(path) => read_reference_file(path)?,
            None => BUILTIN_SIRET_REJECT_LIST.iter().map(|s| s.to_string()).collect(),
        };

        let mut data = Self::new(domains, sirets)?;
        if let Some(path) = &settings.suspicious_markers_csv {
            data = data.with_suspicious_markers(read_reference_file(path)?)?;
        }
        info!(
            disposable_domains = data.disposable_domains.len(),
            suspicious_markers = data.suspicious_markers.len(),
            rejected_sirets = data.siret_reject_list.len(),
            "reference data loaded"
        );
        Ok(data)
    }

    /// Replace the heuristic markers; an empty set disables the heuristic.
    pub fn with_suspicious_markers<M>(mut self, markers: M) -> Result<Self, ReferenceDataError>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        self.suspicious_markers = markers
            .into_iter()
            .map(|marker| canonical_marker(marker.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self)
    }

    /// Listed domains and their subdomains, plus domains that look throwaway: a non-TLD
    /// label with a hyphen-separated token equal to a suspicious marker.
    pub fn is_disposable_domain(&self, domain: &str) -> bool {
        let domain = domain.trim().trim_end_matches('.').to_lowercase();

        let listed = self.disposable_domains.iter().any(|listed| {
            domain == *listed
                || domain
                    .strip_suffix(listed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        });
        if listed {
            return true;
        }

        let labels: Vec<&str> = domain.split('.').collect();
        let Some((_, registrable)) = labels.split_last() else {
            return false;
        };
        registrable
            .iter()
            .flat_map(|label| label.split('-'))
            .any(|token| {
                self.suspicious_markers
                    .iter()
                    .any(|marker| token == marker.as_str())
            })
    }

    pub fn is_rejected_siret(&self, siret: &str) -> bool {
        self.siret_reject_list.contains(siret)
    }

    pub fn suspicious_marker_count(&self) -> usize {
        self.suspicious_markers.len()
    }

    pub fn disposable_domain_count(&self) -> usize {
        self.disposable_domains.len()
    }

    pub fn rejected_siret_count(&self) -> usize {
        self.siret_reject_list.len()
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn canonical_domain(raw: &str) -> Result<String, ReferenceDataError> {
    let domain = raw.trim().to_lowercase();
    let well_formed = domain.contains('.')
        && !domain.contains('@')
        && !domain.chars().any(char::is_whitespace)
        && domain.split('.').all(|label| !label.is_empty());

    if well_formed {
        Ok(domain)
    } else {
        Err(ReferenceDataError::MalformedDomain(raw.to_string()))
    }
}

fn canonical_marker(raw: &str) -> Result<String, ReferenceDataError> {
    let marker = raw.trim().to_lowercase();
    let single_token = !marker.is_empty() && marker.chars().all(char::is_alphanumeric);

    if single_token {
        Ok(marker)
    } else {
        Err(ReferenceDataError::MalformedMarker(raw.to_string()))
    }
}

fn canonical_siret(raw: &str) -> Result<String, ReferenceDataError> {
    let siret = raw.trim();
    if siret.len() == SIRET_LENGTH && siret.bytes().all(|b| b.is_ascii_digit()) {
        Ok(siret.to_string())
    } else {
        Err(ReferenceDataError::MalformedSiret(raw.to_string()))
    }
}

/// Process-wide holder for the current [`ReferenceData`].
pub struct ReferenceStore {
    current: ArcSwap<ReferenceData>,
}

impl ReferenceStore {
    pub fn new(data: ReferenceData) -> Self {
        Self {
            current: ArcSwap::from_pointee(data),
        }
    }

    /// The complete set in effect right now. Hold it for the duration of one validation.
    pub fn snapshot(&self) -> Arc<ReferenceData> {
        self.current.load_full()
    }

    /// Atomically replace the whole set; in-flight validations keep their snapshot.
    pub fn replace(&self, data: ReferenceData) {
        info!(
            disposable_domains = data.disposable_domain_count(),
            rejected_sirets = data.rejected_siret_count(),
            "reference data replaced"
        );
        self.current.store(Arc::new(data));
    }
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new(ReferenceData::builtin())
    }
}

impl std::fmt::Debug for ReferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceStore")
            .field("current", &self.snapshot())
            .finish()
    }
}
