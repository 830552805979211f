use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use super::domain::{ApplicantPayload, BusinessIdentity, RegistrationStep};
use super::email::validate_email;
use super::name::validate_name;
use super::normalizer::normalize_text;
use super::phone::validate_phone;
use super::reference::{ReferenceData, ReferenceStore};
use super::registry::{ActivityReport, RegistryError, RegistryLookup, RegistryRecord};
use super::siret::check_siret;
use super::verdict::{RejectionReason, ValidatedField, ValidationVerdict};

type Check<'a> = (ValidatedField, Box<dyn Fn() -> ValidationVerdict + 'a>);

/// What the registry said about a checksum-valid SIRET, after degradation rules.
/// Only a panicking backend is `Internal`; every reported failure is `Unverifiable`.
#[derive(Debug)]
enum RegistryOutcome {
    Active(RegistryRecord),
    Inactive,
    Unverifiable(RegistryError),
    Internal(String),
}

/// Composes the field validators for a registration step.
///
/// Holds no per-call state: reference data is read from a snapshot taken at the start of
/// each call and the registry backend is shared behind an `Arc`.
pub struct ValidationCoordinator<L> {
    reference: Arc<ReferenceStore>,
    registry: Arc<L>,
    registry_timeout: Duration,
}

impl<L> ValidationCoordinator<L>
where
    L: RegistryLookup + 'static,
{
    pub fn new(
        reference: Arc<ReferenceStore>,
        registry: Arc<L>,
        registry_timeout: Duration,
    ) -> Self {
        Self {
            reference,
            registry,
            registry_timeout,
        }
    }

    pub fn reference(&self) -> &ReferenceStore {
        &self.reference
    }

    pub fn registry_timeout(&self) -> Duration {
        self.registry_timeout
    }

    /// First failure wins, in field order: firstname, lastname, email, phone, address,
    /// then SIRET for steps that carry business information.
    pub fn validate_applicant(
        &self,
        payload: &ApplicantPayload,
        step: RegistrationStep,
    ) -> ValidationVerdict {
        self.run_checks(payload, step, true)
            .into_iter()
            .next()
            .unwrap_or(ValidationVerdict::Accepted)
    }

    /// Every rejection in field order; empty when the payload is acceptable.
    pub fn validate_all(
        &self,
        payload: &ApplicantPayload,
        step: RegistrationStep,
    ) -> Vec<ValidationVerdict> {
        self.run_checks(payload, step, false)
    }

    /// Offline format, reject-list, and checksum rules only.
    pub fn validate_siret(&self, code: &str) -> ValidationVerdict {
        let reference = self.reference.snapshot();
        guarded(ValidatedField::Siret, || {
            super::siret::validate_siret(code, &reference)
        })
    }

    /// Standalone inquiry: offline rules, then the registry for checksum-valid codes.
    pub fn lookup_activity(&self, code: &str) -> ActivityReport {
        let reference = self.reference.snapshot();
        let siret = match check_siret(code, &reference) {
            Ok(siret) => siret,
            Err(reason) => {
                return ActivityReport {
                    is_valid: false,
                    is_active: false,
                    message: reason.message(ValidatedField::Siret),
                }
            }
        };

        match self.query_registry(&siret) {
            RegistryOutcome::Active(record) => ActivityReport {
                is_valid: true,
                is_active: true,
                message: match record.company_name {
                    Some(name) => format!("SIRET valide, entreprise active : {name}"),
                    None => "SIRET valide, entreprise active".to_string(),
                },
            },
            RegistryOutcome::Inactive => ActivityReport {
                is_valid: true,
                is_active: false,
                message: RejectionReason::SiretNotActive.message(ValidatedField::Siret),
            },
            RegistryOutcome::Unverifiable(_) => ActivityReport {
                is_valid: true,
                is_active: false,
                message: "SIRET valide, mais le répertoire des entreprises est injoignable : \
                          activité non vérifiée"
                    .to_string(),
            },
            RegistryOutcome::Internal(_) => ActivityReport {
                is_valid: true,
                is_active: false,
                message: RejectionReason::ValidationInternalError.message(ValidatedField::Siret),
            },
        }
    }

    /// Run offline and registry checks for a business submission and set the verification
    /// flag from the result. The returned identity carries the normalized SIRET.
    pub fn verify_business(
        &self,
        mut business: BusinessIdentity,
    ) -> (BusinessIdentity, ValidationVerdict) {
        let reference = self.reference.snapshot();
        let verdict = guarded(ValidatedField::Siret, || {
            self.siret_with_registry(&business.siret, &reference)
        });

        if verdict.is_accepted() {
            business.siret = super::normalizer::normalize_siret(&business.siret);
        }
        business.siret_verified = verdict.is_accepted();
        (business, verdict)
    }

    fn run_checks(
        &self,
        payload: &ApplicantPayload,
        step: RegistrationStep,
        first_only: bool,
    ) -> Vec<ValidationVerdict> {
        let snapshot = self.reference.snapshot();
        let reference: &ReferenceData = &snapshot;

        let mut checks: Vec<Check<'_>> = Vec::new();

        if let Some(profile) = payload.profile.as_ref() {
            checks.push((
                ValidatedField::Firstname,
                Box::new(move || validate_name(&profile.firstname, ValidatedField::Firstname)),
            ));
            checks.push((
                ValidatedField::Lastname,
                Box::new(move || validate_name(&profile.lastname, ValidatedField::Lastname)),
            ));
            checks.push((
                ValidatedField::Email,
                Box::new(move || validate_email(&profile.email, reference)),
            ));
            checks.push((
                ValidatedField::Phone,
                Box::new(move || validate_phone(&profile.phone)),
            ));
            checks.push((
                ValidatedField::Address,
                Box::new(move || address_present(&profile.address)),
            ));
        }

        if step.includes_business() {
            if let Some(business) = payload.business_info.as_ref() {
                checks.push((
                    ValidatedField::Siret,
                    Box::new(move || self.siret_with_registry(&business.siret, reference)),
                ));
            }
        }

        let mut violations = Vec::new();
        for (field, check) in checks {
            let verdict = guarded(field, check);
            if let Some(rejection) = verdict.rejection() {
                debug!(
                    step = step.number(),
                    field = rejection.field.label(),
                    reason = rejection.reason.code(),
                    "applicant field rejected"
                );
                violations.push(verdict);
                if first_only {
                    break;
                }
            }
        }
        violations
    }

    fn siret_with_registry(&self, code: &str, reference: &ReferenceData) -> ValidationVerdict {
        let siret = match check_siret(code, reference) {
            Ok(siret) => siret,
            Err(reason) => return ValidationVerdict::rejected(ValidatedField::Siret, reason),
        };

        match self.query_registry(&siret) {
            RegistryOutcome::Active(_) => ValidationVerdict::Accepted,
            RegistryOutcome::Inactive | RegistryOutcome::Unverifiable(_) => {
                ValidationVerdict::rejected(ValidatedField::Siret, RejectionReason::SiretNotActive)
            }
            RegistryOutcome::Internal(_) => ValidationVerdict::rejected(
                ValidatedField::Siret,
                RejectionReason::ValidationInternalError,
            ),
        }
    }

    fn query_registry(&self, siret: &str) -> RegistryOutcome {
        let timeout = self.registry_timeout;
        let started = Instant::now();
        let response = catch_unwind(AssertUnwindSafe(|| self.registry.lookup(siret, timeout)));
        let elapsed = started.elapsed();

        let outcome = match response {
            Err(_) => RegistryOutcome::Internal("registry backend panicked".to_string()),
            Ok(_) if elapsed > timeout => {
                RegistryOutcome::Unverifiable(RegistryError::Timeout(timeout))
            }
            Ok(Ok(record)) if record.siret != siret => {
                RegistryOutcome::Unverifiable(RegistryError::Malformed(format!(
                    "registry answered for {} instead of the requested establishment",
                    record.siret
                )))
            }
            Ok(Ok(record)) if record.is_active => RegistryOutcome::Active(record),
            Ok(Ok(_)) => RegistryOutcome::Inactive,
            Ok(Err(err)) => RegistryOutcome::Unverifiable(err),
        };

        match &outcome {
            RegistryOutcome::Active(_) => {}
            RegistryOutcome::Inactive => debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                "registry reports inactive establishment"
            ),
            RegistryOutcome::Unverifiable(err) => warn!(
                error = %err,
                elapsed_ms = elapsed.as_millis() as u64,
                "registry lookup failed; treating establishment as inactive"
            ),
            RegistryOutcome::Internal(detail) => error!(
                detail = %detail,
                "registry lookup produced an internal error"
            ),
        }
        outcome
    }
}

/// Run a check, mapping a panic to an internal-error rejection for `field`.
fn guarded<F>(field: ValidatedField, check: F) -> ValidationVerdict
where
    F: FnOnce() -> ValidationVerdict,
{
    match catch_unwind(AssertUnwindSafe(check)) {
        Ok(verdict) => verdict,
        Err(_) => {
            error!(field = field.label(), "validation check panicked");
            ValidationVerdict::rejected(field, RejectionReason::ValidationInternalError)
        }
    }
}

fn address_present(address: &str) -> ValidationVerdict {
    if normalize_text(address).is_empty() {
        ValidationVerdict::rejected(ValidatedField::Address, RejectionReason::AddressMissing)
    } else {
        ValidationVerdict::Accepted
    }
}
