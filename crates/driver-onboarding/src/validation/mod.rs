//! Field-by-field validation of driver applicant submissions.
//!
//! Leaf checkers (`name`, `email`, `phone`, `siret`) are pure functions over their input and
//! the current [`ReferenceData`]. The [`ValidationCoordinator`] picks the checks that apply to
//! a registration step, consults the injected [`RegistryLookup`] for SIRET activity, and
//! returns a [`ValidationVerdict`]. Bad input is always a verdict, never an error.

pub mod coordinator;
pub mod domain;
pub mod email;
pub mod name;
pub mod normalizer;
pub mod phone;
pub mod reference;
pub mod registry;
pub mod router;
pub mod siret;
pub mod verdict;

#[cfg(test)]
mod tests;

pub use coordinator::ValidationCoordinator;
pub use domain::{
    ApplicantIdentity, ApplicantPayload, BusinessIdentity, InvalidStep, RegistrationStep,
};
pub use email::validate_email;
pub use name::validate_name;
pub use phone::validate_phone;
pub use reference::{ReferenceData, ReferenceDataError, ReferenceStore};
pub use registry::{ActivityReport, RegistryError, RegistryLookup, RegistryRecord};
pub use router::{validation_router, ApplicantValidationRequest, ReportMode};
pub use siret::{luhn_checksum_valid, validate_siret};
pub use verdict::{Rejection, RejectionReason, ValidatedField, ValidationVerdict};
