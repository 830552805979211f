use serde::{Deserialize, Serialize};

/// Personal and contact details captured at the profile step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// Business registration submitted by auto-entrepreneur applicants.
///
/// `siret_verified` is never taken from input; only
/// [`ValidationCoordinator::verify_business`](super::ValidationCoordinator::verify_business)
/// sets it, and only after the checksum and registry checks both pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessIdentity {
    pub siret: String,
    pub company_name: String,
    pub business_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_deserializing)]
    pub siret_verified: bool,
}

impl BusinessIdentity {
    pub fn new(
        siret: impl Into<String>,
        company_name: impl Into<String>,
        business_address: impl Into<String>,
    ) -> Self {
        Self {
            siret: siret.into(),
            company_name: company_name.into(),
            business_address: business_address.into(),
            vehicle_type: None,
            siret_verified: false,
        }
    }
}

/// Sections an applicant submits for create/update. Absent sections are not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantPayload {
    #[serde(default)]
    pub profile: Option<ApplicantIdentity>,
    #[serde(default)]
    pub business_info: Option<BusinessIdentity>,
}

/// Registration steps of the onboarding flow, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    Profile = 1,
    Identity = 2,
    Documents = 3,
    Business = 4,
    Bank = 5,
    Contract = 6,
}

impl RegistrationStep {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Profile,
            Self::Identity,
            Self::Documents,
            Self::Business,
            Self::Bank,
            Self::Contract,
        ]
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profil",
            Self::Identity => "Identité",
            Self::Documents => "Documents",
            Self::Business => "Entreprise",
            Self::Bank => "Banque",
            Self::Contract => "Contrat",
        }
    }

    /// Business information is only collected from the business step onward.
    pub fn includes_business(self) -> bool {
        self >= Self::Business
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registration step {0} (expected 1-6)")]
pub struct InvalidStep(pub u8);

impl TryFrom<u8> for RegistrationStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ordered()
            .into_iter()
            .find(|step| step.number() == value)
            .ok_or(InvalidStep(value))
    }
}
