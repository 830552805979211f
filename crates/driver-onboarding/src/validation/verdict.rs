use serde::{Deserialize, Serialize};

/// Applicant field a rejection is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatedField {
    Firstname,
    Lastname,
    Email,
    Phone,
    Address,
    Siret,
}

impl ValidatedField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Firstname => "firstname",
            Self::Lastname => "lastname",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Siret => "siret",
        }
    }
}

/// Stable reason codes returned to callers alongside a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    NameTooShort,
    EmailMalformed,
    EmailDisposable,
    PhoneInvalidFormat,
    PhonePremiumRate,
    AddressMissing,
    SiretBadFormat,
    SiretBlacklisted,
    SiretChecksumFailed,
    SiretNotActive,
    ValidationInternalError,
}

impl RejectionReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NameTooShort => "NAME_TOO_SHORT",
            Self::EmailMalformed => "EMAIL_MALFORMED",
            Self::EmailDisposable => "EMAIL_DISPOSABLE",
            Self::PhoneInvalidFormat => "PHONE_INVALID_FORMAT",
            Self::PhonePremiumRate => "PHONE_PREMIUM_RATE",
            Self::AddressMissing => "ADDRESS_MISSING",
            Self::SiretBadFormat => "SIRET_BAD_FORMAT",
            Self::SiretBlacklisted => "SIRET_BLACKLISTED",
            Self::SiretChecksumFailed => "SIRET_CHECKSUM_FAILED",
            Self::SiretNotActive => "SIRET_NOT_ACTIVE",
            Self::ValidationInternalError => "VALIDATION_INTERNAL_ERROR",
        }
    }

    /// User-facing message shown by the onboarding front end.
    pub fn message(self, field: ValidatedField) -> String {
        match self {
            Self::NameTooShort => match field {
                ValidatedField::Firstname => {
                    "Le prénom doit contenir au moins 2 caractères dont une lettre".to_string()
                }
                _ => "Le nom doit contenir au moins 2 caractères dont une lettre".to_string(),
            },
            Self::EmailMalformed => "Adresse email invalide".to_string(),
            Self::EmailDisposable => {
                "Les adresses email temporaires ou jetables ne sont pas acceptées".to_string()
            }
            Self::PhoneInvalidFormat => "Numéro de téléphone invalide : 10 chiffres commençant \
                 par 0 attendus, les numéros internationaux ne sont pas acceptés"
                .to_string(),
            Self::PhonePremiumRate => {
                "Les numéros de téléphone surtaxés (08) ne sont pas acceptés".to_string()
            }
            Self::AddressMissing => "L'adresse est obligatoire".to_string(),
            Self::SiretBadFormat => {
                "Le numéro SIRET doit contenir exactement 14 chiffres".to_string()
            }
            Self::SiretBlacklisted => "Ce numéro SIRET n'est pas accepté".to_string(),
            Self::SiretChecksumFailed => {
                "Numéro SIRET invalide : la clé de contrôle est incorrecte".to_string()
            }
            Self::SiretNotActive => {
                "Entreprise inactive ou introuvable au répertoire SIRENE".to_string()
            }
            Self::ValidationInternalError => {
                format!(
                    "Erreur interne lors de la vérification du champ {}, veuillez réessayer",
                    field.label()
                )
            }
        }
    }
}

/// Structured rejection carried by [`ValidationVerdict::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub field: ValidatedField,
    pub reason: RejectionReason,
    pub message: String,
}

/// Outcome of a single validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationVerdict {
    Accepted,
    Rejected(Rejection),
}

impl ValidationVerdict {
    pub fn rejected(field: ValidatedField, reason: RejectionReason) -> Self {
        Self::Rejected(Rejection {
            field,
            reason,
            message: reason.message(field),
        })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        self.rejection().map(|rejection| rejection.reason)
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Accepted => "accepted".to_string(),
            Self::Rejected(rejection) => format!(
                "rejected {} ({})",
                rejection.field.label(),
                rejection.reason.code()
            ),
        }
    }
}
