use super::normalizer::normalize_email;
use super::reference::ReferenceData;
use super::verdict::{RejectionReason, ValidatedField, ValidationVerdict};

/// Split a normalized address into local part and domain when it is syntactically usable:
/// a single `@`, no whitespace, and a domain of at least two non-empty dot-separated labels.
pub(crate) fn split_address(email: &str) -> Option<(&str, &str)> {
    if email.chars().any(char::is_whitespace) {
        return None;
    }

    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.contains('@') {
        return None;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return None;
    }

    Some((local, domain))
}

pub fn validate_email(value: &str, reference: &ReferenceData) -> ValidationVerdict {
    let email = normalize_email(value);

    let Some((_, domain)) = split_address(&email) else {
        return ValidationVerdict::rejected(ValidatedField::Email, RejectionReason::EmailMalformed);
    };

    if reference.is_disposable_domain(domain) {
        return ValidationVerdict::rejected(ValidatedField::Email, RejectionReason::EmailDisposable);
    }

    ValidationVerdict::Accepted
}
