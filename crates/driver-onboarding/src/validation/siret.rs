//! Offline SIRET checks: format, reject list, and Luhn checksum.
//!
//! These run before any registry inquiry so malformed or fraudulent identifiers are
//! rejected deterministically without leaving the process.

use super::normalizer::normalize_siret;
use super::reference::ReferenceData;
use super::verdict::{RejectionReason, ValidatedField, ValidationVerdict};

pub const SIRET_LENGTH: usize = 14;

/// Luhn check over a digit string: every second digit from the right is doubled, doubled
/// values above 9 lose 9, and the total must be a multiple of 10.
///
/// Returns `false` for input containing anything other than ASCII digits.
pub fn luhn_checksum_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    for (position, byte) in digits.bytes().rev().enumerate() {
        if !byte.is_ascii_digit() {
            return false;
        }
        let mut value = u32::from(byte - b'0');
        if position % 2 == 1 {
            value *= 2;
            if value > 9 {
                value -= 9;
            }
        }
        sum += value;
    }
    !digits.is_empty() && sum % 10 == 0
}

fn is_repeated_digit(siret: &str) -> bool {
    let mut bytes = siret.bytes();
    match bytes.next() {
        Some(first) => bytes.all(|byte| byte == first),
        None => false,
    }
}

/// Run the offline rules in order, returning the normalized code when all pass.
pub fn check_siret(value: &str, reference: &ReferenceData) -> Result<String, RejectionReason> {
    let siret = normalize_siret(value);

    if siret.len() != SIRET_LENGTH || !siret.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectionReason::SiretBadFormat);
    }

    if is_repeated_digit(&siret) || reference.is_rejected_siret(&siret) {
        return Err(RejectionReason::SiretBlacklisted);
    }

    if !luhn_checksum_valid(&siret) {
        return Err(RejectionReason::SiretChecksumFailed);
    }

    Ok(siret)
}

pub fn validate_siret(value: &str, reference: &ReferenceData) -> ValidationVerdict {
    match check_siret(value, reference) {
        Ok(_) => ValidationVerdict::Accepted,
        Err(reason) => ValidationVerdict::rejected(ValidatedField::Siret, reason),
    }
}
