use super::normalizer::normalize_phone;
use super::verdict::{RejectionReason, ValidatedField, ValidationVerdict};

const NATIONAL_LENGTH: usize = 10;
const PREMIUM_RATE_PREFIX: u8 = b'8';

/// French national numbers only: ten digits with a leading `0` and an area/range digit in
/// `1-7` or `9`. International notation (`+33`, `0033`) is refused by policy, and the `08`
/// premium-rate range gets its own reason. Landline and mobile ranges are treated alike.
pub fn validate_phone(value: &str) -> ValidationVerdict {
    let digits = normalize_phone(value);
    let bytes = digits.as_bytes();

    let national = bytes.len() == NATIONAL_LENGTH
        && bytes.iter().all(u8::is_ascii_digit)
        && bytes[0] == b'0';
    if !national {
        return ValidationVerdict::rejected(
            ValidatedField::Phone,
            RejectionReason::PhoneInvalidFormat,
        );
    }

    match bytes[1] {
        PREMIUM_RATE_PREFIX => {
            ValidationVerdict::rejected(ValidatedField::Phone, RejectionReason::PhonePremiumRate)
        }
        b'1'..=b'7' | b'9' => ValidationVerdict::Accepted,
        // 00 is an international dialling prefix
        _ => ValidationVerdict::rejected(
            ValidatedField::Phone,
            RejectionReason::PhoneInvalidFormat,
        ),
    }
}
