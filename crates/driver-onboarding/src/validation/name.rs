use unicode_segmentation::UnicodeSegmentation;

use super::normalizer::normalize_text;
use super::verdict::{RejectionReason, ValidatedField, ValidationVerdict};

const MIN_NAME_CHARS: usize = 2;

/// Person names need two characters after trimming, at least one of them a letter.
/// Characters are grapheme clusters, so a decomposed `E` + combining acute counts once.
/// `char::is_alphabetic` covers accented Latin letters (`Élodie`, `Noël`).
pub fn validate_name(value: &str, field: ValidatedField) -> ValidationVerdict {
    let name = normalize_text(value);

    let long_enough = name.graphemes(true).count() >= MIN_NAME_CHARS;
    let has_letter = name.chars().any(char::is_alphabetic);

    if long_enough && has_letter {
        ValidationVerdict::Accepted
    } else {
        ValidationVerdict::rejected(field, RejectionReason::NameTooShort)
    }
}
