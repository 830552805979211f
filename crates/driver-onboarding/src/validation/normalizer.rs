//! Canonical forms for raw applicant input. Nothing here fails: malformed values pass
//! through so the field validators can reject them with a precise reason.

const INVISIBLE: [char; 3] = ['\u{feff}', '\u{200b}', '\u{00ad}'];
const PHONE_SEPARATORS: [char; 5] = ['.', '-', '(', ')', '/'];

/// Trim, drop invisible characters, and collapse inner whitespace runs.
pub fn normalize_text(raw: &str) -> String {
    let cleaned = raw.replace(INVISIBLE, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip whitespace and common formatting separators from a phone number.
///
/// A leading `+` and any letters are kept so international or garbage input still fails
/// the format rule instead of being silently coerced into a national number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !PHONE_SEPARATORS.contains(c) && !INVISIBLE.contains(c))
        .collect()
}

pub fn normalize_email(raw: &str) -> String {
    raw.replace(INVISIBLE, "").trim().to_lowercase()
}

/// SIRET codes are commonly written in 3-3-3-5 groups; only whitespace is removed.
pub fn normalize_siret(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !INVISIBLE.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_drops_spaces_dots_and_dashes() {
        assert_eq!(normalize_phone(" 06 12.34-56 78 "), "0612345678");
        assert_eq!(normalize_phone("(01) 23 45 67 89"), "0123456789");
    }

    #[test]
    fn phone_keeps_international_prefix_and_letters() {
        assert_eq!(normalize_phone("+33 6 12 34 56 78"), "+33612345678");
        assert_eq!(normalize_phone("ddd"), "ddd");
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Jean.Dupont@GMail.com\u{feff} "),
            "jean.dupont@gmail.com"
        );
    }

    #[test]
    fn text_collapses_whitespace() {
        assert_eq!(normalize_text("  Jean \u{200b}  Pierre "), "Jean Pierre");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn siret_groups_are_joined() {
        assert_eq!(normalize_siret("732 829 320 00074"), "73282932000074");
        assert_eq!(normalize_siret("abcd1234567890"), "abcd1234567890");
    }
}
