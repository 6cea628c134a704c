//! Text predicates shared by the extraction pipeline and the resolver.

use std::sync::OnceLock;

use regex::Regex;

fn markup_re() -> &'static Regex {
    static MARKUP_RE: OnceLock<Regex> = OnceLock::new();
    MARKUP_RE.get_or_init(|| Regex::new(r"<[^<>]+?>").unwrap())
}

/// Whether an extracted string is worth translating.
///
/// Deliberately conservative: anything without an alphabetic character, or
/// that looks like an icon class, a CSS length, or a formula marker, is
/// rejected. False negatives are acceptable.
pub fn is_translatable(message: &str) -> bool {
    message.chars().any(|c| c.is_ascii_alphabetic())
        && !message.starts_with("fa fa-")
        && !message.ends_with("px")
        && !message.starts_with("eval:")
}

/// Whether the message carries markup tags. Translations are keyed on
/// plain text, so markup-bearing messages are stripped before lookup.
pub fn contains_markup(message: &str) -> bool {
    markup_re().is_match(message)
}

/// Remove markup tags, keeping the text content.
pub fn strip_markup(message: &str) -> String {
    markup_re().replace_all(message, "").into_owned()
}

/// Escape percent signs so imported strings cannot collide with format
/// placeholders.
pub fn escape_percent(s: &str) -> String {
    s.replace('%', "&#37;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_accepts_plain_labels() {
        assert!(is_translatable("Submit"));
        assert!(is_translatable("Delete {0} rows?"));
    }

    #[test]
    fn heuristic_rejects_non_text() {
        assert!(!is_translatable("fa fa-home"));
        assert!(!is_translatable("eval:doc.status=='Open'"));
        assert!(!is_translatable("120px"));
        assert!(!is_translatable("42"));
        assert!(!is_translatable(""));
    }

    #[test]
    fn markup_is_detected_and_stripped() {
        assert!(contains_markup("<b>Save</b> changes"));
        assert!(!contains_markup("Save changes"));
        assert_eq!(strip_markup("<b>Save</b> changes"), "Save changes");
        assert_eq!(strip_markup("a < b and c > d"), "a < b and c > d");
    }

    #[test]
    fn percent_is_escaped() {
        assert_eq!(escape_percent("100% done"), "100&#37; done");
    }
}
