//! Locale code helpers.

/// If the passed language is a regional variant, return its base language.
///
/// `zh-TW` -> `zh`, `sr_BA` -> `sr`. Returns `None` for plain codes.
pub fn parent_language(lang: &str) -> Option<&str> {
    lang.find(['-', '_']).map(|idx| &lang[..idx])
}

/// Normalize a language code to the directory form used on disk
/// (`pt-BR` -> `pt_BR`).
pub fn normalize_locale(lang: &str) -> String {
    lang.trim().replace('-', "_")
}

/// Candidate locales for catalog loading: the direct locale first, then
/// the base language for regional variants.
pub fn locale_candidates(lang: &str) -> Vec<String> {
    let direct = normalize_locale(lang);
    let mut out = vec![direct.clone()];
    if let Some(parent) = parent_language(&direct) {
        if parent != direct {
            out.push(parent.to_string());
        }
    }
    out
}
