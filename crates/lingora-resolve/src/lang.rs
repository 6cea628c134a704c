//! Request-language selection and scoped language overrides.

use std::collections::HashMap;

use lingora_core::locale::parent_language;

use crate::TranslationContext;

/// Language-preference signals of the current request, supplied by the
/// host's HTTP layer.
pub trait RequestSignals {
    /// Explicit `_lang` query parameter, if any.
    fn query_lang(&self) -> Option<String>;
    /// `preferred_language` cookie, if any.
    fn cookie_lang(&self) -> Option<String>;
    /// Parsed `Accept-Language` header values, best first.
    fn accept_languages(&self) -> Vec<String>;
    fn is_authenticated(&self) -> bool;
    /// The authenticated user's stored language preference.
    fn user_lang(&self) -> Option<String>;
}

/// The set of enabled language codes, with optional full-name aliases
/// ("german" -> "de") for resolving explicit query parameters.
#[derive(Debug, Clone, Default)]
pub struct KnownLanguages {
    codes: Vec<String>,
    aliases: HashMap<String, String>,
}

impl KnownLanguages {
    pub fn new(codes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            aliases: HashMap::new(),
        }
    }

    pub fn with_alias(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), code.into());
        self
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Resolve a code or a full name to an enabled code.
    pub fn resolve(&self, code_or_name: &str) -> Option<String> {
        if self.contains(code_or_name) {
            return Some(code_or_name.to_string());
        }
        self.aliases.get(code_or_name).cloned()
    }
}

/// Pick the request language. Priority order:
///
/// 1. explicit query parameter (code or full name, then its base language)
/// 2. the authenticated user's stored preference
/// 3. cookie, then the cookie's base language
/// 4. each Accept-Language value, then its base language
/// 5. the configured default
pub fn select_language(
    signals: &dyn RequestSignals,
    known: &KnownLanguages,
    default_lang: &str,
) -> String {
    if let Some(query) = signals.query_lang() {
        if let Some(code) = known
            .resolve(&query)
            .or_else(|| parent_language(&query).and_then(|p| known.resolve(p)))
        {
            return code;
        }
    }

    if signals.is_authenticated() {
        if let Some(lang) = signals.user_lang() {
            return lang;
        }
        return default_lang.to_string();
    }

    if let Some(cookie) = signals.cookie_lang() {
        if known.contains(&cookie) {
            return cookie;
        }
        if let Some(parent) = parent_language(&cookie) {
            if known.contains(parent) {
                return parent.to_string();
            }
        }
    }

    for lang in signals.accept_languages() {
        if known.contains(&lang) {
            return lang;
        }
        if let Some(parent) = parent_language(&lang) {
            if known.contains(parent) {
                return parent.to_string();
            }
        }
    }

    default_lang.to_string()
}

/// Scoped language override: installs `lang` on the context and
/// restores the prior value when dropped, on every exit path including
/// unwinding. The "render in language X" pattern.
pub struct LanguageGuard<'a> {
    ctx: &'a mut TranslationContext,
    prior: String,
}

impl<'a> LanguageGuard<'a> {
    pub fn install(ctx: &'a mut TranslationContext, lang: &str) -> Self {
        let prior = std::mem::replace(&mut ctx.lang, lang.to_string());
        Self { ctx, prior }
    }

    pub fn context(&self) -> &TranslationContext {
        self.ctx
    }
}

impl Drop for LanguageGuard<'_> {
    fn drop(&mut self) {
        self.ctx.lang = std::mem::take(&mut self.prior);
    }
}

/// Run `f` with `lang` installed on the context, restoring the previous
/// language afterwards.
pub fn with_language<T>(
    ctx: &mut TranslationContext,
    lang: &str,
    f: impl FnOnce(&TranslationContext) -> T,
) -> T {
    let guard = LanguageGuard::install(ctx, lang);
    f(guard.context())
}
