//! Message resolution.
//!
//! Two resolution surfaces with deliberately different override orders:
//!
//! * [`translate`] — single message, first registered app with a
//!   non-identity translation wins, context-qualified lookups before
//!   context-free ones within the same app.
//! * [`all_translations`] — merged per-language dictionary, later apps
//!   overwrite earlier ones, user overrides on top.
//!
//! Both orderings are part of the public contract. Resolution never
//! fails; every error path falls back to the input message.

use std::borrow::Cow;

use tracing::debug;

use lingora_core::text::{contains_markup, strip_markup};
use lingora_core::{DEFAULT_LANG, MERGED_TRANSLATION_KEY, USER_TRANSLATION_KEY};

use crate::cache::Dict;
use crate::overrides::Override;
use crate::TranslationContext;

/// Resolve one message. Infallible: on any miss or internal failure the
/// (markup-stripped) input comes back unchanged.
///
/// User overrides are not consulted here; they apply to the bulk
/// dictionary, which is what user-facing clients resolve against.
pub fn translate(
    ctx: &TranslationContext,
    message: &str,
    context: Option<&str>,
    lang: &str,
) -> String {
    let lang = if lang.is_empty() { DEFAULT_LANG } else { lang };

    let trimmed = message.trim();
    let msg: Cow<'_, str> = if contains_markup(trimmed) {
        Cow::Owned(strip_markup(trimmed))
    } else {
        Cow::Borrowed(trimmed)
    };

    for app in ctx.apps.iter() {
        let Some(catalog) = ctx.compiled_catalog(&app.root, lang) else {
            continue;
        };
        if let Some(wanted) = context {
            if let Some(hit) = catalog.lookup_with_context(wanted, &msg) {
                if !hit.is_empty() && hit != msg {
                    return hit.to_string();
                }
            }
        }
        if let Some(hit) = catalog.lookup(&msg) {
            if !hit.is_empty() && hit != msg {
                return hit.to_string();
            }
        }
    }

    msg.into_owned()
}

/// The flattened dictionary for `lang` from every app's compiled
/// catalog, without user overrides. Later apps overwrite earlier ones.
///
/// For a regional variant the base language is loaded first so the
/// variant's entries override it. The default language carries no
/// catalogs, so it yields an empty dictionary.
pub fn app_translations(ctx: &TranslationContext, lang: &str) -> Dict {
    let mut out = Dict::new();
    if lang.is_empty() || lang == DEFAULT_LANG {
        return out;
    }

    for app in ctx.apps.iter() {
        let mut candidates = lingora_core::locale::locale_candidates(lang);
        candidates.reverse(); // base language first, variant overrides
        for candidate in candidates {
            let path = lingora_core::paths::mo_path(&app.root, &candidate);
            let Some(catalog) = ctx.compiled_at(&path) else {
                continue;
            };
            for (context, id, value) in catalog.iter() {
                let key = match context {
                    Some(ctx_str) => format!("{id}:{ctx_str}"),
                    None => id.to_string(),
                };
                out.insert(key, value.to_string());
            }
        }
    }
    out
}

/// User overrides for `lang` as a dictionary keyed `source` or
/// `source:context`. Store failures are swallowed: no overrides.
pub fn user_translations(ctx: &TranslationContext, lang: &str) -> Dict {
    if lang.is_empty() {
        return Dict::new();
    }
    let key = format!("{USER_TRANSLATION_KEY}:{lang}");
    ctx.cache.get_or_insert_with(&key, &|| {
        match ctx.overrides.for_language(lang) {
            Ok(entries) => entries
                .into_iter()
                .map(|o| (o.key(), o.translated))
                .collect(),
            Err(err) => {
                debug!(%lang, %err, "override store unavailable");
                Dict::new()
            }
        }
    })
}

/// The complete merged dictionary for `lang`: all apps' catalogs plus
/// user overrides, memoized in the shared cache.
pub fn all_translations(ctx: &TranslationContext, lang: &str) -> Dict {
    if lang.is_empty() {
        return Dict::new();
    }
    let key = format!("{MERGED_TRANSLATION_KEY}:{lang}");
    ctx.cache.get_or_insert_with(&key, &|| {
        let mut merged = app_translations(ctx, lang);
        merged.extend(user_translations(ctx, lang));
        merged
    })
}

/// Filter the merged dictionary down to the given `(message, context)`
/// pairs, including the context-qualified keys. Used to seed a
/// client-side dictionary for a known message list.
pub fn translations_for(
    ctx: &TranslationContext,
    lang: &str,
    messages: &[(&str, Option<&str>)],
) -> Dict {
    let full = all_translations(ctx, lang);
    let mut out = Dict::new();
    for (message, context) in messages {
        if let Some(hit) = full.get(*message) {
            out.insert((*message).to_string(), hit.clone());
        }
        if let Some(ctx_str) = context {
            let key = format!("{message}:{ctx_str}");
            if let Some(hit) = full.get(&key) {
                out.insert(key, hit.clone());
            }
        }
    }
    out
}

/// Record user edits for one source text: non-empty values are
/// upserted, empty values delete the language's mapping. Markup-bearing
/// sources are stripped first, matching lookup keying. Clears the
/// affected cache entries.
pub fn apply_override_edits(
    ctx: &TranslationContext,
    source_text: &str,
    edits: &[(String, String)],
) -> lingora_core::Result<()> {
    let source: Cow<'_, str> = if contains_markup(source_text) {
        Cow::Owned(strip_markup(source_text))
    } else {
        Cow::Borrowed(source_text)
    };

    for (lang, translated) in edits {
        if translated.is_empty() {
            ctx.overrides.remove(&source, lang)?;
        } else {
            ctx.overrides.upsert(Override {
                source_text: source.to_string(),
                language: lang.clone(),
                context: None,
                translated: translated.clone(),
            })?;
        }
        clear_cache(ctx, Some(lang));
    }
    Ok(())
}

/// Drop the cached dictionaries for one language, or for all languages
/// when `lang` is `None`. Writers call this after any catalog or
/// override change; deletion is the cross-process invalidation signal.
pub fn clear_cache(ctx: &TranslationContext, lang: Option<&str>) {
    match lang {
        Some(lang) => {
            ctx.cache.delete(&format!("{MERGED_TRANSLATION_KEY}:{lang}"));
            ctx.cache.delete(&format!("{USER_TRANSLATION_KEY}:{lang}"));
        }
        None => {
            ctx.cache.delete_prefix(&format!("{MERGED_TRANSLATION_KEY}:"));
            ctx.cache.delete_prefix(&format!("{USER_TRANSLATION_KEY}:"));
        }
    }
    ctx.invalidate_compiled();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lingora_catalog::{mo, Catalog};
    use lingora_core::{paths, AppInfo, AppRegistry};

    use super::*;
    use crate::cache::MemoryCache;
    use crate::overrides::InMemoryOverrideStore;

    fn write_catalog(root: &std::path::Path, locale: &str, entries: &[(&str, Option<&str>, &str)]) {
        let mut cat = Catalog::new(Some(locale));
        for (id, context, translation) in entries {
            cat.add(id, *context, &[], &[]);
            cat.get_mut(id, *context).unwrap().translation = (*translation).to_string();
        }
        mo::write_mo_file(&paths::mo_path(root, locale), &cat).unwrap();
    }

    fn context_with(apps: Vec<AppInfo>) -> TranslationContext {
        TranslationContext::new(
            AppRegistry::new(apps),
            Arc::new(InMemoryOverrideStore::new()),
            Arc::new(MemoryCache::default()),
        )
    }

    #[test]
    fn identity_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        assert_eq!(translate(&ctx, "Submit", None, "de"), "Submit");
        assert_eq!(translate(&ctx, "  Submit  ", None, ""), "Submit");
    }

    #[test]
    fn markup_is_stripped_before_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "de", &[("Save changes", None, "Änderungen speichern")]);
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        assert_eq!(
            translate(&ctx, "<b>Save</b> changes", None, "de"),
            "Änderungen speichern"
        );
    }

    #[test]
    fn first_registered_app_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_catalog(a.path(), "de", &[("Submit", None, "Absenden")]);
        write_catalog(b.path(), "de", &[("Submit", None, "Einreichen")]);

        let ctx = context_with(vec![
            AppInfo::new("first", a.path()),
            AppInfo::new("second", b.path()),
        ]);
        assert_eq!(translate(&ctx, "Submit", None, "de"), "Absenden");
    }

    #[test]
    fn context_lookup_beats_context_free_in_same_app() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(
            dir.path(),
            "de",
            &[("May", None, "Kann"), ("May", Some("month"), "Mai")],
        );
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        assert_eq!(translate(&ctx, "May", Some("month"), "de"), "Mai");
        assert_eq!(translate(&ctx, "May", None, "de"), "Kann");
        // unknown context falls back to the context-free entry
        assert_eq!(translate(&ctx, "May", Some("verb"), "de"), "Kann");
    }

    #[test]
    fn regional_variant_falls_back_to_base_language() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "es", &[("Submit", None, "Enviar")]);
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        assert_eq!(translate(&ctx, "Submit", None, "es-GT"), "Enviar");
    }

    #[test]
    fn bulk_dictionary_prefers_later_apps_and_overrides() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_catalog(a.path(), "de", &[("Submit", None, "Absenden")]);
        write_catalog(b.path(), "de", &[("Submit", None, "Einreichen")]);

        let ctx = context_with(vec![
            AppInfo::new("first", a.path()),
            AppInfo::new("second", b.path()),
        ]);
        // opposite of the single-message order: the later app wins
        assert_eq!(
            all_translations(&ctx, "de").get("Submit").map(String::as_str),
            Some("Einreichen")
        );

        ctx.overrides
            .upsert(Override {
                source_text: "Submit".into(),
                language: "de".into(),
                context: None,
                translated: "Schicken".into(),
            })
            .unwrap();
        clear_cache(&ctx, Some("de"));
        assert_eq!(
            all_translations(&ctx, "de").get("Submit").map(String::as_str),
            Some("Schicken")
        );
    }

    #[test]
    fn variant_entries_override_base_in_bulk() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(
            dir.path(),
            "es",
            &[("Submit", None, "Enviar"), ("Cancel", None, "Cancelar")],
        );
        write_catalog(dir.path(), "es_GT", &[("Submit", None, "Mandar")]);

        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        let dict = all_translations(&ctx, "es-GT");
        assert_eq!(dict.get("Submit").map(String::as_str), Some("Mandar"));
        assert_eq!(dict.get("Cancel").map(String::as_str), Some("Cancelar"));
    }

    #[test]
    fn default_language_has_no_app_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "en", &[("Submit", None, "SUBMIT")]);
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        assert!(app_translations(&ctx, "en").is_empty());
        assert!(all_translations(&ctx, "").is_empty());
    }

    #[test]
    fn context_entries_get_qualified_keys_in_bulk() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(
            dir.path(),
            "de",
            &[("May", Some("month"), "Mai"), ("May", None, "Kann")],
        );
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        let dict = all_translations(&ctx, "de");
        assert_eq!(dict.get("May:month").map(String::as_str), Some("Mai"));
        assert_eq!(dict.get("May").map(String::as_str), Some("Kann"));
    }

    #[test]
    fn translations_for_selects_requested_messages() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(
            dir.path(),
            "de",
            &[
                ("Submit", None, "Absenden"),
                ("May", Some("month"), "Mai"),
                ("Cancel", None, "Abbrechen"),
            ],
        );
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);
        let dict = translations_for(
            &ctx,
            "de",
            &[("Submit", None), ("May", Some("month")), ("Unknown", None)],
        );
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("May:month").map(String::as_str), Some("Mai"));
    }

    #[test]
    fn override_edits_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with(vec![AppInfo::new("frame", dir.path())]);

        apply_override_edits(
            &ctx,
            "<p>Welcome</p>",
            &[("de".into(), "Willkommen".into()), ("fr".into(), "Bienvenue".into())],
        )
        .unwrap();
        assert_eq!(
            all_translations(&ctx, "de").get("Welcome").map(String::as_str),
            Some("Willkommen")
        );

        apply_override_edits(&ctx, "Welcome", &[("de".into(), String::new())]).unwrap();
        assert!(all_translations(&ctx, "de").get("Welcome").is_none());
    }
}
