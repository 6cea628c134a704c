//! Runtime translation resolution.
//!
//! Everything request-scoped is carried by an explicit
//! [`TranslationContext`] threaded through the calls; the only shared
//! piece is the injected [`SharedCache`], which gives all worker
//! processes one authoritative view of the merged per-language
//! dictionaries.

mod cache;
mod lang;
mod overrides;
mod resolver;

pub use cache::{Dict, MemoryCache, SharedCache};
pub use lang::{
    select_language, with_language, KnownLanguages, LanguageGuard, RequestSignals,
};
pub use overrides::{
    InMemoryOverrideStore, JsonFileOverrideStore, Override, OverrideStore,
};
pub use resolver::{
    all_translations, app_translations, apply_override_edits, clear_cache, translate,
    translations_for, user_translations,
};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use lingora_catalog::CompiledCatalog;
use lingora_core::{locale, paths, AppRegistry, DEFAULT_LANG};
use tracing::debug;

/// Per-process handle bundling everything resolution needs: the current
/// language, the ordered application registry, the user-override store
/// and the shared cache. Never a hidden global; construct one and pass
/// it along.
pub struct TranslationContext {
    pub lang: String,
    pub apps: AppRegistry,
    pub overrides: Arc<dyn OverrideStore>,
    pub cache: Arc<dyn SharedCache>,
    /// Compiled catalogs already read from disk this process. Keyed by
    /// file path; `None` records a missing or unreadable file so it is
    /// not retried on every lookup.
    compiled: Mutex<HashMap<PathBuf, Option<Arc<CompiledCatalog>>>>,
}

impl TranslationContext {
    pub fn new(
        apps: AppRegistry,
        overrides: Arc<dyn OverrideStore>,
        cache: Arc<dyn SharedCache>,
    ) -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            apps,
            overrides,
            cache,
            compiled: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_language(&mut self, lang: &str) {
        self.lang = lang.to_string();
    }

    /// Load the compiled catalog for one app and language, trying the
    /// direct locale first and the base language for regional variants.
    /// Any load failure degrades to "no catalog".
    pub(crate) fn compiled_catalog(
        &self,
        app_root: &std::path::Path,
        lang: &str,
    ) -> Option<Arc<CompiledCatalog>> {
        for candidate in locale::locale_candidates(lang) {
            let path = paths::mo_path(app_root, &candidate);
            if let Some(catalog) = self.compiled_at(&path) {
                return Some(catalog);
            }
        }
        None
    }

    pub(crate) fn compiled_at(&self, path: &std::path::Path) -> Option<Arc<CompiledCatalog>> {
        let mut cache = self.compiled.lock().ok()?;
        if let Some(cached) = cache.get(path) {
            return cached.clone();
        }
        let loaded = match CompiledCatalog::load(path) {
            Ok(catalog) => Some(Arc::new(catalog)),
            Err(err) => {
                debug!(path = %path.display(), %err, "compiled catalog unavailable");
                None
            }
        };
        cache.insert(path.to_path_buf(), loaded.clone());
        loaded
    }

    /// Forget loaded compiled catalogs, e.g. after recompilation.
    pub fn invalidate_compiled(&self) {
        if let Ok(mut cache) = self.compiled.lock() {
            cache.clear();
        }
    }
}
