//! High-level orchestration over the catalog, extraction and resolution
//! crates. Exposes the stable operations the CLI (or any host front
//! end) drives: template generation, locale creation, update-merge,
//! compilation and CSV import.
//!
//! These are offline, administrative operations: errors surface to the
//! invoker instead of degrading silently, and any successful write
//! invalidates the shared resolution cache.

mod csv_import;
mod hooks;
mod locales;
mod template;

pub use hooks::{DictionaryProvider, ExtraFileProvider, HookRegistry, RecordMessageProvider};

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use lingora_core::{
    AppInfo, AppRegistry, LingoraError, Result, MERGED_TRANSLATION_KEY, USER_TRANSLATION_KEY,
};
use lingora_domain::{
    CompileSummary, CsvImportSummary, LocaleSummary, TemplateSummary, UpdateSummary,
};
use lingora_extract::ExtractorRegistry;
use lingora_resolve::{Dict, SharedCache, TranslationContext};

/// The engine bundles the application registry, the extractor rules and
/// the host-registered hooks. The shared cache is optional; when
/// present, every write operation signals the worker fleet by deleting
/// the cached dictionaries.
pub struct Engine {
    apps: AppRegistry,
    extractors: ExtractorRegistry,
    hooks: HookRegistry,
    cache: Option<Arc<dyn SharedCache>>,
}

impl Engine {
    pub fn new(apps: AppRegistry) -> Self {
        Self {
            apps,
            extractors: ExtractorRegistry::standard(),
            hooks: HookRegistry::default(),
            cache: None,
        }
    }

    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn SharedCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    fn select_apps(&self, app: Option<&str>) -> Result<Vec<&AppInfo>> {
        if let Some(name) = app {
            return match self.apps.get(name) {
                Some(info) => Ok(vec![info]),
                None => Err(LingoraError::UnknownApp(name.to_string()).into()),
            };
        }
        Ok(self.apps.iter().collect())
    }

    /// Generate the language-neutral template for one app or all apps.
    pub fn generate_template(&self, app: Option<&str>) -> Result<Vec<TemplateSummary>> {
        let mut out = Vec::new();
        for info in self.select_apps(app)? {
            out.push(template::generate(self, info)?);
        }
        Ok(out)
    }

    /// Seed a locale catalog from the template. Existing catalogs are
    /// left untouched and reported with `created: false`.
    pub fn new_locale(&self, locale: &str, app: Option<&str>) -> Result<Vec<LocaleSummary>> {
        let mut out = Vec::new();
        for info in self.select_apps(app)? {
            out.push(locales::new_locale(info, locale)?);
        }
        Ok(out)
    }

    /// Merge each locale catalog against the latest template.
    pub fn update(&self, app: Option<&str>, locale: Option<&str>) -> Result<Vec<UpdateSummary>> {
        let mut out = Vec::new();
        for info in self.select_apps(app)? {
            out.extend(locales::update(info, locale)?);
        }
        self.invalidate();
        Ok(out)
    }

    /// Compile locale catalogs to their binary form.
    pub fn compile(&self, app: Option<&str>, locale: Option<&str>) -> Result<Vec<CompileSummary>> {
        let mut out = Vec::new();
        for info in self.select_apps(app)? {
            out.extend(locales::compile(info, locale)?);
        }
        self.invalidate();
        Ok(out)
    }

    /// Import a three-column CSV of community translations for one
    /// locale.
    pub fn import_csv(
        &self,
        locale: &str,
        app: Option<&str>,
        csv_path: Option<&Path>,
    ) -> Result<Vec<CsvImportSummary>> {
        let mut out = Vec::new();
        for info in self.select_apps(app)? {
            out.push(csv_import::import(info, locale, csv_path)?);
        }
        self.invalidate();
        Ok(out)
    }

    /// Import every `translations/*.csv` file shipped by the app(s),
    /// deriving each locale from the file stem.
    pub fn migrate(&self, app: Option<&str>) -> Result<Vec<CsvImportSummary>> {
        let mut out = Vec::new();
        for info in self.select_apps(app)? {
            out.extend(csv_import::migrate(info)?);
        }
        self.invalidate();
        Ok(out)
    }

    /// The dictionary a client needs at boot: the merged per-language
    /// dictionary plus whatever the registered dictionary hooks supply.
    /// Hook failures degrade to "no extra entries".
    pub fn boot_dictionary(&self, ctx: &TranslationContext, lang: &str) -> Dict {
        let mut dict = lingora_resolve::all_translations(ctx, lang);
        for provider in self.hooks.dictionary_providers() {
            match provider.dictionary(lang) {
                Ok(extra) => dict.extend(extra),
                Err(err) => warn!(provider = provider.name(), %err, "dictionary hook failed"),
            }
        }
        dict
    }

    /// Cross-process invalidation signal: drop every cached dictionary.
    /// Locale codes on disk and requested language tags differ
    /// (`es_GT` vs `es-GT`), so writers clear all languages rather than
    /// guessing key forms.
    fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.delete_prefix(&format!("{MERGED_TRANSLATION_KEY}:"));
            cache.delete_prefix(&format!("{USER_TRANSLATION_KEY}:"));
        }
    }
}
