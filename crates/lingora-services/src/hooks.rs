//! Host extension points.
//!
//! The engine calls through these interfaces and assumes nothing about
//! how many providers are registered; the host wires them up when it
//! constructs the [`Engine`](crate::Engine).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use lingora_core::{AppInfo, RawMessage, Result};

/// Yields flat message tuples from host records (workflow states,
/// custom fields, navigation labels and the like) for the template
/// build.
pub trait RecordMessageProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn messages(&self, app: &AppInfo) -> Result<Vec<RawMessage>>;
}

/// Supplies extra translated dictionaries merged into the boot
/// dictionary.
pub trait DictionaryProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn dictionary(&self, lang: &str) -> Result<HashMap<String, String>>;
}

/// Names additional files, possibly outside the app tree, to run the
/// extractors over.
pub trait ExtraFileProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn files(&self, app: &AppInfo) -> Vec<PathBuf>;
}

#[derive(Default)]
pub struct HookRegistry {
    record_providers: Vec<Arc<dyn RecordMessageProvider>>,
    dictionary_providers: Vec<Arc<dyn DictionaryProvider>>,
    extra_file_providers: Vec<Arc<dyn ExtraFileProvider>>,
}

impl HookRegistry {
    pub fn register_record_provider(&mut self, provider: Arc<dyn RecordMessageProvider>) {
        self.record_providers.push(provider);
    }

    pub fn register_dictionary_provider(&mut self, provider: Arc<dyn DictionaryProvider>) {
        self.dictionary_providers.push(provider);
    }

    pub fn register_extra_file_provider(&mut self, provider: Arc<dyn ExtraFileProvider>) {
        self.extra_file_providers.push(provider);
    }

    pub fn record_providers(&self) -> &[Arc<dyn RecordMessageProvider>] {
        &self.record_providers
    }

    pub fn dictionary_providers(&self) -> &[Arc<dyn DictionaryProvider>] {
        &self.dictionary_providers
    }

    pub fn extra_file_providers(&self) -> &[Arc<dyn ExtraFileProvider>] {
        &self.extra_file_providers
    }
}
