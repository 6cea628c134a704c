//! User-entered translation overrides.
//!
//! Overrides live in the host's record store, independent of any
//! application's catalog, and win over compiled entries in the bulk
//! dictionary. The resolver only ever reads them through the
//! [`OverrideStore`] trait; a store failure means "no overrides", never
//! an error for the caller.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use lingora_core::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub source_text: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub translated: String,
}

impl Override {
    /// Lookup key in the merged dictionary: `source` or `source:context`.
    pub fn key(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{}:{}", self.source_text, ctx),
            None => self.source_text.clone(),
        }
    }
}

pub trait OverrideStore: Send + Sync {
    fn for_language(&self, lang: &str) -> Result<Vec<Override>>;
    fn upsert(&self, entry: Override) -> Result<()>;
    /// Remove the mapping for `(source_text, lang)` regardless of context.
    fn remove(&self, source_text: &str, lang: &str) -> Result<()>;
}

/// Simple store for tests and single-process use.
#[derive(Default)]
pub struct InMemoryOverrideStore {
    entries: RwLock<Vec<Override>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverrideStore for InMemoryOverrideStore {
    fn for_language(&self, lang: &str) -> Result<Vec<Override>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| lingora_core::LingoraError::Other("override store poisoned".into()))?;
        Ok(entries.iter().filter(|o| o.language == lang).cloned().collect())
    }

    fn upsert(&self, entry: Override) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| lingora_core::LingoraError::Other("override store poisoned".into()))?;
        match entries.iter_mut().find(|o| {
            o.source_text == entry.source_text
                && o.language == entry.language
                && o.context == entry.context
        }) {
            Some(existing) => existing.translated = entry.translated,
            None => entries.push(entry),
        }
        Ok(())
    }

    fn remove(&self, source_text: &str, lang: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| lingora_core::LingoraError::Other("override store poisoned".into()))?;
        entries.retain(|o| !(o.source_text == source_text && o.language == lang));
        Ok(())
    }
}

/// JSON-file-backed store, enough for CLI use and small installations.
/// The file holds a flat array of [`Override`] records.
pub struct JsonFileOverrideStore {
    path: PathBuf,
}

impl JsonFileOverrideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Vec<Override>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        Ok(serde_json::from_reader(file)?)
    }

    fn write_all(&self, entries: &[Override]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, entries)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OverrideStore for JsonFileOverrideStore {
    fn for_language(&self, lang: &str) -> Result<Vec<Override>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|o| o.language == lang)
            .collect())
    }

    fn upsert(&self, entry: Override) -> Result<()> {
        let mut entries = self.read_all()?;
        match entries.iter_mut().find(|o| {
            o.source_text == entry.source_text
                && o.language == entry.language
                && o.context == entry.context
        }) {
            Some(existing) => existing.translated = entry.translated,
            None => entries.push(entry),
        }
        self.write_all(&entries)
    }

    fn remove(&self, source_text: &str, lang: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.retain(|o| !(o.source_text == source_text && o.language == lang));
        self.write_all(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, lang: &str, context: Option<&str>, translated: &str) -> Override {
        Override {
            source_text: source.into(),
            language: lang.into(),
            context: context.map(str::to_string),
            translated: translated.into(),
        }
    }

    #[test]
    fn upsert_replaces_matching_entry() {
        let store = InMemoryOverrideStore::new();
        store.upsert(entry("Submit", "de", None, "Absenden")).unwrap();
        store.upsert(entry("Submit", "de", None, "Einreichen")).unwrap();
        store.upsert(entry("Submit", "de", Some("form"), "Senden")).unwrap();

        let all = store.for_language("de").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].translated, "Einreichen");
    }

    #[test]
    fn remove_drops_every_context() {
        let store = InMemoryOverrideStore::new();
        store.upsert(entry("Submit", "de", None, "Absenden")).unwrap();
        store.upsert(entry("Submit", "de", Some("form"), "Senden")).unwrap();
        store.upsert(entry("Submit", "fr", None, "Envoyer")).unwrap();

        store.remove("Submit", "de").unwrap();
        assert!(store.for_language("de").unwrap().is_empty());
        assert_eq!(store.for_language("fr").unwrap().len(), 1);
    }

    #[test]
    fn json_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileOverrideStore::new(dir.path().join("overrides.json"));
        store.upsert(entry("Open", "es", Some("verb"), "Abrir")).unwrap();

        let again = JsonFileOverrideStore::new(store.path());
        let all = again.for_language("es").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].key(), "Open:verb");
    }
}
