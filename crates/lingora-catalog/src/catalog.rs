use std::collections::BTreeMap;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::entry::{EntryKey, MessageEntry};
use lingora_core::TRANSLATION_DOMAIN;

const PO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

/// Header metadata carried in the empty-msgid entry of a PO file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub project: Option<String>,
    /// Maintainer address; doubles as bug address and last translator.
    pub maintainer: Option<String>,
    pub copyright_holder: Option<String>,
    pub language_team: Option<String>,
    pub creation_date: Option<String>,
    pub revision_date: Option<String>,
}

impl CatalogMetadata {
    /// Fresh metadata stamped with the current local time.
    pub fn stamped_now() -> Self {
        let now = Local::now().format(PO_DATE_FORMAT).to_string();
        Self {
            creation_date: Some(now.clone()),
            revision_date: Some(now),
            ..Self::default()
        }
    }

    pub fn touch_revision(&mut self) {
        self.revision_date = Some(Local::now().format(PO_DATE_FORMAT).to_string());
    }
}

/// Counters returned by [`Catalog::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub added: usize,
    pub obsoleted: usize,
    pub kept: usize,
}

/// All messages for one application and one locale, or the
/// language-neutral template when `locale` is `None`.
///
/// Entries are held in a sorted map keyed by `(id, context)` so every
/// serialization of the same catalog comes out in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub domain: String,
    pub locale: Option<String>,
    pub metadata: CatalogMetadata,
    entries: BTreeMap<EntryKey, MessageEntry>,
}

impl Catalog {
    pub fn new(locale: Option<&str>) -> Self {
        Self {
            domain: TRANSLATION_DOMAIN.to_string(),
            locale: locale.map(str::to_string),
            metadata: CatalogMetadata::stamped_now(),
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str, context: Option<&str>) -> Option<&MessageEntry> {
        self.entries.get(&EntryKey::new(id, context))
    }

    pub fn get_mut(&mut self, id: &str, context: Option<&str>) -> Option<&mut MessageEntry> {
        self.entries.get_mut(&EntryKey::new(id, context))
    }

    /// Contexts under which `id` appears, in sorted order.
    pub fn contexts_of(&self, id: &str) -> Vec<Option<&str>> {
        self.entries
            .values()
            .filter(|e| e.id == id)
            .map(|e| e.context.as_deref())
            .collect()
    }

    /// Entries in deterministic `(id, context)` order.
    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.values()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut MessageEntry> {
        self.entries.values_mut()
    }

    /// Insert a fully-formed entry, replacing any previous one under the
    /// same key. Used by the PO reader; extraction goes through [`add`].
    ///
    /// [`add`]: Catalog::add
    pub fn insert(&mut self, entry: MessageEntry) {
        self.entries.insert(entry.key(), entry);
    }

    /// Add an extracted message. Idempotent: adding an existing
    /// `(id, context)` appends the new locations and comments instead of
    /// duplicating the entry.
    pub fn add(
        &mut self,
        message: &str,
        context: Option<&str>,
        locations: &[(String, u32)],
        comments: &[String],
    ) -> &mut MessageEntry {
        let key = EntryKey::new(message, context);
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| MessageEntry::new(message, context));
        for (path, line) in locations {
            entry.push_location(path.clone(), *line);
        }
        for comment in comments {
            entry.push_comment(comment.clone());
        }
        entry
    }

    /// Structural merge against a newer template.
    ///
    /// Every template key is ensured present (new keys start with a blank
    /// translation); locations and comments are refreshed from the
    /// template; keys no longer in the template are marked obsolete, never
    /// deleted, so existing translation work survives.
    pub fn update(&mut self, template: &Catalog) -> UpdateStats {
        let mut stats = UpdateStats::default();

        for tpl in template.entries() {
            if tpl.obsolete {
                continue;
            }
            match self.entries.get_mut(&tpl.key()) {
                Some(existing) => {
                    existing.locations = tpl.locations.clone();
                    existing.comments = tpl.comments.clone();
                    existing.obsolete = false;
                    stats.kept += 1;
                }
                None => {
                    let mut entry = MessageEntry::new(&tpl.id, tpl.context.as_deref());
                    entry.locations = tpl.locations.clone();
                    entry.comments = tpl.comments.clone();
                    self.entries.insert(entry.key(), entry);
                    stats.added += 1;
                }
            }
        }

        for (key, entry) in self.entries.iter_mut() {
            if !entry.obsolete && template.entries.get(key).map_or(true, |t| t.obsolete) {
                entry.obsolete = true;
                stats.obsoleted += 1;
            }
        }

        self.metadata.touch_revision();
        stats
    }

    /// Copy of this catalog re-labelled for `locale`, used when seeding a
    /// new locale catalog from the template.
    pub fn for_locale(&self, locale: &str) -> Catalog {
        let mut out = self.clone();
        out.locale = Some(locale.to_string());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(path: &str, line: u32) -> Vec<(String, u32)> {
        vec![(path.to_string(), line)]
    }

    #[test]
    fn add_is_idempotent_and_collects_locations() {
        let mut cat = Catalog::new(None);
        cat.add("Submit", None, &loc("a.js", 3), &[]);
        cat.add("Submit", None, &loc("b.js", 9), &["Button label".into()]);

        assert_eq!(cat.len(), 1);
        let entry = cat.get("Submit", None).unwrap();
        assert_eq!(
            entry.locations,
            vec![("a.js".to_string(), 3), ("b.js".to_string(), 9)]
        );
        assert_eq!(entry.comments, vec!["Button label".to_string()]);
    }

    #[test]
    fn same_id_different_context_stays_distinct() {
        let mut cat = Catalog::new(None);
        cat.add("May", None, &[], &[]);
        cat.add("May", Some("month"), &[], &[]);
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.contexts_of("May"), vec![None, Some("month")]);
    }

    #[test]
    fn update_merges_against_template() {
        let mut template = Catalog::new(None);
        template.add("A", None, &loc("x.js", 1), &[]);
        template.add("B", None, &loc("x.js", 2), &[]);
        template.add("C", None, &loc("x.js", 3), &[]);

        let mut locale = Catalog::new(Some("de"));
        locale.add("A", None, &loc("old.js", 1), &[]);
        locale.get_mut("A", None).unwrap().translation = "Ah".into();
        locale.add("D", None, &loc("old.js", 9), &[]);
        locale.get_mut("D", None).unwrap().translation = "Deh".into();

        let stats = locale.update(&template);
        assert_eq!(stats.added, 2);
        assert_eq!(stats.obsoleted, 1);

        let a = locale.get("A", None).unwrap();
        assert_eq!(a.translation, "Ah");
        assert!(!a.obsolete);
        assert_eq!(a.locations, vec![("x.js".to_string(), 1)]);

        assert!(!locale.get("B", None).unwrap().is_translated());
        assert!(!locale.get("C", None).unwrap().is_translated());

        let d = locale.get("D", None).unwrap();
        assert!(d.obsolete);
        assert_eq!(d.translation, "Deh");
    }
}
