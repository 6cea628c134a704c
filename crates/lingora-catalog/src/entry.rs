use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Catalog key: `(id, context)`. Two entries with the same id but
/// different contexts are distinct messages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub id: String,
    pub context: Option<String>,
}

impl EntryKey {
    pub fn new(id: impl Into<String>, context: Option<&str>) -> Self {
        Self {
            id: id.into(),
            context: context.map(str::to_string),
        }
    }
}

/// One message in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub id: String,
    pub context: Option<String>,
    /// Empty string means untranslated.
    pub translation: String,
    /// Ordered `(source_ref, line)` pairs.
    pub locations: Vec<(String, u32)>,
    /// Extraction comments (`#.` lines).
    pub comments: Vec<String>,
    /// Entry flags, e.g. "fuzzy".
    pub flags: BTreeSet<String>,
    /// Set by update-merge when the template no longer carries this key.
    pub obsolete: bool,
}

impl MessageEntry {
    pub fn new(id: impl Into<String>, context: Option<&str>) -> Self {
        Self {
            id: id.into(),
            context: context.map(str::to_string),
            translation: String::new(),
            locations: Vec::new(),
            comments: Vec::new(),
            flags: BTreeSet::new(),
            obsolete: false,
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey {
            id: self.id.clone(),
            context: self.context.clone(),
        }
    }

    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains("fuzzy")
    }

    /// Append a location unless the exact pair is already recorded.
    pub fn push_location(&mut self, source_ref: impl Into<String>, line: u32) {
        let loc = (source_ref.into(), line);
        if !self.locations.contains(&loc) {
            self.locations.push(loc);
        }
    }

    /// Append a comment unless already present.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        if !self.comments.contains(&comment) {
            self.comments.push(comment);
        }
    }
}
