use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod locale;
pub mod paths;
pub mod text;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Fallback language used whenever no language is supplied or resolvable.
pub const DEFAULT_LANG: &str = "en";
/// Directory under each application root holding its catalogs.
pub const LOCALE_DIR: &str = "locale";
/// Gettext domain; one fixed value per installation.
pub const TRANSLATION_DOMAIN: &str = "messages";
/// File name of the language-neutral template catalog.
pub const POT_FILE: &str = "main.pot";
/// Shared-cache key prefix for the merged per-language dictionary.
pub const MERGED_TRANSLATION_KEY: &str = "merged_translations";
/// Shared-cache key prefix for user-entered overrides.
pub const USER_TRANSLATION_KEY: &str = "user_translations";

/// A single candidate message yielded by an extractor, before
/// deduplication and before the translatability heuristic is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Source reference the message was found in (file path or record ref).
    pub location: String,
    /// 1-based line number if known.
    pub line: Option<u32>,
    pub message: String,
    /// Disambiguating context, e.g. the owning entity name.
    pub context: Option<String>,
    /// Extraction comment describing the role of the string.
    pub comment: Option<String>,
}

impl RawMessage {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            line: None,
            message: message.into(),
            context: None,
            comment: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One installed application known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    /// Root of the application's source tree; catalogs live under
    /// `<root>/locale`.
    pub root: PathBuf,
}

impl AppInfo {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

/// Ordered list of installed applications. Registration order is the
/// resolution order: the single-message resolver returns the first app's
/// non-identity hit, the bulk resolver lets later apps overwrite earlier
/// ones.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: Vec<AppInfo>,
}

impl AppRegistry {
    pub fn new(apps: Vec<AppInfo>) -> Self {
        Self { apps }
    }

    pub fn register(&mut self, app: AppInfo) {
        self.apps.push(app);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppInfo> {
        self.apps.iter()
    }

    pub fn get(&self, name: &str) -> Option<&AppInfo> {
        self.apps.iter().find(|a| a.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Apps to operate on: the named one, or all of them.
    pub fn select(&self, name: Option<&str>) -> Vec<&AppInfo> {
        match name {
            Some(n) => self.get(n).into_iter().collect(),
            None => self.apps.iter().collect(),
        }
    }
}

/// Lightweight error type for crates that need structured failures.
#[derive(Debug, Error)]
pub enum LingoraError {
    #[error("unknown application: {0}")]
    UnknownApp(String),
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_registration_order() {
        let mut reg = AppRegistry::default();
        reg.register(AppInfo::new("frame", "/srv/frame"));
        reg.register(AppInfo::new("books", "/srv/books"));

        let names: Vec<&str> = reg.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["frame", "books"]);
        assert_eq!(reg.select(Some("books")).len(), 1);
        assert_eq!(reg.select(None).len(), 2);
        assert!(reg.select(Some("missing")).is_empty());
    }
}
