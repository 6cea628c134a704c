//! Extraction pipeline: walks source-like inputs and yields raw
//! `(message, context, location, comment)` tuples.
//!
//! Extractors are pure and stateless; the registry dispatches them by
//! glob pattern in registration order, so two runs over the same tree
//! always merge the same way. A failing input is logged and skipped,
//! never aborting the run.

mod code;
mod entity;
mod tour;
mod workspace;

pub use code::CodeExtractor;
pub use entity::EntityExtractor;
pub use tour::TourExtractor;
pub use workspace::WorkspaceExtractor;

use std::path::Path;
use std::sync::Arc;

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use lingora_core::{RawMessage, Result};

/// A pure scanner over one document.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Yield every candidate message found in `text`. `origin` is the
    /// source reference recorded on each message.
    fn extract(&self, text: &str, origin: &Path) -> Result<Vec<RawMessage>>;
}

/// Ordered mapping from glob patterns to extractors. The first matching
/// pattern wins; iteration order is registration order.
pub struct ExtractorRegistry {
    rules: Vec<(Pattern, Arc<dyn Extractor>)>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rule set, in the order template generation applies
    /// them: code scanners first, then the structured-metadata shapes.
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register("**/*.py", Arc::new(CodeExtractor::new("_")))
            .expect("static pattern");
        reg.register("**/*.js", Arc::new(CodeExtractor::new("__")))
            .expect("static pattern");
        reg.register("**/entity/*/*.json", Arc::new(EntityExtractor))
            .expect("static pattern");
        reg.register("**/tour/*/*.json", Arc::new(TourExtractor))
            .expect("static pattern");
        reg.register("**/workspace/*/*.json", Arc::new(WorkspaceExtractor))
            .expect("static pattern");
        reg
    }

    pub fn register(&mut self, pattern: &str, extractor: Arc<dyn Extractor>) -> Result<()> {
        let pattern = Pattern::new(pattern)?;
        self.rules.push((pattern, extractor));
        Ok(())
    }

    pub fn extractor_for(&self, rel_path: &Path) -> Option<&dyn Extractor> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches_path(rel_path))
            .map(|(_, extractor)| extractor.as_ref())
    }

    /// Run one file through its matching extractor, if any.
    pub fn extract_file(&self, root: &Path, path: &Path) -> Result<Vec<RawMessage>> {
        let rel = path.strip_prefix(root).unwrap_or(path);
        let Some(extractor) = self.extractor_for(rel) else {
            return Ok(Vec::new());
        };
        let text = std::fs::read_to_string(path)?;
        let origin = rel.to_string_lossy().replace('\\', "/");
        extractor.extract(&text, Path::new(&origin))
    }

    /// Walk `root` and extract from every matching file, in a stable
    /// file order. Unreadable or malformed inputs are skipped with a
    /// warning so one bad document cannot abort the whole run.
    pub fn extract_tree(&self, root: &Path) -> Vec<RawMessage> {
        let mut out = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e));

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            match self.extract_file(root, path) {
                Ok(mut messages) => {
                    if !messages.is_empty() {
                        debug!(path = %path.display(), count = messages.len(), "extracted");
                    }
                    out.append(&mut messages);
                }
                Err(err) => warn!(path = %path.display(), %err, "skipping unreadable input"),
            }
        }
        out
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    // the walk root itself is never filtered, whatever its name
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || name.starts_with('_') {
        return true;
    }
    // built assets are never a translation source
    entry.path().to_string_lossy().contains("public/dist")
}
