use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TemplateSummary {
    pub schema_version: u32,
    pub app: String,
    /// Messages in the written template, after dedup and heuristics.
    pub messages: usize,
    pub pot_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocaleSummary {
    pub schema_version: u32,
    pub app: String,
    pub locale: String,
    pub po_path: String,
    /// False when the locale catalog already existed and was skipped.
    pub created: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateSummary {
    pub schema_version: u32,
    pub app: String,
    pub locale: String,
    pub po_path: String,
    pub added: usize,
    pub obsoleted: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompileSummary {
    pub schema_version: u32,
    pub app: String,
    pub locale: String,
    pub mo_path: String,
    /// Entries carried in the compiled catalog.
    pub entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CsvImportSummary {
    pub schema_version: u32,
    pub app: String,
    pub locale: String,
    pub csv_path: String,
    pub po_path: String,
    /// Rows whose source text matched a template entry.
    pub imported: usize,
    /// Rows with no matching template entry.
    pub unmatched: usize,
}
