//! In-memory message catalogs plus their two on-disk forms: the textual
//! PO format (authoritative, human-edited) and the compiled MO format
//! (derived, regenerated whenever the PO changes).

mod catalog;
mod entry;
pub mod mo;
pub mod po;

pub use catalog::{Catalog, CatalogMetadata, UpdateStats};
pub use entry::{EntryKey, MessageEntry};
pub use mo::CompiledCatalog;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("PO parse error at line {line}: {message}")]
    PoParse { line: usize, message: String },
    #[error("invalid MO data: {0}")]
    Mo(String),
}
