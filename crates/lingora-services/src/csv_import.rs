//! Bulk import of community translations from three-column CSV files:
//! source text, translated text, optional context.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use lingora_catalog::po::{self, WriteOptions};
use lingora_catalog::Catalog;
use lingora_core::locale::normalize_locale;
use lingora_core::text::escape_percent;
use lingora_core::{paths, AppInfo, LingoraError, Result};
use lingora_domain::{CsvImportSummary, SCHEMA_VERSION};

fn default_csv_path(app: &AppInfo, locale: &str) -> PathBuf {
    // shipped files use the dashed form of the locale
    app.root
        .join("translations")
        .join(format!("{}.csv", locale.replace('_', "-")))
}

pub(crate) fn import(
    app: &AppInfo,
    locale: &str,
    csv_path: Option<&Path>,
) -> Result<CsvImportSummary> {
    let normalized = normalize_locale(locale);
    let csv_path = csv_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_csv_path(app, &normalized));
    if !csv_path.exists() {
        return Err(LingoraError::Other(format!(
            "translation CSV not found: {}",
            csv_path.display()
        ))
        .into());
    }

    let mut catalog =
        po::read_po_file(&paths::pot_path(&app.root))?.unwrap_or_else(|| Catalog::new(None));

    // contexts each source text appears under, so context-free rows can
    // fan out to every variant
    let mut contexts: HashMap<String, Vec<Option<String>>> = HashMap::new();
    for entry in catalog.entries() {
        contexts
            .entry(entry.id.clone())
            .or_default()
            .push(entry.context.clone());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&csv_path)?;

    let mut imported = 0usize;
    let mut unmatched = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            continue;
        }
        // percent signs are escaped on the way in so imported text can
        // never collide with format placeholders
        let source = escape_percent(&record[0]);
        let translated = escape_percent(&record[1]);
        let context = record.get(2).filter(|c| !c.is_empty());

        let mut matched = false;
        match context {
            Some(ctx) => {
                if let Some(entry) = catalog.get_mut(&source, Some(ctx)) {
                    entry.translation = translated.clone();
                    matched = true;
                }
            }
            None => {
                // apply to every context the source appears under
                for ctx in contexts.get(&source).cloned().unwrap_or_default() {
                    if let Some(entry) = catalog.get_mut(&source, ctx.as_deref()) {
                        entry.translation = translated.clone();
                        matched = true;
                    }
                }
            }
        }
        if matched {
            imported += 1;
        } else {
            unmatched += 1;
        }
    }

    let po_path = paths::po_path(&app.root, &normalized);
    catalog.locale = Some(normalized.clone());
    po::write_po_file(&po_path, &catalog, WriteOptions::default())?;
    info!(app = %app.name, locale = %normalized, imported, unmatched,
        path = %po_path.display(), "CSV imported");

    Ok(CsvImportSummary {
        schema_version: SCHEMA_VERSION,
        app: app.name.clone(),
        locale: normalized,
        csv_path: csv_path.display().to_string(),
        po_path: po_path.display().to_string(),
        imported,
        unmatched,
    })
}

/// Import every `translations/*.csv` the app ships, deriving the locale
/// from each file stem.
pub(crate) fn migrate(app: &AppInfo) -> Result<Vec<CsvImportSummary>> {
    let dir = app.root.join("translations");
    let mut out = Vec::new();
    if !dir.is_dir() {
        return Ok(out);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    for file in files {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        out.push(import(app, stem, Some(&file))?);
    }
    Ok(out)
}
