//! Locale catalog lifecycle: seed from the template, merge against a
//! newer template, compile to the binary form.

use tracing::{info, warn};

use lingora_catalog::po::{self, WriteOptions};
use lingora_catalog::{mo, Catalog};
use lingora_core::locale::normalize_locale;
use lingora_core::{paths, AppInfo, Result};
use lingora_domain::{CompileSummary, LocaleSummary, UpdateSummary, SCHEMA_VERSION};

pub(crate) fn new_locale(app: &AppInfo, locale: &str) -> Result<LocaleSummary> {
    let locale = normalize_locale(locale);
    let po_path = paths::po_path(&app.root, &locale);

    if po_path.exists() {
        info!(app = %app.name, %locale, "locale catalog exists, skipping");
        return Ok(LocaleSummary {
            schema_version: SCHEMA_VERSION,
            app: app.name.clone(),
            locale,
            po_path: po_path.display().to_string(),
            created: false,
        });
    }

    let template =
        po::read_po_file(&paths::pot_path(&app.root))?.unwrap_or_else(|| Catalog::new(None));
    let catalog = template.for_locale(&locale);
    po::write_po_file(&po_path, &catalog, WriteOptions::default())?;
    info!(app = %app.name, %locale, path = %po_path.display(), "locale catalog created");

    Ok(LocaleSummary {
        schema_version: SCHEMA_VERSION,
        app: app.name.clone(),
        locale,
        po_path: po_path.display().to_string(),
        created: true,
    })
}

fn target_locales(app: &AppInfo, locale: Option<&str>) -> Vec<String> {
    match locale {
        Some(locale) => vec![normalize_locale(locale)],
        None => paths::locales(&app.root),
    }
}

pub(crate) fn update(app: &AppInfo, locale: Option<&str>) -> Result<Vec<UpdateSummary>> {
    let template =
        po::read_po_file(&paths::pot_path(&app.root))?.unwrap_or_else(|| Catalog::new(None));
    let mut out = Vec::new();

    for locale in target_locales(app, locale) {
        let po_path = paths::po_path(&app.root, &locale);
        let mut catalog =
            po::read_po_file(&po_path)?.unwrap_or_else(|| Catalog::new(Some(&locale)));
        let stats = catalog.update(&template);
        po::write_po_file(&po_path, &catalog, WriteOptions::default())?;
        info!(app = %app.name, %locale, added = stats.added, obsoleted = stats.obsoleted,
            "locale catalog updated");

        out.push(UpdateSummary {
            schema_version: SCHEMA_VERSION,
            app: app.name.clone(),
            locale,
            po_path: po_path.display().to_string(),
            added: stats.added,
            obsoleted: stats.obsoleted,
            kept: stats.kept,
        });
    }
    Ok(out)
}

pub(crate) fn compile(app: &AppInfo, locale: Option<&str>) -> Result<Vec<CompileSummary>> {
    let mut out = Vec::new();

    for locale in target_locales(app, locale) {
        let po_path = paths::po_path(&app.root, &locale);
        let catalog = match po::read_po_file(&po_path)? {
            Some(catalog) => catalog,
            None => {
                warn!(app = %app.name, %locale, "no textual catalog, compiling empty");
                Catalog::new(Some(&locale))
            }
        };
        let mo_path = paths::mo_path(&app.root, &locale);
        mo::write_mo_file(&mo_path, &catalog)?;

        let entries = catalog
            .entries()
            .filter(|e| e.is_translated() && !e.is_fuzzy() && !e.obsolete)
            .count();
        info!(app = %app.name, %locale, entries, path = %mo_path.display(), "compiled");

        out.push(CompileSummary {
            schema_version: SCHEMA_VERSION,
            app: app.name.clone(),
            locale,
            mo_path: mo_path.display().to_string(),
            entries,
        });
    }
    Ok(out)
}
