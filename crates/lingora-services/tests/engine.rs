//! End-to-end catalog lifecycle: extract -> template -> locale ->
//! translate -> update -> compile -> resolve.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use lingora_catalog::po::{self, WriteOptions};
use lingora_core::{paths, AppInfo, AppRegistry, RawMessage, Result};
use lingora_resolve::{InMemoryOverrideStore, MemoryCache, TranslationContext};
use lingora_services::{DictionaryProvider, Engine, ExtraFileProvider, RecordMessageProvider};

fn seed_app(root: &Path) {
    fs::create_dir_all(root.join("entity/invoice")).unwrap();
    fs::write(
        root.join("page.js"),
        r#"
        let save = __("Save");
        let open = __("Open", null, "verb");
        let icon = __("fa fa-home");
        "#,
    )
    .unwrap();
    fs::write(
        root.join("entity/invoice/invoice.json"),
        r#"{
            "name": "Invoice",
            "fields": [{"fieldtype": "Data", "label": "Customer"}]
        }"#,
    )
    .unwrap();
}

fn engine_for(root: &Path) -> Engine {
    let registry = AppRegistry::new(vec![AppInfo::new("frame", root)]);
    Engine::new(registry)
}

fn resolve_context(root: &Path) -> TranslationContext {
    TranslationContext::new(
        AppRegistry::new(vec![AppInfo::new("frame", root)]),
        Arc::new(InMemoryOverrideStore::new()),
        Arc::new(MemoryCache::default()),
    )
}

#[test]
fn template_collects_code_and_metadata_messages() {
    let dir = tempfile::tempdir().unwrap();
    seed_app(dir.path());

    let summaries = engine_for(dir.path()).generate_template(None).unwrap();
    assert_eq!(summaries.len(), 1);

    let template = po::read_po_file(&paths::pot_path(dir.path())).unwrap().unwrap();
    assert!(template.get("Save", None).is_some());
    assert!(template.get("Open", Some("verb")).is_some());
    assert!(template.get("Invoice", None).is_some());
    assert!(template.get("Customer", Some("Invoice")).is_some());
    // heuristic: icon classes never make it into the template
    assert!(template.get("fa fa-home", None).is_none());
}

#[test]
fn full_lifecycle_to_resolution() {
    let dir = tempfile::tempdir().unwrap();
    seed_app(dir.path());
    let engine = engine_for(dir.path());

    engine.generate_template(None).unwrap();
    let created = engine.new_locale("de", None).unwrap();
    assert!(created[0].created);
    // second run skips
    assert!(!engine.new_locale("de", None).unwrap()[0].created);

    // translate one entry by editing the PO, the way a translator would
    let po_path = paths::po_path(dir.path(), "de");
    let mut catalog = po::read_po_file(&po_path).unwrap().unwrap();
    catalog.get_mut("Save", None).unwrap().translation = "Speichern".into();
    po::write_po_file(&po_path, &catalog, WriteOptions::default()).unwrap();

    engine.compile(None, Some("de")).unwrap();
    assert!(paths::mo_path(dir.path(), "de").exists());

    let ctx = resolve_context(dir.path());
    assert_eq!(lingora_resolve::translate(&ctx, "Save", None, "de"), "Speichern");
    assert_eq!(lingora_resolve::translate(&ctx, "Open", None, "de"), "Open");
}

#[test]
fn update_marks_vanished_messages_obsolete() {
    let dir = tempfile::tempdir().unwrap();
    seed_app(dir.path());
    let engine = engine_for(dir.path());

    engine.generate_template(None).unwrap();
    engine.new_locale("de", None).unwrap();

    let po_path = paths::po_path(dir.path(), "de");
    let mut catalog = po::read_po_file(&po_path).unwrap().unwrap();
    catalog.get_mut("Save", None).unwrap().translation = "Speichern".into();
    po::write_po_file(&po_path, &catalog, WriteOptions::default()).unwrap();

    // the source changes: "Save" disappears, "Store" appears
    fs::write(dir.path().join("page.js"), r#"let x = __("Store");"#).unwrap();
    engine.generate_template(None).unwrap();
    let summaries = engine.update(None, Some("de")).unwrap();
    assert!(summaries[0].added >= 1);
    assert!(summaries[0].obsoleted >= 1);

    let merged = po::read_po_file(&po_path).unwrap().unwrap();
    let save = merged.get("Save", None).unwrap();
    assert!(save.obsolete);
    assert_eq!(save.translation, "Speichern");
    assert!(!merged.get("Store", None).unwrap().obsolete);
}

#[test]
fn csv_import_fills_translations_per_context() {
    let dir = tempfile::tempdir().unwrap();
    seed_app(dir.path());
    let engine = engine_for(dir.path());
    engine.generate_template(None).unwrap();

    fs::create_dir_all(dir.path().join("translations")).unwrap();
    fs::write(
        dir.path().join("translations/de.csv"),
        "Save,Speichern\nOpen,Öffnen,verb\n100% sure,100% sicher\n",
    )
    .unwrap();

    let summaries = engine.migrate(None).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].imported, 2);
    assert_eq!(summaries[0].unmatched, 1);

    let catalog = po::read_po_file(&paths::po_path(dir.path(), "de")).unwrap().unwrap();
    assert_eq!(catalog.get("Save", None).unwrap().translation, "Speichern");
    assert_eq!(catalog.get("Open", Some("verb")).unwrap().translation, "Öffnen");
}

struct NavbarProvider;

impl RecordMessageProvider for NavbarProvider {
    fn name(&self) -> &'static str {
        "navbar"
    }

    fn messages(&self, _app: &AppInfo) -> Result<Vec<RawMessage>> {
        Ok(vec![
            RawMessage::new("Navbar:", "Pending").with_comment("Label of a Navbar Item"),
            RawMessage::new("Workflow: Sales", "Pending").with_context("Workflow: Sales"),
        ])
    }
}

#[test]
fn record_messages_are_deduplicated_by_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path()).unwrap();
    let mut engine = engine_for(dir.path());
    engine
        .hooks_mut()
        .register_record_provider(Arc::new(NavbarProvider));

    engine.generate_template(None).unwrap();
    let template = po::read_po_file(&paths::pot_path(dir.path())).unwrap().unwrap();

    // both tuples share the text "Pending"; only the first in sorted
    // order survives, context and all
    assert_eq!(template.len(), 1);
    let entry = template.entries().next().unwrap();
    assert_eq!(entry.id, "Pending");
    assert_eq!(entry.context, None);
}

struct BundledAssets {
    file: std::path::PathBuf,
}

impl ExtraFileProvider for BundledAssets {
    fn name(&self) -> &'static str {
        "bundled-assets"
    }

    fn files(&self, _app: &AppInfo) -> Vec<std::path::PathBuf> {
        vec![self.file.clone()]
    }
}

#[test]
fn extra_files_outside_the_app_tree_are_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let app_root = dir.path().join("apps/frame");
    fs::create_dir_all(&app_root).unwrap();

    let shared = dir.path().join("assets/shared.js");
    fs::create_dir_all(shared.parent().unwrap()).unwrap();
    fs::write(&shared, r#"let t = __("Shared label");"#).unwrap();

    let mut engine = engine_for(&app_root);
    engine
        .hooks_mut()
        .register_extra_file_provider(Arc::new(BundledAssets { file: shared }));

    engine.generate_template(None).unwrap();
    let template = po::read_po_file(&paths::pot_path(&app_root)).unwrap().unwrap();
    assert!(template.get("Shared label", None).is_some());
}

struct CountryProvider;

impl DictionaryProvider for CountryProvider {
    fn name(&self) -> &'static str {
        "countries"
    }

    fn dictionary(&self, lang: &str) -> Result<HashMap<String, String>> {
        let mut out = HashMap::new();
        if lang == "de" {
            out.insert("Germany".into(), "Deutschland".into());
        }
        Ok(out)
    }
}

#[test]
fn boot_dictionary_layers_hook_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_for(dir.path());
    engine
        .hooks_mut()
        .register_dictionary_provider(Arc::new(CountryProvider));

    let ctx = resolve_context(dir.path());
    let dict = engine.boot_dictionary(&ctx, "de");
    assert_eq!(dict.get("Germany").map(String::as_str), Some("Deutschland"));
}
