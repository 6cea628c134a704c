//! Template generation: extractors over the source tree, plus flat
//! messages from host records, deduplicated and merged into the POT.

use tracing::{info, warn};

use lingora_catalog::po::{self, WriteOptions};
use lingora_catalog::Catalog;
use lingora_core::text::is_translatable;
use lingora_core::{paths, AppInfo, RawMessage, Result};
use lingora_domain::{TemplateSummary, SCHEMA_VERSION};

use crate::Engine;

pub(crate) fn generate(engine: &Engine, app: &AppInfo) -> Result<TemplateSummary> {
    let pot_path = paths::pot_path(&app.root);

    // keep the metadata of an existing template, start the entries fresh
    let mut catalog = Catalog::new(None);
    if let Some(existing) = po::read_po_file(&pot_path)? {
        catalog.metadata = existing.metadata;
    }
    if catalog.metadata.project.is_none() {
        catalog.metadata.project = Some(app.name.clone());
    }

    let mut extracted = engine.extractors.extract_tree(&app.root);
    for provider in engine.hooks.extra_file_providers() {
        for path in provider.files(app) {
            match engine.extractors.extract_file(&app.root, &path) {
                Ok(mut messages) => extracted.append(&mut messages),
                Err(err) => {
                    warn!(provider = provider.name(), path = %path.display(), %err,
                        "skipping extra file")
                }
            }
        }
    }
    for msg in &extracted {
        if !accepted(msg) {
            continue;
        }
        catalog.add(
            &msg.message,
            msg.context.as_deref(),
            &[(msg.location.clone(), msg.line.unwrap_or(1))],
            msg.comment.as_ref().map(std::slice::from_ref).unwrap_or(&[]),
        );
    }

    // flat record messages: dedup by message text alone, first
    // occurrence in sorted order wins, before context plays any role
    let mut flat = Vec::new();
    for provider in engine.hooks.record_providers() {
        flat.extend(provider.messages(app)?);
    }
    for msg in deduplicate_messages(flat) {
        if !accepted(&msg) {
            continue;
        }
        let mut comments = vec![format!("{}:{}", msg.location, msg.line.unwrap_or(1))];
        if let Some(comment) = &msg.comment {
            comments.push(comment.clone());
        }
        catalog.add(&msg.message, msg.context.as_deref(), &[], &comments);
    }

    po::write_po_file(&pot_path, &catalog, WriteOptions::default())?;
    info!(app = %app.name, messages = catalog.len(), path = %pot_path.display(),
        "template written");

    Ok(TemplateSummary {
        schema_version: SCHEMA_VERSION,
        app: app.name.clone(),
        messages: catalog.len(),
        pot_path: pot_path.display().to_string(),
    })
}

fn accepted(msg: &RawMessage) -> bool {
    let text = msg.message.trim();
    !text.is_empty() && is_translatable(text)
}

/// Collapse flat messages by message text: stable sort on the text,
/// first occurrence per text wins. Context is deliberately not part of
/// the key, so context-distinguished duplicates sharing text collapse
/// too.
pub(crate) fn deduplicate_messages(mut messages: Vec<RawMessage>) -> Vec<RawMessage> {
    messages.sort_by(|a, b| a.message.cmp(&b.message));
    messages.dedup_by(|current, retained| current.message == retained.message);
    messages
}
