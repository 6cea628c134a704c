//! Extractor for grouped-navigation (workspace) documents.

use std::path::Path;

use serde_json::Value;

use lingora_core::{RawMessage, Result};

use crate::entity::{iter_objects, non_empty};
use crate::Extractor;

pub struct WorkspaceExtractor;

impl Extractor for WorkspaceExtractor {
    fn name(&self) -> &'static str {
        "workspace"
    }

    fn extract(&self, text: &str, origin: &Path) -> Result<Vec<RawMessage>> {
        let data: Value = serde_json::from_str(text)?;
        let Value::Object(doc) = data else {
            return Ok(Vec::new());
        };
        if doc.get("kind").and_then(Value::as_str) != Some("Workspace") {
            return Ok(Vec::new());
        }
        let origin = origin.to_string_lossy();
        let mut out = Vec::new();

        let Some(workspace) = non_empty(doc.get("label")) else {
            return Ok(Vec::new());
        };
        out.push(RawMessage::new(origin.as_ref(), workspace).with_comment("Name of a Workspace"));

        for chart in iter_objects(doc.get("charts")) {
            if let Some(label) = non_empty(chart.get("label")) {
                out.push(
                    RawMessage::new(origin.as_ref(), label)
                        .with_comment(format!("Label of a chart in the {workspace} Workspace")),
                );
            }
        }

        for link in iter_objects(doc.get("links")) {
            let Some(label) = non_empty(link.get("label")) else {
                continue;
            };
            let kind = link.get("type").and_then(Value::as_str).unwrap_or("Link");
            let mut msg = RawMessage::new(origin.as_ref(), label)
                .with_comment(format!("Label of a {kind} in the {workspace} Workspace"));
            // entity-targeted links disambiguate by their target
            if link.get("link_type").and_then(Value::as_str) == Some("Entity") {
                if let Some(target) = non_empty(link.get("link_to")) {
                    msg.context = Some(target.to_string());
                }
            }
            out.push(msg);
        }

        for shortcut in iter_objects(doc.get("shortcuts")) {
            let Some(label) = non_empty(shortcut.get("label")) else {
                continue;
            };
            let mut msg = RawMessage::new(origin.as_ref(), label)
                .with_comment(format!("Label of a shortcut in the {workspace} Workspace"));
            if shortcut.get("type").and_then(Value::as_str) == Some("Entity") {
                if let Some(target) = non_empty(shortcut.get("link_to")) {
                    msg.context = Some(target.to_string());
                }
            }
            out.push(msg);
        }

        Ok(out)
    }
}
