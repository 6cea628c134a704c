//! Extractor for guided-tour documents.

use std::path::Path;

use serde_json::Value;

use lingora_core::{RawMessage, Result};

use crate::entity::{iter_objects, non_empty};
use crate::Extractor;

pub struct TourExtractor;

impl Extractor for TourExtractor {
    fn name(&self) -> &'static str {
        "tour"
    }

    fn extract(&self, text: &str, origin: &Path) -> Result<Vec<RawMessage>> {
        let data: Value = serde_json::from_str(text)?;
        let Value::Object(doc) = data else {
            return Ok(Vec::new());
        };
        if doc.get("kind").and_then(Value::as_str) != Some("Tour") {
            return Ok(Vec::new());
        }
        let origin = origin.to_string_lossy();
        let mut out = Vec::new();

        let Some(tour) = non_empty(doc.get("name")) else {
            return Ok(Vec::new());
        };
        out.push(RawMessage::new(origin.as_ref(), tour).with_comment("Name of a guided tour"));

        if let Some(title) = non_empty(doc.get("title")) {
            out.push(RawMessage::new(origin.as_ref(), title).with_comment("Title of a guided tour"));
        }
        if let Some(view) = non_empty(doc.get("view_name")) {
            out.push(RawMessage::new(origin.as_ref(), view).with_comment("View name of a guided tour"));
        }

        for step in iter_objects(doc.get("steps")) {
            for (field, role) in [
                ("title", "Title"),
                ("description", "Description"),
                ("label", "Label"),
                ("ondemand_description", "On-demand description"),
            ] {
                if let Some(value) = non_empty(step.get(field)) {
                    out.push(
                        RawMessage::new(origin.as_ref(), value)
                            .with_context(tour)
                            .with_comment(format!("{role} of a step of the '{tour}' tour")),
                    );
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tour_steps_with_context() {
        let doc = r#"{
            "kind": "Tour",
            "name": "Onboarding",
            "title": "Getting Started",
            "view_name": "Workspaces",
            "steps": [
                {"title": "Pick a module", "description": "Choose where to begin"},
                {"label": "Next"}
            ]
        }"#;
        let messages = TourExtractor
            .extract(doc, Path::new("tour/onboarding/onboarding.json"))
            .unwrap();

        assert_eq!(messages[0].message, "Onboarding");
        assert!(messages.iter().any(|m| m.message == "Getting Started"));

        let step = messages.iter().find(|m| m.message == "Pick a module").unwrap();
        assert_eq!(step.context.as_deref(), Some("Onboarding"));

        let label = messages.iter().find(|m| m.message == "Next").unwrap();
        assert_eq!(label.context.as_deref(), Some("Onboarding"));
    }

    #[test]
    fn non_tour_documents_are_ignored() {
        assert!(TourExtractor
            .extract(r#"{"kind": "Workspace"}"#, Path::new("tour/x/x.json"))
            .unwrap()
            .is_empty());
    }
}
