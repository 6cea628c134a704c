//! Extractor for entity-definition documents.
//!
//! An entity definition is a JSON object describing a record type: its
//! fields (label, description, options), its links to other entities,
//! and its permission rules. Field-level strings get the entity name as
//! translation context; role names stay context-free because the same
//! role is shared across entities.

use std::path::Path;

use serde_json::Value;

use lingora_core::{RawMessage, Result};

use crate::Extractor;

pub struct EntityExtractor;

impl Extractor for EntityExtractor {
    fn name(&self) -> &'static str {
        "entity"
    }

    fn extract(&self, text: &str, origin: &Path) -> Result<Vec<RawMessage>> {
        let data: Value = serde_json::from_str(text)?;
        let Value::Object(doc) = data else {
            return Ok(Vec::new());
        };
        let origin = origin.to_string_lossy();
        let mut out = Vec::new();

        let Some(entity) = doc.get("name").and_then(Value::as_str) else {
            return Ok(Vec::new());
        };
        out.push(RawMessage::new(origin.as_ref(), entity).with_comment("Name of an Entity"));

        let contextual = |message: &str, comment: String, out: &mut Vec<RawMessage>| {
            out.push(
                RawMessage::new(origin.as_ref(), message)
                    .with_context(entity)
                    .with_comment(comment),
            );
        };

        for field in iter_objects(doc.get("fields")) {
            let fieldtype = field.get("fieldtype").and_then(Value::as_str).unwrap_or("Data");

            if let Some(label) = non_empty(field.get("label")) {
                contextual(
                    label,
                    format!("Label of a {fieldtype} field in Entity '{entity}'"),
                    &mut out,
                );
            }
            if let Some(description) = non_empty(field.get("description")) {
                contextual(
                    description,
                    format!("Description of a {fieldtype} field in Entity '{entity}'"),
                    &mut out,
                );
            }
            if let Some(options) = non_empty(field.get("options")) {
                match fieldtype {
                    "Select" => {
                        let choices: Vec<&str> = options
                            .lines()
                            .filter(|o| !o.is_empty() && !o.chars().all(|c| c.is_ascii_digit()))
                            .collect();
                        // icon pickers carry class names, not text
                        if choices.first().is_some_and(|first| first.contains("icon")) {
                            continue;
                        }
                        for choice in choices {
                            contextual(
                                choice,
                                format!("Option for a Select field in Entity '{entity}'"),
                                &mut out,
                            );
                        }
                    }
                    "HTML" => contextual(
                        options,
                        format!("Content of an HTML field in Entity '{entity}'"),
                        &mut out,
                    ),
                    _ => {}
                }
            }
        }

        for link in iter_objects(doc.get("links")) {
            if let Some(group) = non_empty(link.get("group")) {
                contextual(group, format!("Group in {entity}'s connections"), &mut out);
            }
            if let Some(linked) = non_empty(link.get("link_entity")) {
                contextual(linked, format!("Linked Entity in {entity}'s connections"), &mut out);
            }
        }

        for perm in iter_objects(doc.get("permissions")) {
            if let Some(role) = non_empty(perm.get("role")) {
                out.push(RawMessage::new(origin.as_ref(), role).with_comment("Name of a role"));
            }
        }

        Ok(out)
    }
}

pub(crate) fn iter_objects(
    value: Option<&Value>,
) -> impl Iterator<Item = &serde_json::Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .map(|v| v.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_object)
}

pub(crate) fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(json: &str) -> Vec<RawMessage> {
        EntityExtractor
            .extract(json, Path::new("entity/invoice/invoice.json"))
            .unwrap()
    }

    #[test]
    fn extracts_labels_with_entity_context() {
        let doc = r#"{
            "name": "Invoice",
            "fields": [
                {"fieldtype": "Data", "label": "Customer", "description": "Billed party"},
                {"fieldtype": "Select", "label": "Status", "options": "Draft\nPaid\n3"},
                {"fieldtype": "HTML", "options": "<b>Terms apply</b>"}
            ],
            "links": [{"group": "Payments", "link_entity": "Payment"}],
            "permissions": [{"role": "Accounts User"}]
        }"#;
        let messages = extract(doc);

        let name = &messages[0];
        assert_eq!(name.message, "Invoice");
        assert_eq!(name.context, None);
        assert_eq!(name.comment.as_deref(), Some("Name of an Entity"));

        let label = messages.iter().find(|m| m.message == "Customer").unwrap();
        assert_eq!(label.context.as_deref(), Some("Invoice"));
        assert_eq!(
            label.comment.as_deref(),
            Some("Label of a Data field in Entity 'Invoice'")
        );

        // select options, minus the digit-only one
        assert!(messages.iter().any(|m| m.message == "Draft"));
        assert!(messages.iter().any(|m| m.message == "Paid"));
        assert!(!messages.iter().any(|m| m.message == "3"));

        let role = messages.iter().find(|m| m.message == "Accounts User").unwrap();
        assert_eq!(role.context, None);

        assert!(messages.iter().any(|m| m.message == "Payment"));
    }

    #[test]
    fn icon_option_lists_are_skipped() {
        let doc = r#"{
            "name": "Theme",
            "fields": [{"fieldtype": "Select", "options": "icon-sun\nicon-moon"}]
        }"#;
        assert_eq!(extract(doc).len(), 1);
    }

    #[test]
    fn arrays_and_nameless_documents_yield_nothing() {
        assert!(extract("[1, 2, 3]").is_empty());
        assert!(extract(r#"{"fields": []}"#).is_empty());
    }
}
