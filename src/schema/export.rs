//! JSON Schema export
//!
//! Walks the record definition and emits a draft 2020-12 schema document.
//! The output depends only on the definition and the registry names, never
//! on a record instance.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::info;

use super::definition::{CAPTURE_FIELDS, FORMAT_VERSION};
use super::types::{FieldDef, FieldKind, TextRules};
use crate::dtype::ElementTypeRegistry;
use crate::errors::{RhError, RhResult};
use crate::observability::Event;
use crate::record::DataType;

const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Builds the schema document for capture records.
pub fn export_schema(registry: &ElementTypeRegistry) -> Value {
    let mut defs = Map::new();
    defs.insert(
        "DataType".into(),
        json!({
            "title": "DataType",
            "description": "Data types supported by RadioHound.",
            "type": "string",
            "enum": DataType::ALL.iter().map(DataType::as_str).collect::<Vec<_>>(),
        }),
    );

    let mut root = object_schema(
        "RadioHoundData",
        "Describes a RadioHound capture.",
        CAPTURE_FIELDS,
        registry,
        &mut defs,
    );

    if let Value::Object(obj) = &mut root {
        // Custom fields are flattened beside the named fields.
        obj.insert("additionalProperties".into(), Value::Bool(true));
        obj.insert(
            "$comment".into(),
            Value::String(
                "Keys other than the named properties are custom fields that are not part of the standard schema"
                    .into(),
            ),
        );
        obj.insert("$schema".into(), Value::String(SCHEMA_DIALECT.into()));
        obj.insert("$defs".into(), Value::Object(defs));
    }

    root
}

fn object_schema(
    title: &str,
    description: &str,
    fields: &'static [FieldDef],
    registry: &ElementTypeRegistry,
    defs: &mut Map<String, Value>,
) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        properties.insert(field.name.into(), field_schema(field, registry, defs));
        if field.is_required() {
            required.push(Value::String(field.name.into()));
        }
    }

    json!({
        "title": title,
        "description": description,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(
    field: &FieldDef,
    registry: &ElementTypeRegistry,
    defs: &mut Map<String, Value>,
) -> Value {
    let mut out = Map::new();

    match field.kind {
        FieldKind::Bool => {
            out.insert("type".into(), json!("boolean"));
        }
        FieldKind::Int {
            exclusive_min,
            exclusive_max,
        } => {
            out.insert("type".into(), json!("integer"));
            if let Some(min) = exclusive_min {
                out.insert("exclusiveMinimum".into(), json!(min));
            }
            if let Some(max) = exclusive_max {
                out.insert("exclusiveMaximum".into(), json!(max));
            }
        }
        FieldKind::Float { exclusive_min } => {
            out.insert("type".into(), json!("number"));
            if let Some(min) = exclusive_min {
                out.insert("exclusiveMinimum".into(), json!(min));
            }
        }
        FieldKind::Text(rules) => {
            out.insert("type".into(), json!("string"));
            text_constraints(&rules, &mut out);
        }
        FieldKind::DataType => {
            out.insert("$ref".into(), json!("#/$defs/DataType"));
        }
        FieldKind::ElementType => {
            out.insert("type".into(), json!("string"));
            out.insert("enum".into(), json!(registry.names().collect::<Vec<_>>()));
        }
        FieldKind::Object {
            title,
            description,
            fields,
        } => {
            let nested = object_schema(title, description, fields, registry, defs);
            defs.insert(title.into(), nested);
            out.insert("$ref".into(), Value::String(format!("#/$defs/{}", title)));
        }
    }

    out.insert("description".into(), json!(field.description));
    if let Some(default) = field.default {
        out.insert("default".into(), json!(default));
    }

    Value::Object(out)
}

fn text_constraints(rules: &TextRules, out: &mut Map<String, Value>) {
    if let Some(min) = rules.min_length {
        out.insert("minLength".into(), json!(min));
    }
    if let Some(max) = rules.max_length {
        out.insert("maxLength".into(), json!(max));
    }
    if let Some(pattern) = rules.pattern {
        out.insert("pattern".into(), json!(pattern));
    }
    if let Some(format) = rules.format {
        out.insert("format".into(), json!(format));
    }
    if let Some(encoding) = rules.content_encoding {
        out.insert("contentEncoding".into(), json!(encoding));
    }
}

/// Location of the schema file for `version` under `dir`
pub fn schema_path(dir: &Path, version: &str) -> PathBuf {
    dir.join(version).join("schema.json")
}

/// Writes the schema to `<dir>/<FORMAT_VERSION>/schema.json`, creating
/// directories as needed. Returns the written path.
pub fn write_schema(dir: &Path, registry: &ElementTypeRegistry) -> RhResult<PathBuf> {
    let path = schema_path(dir, FORMAT_VERSION);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RhError::io(parent, e))?;
    }

    let content = crate::record::to_indented_json(&export_schema(registry))?;
    fs::write(&path, content).map_err(|e| RhError::io(&path, e))?;

    info!(event = %Event::SchemaExported, path = %path.display(), version = FORMAT_VERSION);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn schema() -> Value {
        export_schema(&ElementTypeRegistry::builtin())
    }

    #[test]
    fn test_top_level_required() {
        let schema = schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["data", "gain", "mac_address", "metadata", "sample_rate", "short_name", "timestamp", "type"]
        );
        assert_eq!(schema["additionalProperties"], json!(true));
    }

    #[test]
    fn test_version_default_and_pattern() {
        let schema = schema();
        let version = &schema["properties"]["version"];
        assert_eq!(version["default"], json!("v0"));
        assert_eq!(version["pattern"], json!("^v[0-9]+$"));
        assert_eq!(version["maxLength"], json!(255));
    }

    #[test]
    fn test_mac_address_constraints() {
        let schema = schema();
        let mac = &schema["properties"]["mac_address"];
        assert_eq!(mac["minLength"], json!(12));
        assert_eq!(mac["maxLength"], json!(12));
        assert_eq!(mac["pattern"], json!("^[0-9A-Fa-f]+$"));
    }

    #[test]
    fn test_metadata_is_closed_ref() {
        let schema = schema();
        assert_eq!(schema["properties"]["metadata"]["$ref"], json!("#/$defs/Metadata"));
        let metadata = &schema["$defs"]["Metadata"];
        assert_eq!(metadata["additionalProperties"], json!(false));
        assert_eq!(metadata["properties"]["fmin"]["exclusiveMinimum"], json!(0));
        assert_eq!(metadata["properties"]["fmin"]["exclusiveMaximum"], json!(i64::MAX));
        assert_eq!(metadata["properties"]["scan_time"]["exclusiveMinimum"], json!(0.0));
    }

    #[test]
    fn test_type_enumerates_registry() {
        let schema = schema();
        let names = schema["properties"]["type"]["enum"].as_array().unwrap();
        assert!(names.contains(&json!("int16")));
        assert!(names.contains(&json!("complex128")));
        assert!(!names.contains(&json!("complex999")));
    }

    #[test]
    fn test_write_schema_layout() {
        let tmp = TempDir::new().unwrap();
        let path = write_schema(tmp.path(), &ElementTypeRegistry::builtin()).unwrap();
        assert_eq!(path, tmp.path().join("v0").join("schema.json"));

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, schema());
    }
}
