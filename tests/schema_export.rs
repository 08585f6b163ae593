//! Schema Export Tests
//!
//! The exported JSON Schema mirrors the record definition:
//! - metadata lists exactly its nine fields with their bounds
//! - top-level constraints (length, pattern, encoding, default) are present
//! - element-type names come from the registry
//! - the schema file lands under <dir>/<version>/schema.json

use std::fs;

use radiohound::dtype::{CatalogEntry, ScalarKind};
use radiohound::schema::{export_schema, write_schema, FORMAT_VERSION};
use radiohound::ElementTypeRegistry;
use serde_json::{json, Value};
use tempfile::TempDir;

fn builtin_schema() -> Value {
    export_schema(&ElementTypeRegistry::builtin())
}

/// Metadata declares exactly the nine named fields, all required.
#[test]
fn test_metadata_has_exactly_nine_fields() {
    let schema = builtin_schema();
    let metadata = &schema["$defs"]["Metadata"];

    let mut names: Vec<&str> = metadata["properties"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec!["data_type", "fmax", "fmin", "gps_lock", "nfft", "scan_time", "xcount", "xstart", "xstop"]
    );
    assert_eq!(metadata["required"].as_array().unwrap().len(), 9);
    assert_eq!(metadata["additionalProperties"], false);
}

/// Each bounded metadata field carries its numeric bounds.
#[test]
fn test_metadata_bounds() {
    let schema = builtin_schema();
    let props = &schema["$defs"]["Metadata"]["properties"];

    for name in ["fmax", "fmin", "xcount", "xstart", "xstop"] {
        assert_eq!(props[name]["type"], "integer", "{}", name);
        assert_eq!(props[name]["exclusiveMinimum"], 0, "{}", name);
        assert_eq!(props[name]["exclusiveMaximum"], json!(i64::MAX), "{}", name);
    }
    assert_eq!(props["nfft"]["exclusiveMinimum"], 0);
    assert!(props["nfft"].get("exclusiveMaximum").is_none());
    assert_eq!(props["scan_time"]["type"], "number");
    assert_eq!(props["scan_time"]["exclusiveMinimum"], 0.0);
    assert_eq!(props["gps_lock"]["type"], "boolean");
    assert_eq!(props["data_type"]["$ref"], "#/$defs/DataType");
}

/// Data-type variants are enumerated.
#[test]
fn test_data_type_enum() {
    let schema = builtin_schema();
    assert_eq!(schema["$defs"]["DataType"]["enum"], json!(["periodogram"]));
}

/// Top-level string constraints are exported.
#[test]
fn test_top_level_constraints() {
    let schema = builtin_schema();
    let props = &schema["properties"];

    assert_eq!(props["mac_address"]["minLength"], 12);
    assert_eq!(props["mac_address"]["maxLength"], 12);
    assert_eq!(props["mac_address"]["pattern"], "^[0-9A-Fa-f]+$");
    assert_eq!(props["version"]["pattern"], "^v[0-9]+$");
    assert_eq!(props["version"]["default"], "v0");
    assert_eq!(props["short_name"]["maxLength"], 255);
    assert_eq!(props["data"]["contentEncoding"], "base64");
    assert_eq!(props["data"]["minLength"], 1);
    assert_eq!(props["timestamp"]["format"], "date-time");
    assert_eq!(props["metadata"]["$ref"], "#/$defs/Metadata");
}

/// Version is the only optional named field; custom fields are allowed.
#[test]
fn test_required_and_open_top_level() {
    let schema = builtin_schema();
    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(required.len(), 8);
    assert!(!required.contains(&"version"));
    assert_eq!(schema["additionalProperties"], true);
}

/// Element-type names follow the registry in sorted order.
#[test]
fn test_element_types_follow_registry() {
    let registry = ElementTypeRegistry::from_catalog(vec![
        CatalogEntry::new("uint8", ScalarKind::Uint, 1),
        CatalogEntry::new("complex64", ScalarKind::Complex, 8),
    ])
    .unwrap();
    let schema = export_schema(&registry);
    assert_eq!(schema["properties"]["type"]["enum"], json!(["complex64", "uint8"]));

    let builtin = builtin_schema();
    assert_eq!(builtin["properties"]["type"]["enum"].as_array().unwrap().len(), 14);
}

/// The export does not depend on anything but the definition and registry.
#[test]
fn test_export_is_deterministic() {
    assert_eq!(builtin_schema(), builtin_schema());
}

/// The schema file is written under the format version directory.
#[test]
fn test_write_schema_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_schema(tmp.path(), &ElementTypeRegistry::builtin()).unwrap();

    assert_eq!(path, tmp.path().join(FORMAT_VERSION).join("schema.json"));
    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, builtin_schema());
}
