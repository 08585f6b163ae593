//! Capture record
//!
//! The top-level RadioHound record. It is validated completely when it is
//! built and not mutated afterwards. The decoded sample view is computed once
//! from `data` and `type` and is never persisted.
//!
//! Two ways in:
//! - [`CaptureRecord::from_document`]: a persisted document. Keys that are not
//!   named fields are custom fields.
//! - [`CaptureRecord::from_fields`]: already separated field values. Custom
//!   fields must sit under `custom_fields`; any other key is rejected.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Value};

use super::metadata::MetadataRecord;
use super::reader::{json_type_name, make_path, FieldReader};
use super::validators::{
    parse_timestamp, validate_base64_payload, validate_element_type, validate_mac_address,
    validate_timestamp, validate_version,
};
use crate::dtype::{decode, ElementType, ElementTypeRegistry, Samples};
use crate::errors::{FieldError, RhError, RhResult, ValidationErrors, Violation};
use crate::schema::{is_named_field, CAPTURE_FIELDS, CUSTOM_FIELDS};

/// How keys outside the named fields are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Unknown top-level keys become custom fields
    Document,
    /// Unknown top-level keys are rejected
    Strict,
}

/// One validated RadioHound capture
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    data: Vec<u8>,
    gain: f64,
    mac_address: String,
    metadata: MetadataRecord,
    sample_rate: i64,
    short_name: String,
    timestamp: DateTime<FixedOffset>,
    element_type: ElementType,
    version: String,
    custom_fields: BTreeMap<String, Value>,
    samples: Samples,
}

impl CaptureRecord {
    /// Builds a record from a persisted document.
    ///
    /// # Errors
    ///
    /// `RhError::Validation` listing every failing field.
    pub fn from_document(document: &Value, registry: &ElementTypeRegistry) -> RhResult<Self> {
        Self::build(document, registry, Mode::Document)
    }

    /// Builds a record from separated field values, rejecting any key that
    /// is not a named field or `custom_fields`.
    ///
    /// # Errors
    ///
    /// `RhError::Validation` listing every failing field.
    pub fn from_fields(fields: &Map<String, Value>, registry: &ElementTypeRegistry) -> RhResult<Self> {
        Self::build_object(fields, registry, Mode::Strict)
    }

    fn build(document: &Value, registry: &ElementTypeRegistry, mode: Mode) -> RhResult<Self> {
        match document.as_object() {
            Some(obj) => Self::build_object(obj, registry, mode),
            None => Err(rejected(vec![
                Violation::type_mismatch("object", json_type_name(document)).at("$root")
            ])),
        }
    }

    fn build_object(
        obj: &Map<String, Value>,
        registry: &ElementTypeRegistry,
        mode: Mode,
    ) -> RhResult<Self> {
        let mut reader = FieldReader::new(obj, "", CAPTURE_FIELDS);

        let custom_fields = match mode {
            Mode::Document => collect_document_custom_fields(obj, &mut reader),
            Mode::Strict => {
                reader.reject_unknown(|key| key == CUSTOM_FIELDS);
                match obj.get(CUSTOM_FIELDS) {
                    None => BTreeMap::new(),
                    Some(Value::Object(bucket)) => bucket.clone().into_iter().collect(),
                    Some(other) => {
                        reader.fail(
                            CUSTOM_FIELDS,
                            Violation::type_mismatch("object", json_type_name(other)),
                        );
                        BTreeMap::new()
                    }
                }
            }
        };
        for key in custom_fields.keys() {
            if is_named_field(key) || key == CUSTOM_FIELDS {
                reader.push(FieldError::unexpected_field(make_path(CUSTOM_FIELDS, key)));
            }
        }

        let data = reader.text_map("data", validate_base64_payload);
        let gain = reader.float("gain");
        let mac_address = reader.text_map("mac_address", validate_mac_address);
        let sample_rate = reader.int("sample_rate");
        let short_name = reader.text("short_name");
        let timestamp =
            reader.text_map("timestamp", |s| parse_timestamp(s).map(validate_timestamp));
        let element_type = reader.text_map("type", |s| validate_element_type(s, registry));
        let version = reader.text_map("version", validate_version);

        let mut metadata_errors = Vec::new();
        let metadata = reader
            .value("metadata")
            .and_then(|value| MetadataRecord::read(value, "metadata", &mut metadata_errors));

        let samples = match (&data, &element_type) {
            (Some(data), Some(ty)) => reader.check("data", decode(data, ty)),
            _ => None,
        };

        let mut errors = reader.finish();
        errors.extend(metadata_errors);

        let (
            Some(data),
            Some(gain),
            Some(mac_address),
            Some(metadata),
            Some(sample_rate),
            Some(short_name),
            Some(timestamp),
            Some(element_type),
            Some(version),
            Some(samples),
        ) = (
            data,
            gain,
            mac_address,
            metadata,
            sample_rate,
            short_name,
            timestamp,
            element_type,
            version,
            samples,
        )
        else {
            return Err(rejected(errors));
        };

        if !errors.is_empty() {
            return Err(rejected(errors));
        }

        Ok(Self {
            data,
            gain,
            mac_address: mac_address.to_string(),
            metadata,
            sample_rate,
            short_name: short_name.to_string(),
            timestamp,
            element_type,
            version: version.to_string(),
            custom_fields,
            samples,
        })
    }

    /// Persisted form: base64 payload, element-type name, RFC 3339
    /// timestamp, custom fields flattened beside the named fields. The
    /// decoded samples are not included.
    pub fn to_document(&self) -> Value {
        let mut doc: Map<String, Value> = self
            .custom_fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        doc.insert("data".into(), Value::String(STANDARD.encode(&self.data)));
        doc.insert("gain".into(), Value::from(self.gain));
        doc.insert("mac_address".into(), Value::String(self.mac_address.clone()));
        doc.insert("metadata".into(), self.metadata.to_value());
        doc.insert("sample_rate".into(), Value::from(self.sample_rate));
        doc.insert("short_name".into(), Value::String(self.short_name.clone()));
        doc.insert(
            "timestamp".into(),
            Value::String(self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        );
        doc.insert("type".into(), Value::String(self.element_type.name().to_string()));
        doc.insert("version".into(), Value::String(self.version.clone()));

        Value::Object(doc)
    }

    /// Raw payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn mac_address(&self) -> &str {
        &self.mac_address
    }

    pub fn metadata(&self) -> &MetadataRecord {
        &self.metadata
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> i64 {
        self.sample_rate
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn custom_fields(&self) -> &BTreeMap<String, Value> {
        &self.custom_fields
    }

    pub fn custom_field(&self, key: &str) -> Option<&Value> {
        self.custom_fields.get(key)
    }

    /// Payload decoded as `type` scalars
    pub fn samples(&self) -> &Samples {
        &self.samples
    }
}

/// Document mode: every key that is not a named field is a custom field.
/// A nested `custom_fields` object is merged into the bucket; a key present
/// both there and at the top level is an `UnexpectedField`.
fn collect_document_custom_fields(
    obj: &Map<String, Value>,
    reader: &mut FieldReader<'_>,
) -> BTreeMap<String, Value> {
    let mut bucket = BTreeMap::new();
    let mut nested = None;
    for (key, value) in obj {
        if is_named_field(key) {
            continue;
        }
        match (key.as_str(), value) {
            (CUSTOM_FIELDS, Value::Object(inner)) => nested = Some(inner),
            _ => {
                bucket.insert(key.clone(), value.clone());
            }
        }
    }

    for (key, value) in nested.into_iter().flatten() {
        if bucket.contains_key(key) {
            reader.push(FieldError::unexpected_field(make_path(CUSTOM_FIELDS, key)));
        } else {
            bucket.insert(key.clone(), value.clone());
        }
    }
    bucket
}

fn rejected(errors: Vec<FieldError>) -> RhError {
    ValidationErrors::from_vec(errors)
        .unwrap_or_else(|| {
            ValidationErrors::single(
                Violation::invalid_format("a complete record", "incomplete record").at("$root"),
            )
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn registry() -> ElementTypeRegistry {
        ElementTypeRegistry::builtin()
    }

    fn document() -> Value {
        json!({
            "data": "AQACAA==",
            "gain": 1.0,
            "mac_address": "0123456789ab",
            "metadata": {
                "data_type": "periodogram",
                "fmax": 2_000_000_000i64,
                "fmin": 1_000_000_000,
                "gps_lock": true,
                "nfft": 2,
                "scan_time": 0.1,
                "xcount": 2,
                "xstart": 1_000_000_000,
                "xstop": 2_000_000_000i64
            },
            "sample_rate": 24_000_000,
            "short_name": "rooftop",
            "timestamp": "2024-05-01T10:00:00.250000+00:00",
            "type": "int16",
            "version": "v0"
        })
    }

    fn validation(result: RhResult<CaptureRecord>) -> ValidationErrors {
        match result {
            Err(RhError::Validation(errs)) => errs,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_decodes_samples() {
        let record = CaptureRecord::from_document(&document(), &registry()).unwrap();
        assert_eq!(record.samples(), &Samples::Int(vec![1, 2]));
        assert_eq!(record.data(), &[1, 0, 2, 0]);
        assert_eq!(record.element_type().name(), "int16");
        assert_eq!(record.version(), "v0");
        assert!(record.custom_fields().is_empty());
    }

    #[test]
    fn test_version_defaults() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("version");
        let record = CaptureRecord::from_document(&doc, &registry()).unwrap();
        assert_eq!(record.version(), "v0");
    }

    #[test]
    fn test_document_routes_unknown_keys_to_custom_fields() {
        let mut doc = document();
        doc["antenna"] = json!({"model": "discone"});
        doc["custom_fields"] = json!({"site": 7});

        let record = CaptureRecord::from_document(&doc, &registry()).unwrap();
        assert_eq!(record.custom_field("antenna"), Some(&json!({"model": "discone"})));
        assert_eq!(record.custom_field("site"), Some(&json!(7)));
        assert_eq!(record.custom_fields().len(), 2);

        let out = record.to_document();
        assert_eq!(out["antenna"], json!({"model": "discone"}));
        assert_eq!(out["site"], json!(7));
        assert!(out.get("custom_fields").is_none());
    }

    #[test]
    fn test_strict_rejects_unknown_keys() {
        let mut fields = document().as_object().unwrap().clone();
        fields.insert("antenna".into(), json!("discone"));
        fields.insert("custom_fields".into(), json!({"site": 7}));

        let errs = validation(CaptureRecord::from_fields(&fields, &registry()));
        assert_eq!(errs.len(), 1);
        assert!(errs.has("antenna", ErrorKind::UnexpectedField));

        fields.remove("antenna");
        let record = CaptureRecord::from_fields(&fields, &registry()).unwrap();
        assert_eq!(record.custom_field("site"), Some(&json!(7)));
    }

    #[test]
    fn test_custom_field_cannot_shadow_named_field() {
        let mut fields = document().as_object().unwrap().clone();
        fields.insert("custom_fields".into(), json!({"gain": 3}));

        let errs = validation(CaptureRecord::from_fields(&fields, &registry()));
        assert!(errs.has("custom_fields.gain", ErrorKind::UnexpectedField));
    }

    #[test]
    fn test_document_key_in_both_places_rejected() {
        let mut doc = document();
        doc["site"] = json!("top");
        doc["custom_fields"] = json!({"site": "nested", "mast": 2});

        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert_eq!(errs.len(), 1);
        assert!(errs.has("custom_fields.site", ErrorKind::UnexpectedField));
    }

    #[test]
    fn test_strict_custom_fields_must_be_object() {
        let mut fields = document().as_object().unwrap().clone();
        fields.insert("custom_fields".into(), json!([1]));

        let errs = validation(CaptureRecord::from_fields(&fields, &registry()));
        assert!(errs.has("custom_fields", ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_all_failures_reported_together() {
        let mut doc = document();
        doc["mac_address"] = json!("AA:BB:CC:DD:EE:FF");
        doc["version"] = json!("1");
        doc["data"] = json!("");
        doc["type"] = json!("complex999");
        doc["metadata"]["fmin"] = json!(0);
        doc.as_object_mut().unwrap().remove("gain");

        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert_eq!(errs.len(), 6, "{}", errs);
        assert!(errs.has("mac_address", ErrorKind::InvalidFormat));
        assert!(errs.has("version", ErrorKind::InvalidFormat));
        assert!(errs.has("data", ErrorKind::EmptyPayload));
        assert!(errs.has("type", ErrorKind::UnknownVariant));
        assert!(errs.has("metadata.fmin", ErrorKind::RangeViolation));
        assert!(errs.has("gain", ErrorKind::MissingField));
    }

    #[test]
    fn test_mac_address_length() {
        let mut doc = document();
        doc["mac_address"] = json!("0123456789");
        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert!(errs.has("mac_address", ErrorKind::RangeViolation));
    }

    #[test]
    fn test_short_name_length() {
        let mut doc = document();
        doc["short_name"] = json!("x".repeat(256));
        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert!(errs.has("short_name", ErrorKind::RangeViolation));

        doc["short_name"] = json!("x".repeat(255));
        assert!(CaptureRecord::from_document(&doc, &registry()).is_ok());
    }

    #[test]
    fn test_misaligned_payload() {
        let mut doc = document();
        doc["data"] = json!(STANDARD.encode([1u8, 0, 2]));
        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert!(errs.has("data", ErrorKind::MisalignedPayload));
    }

    #[test]
    fn test_metadata_missing_and_null() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("metadata");
        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert!(errs.has("metadata", ErrorKind::MissingField));

        doc["metadata"] = Value::Null;
        let errs = validation(CaptureRecord::from_document(&doc, &registry()));
        assert!(errs.has("metadata", ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_root_must_be_object() {
        let errs = validation(CaptureRecord::from_document(&json!("record"), &registry()));
        assert!(errs.has("$root", ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_to_document_shape() {
        let record = CaptureRecord::from_document(&document(), &registry()).unwrap();
        let out = record.to_document();
        assert_eq!(out["data"], json!("AQACAA=="));
        assert_eq!(out["type"], json!("int16"));
        assert_eq!(out["timestamp"], json!("2024-05-01T10:00:00.250+00:00"));
        assert_eq!(out["metadata"], document()["metadata"]);
        assert!(out.get("samples").is_none());
    }
}
