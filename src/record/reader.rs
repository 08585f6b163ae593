//! Field extraction against a definition table
//!
//! Validation semantics:
//! - required fields must be present, absent optional fields take their default
//! - null is never accepted
//! - integers must be JSON integers, floats accept any JSON number
//! - bounds, lengths and patterns come from the field table
//! - every failure is recorded; reading never stops early

use serde_json::{Map, Value};

use super::metadata::DataType;
use super::validators::validate_data_type;
use crate::errors::{FieldError, Violation};
use crate::schema::{find, FieldDef, FieldKind, TextRules};

/// JSON type name for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn make_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Reads typed values out of one JSON object, collecting failures.
pub(crate) struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    prefix: &'a str,
    fields: &'static [FieldDef],
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(obj: &'a Map<String, Value>, prefix: &'a str, fields: &'static [FieldDef]) -> Self {
        Self {
            obj,
            prefix,
            fields,
            errors: Vec::new(),
        }
    }

    pub fn path(&self, name: &str) -> String {
        make_path(self.prefix, name)
    }

    pub fn fail(&mut self, name: &str, violation: Violation) {
        let path = self.path(name);
        self.errors.push(violation.at(path));
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Records an `UnexpectedField` for each key that is neither a defined
    /// field nor accepted by `allowed`.
    pub fn reject_unknown(&mut self, allowed: impl Fn(&str) -> bool) {
        let obj = self.obj;
        for key in obj.keys() {
            if find(self.fields, key).is_none() && !allowed(key) {
                let path = self.path(key);
                self.errors.push(FieldError::unexpected_field(path));
            }
        }
    }

    /// Records the failure of an already computed check
    pub fn check<T>(&mut self, name: &str, result: Result<T, Violation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.fail(name, violation);
                None
            }
        }
    }

    fn def(&self, name: &str) -> Option<&'static FieldDef> {
        find(self.fields, name)
    }

    /// Present, non-null value. Absence is an error only for required fields.
    pub fn value(&mut self, name: &str) -> Option<&'a Value> {
        let obj = self.obj;
        match obj.get(name) {
            Some(Value::Null) => {
                self.fail(name, Violation::type_mismatch("non-null value", "null"));
                None
            }
            Some(value) => Some(value),
            None => {
                if self.def(name).map_or(true, FieldDef::is_required) {
                    let path = self.path(name);
                    self.errors.push(FieldError::missing_field(path));
                }
                None
            }
        }
    }

    pub fn bool(&mut self, name: &str) -> Option<bool> {
        match self.value(name)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.fail(name, Violation::type_mismatch("bool", json_type_name(other)));
                None
            }
        }
    }

    pub fn int(&mut self, name: &str) -> Option<i64> {
        let (exclusive_min, exclusive_max) = match self.def(name).map(|d| d.kind) {
            Some(FieldKind::Int {
                exclusive_min,
                exclusive_max,
            }) => (exclusive_min, exclusive_max),
            _ => (None, None),
        };

        let number = match self.value(name)? {
            Value::Number(n) => n,
            other => {
                self.fail(name, Violation::type_mismatch("int", json_type_name(other)));
                return None;
            }
        };

        let value = match number.as_i64() {
            Some(v) => v,
            None if number.is_u64() => {
                self.fail(
                    name,
                    Violation::range(format!("value < {}", i64::MAX), number.to_string()),
                );
                return None;
            }
            None => {
                self.fail(name, Violation::type_mismatch("int", "float"));
                return None;
            }
        };

        if let Some(min) = exclusive_min {
            if value <= min {
                self.fail(name, Violation::range(format!("value > {}", min), value.to_string()));
                return None;
            }
        }
        if let Some(max) = exclusive_max {
            if value >= max {
                self.fail(name, Violation::range(format!("value < {}", max), value.to_string()));
                return None;
            }
        }

        Some(value)
    }

    pub fn float(&mut self, name: &str) -> Option<f64> {
        let exclusive_min = match self.def(name).map(|d| d.kind) {
            Some(FieldKind::Float { exclusive_min }) => exclusive_min,
            _ => None,
        };

        let value = match self.value(name)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        let Some(value) = value else {
            let actual = self.obj.get(name).map_or("missing", json_type_name);
            self.fail(name, Violation::type_mismatch("float", actual));
            return None;
        };

        if let Some(min) = exclusive_min {
            if value <= min {
                self.fail(name, Violation::range(format!("value > {}", min), value.to_string()));
                return None;
            }
        }

        Some(value)
    }

    /// Reads a string, converts it with `convert`, then applies the length
    /// rules of a text field. Absent optional fields use their default.
    pub fn text_map<T>(
        &mut self,
        name: &str,
        convert: impl FnOnce(&'a str) -> Result<T, Violation>,
    ) -> Option<T> {
        let def = self.def(name);
        let obj = self.obj;
        let text: &'a str = match obj.get(name) {
            None => match def.and_then(|d| d.default) {
                Some(default) => default,
                None => {
                    self.value(name)?;
                    return None;
                }
            },
            Some(_) => match self.value(name)? {
                Value::String(s) => s.as_str(),
                other => {
                    self.fail(name, Violation::type_mismatch("string", json_type_name(other)));
                    return None;
                }
            },
        };

        let converted = match convert(text) {
            Ok(value) => value,
            Err(violation) => {
                self.fail(name, violation);
                return None;
            }
        };

        if let Some(FieldKind::Text(rules)) = def.map(|d| d.kind) {
            if let Err(violation) = check_length(text, &rules) {
                self.fail(name, violation);
                return None;
            }
        }

        Some(converted)
    }

    pub fn text(&mut self, name: &str) -> Option<&'a str> {
        self.text_map(name, Ok)
    }

    pub fn data_type(&mut self, name: &str) -> Option<DataType> {
        self.text_map(name, validate_data_type)
    }

    pub fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Length constraints in characters
pub(crate) fn check_length(s: &str, rules: &TextRules) -> Result<(), Violation> {
    let len = s.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            return Err(Violation::range(
                format!("at least {} characters", min),
                format!("{} characters", len),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Err(Violation::range(
                format!("at most {} characters", max),
                format!("{} characters", len),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    const FIELDS: &[FieldDef] = &[
        FieldDef {
            name: "count",
            kind: FieldKind::Int {
                exclusive_min: Some(0),
                exclusive_max: Some(100),
            },
            description: "",
            default: None,
        },
        FieldDef {
            name: "ratio",
            kind: FieldKind::Float {
                exclusive_min: Some(0.0),
            },
            description: "",
            default: None,
        },
        FieldDef {
            name: "label",
            kind: FieldKind::Text(TextRules {
                max_length: Some(3),
                ..TextRules::NONE
            }),
            description: "",
            default: Some("abc"),
        },
    ];

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_int_bounds_are_exclusive() {
        let o = obj(json!({"count": 100}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.int("count"), None);
        assert_eq!(reader.finish()[0].kind, ErrorKind::RangeViolation);

        let o = obj(json!({"count": 99}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.int("count"), Some(99));
        assert!(reader.finish().is_empty());
    }

    #[test]
    fn test_int_rejects_float_and_string() {
        let o = obj(json!({"count": 1.5, "ratio": "x"}));
        let mut reader = FieldReader::new(&o, "p", FIELDS);
        assert_eq!(reader.int("count"), None);
        assert_eq!(reader.float("ratio"), None);
        let errors = reader.finish();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::TypeMismatch));
        assert_eq!(errors[0].field, "p.count");
    }

    #[test]
    fn test_int_above_i64_is_range_violation() {
        let o = obj(json!({"count": u64::MAX}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.int("count"), None);
        assert_eq!(reader.finish()[0].kind, ErrorKind::RangeViolation);
    }

    #[test]
    fn test_float_accepts_integer() {
        let o = obj(json!({"ratio": 2}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.float("ratio"), Some(2.0));
    }

    #[test]
    fn test_null_is_rejected() {
        let o = obj(json!({"count": null}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.int("count"), None);
        let errors = reader.finish();
        assert_eq!(errors[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(errors[0].actual, "null");
    }

    #[test]
    fn test_default_and_length() {
        let o = obj(json!({}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.text("label"), Some("abc"));
        assert_eq!(reader.int("count"), None);
        let errors = reader.finish();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::MissingField);

        let o = obj(json!({"label": "abcd"}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        assert_eq!(reader.text("label"), None);
        assert_eq!(reader.finish()[0].kind, ErrorKind::RangeViolation);
    }

    #[test]
    fn test_reject_unknown() {
        let o = obj(json!({"count": 1, "extra": 1, "allowed": 2}));
        let mut reader = FieldReader::new(&o, "", FIELDS);
        reader.reject_unknown(|k| k == "allowed");
        let errors = reader.finish();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "extra");
        assert_eq!(errors[0].kind, ErrorKind::UnexpectedField);
    }
}
