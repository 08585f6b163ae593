//! Field definition types
//!
//! Supported kinds:
//! - bool
//! - int: 64-bit signed integer with exclusive bounds
//! - float: 64-bit floating point with an optional exclusive lower bound
//! - text: UTF-8 string with length, pattern and format annotations
//! - data type: the capture category enumeration
//! - element type: a name from the element-type registry
//! - object: nested closed object with its own field table

/// String constraints
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextRules {
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Maximum length in characters
    pub max_length: Option<usize>,
    /// Regular expression the value must match
    pub pattern: Option<&'static str>,
    /// JSON Schema `format` annotation
    pub format: Option<&'static str>,
    /// JSON Schema `contentEncoding` annotation
    pub content_encoding: Option<&'static str>,
}

impl TextRules {
    pub const NONE: TextRules = TextRules {
        min_length: None,
        max_length: None,
        pattern: None,
        format: None,
        content_encoding: None,
    };
}

/// Kind of a field with its constraints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Bool,
    Int {
        exclusive_min: Option<i64>,
        exclusive_max: Option<i64>,
    },
    Float {
        exclusive_min: Option<f64>,
    },
    Text(TextRules),
    /// Capture category (`periodogram`)
    DataType,
    /// Name resolved against the element-type registry
    ElementType,
    /// Nested closed object
    Object {
        /// Definition name used in the exported schema
        title: &'static str,
        description: &'static str,
        fields: &'static [FieldDef],
    },
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int { .. } => "int",
            FieldKind::Float { .. } => "float",
            FieldKind::Text(_) => "string",
            FieldKind::DataType => "data type",
            FieldKind::ElementType => "element type",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// One named field of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    /// Persisted key
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    /// Value used when the field is absent; absent means required
    pub default: Option<&'static str>,
}

impl FieldDef {
    /// Whether the field must be present
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Looks up a field definition by persisted key
pub fn find(fields: &'static [FieldDef], name: &str) -> Option<&'static FieldDef> {
    fields.iter().find(|f| f.name == name)
}
