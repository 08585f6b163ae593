//! Record definition and schema export
//!
//! The field tables in `definition` are the single description of the
//! RadioHound v0 document shape:
//!
//! - record validation reads bounds, lengths and patterns from them
//! - the exporter turns them into a JSON Schema for external tooling

mod definition;
mod export;
mod types;

pub use definition::{
    is_named_field, CAPTURE_FIELDS, CUSTOM_FIELDS, FORMAT_VERSION, MAC_ADDRESS_PATTERN,
    MAX_INT_SIZE, METADATA_FIELDS, VERSION_PATTERN,
};
pub use export::{export_schema, schema_path, write_schema};
pub use types::{find, FieldDef, FieldKind, TextRules};
