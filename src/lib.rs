//! radiohound - RadioHound spectrum capture records
//!
//! Validated construction, file save/load, element-type decoding of the
//! base64 payload, JSON Schema export and a reference self-test for the
//! RadioHound v0 format.

pub mod cli;
pub mod dtype;
pub mod errors;
pub mod observability;
pub mod record;
pub mod schema;
pub mod selftest;

pub use dtype::{ElementType, ElementTypeRegistry, Samples, ScalarKind};
pub use errors::{ErrorKind, FieldError, RhError, RhResult, ValidationErrors};
pub use record::{CaptureRecord, DataType, MetadataRecord, RecordCodec};
pub use selftest::{run_self_test, SelfTestReport};
