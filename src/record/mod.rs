//! RadioHound capture records
//!
//! Validation, the in-memory record model and the on-disk codec.
//!
//! # Validation
//!
//! - every named field except `version` is required
//! - `metadata` is a closed object with nine fields
//! - `data` must be non-empty base64 whose length is a multiple of the
//!   element width
//! - `type` must name an entry of the element-type registry
//! - a timestamp without offset is given UTC and logged, not rejected
//! - all failures of one record are reported together

mod capture;
mod file;
mod metadata;
mod reader;
mod validators;

pub use capture::CaptureRecord;
pub use file::{to_indented_json, with_default_extension, RecordCodec, DEFAULT_EXTENSION};
pub use metadata::{DataType, MetadataRecord};
pub use validators::{
    parse_timestamp, validate_base64_payload, validate_data_type, validate_element_type,
    validate_mac_address, validate_timestamp, validate_version, ParsedTimestamp,
};
