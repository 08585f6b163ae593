//! RadioHound v0 record definition
//!
//! These tables drive both record validation and schema export, so the two
//! cannot disagree on a bound or pattern.

use super::types::{FieldDef, FieldKind, TextRules};

/// Format version written by this crate
pub const FORMAT_VERSION: &str = "v0";

/// Exclusive upper bound of bounded integer fields (2^63 - 1)
pub const MAX_INT_SIZE: i64 = i64::MAX;

/// Key of the custom field bucket in strict construction
pub const CUSTOM_FIELDS: &str = "custom_fields";

pub const MAC_ADDRESS_PATTERN: &str = r"^[0-9A-Fa-f]+$";
pub const VERSION_PATTERN: &str = r"^v[0-9]+$";

const POSITIVE_BOUNDED: FieldKind = FieldKind::Int {
    exclusive_min: Some(0),
    exclusive_max: Some(MAX_INT_SIZE),
};

pub const METADATA_FIELDS: &[FieldDef] = &[
    FieldDef {
        name: "data_type",
        kind: FieldKind::DataType,
        description: "The category of this capture",
        default: None,
    },
    FieldDef {
        name: "fmax",
        kind: POSITIVE_BOUNDED,
        description: "The maximum frequency in the sample",
        default: None,
    },
    FieldDef {
        name: "fmin",
        kind: POSITIVE_BOUNDED,
        description: "The minimum frequency in the sample",
        default: None,
    },
    FieldDef {
        name: "gps_lock",
        kind: FieldKind::Bool,
        description: "Whether device coordinates were set and locked (e.g. when satellites are not reachable)",
        default: None,
    },
    FieldDef {
        name: "nfft",
        kind: FieldKind::Int {
            exclusive_min: Some(0),
            exclusive_max: None,
        },
        description: "Number of FFT bins, recommended to be a power of 2",
        default: None,
    },
    FieldDef {
        name: "scan_time",
        kind: FieldKind::Float {
            exclusive_min: Some(0.0),
        },
        description: "The time taken to scan this sample, in seconds",
        default: None,
    },
    FieldDef {
        name: "xcount",
        kind: POSITIVE_BOUNDED,
        description: "The number of points in the periodogram",
        default: None,
    },
    FieldDef {
        name: "xstart",
        kind: POSITIVE_BOUNDED,
        description: "The start frequency of the periodogram",
        default: None,
    },
    FieldDef {
        name: "xstop",
        kind: POSITIVE_BOUNDED,
        description: "The stop frequency of the periodogram",
        default: None,
    },
];

pub const CAPTURE_FIELDS: &[FieldDef] = &[
    FieldDef {
        name: "data",
        kind: FieldKind::Text(TextRules {
            min_length: Some(1),
            content_encoding: Some("base64"),
            ..TextRules::NONE
        }),
        description: "Raw measurement payload, base64 encoded",
        default: None,
    },
    FieldDef {
        name: "gain",
        kind: FieldKind::Float {
            exclusive_min: None,
        },
        description: "Gain of the capture",
        default: None,
    },
    FieldDef {
        name: "mac_address",
        kind: FieldKind::Text(TextRules {
            min_length: Some(12),
            max_length: Some(12),
            pattern: Some(MAC_ADDRESS_PATTERN),
            ..TextRules::NONE
        }),
        description: "MAC address of the RadioHound device",
        default: None,
    },
    FieldDef {
        name: "metadata",
        kind: FieldKind::Object {
            title: "Metadata",
            description: "Metadata for a RadioHound capture.",
            fields: METADATA_FIELDS,
        },
        description: "Metadata for this capture",
        default: None,
    },
    FieldDef {
        name: "sample_rate",
        kind: POSITIVE_BOUNDED,
        description: "Sample rate of the capture in Hz",
        default: None,
    },
    FieldDef {
        name: "short_name",
        kind: FieldKind::Text(TextRules {
            max_length: Some(255),
            ..TextRules::NONE
        }),
        description: "Short name for the capture",
        default: None,
    },
    FieldDef {
        name: "timestamp",
        kind: FieldKind::Text(TextRules {
            format: Some("date-time"),
            ..TextRules::NONE
        }),
        description: "Timestamp of the capture start as ISO 8601 with timezone information.",
        default: None,
    },
    FieldDef {
        name: "type",
        kind: FieldKind::ElementType,
        description: "Element type of the payload samples",
        default: None,
    },
    FieldDef {
        name: "version",
        kind: FieldKind::Text(TextRules {
            max_length: Some(255),
            pattern: Some(VERSION_PATTERN),
            ..TextRules::NONE
        }),
        description: "Version of the RadioHound data format",
        default: Some(FORMAT_VERSION),
    },
];

/// Whether `name` is one of the named top-level fields
pub fn is_named_field(name: &str) -> bool {
    CAPTURE_FIELDS.iter().any(|f| f.name == name)
}
