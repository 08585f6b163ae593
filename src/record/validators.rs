//! Primitive validators
//!
//! Each validator checks one scalar and returns the (possibly normalized)
//! value or a [`Violation`]. The record builder attaches field paths.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};
use regex::Regex;
use tracing::warn;

use super::metadata::DataType;
use crate::dtype::{ElementType, ElementTypeRegistry};
use crate::errors::{ErrorKind, Violation};
use crate::observability::Event;
use crate::schema::{MAC_ADDRESS_PATTERN, VERSION_PATTERN};

fn mac_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MAC_ADDRESS_PATTERN).expect("MAC address pattern is valid"))
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// Hexadecimal digits only, no separators. Length is a field constraint.
pub fn validate_mac_address(s: &str) -> Result<&str, Violation> {
    if !mac_regex().is_match(s) {
        return Err(Violation::invalid_format(
            "a hexadecimal string with no separators",
            format!("'{}'", s),
        ));
    }
    Ok(s)
}

/// `v` followed by a non-negative integer
pub fn validate_version(s: &str) -> Result<&str, Violation> {
    if !version_regex().is_match(s) {
        return Err(Violation::invalid_format(
            format!("version matching '{}'", VERSION_PATTERN),
            format!("'{}'", s),
        ));
    }
    Ok(s)
}

/// Decodes standard padded base64; the result is never empty. ASCII
/// whitespace is dropped first so line-wrapped (RFC 2045) payloads decode.
pub fn validate_base64_payload(s: &str) -> Result<Vec<u8>, Violation> {
    let compact: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(Violation::new(
            ErrorKind::EmptyPayload,
            "non-empty base64 payload",
            "empty string",
        ));
    }

    STANDARD.decode(&compact).map_err(|e| {
        Violation::new(ErrorKind::DecodeError, "base64 encoded data", e.to_string())
    })
}

pub fn validate_data_type(s: &str) -> Result<DataType, Violation> {
    s.parse()
}

pub fn validate_element_type(s: &str, registry: &ElementTypeRegistry) -> Result<ElementType, Violation> {
    registry.resolve(s).cloned()
}

/// Timestamp text as parsed, before offset normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// Carries an explicit UTC offset
    Aware(DateTime<FixedOffset>),
    /// No offset information
    Naive(NaiveDateTime),
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses ISO 8601 date-time text, with or without an offset.
pub fn parse_timestamp(s: &str) -> Result<ParsedTimestamp, Violation> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedTimestamp::Aware(aware));
    }
    if let Ok(aware) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ParsedTimestamp::Aware(aware));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(ParsedTimestamp::Naive)
        .ok_or_else(|| {
            Violation::invalid_format("an ISO 8601 date-time", format!("'{}'", s))
        })
}

/// Attaches an offset to a naive timestamp.
///
/// A naive value gets UTC (+00:00) and one `TIMESTAMP_OFFSET_ASSUMED`
/// warning. An aware value is returned unchanged without logging.
pub fn validate_timestamp(t: ParsedTimestamp) -> DateTime<FixedOffset> {
    match t {
        ParsedTimestamp::Aware(aware) => aware,
        ParsedTimestamp::Naive(naive) => {
            let normalized = naive.and_utc().fixed_offset();
            warn!(
                event = %Event::TimestampOffsetAssumed,
                timestamp = %normalized.to_rfc3339_opts(SecondsFormat::AutoSi, false),
                "Timestamp must have timezone information. Assuming UTC."
            );
            normalized
        }
    }
}
