//! Capture metadata
//!
//! Acquisition parameters of one capture. All fields are mandatory and the
//! object is closed: unknown keys are rejected.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use super::reader::{json_type_name, FieldReader};
use crate::errors::{FieldError, Violation};
use crate::schema::METADATA_FIELDS;

/// Capture category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Periodogram,
}

impl DataType {
    pub const ALL: &'static [DataType] = &[DataType::Periodogram];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Periodogram => "periodogram",
        }
    }
}

impl FromStr for DataType {
    type Err = Violation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|dt| dt.as_str() == s)
            .ok_or_else(|| {
                Violation::unknown_variant(
                    format!(
                        "one of [{}]",
                        DataType::ALL.iter().map(DataType::as_str).collect::<Vec<_>>().join(", ")
                    ),
                    format!("'{}'", s),
                )
            })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Acquisition parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    data_type: DataType,
    fmax: i64,
    fmin: i64,
    gps_lock: bool,
    nfft: i64,
    scan_time: f64,
    xcount: i64,
    xstart: i64,
    xstop: i64,
}

impl MetadataRecord {
    /// Reads and validates the `metadata` object, appending every failure
    /// to `errors` under `path`.
    pub(crate) fn read(value: &Value, path: &str, errors: &mut Vec<FieldError>) -> Option<Self> {
        let Some(obj) = value.as_object() else {
            errors.push(Violation::type_mismatch("object", json_type_name(value)).at(path));
            return None;
        };

        let mut reader = FieldReader::new(obj, path, METADATA_FIELDS);
        reader.reject_unknown(|_| false);

        let data_type = reader.data_type("data_type");
        let fmax = reader.int("fmax");
        let fmin = reader.int("fmin");
        let gps_lock = reader.bool("gps_lock");
        let nfft = reader.int("nfft");
        let scan_time = reader.float("scan_time");
        let xcount = reader.int("xcount");
        let xstart = reader.int("xstart");
        let xstop = reader.int("xstop");

        errors.extend(reader.finish());

        Some(Self {
            data_type: data_type?,
            fmax: fmax?,
            fmin: fmin?,
            gps_lock: gps_lock?,
            nfft: nfft?,
            scan_time: scan_time?,
            xcount: xcount?,
            xstart: xstart?,
            xstop: xstop?,
        })
    }

    /// Persisted form
    pub fn to_value(&self) -> Value {
        json!({
            "data_type": self.data_type.as_str(),
            "fmax": self.fmax,
            "fmin": self.fmin,
            "gps_lock": self.gps_lock,
            "nfft": self.nfft,
            "scan_time": self.scan_time,
            "xcount": self.xcount,
            "xstart": self.xstart,
            "xstop": self.xstop,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Maximum frequency in Hz
    pub fn fmax(&self) -> i64 {
        self.fmax
    }

    /// Minimum frequency in Hz
    pub fn fmin(&self) -> i64 {
        self.fmin
    }

    pub fn gps_lock(&self) -> bool {
        self.gps_lock
    }

    pub fn nfft(&self) -> i64 {
        self.nfft
    }

    /// Whether `nfft` follows the power-of-two recommendation
    pub fn nfft_is_power_of_two(&self) -> bool {
        self.nfft > 0 && (self.nfft as u64).is_power_of_two()
    }

    /// Scan duration in seconds
    pub fn scan_time(&self) -> f64 {
        self.scan_time
    }

    pub fn xcount(&self) -> i64 {
        self.xcount
    }

    pub fn xstart(&self) -> i64 {
        self.xstart
    }

    pub fn xstop(&self) -> i64 {
        self.xstop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn sample() -> Value {
        json!({
            "data_type": "periodogram",
            "fmax": 6_000_000_000i64,
            "fmin": 100_000_000,
            "gps_lock": false,
            "nfft": 1024,
            "scan_time": 0.25,
            "xcount": 1024,
            "xstart": 100_000_000,
            "xstop": 6_000_000_000i64
        })
    }

    fn read(value: &Value) -> (Option<MetadataRecord>, Vec<FieldError>) {
        let mut errors = Vec::new();
        let record = MetadataRecord::read(value, "metadata", &mut errors);
        (record, errors)
    }

    #[test]
    fn test_valid_metadata() {
        let (record, errors) = read(&sample());
        assert!(errors.is_empty(), "{:?}", errors);
        let record = record.unwrap();
        assert_eq!(record.data_type(), DataType::Periodogram);
        assert_eq!(record.fmax(), 6_000_000_000);
        assert_eq!(record.scan_time(), 0.25);
        assert!(record.nfft_is_power_of_two());
        assert_eq!(record.to_value(), sample());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut value = sample();
        value["antenna"] = json!("whip");
        let (record, errors) = read(&value);
        assert!(record.is_some());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "metadata.antenna");
        assert_eq!(errors[0].kind, ErrorKind::UnexpectedField);
    }

    #[test]
    fn test_all_failures_reported() {
        let mut value = sample();
        value["fmin"] = json!(0);
        value["nfft"] = json!(-1);
        value["data_type"] = json!("waterfall");
        value.as_object_mut().unwrap().remove("gps_lock");

        let (record, errors) = read(&value);
        assert!(record.is_none());
        assert_eq!(errors.len(), 4, "{:?}", errors);
        let kinds: Vec<(&str, ErrorKind)> =
            errors.iter().map(|e| (e.field.as_str(), e.kind)).collect();
        assert!(kinds.contains(&("metadata.fmin", ErrorKind::RangeViolation)));
        assert!(kinds.contains(&("metadata.nfft", ErrorKind::RangeViolation)));
        assert!(kinds.contains(&("metadata.data_type", ErrorKind::UnknownVariant)));
        assert!(kinds.contains(&("metadata.gps_lock", ErrorKind::MissingField)));
    }

    #[test]
    fn test_fmin_fmax_order_not_enforced() {
        let mut value = sample();
        value["fmin"] = json!(10);
        value["fmax"] = json!(5);
        let (record, errors) = read(&value);
        assert!(errors.is_empty());
        assert!(record.is_some());
    }

    #[test]
    fn test_not_an_object() {
        let (record, errors) = read(&json!([1, 2]));
        assert!(record.is_none());
        assert_eq!(errors[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(errors[0].actual, "array");
    }

    #[test]
    fn test_data_type_from_str() {
        assert_eq!("periodogram".parse::<DataType>().unwrap(), DataType::Periodogram);
        assert!("Periodogram".parse::<DataType>().is_err());
    }
}
