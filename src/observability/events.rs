//! Observable events for RadioHound
//!
//! Every log line carries one of these as its `event` field, so log
//! consumers can match on a stable name instead of message text.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Element-type registry built
    RegistryLoaded,

    // Records
    /// Record read from disk and validated
    RecordLoaded,
    /// Record written to disk
    RecordSaved,
    /// Record failed validation
    RecordRejected,
    /// Timestamp had no offset; UTC was attached
    TimestampOffsetAssumed,

    // Schema
    /// Schema document written
    SchemaExported,

    // Self-test
    /// Self-test run begins
    SelfTestStart,
    /// Sample re-serialized to a reference file
    SelfTestReferenceWritten,
    /// Reference file no longer matches its sample
    SelfTestDrift,
    /// Self-test run complete
    SelfTestComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RegistryLoaded => "REGISTRY_LOADED",

            Event::RecordLoaded => "RECORD_LOADED",
            Event::RecordSaved => "RECORD_SAVED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::TimestampOffsetAssumed => "TIMESTAMP_OFFSET_ASSUMED",

            Event::SchemaExported => "SCHEMA_EXPORTED",

            Event::SelfTestStart => "SELF_TEST_START",
            Event::SelfTestReferenceWritten => "SELF_TEST_REFERENCE_WRITTEN",
            Event::SelfTestDrift => "SELF_TEST_DRIFT",
            Event::SelfTestComplete => "SELF_TEST_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
