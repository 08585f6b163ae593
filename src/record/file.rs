//! RadioHound file codec
//!
//! One record per file, stored as 4-space indented JSON. A path without an
//! extension gets the default extension (`rh`) on save.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::capture::CaptureRecord;
use crate::dtype::ElementTypeRegistry;
use crate::errors::{RhError, RhResult};
use crate::observability::Event;

/// Extension appended when a save target has none
pub const DEFAULT_EXTENSION: &str = "rh";

/// Serializes `value` as JSON indented by four spaces
pub fn to_indented_json<T: Serialize>(value: &T) -> RhResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `path` with `extension` appended if it has none
pub fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}

/// Reads and writes capture records against a shared element-type registry.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    registry: Arc<ElementTypeRegistry>,
    default_extension: String,
}

impl RecordCodec {
    pub fn new(registry: Arc<ElementTypeRegistry>) -> Self {
        Self {
            registry,
            default_extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Replaces the extension used for save targets without one
    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    pub fn registry(&self) -> &ElementTypeRegistry {
        &self.registry
    }

    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    /// Open mode: unknown top-level keys become custom fields
    pub fn from_document(&self, document: &Value) -> RhResult<CaptureRecord> {
        CaptureRecord::from_document(document, &self.registry)
    }

    /// Strict mode: unknown keys outside `custom_fields` are rejected
    pub fn from_fields(&self, fields: &Map<String, Value>) -> RhResult<CaptureRecord> {
        CaptureRecord::from_fields(fields, &self.registry)
    }

    /// Parses document text and validates it
    pub fn parse_str(&self, text: &str) -> RhResult<CaptureRecord> {
        let document: Value = serde_json::from_str(text)?;
        self.from_document(&document)
    }

    /// Document text as written by [`save`](Self::save)
    pub fn to_text(&self, record: &CaptureRecord) -> RhResult<String> {
        to_indented_json(&record.to_document())
    }

    /// Writes `record` to `path`, appending the default extension when
    /// `path` has none. Returns the path written.
    pub fn save(&self, record: &CaptureRecord, path: &Path) -> RhResult<PathBuf> {
        let target = with_default_extension(path, &self.default_extension);
        let content = self.to_text(record)?;

        fs::write(&target, content).map_err(|e| RhError::io(&target, e))?;

        info!(
            event = %Event::RecordSaved,
            path = %target.display(),
            version = record.version(),
            "record saved"
        );
        Ok(target)
    }

    /// Reads and validates the record at `path`.
    ///
    /// # Errors
    ///
    /// - `RhError::NotFound` if nothing exists at `path`
    /// - `RhError::Json` if the file is not JSON
    /// - `RhError::Validation` if the document is not a valid record
    pub fn load(&self, path: &Path) -> RhResult<CaptureRecord> {
        if !path.exists() {
            return Err(RhError::NotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|e| RhError::io(path, e))?;
        debug!(path = %path.display(), bytes = text.len(), "read record file");

        match self.parse_str(&text) {
            Ok(record) => {
                info!(
                    event = %Event::RecordLoaded,
                    path = %path.display(),
                    element_type = record.element_type().name(),
                    samples = record.samples().len(),
                    "record loaded"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(
                    event = %Event::RecordRejected,
                    path = %path.display(),
                    code = err.code(),
                    "record rejected"
                );
                Err(err)
            }
        }
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new(Arc::new(ElementTypeRegistry::builtin()))
    }
}
