//! Element types for RadioHound payloads
//!
//! The `type` field of a capture names one entry of the registry; the
//! registry entry fixes how the base64 payload is read back as numbers.

mod registry;
mod samples;

pub use registry::{CatalogEntry, ElementType, ElementTypeRegistry, ScalarKind};
pub use samples::{decode, encode, Samples};
