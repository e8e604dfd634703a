//! All supported catalog file formats for a3trans.
//!
//! This module re-exports the main types for each format and the id
//! sanitizing shared by both writers.

pub(crate) mod dom;
pub mod stringtable;
pub mod xliff;

// Reexporting the formats for easier access
pub use stringtable::Format as StringtableFormat;
pub use xliff::{Format as XliffFormat, XliffVersion};

/// Turns a display name into an XML-safe id: trimmed, inner whitespace
/// collapsed, each remaining space replaced by `_`.
pub fn xml_id(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
