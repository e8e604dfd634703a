#![forbid(unsafe_code)]
//! Localization toolkit for Arma 3 missions and mods.
//!
//! Builds a `stringtable.xml` catalog from translation directives embedded in
//! SQF scripts, exports it to XLIFF 1.2/2.0 files for translators, and merges
//! the translated XLIFF files back.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use a3trans::{Extractor, LanguageCode, Project, WorkDir, XliffVersion};
//!
//! let workdir = WorkDir::new("missions/op_test.Altis");
//! let reference = workdir.read_stringtable().unwrap_or_default();
//!
//! let mut project = Project::new(reference.name());
//! let extractor = Extractor::new(&reference);
//! extractor.extract_file("missions/op_test.Altis/init.sqf", &mut project)?;
//! workdir.write_stringtable(&project, true)?;
//!
//! workdir.write_xliff(&project, &[LanguageCode::German], LanguageCode::English, XliffVersion::V1_2)?;
//! # Ok::<(), a3trans::Error>(())
//! ```
//!
//! # Directives
//!
//! ```text
//! // TR <package> <container> <key> "<text>"
//! /* TR <package> <container> <key>
//!    text spanning several lines */
//! ```
//!
//! `*` selects the default package (`Main`) or the script's base name as
//! container; `_` in package and container names stands for a space.

pub mod error;
pub mod extractor;
pub mod formats;
pub mod language;
pub mod traits;
pub mod types;
pub mod workdir;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    extractor::{ExtractReport, Extractor, OrphanIdentifier, script_base_name},
    formats::{StringtableFormat, XliffFormat, XliffVersion, xml_id},
    language::{LanguageCode, display_name_for_code},
    traits::Parser,
    types::{Container, Key, KeyMatch, ORIGINAL, Package, Project, Translation},
    workdir::{ExportReport, FileFailure, ImportReport, WorkDir},
};
