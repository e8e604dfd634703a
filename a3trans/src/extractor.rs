//! Extraction of translation directives from script files.
//!
//! Two directive forms are recognised:
//!
//! ```text
//! // TR <package> <container> <key> "text"
//!
//! /* TR <package> <container> <key>
//!    text spanning
//!    several lines */
//! ```
//!
//! A `*` package resolves to `Main`, a `*` container to the script's base
//! name; any other package or container token has `_` replaced by spaces.
//! The key token is used as written.
//!
//! Extracted strings are written to an output catalog. When the reference
//! catalog (the previous stringtable) holds the same source text for the key,
//! compared case-insensitively, its other translations are carried over.
//!
//! A second pass resolves `str_*` identifiers used in the script against both
//! catalogs and reports the ones no catalog knows.

use std::{borrow::Cow, fs::File, io::Read, path::Path};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    types::{ORIGINAL, Project},
};

/// Package used for the `*` package token.
pub const MAIN_PACKAGE: &str = "Main";

lazy_static! {
    static ref SINGLE_LINE: Regex = Regex::new(
        r#"//\s*TR\s+([A-Za-z0-9_*]+)\s+([A-Za-z0-9_*]+)\s+([A-Za-z0-9_*]+)\s+"([^"]*)""#
    )
    .unwrap();
    static ref BLOCK_START: Regex = Regex::new(r"/\*\s*TR").unwrap();
    static ref BLOCK_END: Regex = Regex::new(r"\s*\*/").unwrap();
    static ref BLOCK_HEADER: Regex =
        Regex::new(r"/\*\s*TR\s+([A-Za-z0-9_*]+)\s+([A-Za-z0-9_*]+)\s+([A-Za-z0-9_*]+)").unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"(?i)str_[a-z0-9_]+").unwrap();
}

/// An identifier used in a script that neither catalog defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanIdentifier {
    /// 1-based line number.
    pub line: usize,
    pub identifier: String,
}

/// Counters and diagnostics collected while extracting one or more files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractReport {
    /// Directives that produced a source text.
    pub directives: usize,
    /// Translations copied from the reference catalog onto extracted keys.
    pub carried_forward: usize,
    /// Keys copied from the reference catalog because a script uses them.
    pub resolved_from_reference: usize,
    pub orphans: Vec<OrphanIdentifier>,
}

impl ExtractReport {
    /// Adds the counters of another report to this one.
    pub fn absorb(&mut self, other: ExtractReport) {
        self.directives += other.directives;
        self.carried_forward += other.carried_forward;
        self.resolved_from_reference += other.resolved_from_reference;
        self.orphans.extend(other.orphans);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    package: String,
    container: String,
    key: String,
    text: String,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Scanning,
    InBlock {
        header: String,
        body: String,
    },
}

/// Extracts directives from scripts against a read-only reference catalog.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'r> {
    reference: &'r Project,
}

impl<'r> Extractor<'r> {
    pub fn new(reference: &'r Project) -> Self {
        Extractor { reference }
    }

    /// Reads a script file (BOM-aware, UTF-8 otherwise) and extracts it.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD instead of failing the
    /// whole file.
    pub fn extract_file<P: AsRef<Path>>(
        &self,
        path: P,
        output: &mut Project,
    ) -> Result<ExtractReport, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);
        let mut bytes = Vec::new();
        decoder.read_to_end(&mut bytes)?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            tracing::warn!(file = %path.display(), "invalid UTF-8 replaced");
        }

        let report = self.extract_str(&script_base_name(path), &content, output);
        for orphan in &report.orphans {
            tracing::warn!(
                file = %path.display(),
                "ID without localization at line {}: {}",
                orphan.line,
                orphan.identifier
            );
        }
        Ok(report)
    }

    /// Extracts one script's text. `base_name` replaces the `*` container token.
    pub fn extract_str(&self, base_name: &str, content: &str, output: &mut Project) -> ExtractReport {
        let mut report = ExtractReport::default();

        for directive in scan_directives(base_name, content) {
            if directive.text.is_empty() {
                tracing::debug!(key = %directive.key, "directive without text");
            } else {
                report.directives += 1;
            }
            report.carried_forward += self.save(&directive, output);
        }

        for (number, line) in content.lines().enumerate() {
            for m in IDENTIFIER.find_iter(line) {
                match self.resolve_identifier(m.as_str(), output) {
                    Resolution::Known => {}
                    Resolution::CopiedFromReference => report.resolved_from_reference += 1,
                    Resolution::Orphan => report.orphans.push(OrphanIdentifier {
                        line: number + 1,
                        identifier: m.as_str().to_string(),
                    }),
                }
            }
        }

        report
    }

    /// Stores the directive's source text and carries forward the reference
    /// translations when the source text is unchanged. Returns the number of
    /// translations carried forward.
    fn save(&self, directive: &Directive, output: &mut Project) -> usize {
        let Directive {
            package,
            container,
            key,
            text,
        } = directive;
        output.set_translation(package, container, key, ORIGINAL, text);

        let Some(saved) = self.reference.get_translation(package, container, key, ORIGINAL) else {
            return 0;
        };
        if saved.text().to_lowercase() != text.to_lowercase() {
            return 0;
        }

        let mut carried = 0;
        for translation in self.reference.get_all_translations(package, container, key) {
            if translation.is_original() {
                continue;
            }
            output.set_translation(package, container, key, translation.language(), translation.text());
            carried += 1;
        }
        carried
    }

    fn resolve_identifier(&self, identifier: &str, output: &mut Project) -> Resolution {
        if output.find_key_recursive(identifier).is_some() {
            return Resolution::Known;
        }
        let Some(found) = self.reference.find_key_recursive(identifier) else {
            return Resolution::Orphan;
        };
        for translation in found.key.translations() {
            output.set_translation(
                found.package,
                found.container,
                found.key.id(),
                translation.language(),
                translation.text(),
            );
        }
        Resolution::CopiedFromReference
    }
}

enum Resolution {
    Known,
    CopiedFromReference,
    Orphan,
}

/// Name of a script without directories and without any extension.
pub fn script_base_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

fn resolve_package(token: &str) -> String {
    if token == "*" {
        MAIN_PACKAGE.to_string()
    } else {
        token.replace('_', " ")
    }
}

fn resolve_container(token: &str, base_name: &str) -> String {
    if token == "*" {
        base_name.to_string()
    } else {
        token.replace('_', " ")
    }
}

fn simplified(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn directive_from_tokens(base_name: &str, caps: &regex::Captures<'_>, text: String) -> Directive {
    Directive {
        package: resolve_package(&caps[1]),
        container: resolve_container(&caps[2], base_name),
        key: caps[3].to_string(),
        text,
    }
}

/// Runs the line state machine and returns the directives in file order.
fn scan_directives(base_name: &str, content: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut state = State::Scanning;

    for line in content.lines() {
        if let State::Scanning = state {
            if let Some(caps) = SINGLE_LINE.captures(line) {
                let text = caps[4].to_string();
                directives.push(directive_from_tokens(base_name, &caps, text));
                continue;
            }
            if BLOCK_START.is_match(line) {
                state = State::InBlock {
                    header: line.to_string(),
                    body: String::new(),
                };
            }
        } else if let State::InBlock { body, .. } = &mut state {
            body.push_str(line);
            body.push(' ');
        }

        let closes = matches!(state, State::InBlock { .. }) && BLOCK_END.is_match(line);
        if closes {
            if let State::InBlock { header, body } = std::mem::take(&mut state) {
                if let Some(directive) = finish_block(base_name, &header, &body) {
                    directives.push(directive);
                }
            }
        }
    }

    directives
}

fn finish_block(base_name: &str, header: &str, body: &str) -> Option<Directive> {
    let body = body.replace('<', "&lt;").replace('>', "&gt;");
    let text = simplified(&BLOCK_END.replace_all(&body, ""));
    let header = simplified(header);
    match BLOCK_HEADER.captures(&header) {
        Some(caps) => Some(directive_from_tokens(base_name, &caps, text)),
        None => {
            tracing::debug!(header = %header, "discarding block without package/container/key");
            None
        }
    }
}
