use std::str::FromStr;

use a3trans::{LanguageCode, WorkDir};

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub xliff_version: Option<String>,
    pub source_lang: Option<String>,
    pub source_only: bool,
    pub langs: Vec<String>,
    pub quiet: bool,
}

/// Target languages for an export: none, the requested ones (deduplicated,
/// in request order), or all supported languages.
pub fn resolve_targets(source_only: bool, langs: &[String]) -> Result<Vec<LanguageCode>, String> {
    if source_only {
        return Ok(Vec::new());
    }
    if langs.is_empty() {
        return Ok(LanguageCode::ALL.to_vec());
    }
    let mut targets = Vec::new();
    for code in langs {
        let lang = LanguageCode::from_str(code).map_err(|e| e.to_string())?;
        if !targets.contains(&lang) {
            targets.push(lang);
        }
    }
    Ok(targets)
}

/// Run the export command: convert `stringtable.xml` into XLIFF files under `l10n/`.
pub fn run_export_command(
    workdir: &WorkDir,
    config: &Config,
    opts: ExportOptions,
) -> Result<(), String> {
    let version = config.xliff_version(opts.xliff_version.as_deref())?;
    let source = config.source_language(opts.source_lang.as_deref());
    let targets = resolve_targets(opts.source_only, &opts.langs)?;

    let project = workdir
        .read_stringtable()
        .map_err(|e| format!("Error reading stringtable.xml: {}", e))?;
    if !project.is_exportable() {
        tracing::warn!("no key has an Original text, the XLIFF files will be empty");
    }

    tracing::info!(
        "converting stringtable.xml into XLIFF {} files ({} targets)",
        version,
        targets.len()
    );
    let report = workdir
        .write_xliff(&project, &targets, source, version)
        .map_err(|e| format!("Error creating the l10n directory: {}", e))?;

    if !opts.quiet {
        for path in &report.written {
            println!("Wrote {}", workdir.display_path(path).display());
        }
    }
    for failure in &report.failed {
        eprintln!(
            "Failed to write {}: {}",
            workdir.display_path(&failure.path).display(),
            failure.error
        );
    }
    if report.written.is_empty() {
        return Err("No XLIFF file could be written".to_string());
    }
    Ok(())
}
