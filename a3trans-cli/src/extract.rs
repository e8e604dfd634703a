use a3trans::{ExtractReport, Extractor, Project, WorkDir};

use crate::config::Config;
use crate::discover::discover_scripts;

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub backup: bool,
    pub quiet: bool,
}

/// Loads the previous stringtable as reference, or an empty catalog when it
/// is missing or unreadable.
fn load_reference(workdir: &WorkDir) -> Option<Project> {
    if !workdir.stringtable_path().exists() {
        tracing::info!("no stringtable.xml yet, starting from an empty catalog");
        return None;
    }
    match workdir.read_stringtable() {
        Ok(project) => Some(project),
        Err(e) if e.is_document_error() => {
            tracing::warn!("ignoring malformed stringtable.xml: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("cannot read stringtable.xml: {}", e);
            None
        }
    }
}

/// Run the extract command: scan every script and rewrite `stringtable.xml`.
pub fn run_extract_command(
    workdir: &WorkDir,
    config: &Config,
    opts: ExtractOptions,
) -> Result<(), String> {
    let reference = load_reference(workdir);
    let name = config.project_name(reference.as_ref().map(Project::name));
    let reference = reference.unwrap_or_default();

    let scripts = discover_scripts(workdir.root())?;
    tracing::info!("found {} script files", scripts.len());

    let extractor = Extractor::new(&reference);
    let mut output = Project::new(name);
    let mut report = ExtractReport::default();
    let mut failed = 0usize;

    for script in &scripts {
        tracing::info!("parsing file {}", workdir.display_path(script).display());
        match extractor.extract_file(script, &mut output) {
            Ok(file_report) => report.absorb(file_report),
            Err(e) => {
                tracing::warn!("skipping {}: {}", workdir.display_path(script).display(), e);
                failed += 1;
            }
        }
    }

    if output.is_empty() {
        tracing::warn!("no translation directives found, stringtable.xml left unchanged");
    } else {
        workdir
            .write_stringtable(&output, config.backup(opts.backup))
            .map_err(|e| format!("Error writing stringtable.xml: {}", e))?;
    }

    if !opts.quiet {
        println!("Scripts: {} ({} failed)", scripts.len(), failed);
        println!("Directives: {}", report.directives);
        println!("Keys: {}", output.key_count());
        println!("Carried forward: {}", report.carried_forward);
        println!("Resolved from reference: {}", report.resolved_from_reference);
        println!("Orphan identifiers: {}", report.orphans.len());
    }
    Ok(())
}
