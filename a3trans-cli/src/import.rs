use a3trans::{Project, WorkDir};

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub backup: bool,
    pub quiet: bool,
}

/// Run the import command: merge `l10n/strings_<code>.xlf` into a new `stringtable.xml`.
pub fn run_import_command(
    workdir: &WorkDir,
    config: &Config,
    opts: ImportOptions,
) -> Result<(), String> {
    let mut project = Project::new(config.project_name(None));

    tracing::info!("converting XLIFF files into stringtable.xml");
    let report = workdir
        .read_xliff(&mut project)
        .map_err(|e| format!("Error reading XLIFF files: {}", e))?;

    for failure in &report.failed {
        eprintln!(
            "Skipped {}: {}",
            workdir.display_path(&failure.path).display(),
            failure.error
        );
    }
    if project.is_empty() {
        return Err("No translations found in the l10n directory".to_string());
    }

    workdir
        .write_stringtable(&project, config.backup(opts.backup))
        .map_err(|e| format!("Error writing stringtable.xml: {}", e))?;

    if !opts.quiet {
        let codes: Vec<&str> = report.imported.iter().map(|l| l.code()).collect();
        println!("Imported languages: {}", codes.join(", "));
        println!("Keys: {}", project.key_count());
    }
    Ok(())
}
