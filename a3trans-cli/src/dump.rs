use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use a3trans::WorkDir;

/// Run the dump command: read `stringtable.xml` and output the catalog as JSON.
pub fn run_dump_command(workdir: &WorkDir, output: Option<PathBuf>) -> Result<(), String> {
    let project = workdir
        .read_stringtable()
        .map_err(|e| format!("Error reading stringtable.xml: {}", e))?;

    let json = project
        .to_json()
        .map_err(|e| format!("Error serializing to JSON: {}", e))?;

    match output {
        Some(output_path) => {
            File::create(&output_path)
                .and_then(|mut f| f.write_all(json.as_bytes()))
                .map_err(|e| format!("Error writing to {}: {}", output_path.display(), e))?;
            tracing::info!("JSON written to {}", output_path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
