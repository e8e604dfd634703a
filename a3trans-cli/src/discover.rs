use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// File name patterns of scripts that may carry translation directives.
pub const SCRIPT_PATTERNS: [&str; 4] = ["*.sqf", "*.SQF", "description.ext", "mission.sqm"];

fn script_globs() -> Result<GlobSet, String> {
    let mut builder = GlobSetBuilder::new();
    for pat in SCRIPT_PATTERNS {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .map_err(|e| format!("Invalid glob pattern '{}': {}", pat, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))
}

/// Finds every script below `root`, honouring ignore files, in sorted order.
pub fn discover_scripts(root: &Path) -> Result<Vec<PathBuf>, String> {
    let set = script_globs()?;
    let walker = WalkBuilder::new(root)
        .git_ignore(true)
        .git_exclude(true)
        .hidden(false)
        .ignore(true)
        .parents(false)
        .build();

    let mut scripts = Vec::new();
    for dent in walker {
        let dent = match dent {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        // match on the file name only, so directory names never count
        if set.is_match(dent.file_name()) {
            scripts.push(dent.into_path());
        }
    }
    scripts.sort();
    Ok(scripts)
}
