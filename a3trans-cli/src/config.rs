use std::fs;
use std::path::Path;
use std::str::FromStr;

use a3trans::{LanguageCode, XliffVersion, types::DEFAULT_PROJECT_NAME};
use serde::Deserialize;

/// Name of the optional settings file in the working directory.
pub const CONFIG_FILE: &str = "a3trans.toml";

/// Defaults read from `a3trans.toml`. Command line flags win over every field.
///
/// ```toml
/// source_language = "en"
/// xliff_version = 2
/// backup = true
/// project_name = "Operation Sandstorm"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source_language: Option<String>,
    pub xliff_version: Option<u8>,
    pub backup: Option<bool>,
    pub project_name: Option<String>,
}

impl Config {
    /// Loads `a3trans.toml` from `dir`; a missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, String> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
        let config = Config::from_toml(&content)
            .map_err(|e| format!("Error parsing {}: {}", path.display(), e))?;
        tracing::debug!(?config, "loaded {}", CONFIG_FILE);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Source language from the flag, then the file, then `en`.
    /// Unsupported codes fall back to `en` with a warning.
    pub fn source_language(&self, flag: Option<&str>) -> LanguageCode {
        let Some(code) = flag.or(self.source_language.as_deref()) else {
            return LanguageCode::English;
        };
        match LanguageCode::from_str(code) {
            Ok(lang) => lang,
            Err(_) => {
                tracing::warn!(
                    "the language code {} is not supported, using default language English",
                    code
                );
                LanguageCode::English
            }
        }
    }

    pub fn xliff_version(&self, flag: Option<&str>) -> Result<XliffVersion, String> {
        let from_file = self.xliff_version.map(|v| v.to_string());
        match flag.or(from_file.as_deref()) {
            Some(v) => XliffVersion::from_str(v)
                .map_err(|_| format!("Unsupported XLIFF version '{}', expected 1 or 2", v)),
            None => Ok(XliffVersion::default()),
        }
    }

    pub fn backup(&self, flag: bool) -> bool {
        flag || self.backup.unwrap_or(false)
    }

    /// Name for a freshly built project. A loaded reference catalog wins,
    /// then the configured name, then `My Project`.
    pub fn project_name(&self, reference: Option<&str>) -> String {
        reference
            .or(self.project_name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_PROJECT_NAME)
            .to_string()
    }
}
