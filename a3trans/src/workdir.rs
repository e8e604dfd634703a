//! File layout of a mission or mod directory.
//!
//! ```text
//! <root>/stringtable.xml
//! <root>/stringtable_<unix-seconds>.xml.bak   (optional backups)
//! <root>/l10n/strings.xlf                     (source only)
//! <root>/l10n/strings_<code>.xlf              (one per target language)
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    error::Error,
    formats::{StringtableFormat, XliffFormat, XliffVersion},
    language::LanguageCode,
    traits::Parser,
    types::Project,
};

pub const STRINGTABLE_FILE: &str = "stringtable.xml";
pub const L10N_DIR: &str = "l10n";
pub const SOURCE_XLIFF_FILE: &str = "strings.xlf";

/// A file that could not be read or written.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of writing the XLIFF files of a project.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FileFailure>,
}

/// Outcome of importing the XLIFF files of a project.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<LanguageCode>,
    pub failed: Vec<FileFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        WorkDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stringtable_path(&self) -> PathBuf {
        self.root.join(STRINGTABLE_FILE)
    }

    pub fn l10n_dir(&self) -> PathBuf {
        self.root.join(L10N_DIR)
    }

    /// Path of the XLIFF file for `target`, or of `strings.xlf` when `None`.
    pub fn xliff_path(&self, target: Option<LanguageCode>) -> PathBuf {
        match target {
            Some(lang) => self.l10n_dir().join(format!("strings_{}.xlf", lang.code())),
            None => self.l10n_dir().join(SOURCE_XLIFF_FILE),
        }
    }

    /// Path relative to the working directory, for messages.
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    pub fn read_stringtable(&self) -> Result<Project, Error> {
        let format = StringtableFormat::read_from(self.stringtable_path())?;
        Ok(format.project)
    }

    /// Writes `stringtable.xml`, optionally backing up the current file first.
    ///
    /// A failed backup aborts before the existing file is touched. Returns the
    /// backup path when one was made.
    pub fn write_stringtable(&self, project: &Project, backup: bool) -> Result<Option<PathBuf>, Error> {
        let path = self.stringtable_path();
        let mut backup_path = None;

        if path.exists() {
            if backup {
                let target = self.backup_path();
                fs::copy(&path, &target)?;
                tracing::info!("created backup {}", self.display_path(&target).display());
                backup_path = Some(target);
            }
            fs::remove_file(&path)?;
        }

        StringtableFormat::from(project.clone()).write_to(&path)?;
        tracing::info!("wrote {}", self.display_path(&path).display());
        Ok(backup_path)
    }

    fn backup_path(&self) -> PathBuf {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.root.join(format!("stringtable_{}.xml.bak", secs))
    }

    /// Writes `strings.xlf` and one `strings_<code>.xlf` per target language.
    ///
    /// Each file is written independently; failures are collected.
    pub fn write_xliff(
        &self,
        project: &Project,
        targets: &[LanguageCode],
        source: LanguageCode,
        version: XliffVersion,
    ) -> Result<ExportReport, Error> {
        fs::create_dir_all(self.l10n_dir())?;

        let mut report = ExportReport::default();
        let files = std::iter::once(None).chain(targets.iter().copied().map(Some));
        for target in files {
            let path = self.xliff_path(target);
            let format = XliffFormat::from_project(project, source, target, version);
            match write_replacing(&path, &format) {
                Ok(()) => {
                    tracing::info!("wrote {}", self.display_path(&path).display());
                    report.written.push(path);
                }
                Err(error) => {
                    tracing::warn!("failed to write {}: {}", self.display_path(&path).display(), error);
                    report.failed.push(FileFailure { path, error });
                }
            }
        }
        Ok(report)
    }

    /// Merges every existing `l10n/strings_<code>.xlf` into `project`.
    ///
    /// Files are visited in [`LanguageCode::ALL`] order; missing files are
    /// skipped, unreadable or invalid ones are logged and collected.
    pub fn read_xliff(&self, project: &mut Project) -> Result<ImportReport, Error> {
        let dir = self.l10n_dir();
        if !dir.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("cannot find the {} directory in {}", L10N_DIR, self.root.display()),
            )));
        }

        let mut report = ImportReport::default();
        for lang in LanguageCode::ALL {
            let path = self.xliff_path(Some(lang));
            if !path.is_file() {
                continue;
            }
            tracing::info!("parsing file {}", self.display_path(&path).display());
            match XliffFormat::read_from(&path) {
                Ok(format) => {
                    format.merge_into(project);
                    report.imported.push(lang);
                }
                Err(error) => {
                    tracing::warn!("skipping {}: {}", self.display_path(&path).display(), error);
                    report.failed.push(FileFailure { path, error });
                }
            }
        }
        Ok(report)
    }
}

fn write_replacing(path: &Path, format: &XliffFormat) -> Result<(), Error> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    format.write_to(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ORIGINAL;
    use tempfile::TempDir;

    fn sample() -> Project {
        let mut project = Project::new("Demo Mission");
        project.set_translation("Main", "intro", "str_a", ORIGINAL, "Hello");
        project.set_translation("Main", "intro", "str_a", "German", "Hallo");
        project
    }

    #[test]
    fn test_paths() {
        let wd = WorkDir::new("/mission");
        assert_eq!(wd.stringtable_path(), Path::new("/mission/stringtable.xml"));
        assert_eq!(
            wd.xliff_path(Some(LanguageCode::Czech)),
            Path::new("/mission/l10n/strings_cz.xlf")
        );
        assert_eq!(wd.xliff_path(None), Path::new("/mission/l10n/strings.xlf"));
        assert_eq!(
            wd.display_path(Path::new("/mission/l10n/strings.xlf")),
            Path::new("l10n/strings.xlf")
        );
    }

    #[test]
    fn test_stringtable_write_with_backup() {
        let dir = TempDir::new().unwrap();
        let wd = WorkDir::new(dir.path());
        assert_eq!(wd.write_stringtable(&sample(), true).unwrap(), None);

        let backup = wd.write_stringtable(&sample(), true).unwrap().unwrap();
        assert!(backup.exists());
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("stringtable_") && name.ends_with(".xml.bak"));

        let project = wd.read_stringtable().unwrap();
        assert_eq!(project.name(), "Demo Mission");
    }

    #[test]
    fn test_missing_stringtable_is_error() {
        let dir = TempDir::new().unwrap();
        let err = WorkDir::new(dir.path()).read_stringtable().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_xliff_export_then_import() {
        let dir = TempDir::new().unwrap();
        let wd = WorkDir::new(dir.path());
        let report = wd
            .write_xliff(
                &sample(),
                &[LanguageCode::German, LanguageCode::French],
                LanguageCode::English,
                XliffVersion::V2_0,
            )
            .unwrap();
        assert_eq!(report.written.len(), 3);
        assert!(report.failed.is_empty());
        assert!(wd.xliff_path(None).exists());

        let mut project = Project::default();
        let report = wd.read_xliff(&mut project).unwrap();
        // strings_fr.xlf has no targets but still counts as imported
        assert_eq!(report.imported, vec![LanguageCode::French, LanguageCode::German]);
        assert_eq!(project.name(), "Demo Mission");
        assert_eq!(
            project.get_translation("Main", "intro", "str_a", "German").unwrap().text(),
            "Hallo"
        );
        assert!(project.get_translation("Main", "intro", "str_a", "French").is_none());
    }

    #[test]
    fn test_import_skips_invalid_files() {
        let dir = TempDir::new().unwrap();
        let wd = WorkDir::new(dir.path());
        fs::create_dir_all(wd.l10n_dir()).unwrap();
        fs::write(wd.xliff_path(Some(LanguageCode::Polish)), "<not xliff").unwrap();
        fs::write(
            wd.xliff_path(Some(LanguageCode::Russian)),
            r#"<xliff version="2.0" trgLang="ru"><file id="P"><group id="Main"><unit id="c"><segment id="k"><source>Yes</source><target>Да</target></segment></unit></group></file></xliff>"#,
        )
        .unwrap();

        let mut project = Project::default();
        let report = wd.read_xliff(&mut project).unwrap();
        assert_eq!(report.imported, vec![LanguageCode::Russian]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("strings_pl.xlf"));
        assert_eq!(
            project.get_translation("Main", "c", "k", "Russian").unwrap().text(),
            "Да"
        );
    }

    #[test]
    fn test_import_without_l10n_dir() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::default();
        assert!(WorkDir::new(dir.path()).read_xliff(&mut project).is_err());
    }
}
