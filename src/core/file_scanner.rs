use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::Pattern;
use walkdir::WalkDir;

use super::error::{GenerateError, SourceWarning};

/// Result of walking the template directories.
pub struct ScanResult {
    /// Source files, de-duplicated and in path order.
    pub files: BTreeSet<PathBuf>,
    /// Entries that could not be accessed during the walk.
    pub warnings: Vec<SourceWarning>,
}

/// Collect every file under `dirs` whose extension is in `extensions`,
/// minus those matching an `ignores` glob (matched against the full path).
///
/// Each directory must exist; the first one that does not is reported as
/// `GenerateError::DirectoryNotFound`.
pub fn scan_files(
    dirs: &[PathBuf],
    extensions: &[String],
    ignores: &[Pattern],
) -> Result<ScanResult, GenerateError> {
    for dir in dirs {
        if !dir.is_dir() {
            return Err(GenerateError::DirectoryNotFound(dir.clone()));
        }
    }

    let mut files = BTreeSet::new();
    let mut warnings = Vec::new();
    for dir in dirs {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                    warnings.push(SourceWarning::Unreadable {
                        path,
                        source: e.into(),
                    });
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, extensions) {
                continue;
            }
            let path_str = path.to_string_lossy();
            if ignores.iter().any(|p| p.matches(&path_str)) {
                continue;
            }
            files.insert(path.to_path_buf());
        }
    }

    Ok(ScanResult { files, warnings })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}
