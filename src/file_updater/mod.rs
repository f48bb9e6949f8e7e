use crate::app_error::ApplyError;
use indexmap::IndexMap;
use path_clean::PathClean;
use std::fs;
use std::path::{Component, Path, PathBuf};


const BACKUP_SUFFIX: &str = ".backup";

pub struct ApplyReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ApplyError>,
}

impl ApplyReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Apply parsed file updates relative to the working directory.
///
/// Entries are processed in map order. A failing entry is recorded in the
/// report and the remaining entries are still applied.
pub fn apply_updates(files: &IndexMap<String, String>) -> ApplyReport {
    apply_updates_in(Path::new("."), files)
}

pub(crate) fn apply_updates_in(base_dir: &Path, files: &IndexMap<String, String>) -> ApplyReport {
    let mut report = ApplyReport {
        written: Vec::new(),
        failures: Vec::new(),
    };

    for (path_str, content) in files {
        match apply_one(base_dir, path_str, content) {
            Ok(path) => {
                println!("Updated: {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                eprintln!("{e}");
                report.failures.push(e);
            }
        }
    }

    report
}

// Backup-then-write for a single entry: ensure the parent directory,
// rename any existing file to `<path>.backup`, write the new content.
fn apply_one(base_dir: &Path, path_str: &str, content: &str) -> Result<PathBuf, ApplyError> {
    let rel = validate_path(path_str)?;
    let path = base_dir.join(&rel);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ApplyError::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    if path.exists() {
        let backup = backup_path(&path);
        if backup.exists() {
            // The previous backup is silently replaced.
            let _ = fs::remove_file(&backup);
        }
        fs::rename(&path, &backup).map_err(|e| ApplyError::BackupRename {
            path: rel.clone(),
            source: e,
        })?;
    }

    fs::write(&path, content).map_err(|e| ApplyError::Write {
        path: rel.clone(),
        source: e,
    })?;

    Ok(rel)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Reject paths the model must never write: empty, absolute, traversing
/// upward, or inside `.git`. Returns the cleaned relative path.
pub(crate) fn validate_path(path_str: &str) -> Result<PathBuf, ApplyError> {
    let invalid = |reason: &str| ApplyError::InvalidPath {
        path: path_str.to_string(),
        reason: reason.to_string(),
    };

    if path_str.trim().is_empty() {
        return Err(invalid("empty path"));
    }

    let raw = PathBuf::from(path_str);
    // Traversal is detected on the raw input so `a/../../b` cannot hide
    // behind cleaning.
    for component in raw.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("absolute paths are not allowed"));
            }
            Component::ParentDir => {
                return Err(invalid("path traversal ('..') is not allowed"));
            }
            _ => {}
        }
    }

    let cleaned = raw.clean();
    if let Some(Component::Normal(first)) = cleaned.components().next() {
        if first.to_str() == Some(".git") {
            return Err(invalid("writing into the .git directory is not allowed"));
        }
    }

    Ok(cleaned)
}
