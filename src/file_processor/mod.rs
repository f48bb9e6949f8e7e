use crate::app_error::AppError;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};


/// Dropping this file into a directory excludes the whole subtree from
/// processing.
pub const SKIP_SENTINEL: &str = ".skip-commander";

pub const DEFAULT_EXTENSION: &str = "py";

/// Finds candidate files beneath a root directory, filtered by extension.
pub struct FileProcessor {
    recursive: bool,
    extensions: Vec<String>,
}

impl FileProcessor {
    pub fn new(recursive: bool, extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self {
            recursive,
            extensions,
        }
    }

    /// Walk `root` and return matching files, sorted, relative to `root`.
    ///
    /// Hidden entries, `__pycache__`, and any directory holding the skip
    /// sentinel are pruned. Gitignore semantics are deliberately not in
    /// play here; only the sentinel and hidden rules apply.
    pub fn find_files(&self, root: &Path) -> Result<Vec<PathBuf>, AppError> {
        if root.join(SKIP_SENTINEL).exists() {
            println!(
                "Skipping directory: {} (contains {SKIP_SENTINEL})",
                root.display()
            );
            return Ok(Vec::new());
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if !is_dir {
                    return true;
                }
                if entry.path().join(SKIP_SENTINEL).exists() {
                    println!(
                        "Skipping directory: {} (contains {SKIP_SENTINEL})",
                        entry.path().display()
                    );
                    return false;
                }
                entry.file_name().to_str() != Some("__pycache__")
            });
        if !self.recursive {
            builder.max_depth(Some(1));
        }

        let mut files = Vec::new();
        for result in builder.build() {
            let entry = result
                .map_err(|e| AppError::Config(format!("Failed to walk directory tree: {e}")))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if !self.matches_extension(entry.path()) {
                continue;
            }
            let rel = match entry.path().strip_prefix(root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => entry.into_path(),
            };
            files.push(rel);
        }
        files.sort();
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions.contains(&e))
    }
}

/// Parse the `-x` value: comma separated, whitespace and leading dots
/// tolerated, empty entries dropped. An empty result falls back to the
/// default extension.
pub fn parse_extensions(value: &str) -> Vec<String> {
    let extensions: Vec<String> = value
        .split(',')
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect();

    if extensions.is_empty() {
        vec![DEFAULT_EXTENSION.to_string()]
    } else {
        extensions
    }
}

/// Language identifier used for a file's opening fence in the prompt.
/// Unknown extensions get no tag.
pub fn language_for_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "md" => "markdown",
        "yml" | "yaml" => "yaml",
        "xml" => "xml",
        "sql" => "sql",
        "sh" | "bash" => "bash",
        "c" => "c",
        "cpp" => "cpp",
        "java" => "java",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        _ => "",
    }
}

pub fn read_file_content(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            eprintln!("Warning: could not read {}: {e}", path.display());
            None
        }
    }
}
